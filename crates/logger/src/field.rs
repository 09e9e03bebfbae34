//! Structured key/value fields

use std::fmt;
use std::time::Duration;

/// Key of the field holding the formatted message
pub const LOG_KEY: &str = "log";

/// Key that overrides the caller location when given as a field
pub const SOURCE_KEY: &str = "source";

/// Keys reserved for record metadata; never rendered as user fields
pub(crate) const RESERVED_KEYS: [&str; 3] = [SOURCE_KEY, "level", "time"];

/// Field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(Duration),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Duration(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_int!(I64, i64: i8, i16, i32, i64, isize);
impl_from_int!(U64, u64: u8, u16, u32, u64, usize);
impl_from_int!(F64, f64: f32, f64);

/// One key/value pair of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub(crate) fn is_reserved(&self) -> bool {
        RESERVED_KEYS.contains(&self.key.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Field with any supported value type
pub fn kv(key: impl Into<String>, value: impl Into<Value>) -> Field {
    Field {
        key: key.into(),
        value: value.into(),
    }
}

/// Field with a string value
pub fn kv_string(key: impl Into<String>, value: impl Into<String>) -> Field {
    Field {
        key: key.into(),
        value: Value::Str(value.into()),
    }
}
