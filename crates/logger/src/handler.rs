//! Record fan-out
//!
//! A [`Logger`](crate::Logger) stamps every call into a [`Record`] and hands
//! it to each configured [`Handler`] in order.

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::field::{Field, LOG_KEY};
use crate::level::Level;

/// One log call
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Local>,
    pub level: Level,
    /// Caller location as `file:line`
    pub source: String,
    /// User fields in call order, including the `log` message field
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(level: Level, source: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            time: Local::now(),
            level,
            source: source.into(),
            fields,
        }
    }

    /// The `log` field, if the record has one
    pub fn message(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == LOG_KEY)
    }
}

/// Destination for rendered records
pub trait Handler: Send + Sync {
    /// Emit one record; failures are absorbed by the handler
    fn log(&self, record: &Record);

    /// Release resources, flushing anything buffered
    fn close(&self) -> Result<()>;
}
