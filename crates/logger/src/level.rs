//! Severity levels

use std::fmt;

use serde::Deserialize;

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Debugging information
    Debug,
    /// Normal operation (default)
    #[default]
    Info,
    /// Something unexpected that the program recovered from
    Warn,
    /// An operation failed
    Error,
}

impl Level {
    /// Upper-case name used in rendered lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        level: Level,
    }

    #[test]
    fn test_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(Level::Debug.to_string(), "DEBUG");
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_deserialize_lowercase() {
        for (s, expected) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warn", Level::Warn),
            ("error", Level::Error),
        ] {
            let parsed: Wrapper = toml::from_str(&format!("level = \"{s}\"")).unwrap();
            assert_eq!(parsed.level, expected);
        }
        assert!(toml::from_str::<Wrapper>("level = \"INFO\"").is_err());
    }
}
