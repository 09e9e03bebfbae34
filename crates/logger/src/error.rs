//! Logger error types

use std::io;

use flog_filewriter::WriterError;
use thiserror::Error;

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors that can occur when configuring or closing a logger
#[derive(Debug, Error)]
pub enum LogError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    ReadConfig {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid logger configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A log file writer failed
    #[error("log file '{file}': {source}")]
    Writer {
        /// Severity file name (`info.log`, ...)
        file: &'static str,
        /// Underlying writer error
        #[source]
        source: WriterError,
    },

    /// Console output failed
    #[error("console output: {0}")]
    Io(#[from] io::Error),
}

impl LogError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
