//! File writer error types

use std::io;
use thiserror::Error;

/// Result type for file writer operations
pub type Result<T> = std::result::Result<T, WriterError>;

/// Errors surfaced by the file writer
///
/// Construction errors (`InvalidPath`, `NotADirectory`, `CreateDir`, `Open`,
/// `Config`, `Spawn`) are returned from `FileWriter::new`. A producer sees
/// `Closed` or `QueueFull` from `write`, or `DaemonPanicked` once the
/// daemon has died without a `close()`.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Write attempted after `close()`
    #[error("filewriter already closed")]
    Closed,

    /// The bounded queue had no free slot (immediately or within the timeout)
    #[error("log queue is full")]
    QueueFull,

    /// The log path has no usable file name
    #[error("invalid log path '{path}': {reason}")]
    InvalidPath {
        /// Offending path
        path: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The parent of the log file exists but is not a directory
    #[error("'{0}' already exists and is not a directory")]
    NotADirectory(String),

    /// The log directory could not be created
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Directory path
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The active log file could not be opened
    #[error("failed to open '{path}': {source}")]
    Open {
        /// File path
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Invalid writer configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The background daemon thread could not be started
    #[error("failed to spawn writer daemon: {0}")]
    Spawn(#[source] io::Error),

    /// The background daemon panicked before finishing its drain
    #[error("writer daemon panicked")]
    DaemonPanicked,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WriterError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error is transient backpressure rather than a dead writer
    pub fn is_backpressure(&self) -> bool {
        matches!(self, Self::QueueFull)
    }
}

impl From<WriterError> for io::Error {
    fn from(err: WriterError) -> Self {
        match err {
            WriterError::Io(e) => e,
            WriterError::QueueFull => io::Error::new(io::ErrorKind::WouldBlock, err),
            WriterError::Closed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            other => io::Error::other(other),
        }
    }
}
