//! Flog - File Writer
//!
//! Asynchronous log file writer with time- and size-based rotation.
//!
//! # Architecture
//!
//! Producers never block on disk I/O. Each `write` copies the record into a
//! pooled buffer and enqueues it; a single daemon thread owns the file.
//!
//! ```text
//! [write] --BytesMut--> [bounded queue] --> [daemon] --aggregate--> app.log
//!                                              │
//!                                   rotate tick ┴──> app.log.2025-01-15
//!                                                    app.log.1, app.log.2, ...
//! ```
//!
//! - **Backpressure**: a full queue rejects the write immediately, or after
//!   the configured timeout; the writer never grows unbounded
//! - **Rotation**: on a time-bucket change or once the file exceeds
//!   `max_size`, checked every `rotate_interval`
//! - **Retention**: only the newest `max_files` archives are kept
//! - **Close**: every write accepted before `close` is on disk when it
//!   returns
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use flog_filewriter::{FileWriter, RotationInterval, WriterConfig};
//!
//! let config = WriterConfig::default()
//!     .with_rotation(RotationInterval::Hourly)
//!     .with_max_size(64 * 1024 * 1024)
//!     .with_max_files(24)
//!     .with_write_timeout(Duration::from_millis(5));
//!
//! let writer = FileWriter::new("logs/app.log", config)?;
//! writer.write(b"service started\n")?;
//! writer.close()?;
//! # Ok::<(), flog_filewriter::WriterError>(())
//! ```

/// Recycled record buffers
pub mod buffer_pool;

/// Writer configuration and rotation intervals
pub mod config;

/// Active file handle with byte accounting
pub mod current_file;

/// Writer counters
pub mod metrics;

/// Rate-limited error reporting for the daemon
pub mod rate_limited_logger;

/// Rotated file bookkeeping and retention
pub mod retention;

/// Rotation policy
pub mod rotation;

mod daemon;
mod error;
mod fallback;
mod writer;

pub use buffer_pool::{BufferPool, PoolSnapshot};
pub use config::{RotationInterval, WriterConfig};
pub use current_file::CurrentFile;
pub use error::{Result, WriterError};
pub use metrics::MetricsSnapshot;
pub use rate_limited_logger::RateLimitedLogger;
pub use retention::{RotatedFile, RotationHistory};
pub use rotation::{Outcome, RotatingFile, RotationCheck};
pub use writer::FileWriter;
