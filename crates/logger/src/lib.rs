//! Flog - Leveled structured logger
//!
//! Records are key/value fields stamped with time, level and caller, rendered
//! through a pattern and fanned out to handlers.
//!
//! ```text
//! logger.info(..) ──▶ Record ──┬──▶ ConsoleHandler ──▶ stderr / stdout
//!                              └──▶ FileHandler ──▶ info.log | warning.log | error.log
//!                                                   (one rotating FileWriter each)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use flog::{Level, LogConfig, Logger, kv, kv_string};
//!
//! let config = LogConfig::default().with_dir("logs");
//! let logger = Logger::new(&config)?;
//!
//! flog::info!(logger, "listening on {}", 8080);
//! logger.log(Level::Warn, vec![kv("retries", 3), kv_string("log", "upstream slow")]);
//!
//! logger.close()?;
//! # Ok::<(), flog::LogError>(())
//! ```

pub mod config;
pub mod console;
pub mod field;
pub mod file;
pub mod handler;
pub mod level;
pub mod logger;
pub mod pattern;

mod error;
mod macros;

pub use config::LogConfig;
pub use console::{ConsoleHandler, ConsoleTarget};
pub use error::{LogError, Result};
pub use field::{Field, LOG_KEY, SOURCE_KEY, Value, kv, kv_string};
pub use file::FileHandler;
pub use handler::{Handler, Record};
pub use level::Level;
pub use logger::Logger;
pub use pattern::{DEFAULT_PATTERN, PatternRender};

/// The rotating file writer behind [`FileHandler`]
pub use flog_filewriter as filewriter;
pub use flog_filewriter::{RotationInterval, WriterConfig};
