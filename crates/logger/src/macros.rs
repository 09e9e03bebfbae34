//! Formatting macros
//!
//! ```no_run
//! use flog::{LogConfig, Logger};
//!
//! let logger = Logger::new(&LogConfig::default())?;
//! let user = "alice";
//! flog::info!(logger, "user {user} logged in");
//! flog::error!(logger, "request failed: {}", 503);
//! # Ok::<(), flog::LogError>(())
//! ```

/// Log a formatted message at debug level
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at info level
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at warn level
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at error level
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}
