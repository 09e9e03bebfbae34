//! Rate-limited error reporting
//!
//! A failing disk produces one error per flush tick (every few
//! milliseconds). This reporter forwards at most one `tracing` event per
//! interval and carries the number of suppressed errors on the next one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default interval between reported errors
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Reports errors through `tracing` at most once per interval
#[derive(Debug)]
pub struct RateLimitedLogger {
    min_interval: Duration,
    last_log_time: Mutex<Option<Instant>>,
    suppressed: AtomicU64,
    total_errors: AtomicU64,
}

impl RateLimitedLogger {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_log_time: Mutex::new(None),
            suppressed: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
        }
    }

    /// Record an error for `path`; returns true if it was emitted
    pub fn error(&self, path: &dyn fmt::Display, message: &str, error: &dyn fmt::Display) -> bool {
        let total = self.total_errors.fetch_add(1, Ordering::Relaxed) + 1;

        if !self.should_log() {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let suppressed = self.suppressed.swap(0, Ordering::Relaxed);
        if suppressed > 0 {
            tracing::error!(
                path = %path,
                error = %error,
                suppressed_count = suppressed,
                total_errors = total,
                "{message} (rate-limited)"
            );
        } else {
            tracing::error!(path = %path, error = %error, total_errors = total, "{message}");
        }
        true
    }

    /// Errors swallowed since the last emitted event
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub fn total_error_count(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }

    fn should_log(&self) -> bool {
        let mut last = self.last_log_time.lock();
        let now = Instant::now();
        match *last {
            Some(at) if now.duration_since(at) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for RateLimitedLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn disk_full() -> io::Error {
        io::Error::new(io::ErrorKind::StorageFull, "disk full")
    }

    #[test]
    fn test_first_error_is_emitted() {
        let logger = RateLimitedLogger::default();
        assert!(logger.error(&"app.log", "write failed", &disk_full()));
        assert_eq!(logger.total_error_count(), 1);
        assert_eq!(logger.suppressed_count(), 0);
    }

    #[test]
    fn test_burst_is_suppressed() {
        let logger = RateLimitedLogger::new(Duration::from_secs(60));
        assert!(logger.error(&"app.log", "write failed", &disk_full()));
        for _ in 0..9 {
            assert!(!logger.error(&"app.log", "write failed", &disk_full()));
        }
        assert_eq!(logger.total_error_count(), 10);
        assert_eq!(logger.suppressed_count(), 9);
    }

    #[test]
    fn test_emits_again_after_interval() {
        let logger = RateLimitedLogger::new(Duration::from_millis(5));
        assert!(logger.error(&"app.log", "write failed", &disk_full()));
        assert!(!logger.error(&"app.log", "write failed", &disk_full()));

        std::thread::sleep(Duration::from_millis(20));
        assert!(logger.error(&"app.log", "write failed", &disk_full()));
        assert_eq!(logger.suppressed_count(), 0);
    }
}
