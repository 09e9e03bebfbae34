//! Writer configuration
//!
//! All options have defaults, so an empty TOML table is a valid config:
//!
//! ```toml
//! queue_size = 8192
//! write_timeout = "0s"
//! flush_interval = "10ms"
//! rotate_interval = "10s"
//! rotation = "daily"          # hourly | daily | monthly | "<strftime>"
//! max_size = 1073741824       # 0 disables size rotation
//! max_files = 0               # 0 keeps every rotated file
//! ```

use std::fmt::Write as _;
use std::time::Duration;

use chrono::format::{Item, Parsed, StrftimeItems};
use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::error::{Result, WriterError};

/// Default bounded queue capacity
pub const DEFAULT_QUEUE_SIZE: usize = 8192;

/// Default flush interval for the aggregation buffer
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

/// Default rotation check interval
pub const DEFAULT_ROTATE_INTERVAL: Duration = Duration::from_secs(10);

/// Default size threshold (1 GiB)
pub const DEFAULT_MAX_SIZE: u64 = 1 << 30;

/// Default number of pre-allocated pooled buffers
pub const DEFAULT_POOL_SIZE: usize = 1024;

/// Default capacity of a pooled buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

const HOURLY_FORMAT: &str = "%Y-%m-%dT%H";
const DAILY_FORMAT: &str = "%Y-%m-%d";
const MONTHLY_FORMAT: &str = "%Y-%m";

/// Time bucket used to decide calendar rotation
///
/// The bucket label is also the suffix of the first archive produced in a
/// bucket (`app.log.2025-01-15`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationInterval {
    /// One bucket per hour
    Hourly,
    /// One bucket per calendar day
    #[default]
    Daily,
    /// One bucket per calendar month
    Monthly,
    /// Any `strftime` format
    #[serde(untagged)]
    Custom(String),
}

impl RotationInterval {
    /// The `strftime` format for this interval
    pub fn format(&self) -> &str {
        match self {
            Self::Hourly => HOURLY_FORMAT,
            Self::Daily => DAILY_FORMAT,
            Self::Monthly => MONTHLY_FORMAT,
            Self::Custom(format) => format,
        }
    }

    /// Bucket label for the given time
    pub fn bucket(&self, now: &DateTime<Local>) -> String {
        let mut label = String::with_capacity(16);
        if write!(label, "{}", now.format(self.format())).is_err() {
            // unreachable for validated configs
            label.clear();
            let _ = write!(label, "{}", now.format(DAILY_FORMAT));
        }
        label
    }

    /// Whether `label` could have been produced by [`bucket`](Self::bucket)
    pub fn matches_label(&self, label: &str) -> bool {
        let mut parsed = Parsed::new();
        !label.is_empty()
            && chrono::format::parse(&mut parsed, label, StrftimeItems::new(self.format())).is_ok()
    }

    fn validate(&self) -> Result<()> {
        let format = self.format();
        if format.is_empty() {
            return Err(WriterError::config("rotation format is empty"));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(WriterError::config(format!(
                "rotation format '{format}' is not a valid strftime format"
            )));
        }
        let sample = self.bucket(&Local::now());
        if sample.is_empty() || sample.contains(['/', '\\']) {
            return Err(WriterError::config(format!(
                "rotation format '{format}' must produce a non-empty file name suffix"
            )));
        }
        Ok(())
    }
}

/// Configuration for [`FileWriter`](crate::FileWriter)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WriterConfig {
    /// Bounded queue capacity (slots)
    pub queue_size: usize,

    /// How long `write` may block for a queue slot (zero = never block)
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,

    /// Interval at which aggregated bytes are written to the file
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,

    /// Interval at which the rotation policy runs
    #[serde(with = "humantime_serde")]
    pub rotate_interval: Duration,

    /// Time bucket format
    pub rotation: RotationInterval,

    /// Rotate once the active file grows beyond this many bytes (0 = never)
    pub max_size: u64,

    /// Rotated files to keep (0 = keep all)
    pub max_files: usize,

    /// Pre-allocated pooled buffers
    pub pool_size: usize,

    /// Capacity of each pooled buffer
    pub buffer_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            write_timeout: Duration::ZERO,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            rotate_interval: DEFAULT_ROTATE_INTERVAL,
            rotation: RotationInterval::Daily,
            max_size: DEFAULT_MAX_SIZE,
            max_files: 0,
            pool_size: DEFAULT_POOL_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl WriterConfig {
    /// Set the queue capacity
    #[must_use]
    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    /// Let `write` block up to `timeout` for a free slot
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the flush interval
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set the rotation check interval
    #[must_use]
    pub fn with_rotate_interval(mut self, interval: Duration) -> Self {
        self.rotate_interval = interval;
        self
    }

    /// Set the time bucket
    #[must_use]
    pub fn with_rotation(mut self, rotation: RotationInterval) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the size threshold (0 disables size rotation)
    #[must_use]
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the number of rotated files to keep (0 = unlimited)
    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.queue_size == 0 {
            return Err(WriterError::config("queue_size must be greater than 0"));
        }
        if self.flush_interval.is_zero() {
            return Err(WriterError::config("flush_interval must be greater than 0"));
        }
        if self.rotate_interval.is_zero() {
            return Err(WriterError::config("rotate_interval must be greater than 0"));
        }
        self.rotation.validate()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
