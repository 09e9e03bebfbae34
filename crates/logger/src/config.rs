//! Logger configuration
//!
//! # Example
//!
//! ```toml
//! level = "info"
//! console = true
//! console_target = "stderr"
//! color = true
//! dir = "/var/log/app"
//! pattern = "[%D %T] [%L] [%S] %M"
//!
//! [file]
//! rotation = "daily"
//! max_size = 104857600
//! max_files = 7
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flog_filewriter::{WriterConfig, WriterError};
use serde::Deserialize;

use crate::console::ConsoleTarget;
use crate::error::{LogError, Result};
use crate::level::Level;
use crate::pattern::DEFAULT_PATTERN;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level that is emitted
    /// Default: info
    pub level: Level,

    /// Enable the console handler
    /// Default: true
    pub console: bool,

    /// Console stream (stdout, stderr)
    /// Default: stderr
    pub console_target: ConsoleTarget,

    /// Colour console lines by level
    /// Default: false
    pub color: bool,

    /// Directory for `info.log`, `warning.log` and `error.log`;
    /// no file handler when unset
    pub dir: Option<PathBuf>,

    /// Line pattern shared by all handlers
    pub pattern: String,

    /// Options for every log file writer
    pub file: WriterConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            console: true,
            console_target: ConsoleTarget::Stderr,
            color: false,
            dir: None,
            pattern: DEFAULT_PATTERN.to_string(),
            file: WriterConfig::default(),
        }
    }
}

impl LogConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| LogError::ReadConfig {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Log files into `dir`
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: WriterConfig) -> Self {
        self.file = file;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(LogError::config("pattern is empty"));
        }
        if let Some(dir) = &self.dir {
            if dir.as_os_str().is_empty() {
                return Err(LogError::config("dir is empty"));
            }
            self.file.validate().map_err(|e| match e {
                WriterError::Config(msg) => LogError::config(format!("[file] {msg}")),
                other => LogError::config(other.to_string()),
            })?;
        }
        Ok(())
    }

    fn parse(s: &str) -> Result<Self> {
        let config: LogConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl FromStr for LogConfig {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
