//! Logger instance
//!
//! There is no global logger: build one from a [`LogConfig`] and pass it
//! (or an `Arc` of it) to whatever needs to log.

use std::fmt;
use std::panic::Location;

use crate::config::LogConfig;
use crate::console::ConsoleHandler;
use crate::error::Result;
use crate::field::{Field, LOG_KEY, SOURCE_KEY, Value, kv_string};
use crate::file::FileHandler;
use crate::handler::{Handler, Record};
use crate::level::Level;
use crate::pattern::PatternRender;

/// Leveled structured logger fanning records out to its handlers
pub struct Logger {
    level: Level,
    handlers: Vec<Box<dyn Handler>>,
}

impl Logger {
    /// Build the console and file handlers enabled in `config`
    pub fn new(config: &LogConfig) -> Result<Self> {
        config.validate()?;

        let render = PatternRender::new(&config.pattern);
        let mut handlers: Vec<Box<dyn Handler>> = Vec::new();

        if config.console {
            handlers.push(Box::new(ConsoleHandler::new(
                render.clone(),
                config.console_target,
                config.color,
            )));
        }
        if let Some(dir) = &config.dir {
            handlers.push(Box::new(FileHandler::new(dir, render, &config.file)?));
        }

        tracing::debug!(
            level = %config.level,
            console = config.console,
            dir = ?config.dir,
            "logger initialized"
        );

        Ok(Self::with_handlers(config.level, handlers))
    }

    /// Logger over an explicit handler list
    pub fn with_handlers(level: Level, handlers: Vec<Box<dyn Handler>>) -> Self {
        Self { level, handlers }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether records at `level` reach the handlers
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Log `fields` at `level`, stamped with the caller's `file:line`
    ///
    /// A string `source` field overrides the caller location.
    #[track_caller]
    pub fn log(&self, level: Level, fields: Vec<Field>) {
        if !self.enabled(level) {
            return;
        }
        let location = Location::caller();
        self.dispatch(level, location, fields);
    }

    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log_message(Level::Debug, args);
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log_message(Level::Info, args);
    }

    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log_message(Level::Warn, args);
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log_message(Level::Error, args);
    }

    /// Close every handler; all are closed even if one fails
    pub fn close(&self) -> Result<()> {
        let mut first_error = None;
        for handler in &self.handlers {
            if let Err(e) = handler.close() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    #[track_caller]
    fn log_message(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let location = Location::caller();
        self.dispatch(level, location, vec![kv_string(LOG_KEY, args.to_string())]);
    }

    fn dispatch(&self, level: Level, location: &Location<'_>, fields: Vec<Field>) {
        let source = fields
            .iter()
            .find_map(|field| match (&field.key[..], &field.value) {
                (SOURCE_KEY, Value::Str(source)) => Some(source.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("{}:{}", location.file(), location.line()));

        let record = Record::new(level, source, fields);
        for handler in &self.handlers {
            handler.log(&record);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
