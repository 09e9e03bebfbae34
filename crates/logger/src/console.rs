//! Terminal output

use std::io::{self, Write};

use owo_colors::{OwoColorize, Style};
use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::Result;
use crate::handler::{Handler, Record};
use crate::level::Level;
use crate::pattern::PatternRender;

/// Console stream
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Renders records to a terminal stream, one line each
pub struct ConsoleHandler {
    render: PatternRender,
    color: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    pub fn new(render: PatternRender, target: ConsoleTarget, color: bool) -> Self {
        match target {
            ConsoleTarget::Stdout => Self::with_writer(render, color, io::stdout()),
            ConsoleTarget::Stderr => Self::with_writer(render, color, io::stderr()),
        }
    }

    /// Console handler writing to an arbitrary stream
    pub fn with_writer(render: PatternRender, color: bool, out: impl Write + Send + 'static) -> Self {
        Self {
            render,
            color,
            out: Mutex::new(Box::new(out)),
        }
    }
}

fn level_style(level: Level, enabled: bool) -> Style {
    if !enabled {
        return Style::new();
    }
    match level {
        Level::Error => Style::new().red(),
        Level::Warn => Style::new().yellow(),
        Level::Info => Style::new(),
        Level::Debug => Style::new().dimmed(),
    }
}

impl Handler for ConsoleHandler {
    fn log(&self, record: &Record) {
        let line = self.render.render_string(record);
        let style = level_style(record.level, self.color);

        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", line.style(style));
    }

    fn close(&self) -> Result<()> {
        self.out.lock().flush()?;
        Ok(())
    }
}
