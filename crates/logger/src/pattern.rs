//! Line rendering
//!
//! A pattern is compiled once into a list of parts:
//!
//! | Directive | Output |
//! |-----------|--------|
//! | `%D` | date, `2025/01/15` |
//! | `%T` | time, `13:04:05.123` |
//! | `%L` | level, `INFO` |
//! | `%S` | caller, `src/main.rs:42` |
//! | `%M` | user fields as `k=v`, then the `log` message |
//!
//! Any other `%x` sequence and a trailing `%` are copied literally.

use std::fmt::Write as _;

use crate::field::LOG_KEY;
use crate::handler::Record;

/// Pattern used when none is configured
pub const DEFAULT_PATTERN: &str = "[%D %T] [%L] [%S] %M";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Date,
    Time,
    Level,
    Source,
    Message,
}

/// Compiled line pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRender {
    parts: Vec<Part>,
}

impl PatternRender {
    pub fn new(format: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                text.push(c);
                continue;
            }
            let directive = match chars.peek() {
                Some('D') => Part::Date,
                Some('T') => Part::Time,
                Some('L') => Part::Level,
                Some('S') => Part::Source,
                Some('M') => Part::Message,
                _ => {
                    text.push('%');
                    continue;
                }
            };
            chars.next();
            if !text.is_empty() {
                parts.push(Part::Text(std::mem::take(&mut text)));
            }
            parts.push(directive);
        }
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }

        Self { parts }
    }

    /// Append the rendered record to `out`
    pub fn render(&self, record: &Record, out: &mut String) {
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Date => {
                    let _ = write!(out, "{}", record.time.format("%Y/%m/%d"));
                }
                Part::Time => {
                    let _ = write!(out, "{}", record.time.format("%H:%M:%S%.3f"));
                }
                Part::Level => out.push_str(record.level.as_str()),
                Part::Source => out.push_str(&record.source),
                Part::Message => render_message(record, out),
            }
        }
    }

    pub fn render_string(&self, record: &Record) -> String {
        let mut out = String::with_capacity(128);
        self.render(record, &mut out);
        out
    }
}

impl Default for PatternRender {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

/// `k=v` pairs separated by spaces, message last
fn render_message(record: &Record, out: &mut String) {
    let mut first = true;
    for field in &record.fields {
        if field.key == LOG_KEY || field.is_reserved() {
            continue;
        }
        if !first {
            out.push(' ');
        }
        let _ = write!(out, "{field}");
        first = false;
    }

    if let Some(message) = record.message() {
        if !first {
            out.push(' ');
        }
        let _ = write!(out, "{}", message.value);
    }
}

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;
