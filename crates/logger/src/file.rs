//! Severity-split log files
//!
//! ```text
//! <dir>/
//! ├── info.log      # debug and info
//! ├── warning.log   # warn
//! └── error.log     # error
//! ```
//!
//! Each file has its own [`FileWriter`], so rotation and retention apply per
//! severity.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use flog_filewriter::{FileWriter, MetricsSnapshot, WriterConfig};

use crate::error::{LogError, Result};
use crate::handler::{Handler, Record};
use crate::level::Level;
use crate::pattern::PatternRender;

/// File names indexed by [`file_index`]
pub const FILE_NAMES: [&str; 3] = ["info.log", "warning.log", "error.log"];

fn file_index(level: Level) -> usize {
    match level {
        Level::Debug | Level::Info => 0,
        Level::Warn => 1,
        Level::Error => 2,
    }
}

/// Writes rendered records to one file per severity
pub struct FileHandler {
    dir: PathBuf,
    render: PatternRender,
    writers: [FileWriter; 3],
    dropped: AtomicU64,
}

impl FileHandler {
    pub fn new(dir: impl AsRef<Path>, render: PatternRender, config: &WriterConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let open = |file: &'static str| {
            FileWriter::new(dir.join(file), config.clone())
                .map_err(|source| LogError::Writer { file, source })
        };

        let writers = [open(FILE_NAMES[0])?, open(FILE_NAMES[1])?, open(FILE_NAMES[2])?];

        Ok(Self {
            dir: dir.to_path_buf(),
            render,
            writers,
            dropped: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Records rejected by a full queue or a closed writer
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Writer counters for the file receiving `level`
    pub fn metrics(&self, level: Level) -> MetricsSnapshot {
        self.writers[file_index(level)].metrics()
    }
}

impl Handler for FileHandler {
    fn log(&self, record: &Record) {
        let mut line = self.render.render_string(record);
        line.push('\n');

        // one write per record keeps lines whole across producers
        if self.writers[file_index(record.level)]
            .write(line.as_bytes())
            .is_err()
        {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn close(&self) -> Result<()> {
        let mut first_error = None;
        for (writer, file) in self.writers.iter().zip(FILE_NAMES) {
            if let Err(source) = writer.close() {
                tracing::error!(file, error = %source, "failed to close log file");
                first_error.get_or_insert(LogError::Writer { file, source });
            }
        }

        let dropped = self.dropped();
        if dropped > 0 {
            tracing::warn!(dir = %self.dir.display(), dropped, "log records were dropped");
        }

        first_error.map_or(Ok(()), Err)
    }
}
