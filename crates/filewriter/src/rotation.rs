//! Rotation policy
//!
//! `RotatingFile` owns the active log file, the rotation history and the
//! bucket/sequence bookkeeping. It is driven by a single owner (the daemon),
//! so none of its state is synchronized.
//!
//! # Naming
//!
//! ```text
//! logs/
//! ├── app.log              # active file
//! ├── app.log.2025-01-14   # first archive of a bucket
//! ├── app.log.1            # further archives of the same bucket
//! └── app.log.2
//! ```
//!
//! An existing file is never overwritten: if the computed archive name is
//! taken, the next free sequence number is used instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::{RotationInterval, WriterConfig};
use crate::current_file::CurrentFile;
use crate::error::{Result, WriterError};
use crate::rate_limited_logger::RateLimitedLogger;
use crate::retention::{RotatedFile, RotationHistory};

/// Result of one rotation policy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Neither the bucket nor the size threshold demanded a rotation
    Skipped,
    /// The active file was archived and a fresh one opened
    Rotated(RotatedFile),
    /// Rotation was attempted and aborted; a writable file is kept if possible
    Failed,
}

/// What a rotation check did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationCheck {
    pub outcome: Outcome,
    /// Archives deleted by retention during this check
    pub evicted: Vec<RotatedFile>,
}

impl RotationCheck {
    pub fn rotated(&self) -> bool {
        matches!(self.outcome, Outcome::Rotated(_))
    }
}

/// Active log file plus rotation state
#[derive(Debug)]
pub struct RotatingFile {
    dir: PathBuf,
    file_name: String,
    path: PathBuf,
    rotation: RotationInterval,
    max_size: u64,
    current: Option<CurrentFile>,
    history: RotationHistory,
    last_bucket: String,
    sequence: u32,
    open_errors: RateLimitedLogger,
}

impl RotatingFile {
    /// Open the active file at `path`, creating its directory if needed
    ///
    /// `now` seeds the current bucket for a new or empty file. A non-empty
    /// file left by an earlier run starts in the bucket of its modification
    /// time, so it is archived under that label once the bucket moves on.
    pub fn open(path: impl AsRef<Path>, config: &WriterConfig, now: DateTime<Local>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| WriterError::InvalidPath {
                path: display.clone(),
                reason: "file name is empty or not valid UTF-8",
            })?
            .to_string();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_dir(&dir)?;

        let current = CurrentFile::open(path).map_err(|source| WriterError::Open {
            path: display,
            source,
        })?;
        let history =
            RotationHistory::recover(&dir, &file_name, &config.rotation, config.max_files)?;

        let last_bucket = match current.modified() {
            Ok(modified) if current.size() > 0 => {
                config.rotation.bucket(&DateTime::<Local>::from(modified))
            }
            _ => config.rotation.bucket(&now),
        };

        tracing::debug!(
            path = %path.display(),
            size = current.size(),
            bucket = %last_bucket,
            archives = history.len(),
            "opened log file"
        );

        Ok(Self {
            dir,
            file_name,
            path: path.to_path_buf(),
            rotation: config.rotation.clone(),
            max_size: config.max_size,
            current: Some(current),
            history,
            last_bucket,
            sequence: 0,
            open_errors: RateLimitedLogger::default(),
        })
    }

    /// Append bytes to the active file
    ///
    /// If an earlier rotation left no open file, reopening is retried first.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.current.is_none() {
            self.reopen();
        }
        match self.current.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other(format!(
                "no writable log file at {}",
                self.path.display()
            ))),
        }
    }

    /// Run the rotation policy for time `now`
    pub fn check(&mut self, now: DateTime<Local>) -> RotationCheck {
        let bucket = self.rotation.bucket(&now);
        let mut evicted = self.history.evict(&self.dir);

        if self.current.is_none() && !self.reopen() {
            return RotationCheck {
                outcome: Outcome::Failed,
                evicted,
            };
        }

        let size = self.size();
        let bucket_changed = bucket != self.last_bucket;
        let oversized = self.max_size != 0 && size > self.max_size;

        if !bucket_changed && !oversized {
            return RotationCheck {
                outcome: Outcome::Skipped,
                evicted,
            };
        }

        // nothing worth archiving
        if size == 0 {
            self.enter_bucket(bucket);
            return RotationCheck {
                outcome: Outcome::Skipped,
                evicted,
            };
        }

        let (archive, sequence) = self.archive_name();
        let archive_path = self.dir.join(&archive);

        if let Some(file) = self.current.take() {
            if let Err(e) = file.sync() {
                tracing::warn!(path = %self.path.display(), error = %e, "sync before rotation failed");
            }
        }

        if let Err(e) = fs::rename(&self.path, &archive_path) {
            tracing::error!(
                from = %self.path.display(),
                to = %archive_path.display(),
                error = %e,
                "rename during rotation failed"
            );
            self.reopen();
            return RotationCheck {
                outcome: Outcome::Failed,
                evicted,
            };
        }

        self.reopen();

        let rotated = RotatedFile {
            bucket: self.last_bucket.clone(),
            sequence,
            file_name: archive,
        };
        self.history.push(rotated.clone());

        if bucket_changed {
            self.enter_bucket(bucket);
        } else {
            self.sequence = sequence + 1;
        }
        evicted.extend(self.history.evict(&self.dir));

        let reason = if bucket_changed { "bucket" } else { "size" };
        tracing::info!(
            path = %self.path.display(),
            archive = %rotated.file_name,
            bytes = size,
            reason,
            "log file rotated"
        );

        RotationCheck {
            outcome: Outcome::Rotated(rotated),
            evicted,
        }
    }

    /// Flush the active file to stable storage
    pub fn sync(&self) -> io::Result<()> {
        match &self.current {
            Some(file) => file.sync(),
            None => Ok(()),
        }
    }

    /// Bytes in the active file (0 when no file is open)
    pub fn size(&self) -> u64 {
        self.current.as_ref().map_or(0, CurrentFile::size)
    }

    /// Whether an active file is currently open
    pub fn is_writable(&self) -> bool {
        self.current.is_some()
    }

    /// Canonical path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn history(&self) -> &RotationHistory {
        &self.history
    }

    pub fn last_bucket(&self) -> &str {
        &self.last_bucket
    }

    /// Reporter for failed reopens of the active file
    pub fn open_errors(&self) -> &RateLimitedLogger {
        &self.open_errors
    }

    fn enter_bucket(&mut self, bucket: String) {
        self.last_bucket = bucket;
        self.sequence = 0;
    }

    fn archive_name(&self) -> (String, u32) {
        let mut sequence = self.sequence;
        let mut name = if sequence == 0 {
            format!("{}.{}", self.file_name, self.last_bucket)
        } else {
            format!("{}.{}", self.file_name, sequence)
        };

        while self.dir.join(&name).exists() {
            sequence += 1;
            name = format!("{}.{}", self.file_name, sequence);
        }
        (name, sequence)
    }

    fn reopen(&mut self) -> bool {
        match CurrentFile::open(&self.path) {
            Ok(file) => {
                self.current = Some(file);
                true
            }
            Err(e) => {
                // retried on every flush tick while the file is gone
                self.open_errors
                    .error(&self.path.display(), "failed to open log file", &e);
                self.current = None;
                false
            }
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(WriterError::NotADirectory(dir.display().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| WriterError::CreateDir {
                path: dir.display().to_string(),
                source,
            })
        }
        Err(e) => Err(WriterError::Io(e)),
    }
}

#[cfg(test)]
#[path = "rotation_test.rs"]
mod rotation_test;
