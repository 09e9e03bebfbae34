//! Rotated file history and retention eviction

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::config::RotationInterval;

/// One archived log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedFile {
    /// Time bucket the archived bytes belong to
    pub bucket: String,
    /// Intra-bucket sequence (0 for the first archive of a bucket)
    pub sequence: u32,
    /// File name inside the log directory
    pub file_name: String,
}

/// Archived files, oldest first
#[derive(Debug, Default)]
pub struct RotationHistory {
    entries: VecDeque<RotatedFile>,
    max_files: usize,
}

impl RotationHistory {
    /// Empty history keeping at most `max_files` archives (0 = unlimited)
    pub fn new(max_files: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_files,
        }
    }

    /// Seed the history from archives of `base_name` already in `dir`
    ///
    /// Matches `<base_name>.<suffix>` where the suffix is a sequence number
    /// or a label `rotation` could have produced. Anything else (such as a
    /// sibling `app.log` next to a writer named `app`) is left alone.
    /// Ordered by modification time, oldest first.
    pub fn recover(
        dir: &Path,
        base_name: &str,
        rotation: &RotationInterval,
        max_files: usize,
    ) -> io::Result<Self> {
        let prefix = format!("{base_name}.");
        let mut found: Vec<(SystemTime, RotatedFile)> = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let Some(suffix) = file_name.strip_prefix(&prefix) else {
                continue;
            };
            if suffix.is_empty() || !entry.file_type()?.is_file() {
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            let (bucket, sequence) = match suffix.parse::<u32>() {
                Ok(sequence) => (String::new(), sequence),
                Err(_) if rotation.matches_label(suffix) => (suffix.to_string(), 0),
                Err(_) => continue,
            };
            found.push((
                modified,
                RotatedFile {
                    bucket,
                    sequence,
                    file_name,
                },
            ));
        }

        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.file_name.cmp(&b.1.file_name)));

        Ok(Self {
            entries: found.into_iter().map(|(_, f)| f).collect(),
            max_files,
        })
    }

    /// Record a new archive (newest)
    pub fn push(&mut self, file: RotatedFile) {
        self.entries.push_back(file);
    }

    /// Delete the oldest archives until at most `max_files` remain
    ///
    /// Deletion is best-effort: a failed removal is logged and the entry is
    /// still dropped from the history. Returns the evicted entries.
    pub fn evict(&mut self, dir: &Path) -> Vec<RotatedFile> {
        let mut evicted = Vec::new();
        if self.max_files == 0 {
            return evicted;
        }

        while self.entries.len() > self.max_files {
            let Some(oldest) = self.entries.pop_front() else {
                break;
            };
            let path = dir.join(&oldest.file_name);
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "evicted rotated log file");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove rotated log file");
                }
            }
            evicted.push(oldest);
        }
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Archives, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &RotatedFile> {
        self.entries.iter()
    }
}
