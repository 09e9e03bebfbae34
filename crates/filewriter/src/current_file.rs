//! The single append-mode file receiving log bytes

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Open log file plus the number of bytes it holds
///
/// `size` starts at the file's on-disk length, so a restarted process keeps
/// an accurate count for size-based rotation.
#[derive(Debug)]
pub struct CurrentFile {
    path: PathBuf,
    file: File,
    size: u64,
}

impl CurrentFile {
    /// Open (or create) `path` in append mode
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        Ok(Self { path, file, size })
    }

    /// Append `buf`, returning the number of bytes that reached the file
    ///
    /// On a short write the counter still advances by the partial amount
    /// before the error is returned.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_counted(&mut self.file, &mut self.size, buf)
    }

    /// Bytes in the file since it was opened (including pre-existing bytes)
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last modification time reported by the filesystem
    pub fn modified(&self) -> io::Result<SystemTime> {
        self.file.metadata()?.modified()
    }

    /// Flush file data to stable storage
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_data()
    }
}

/// Write all of `buf`, adding every byte that lands to `size`
pub(crate) fn write_counted<W: Write>(
    writer: &mut W,
    size: &mut u64,
    mut buf: &[u8],
) -> io::Result<usize> {
    let mut written = 0;
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("wrote {written} of {} bytes", written + buf.len()),
                ));
            }
            Ok(n) => {
                written += n;
                *size += n as u64;
                buf = &buf[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}
