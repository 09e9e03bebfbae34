//! Front door of the file writer
//!
//! Producers copy their bytes into a pooled buffer and enqueue it on a
//! bounded channel. Nothing on this path touches the file system.
//!
//! # Close protocol
//!
//! Every `write` holds a read guard on the `closed` flag across the check
//! and the enqueue. `close` takes the write guard, so once it flips the
//! flag no producer is mid-enqueue and none can start. Only then is the
//! daemon signalled (through a separate shutdown channel) and joined; it
//! drains everything that made it onto the queue before exiting.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::BytesMut;
use chrono::Local;
use crossbeam::channel::{self, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};

use crate::buffer_pool::{BufferPool, PoolSnapshot};
use crate::config::WriterConfig;
use crate::daemon::Daemon;
use crate::error::{Result, WriterError};
use crate::fallback::Fallback;
use crate::metrics::{MetricsSnapshot, WriterMetrics};
use crate::rotation::RotatingFile;

const DAEMON_THREAD_NAME: &str = "flog-filewriter";

/// Producer half: the closed gate and the enqueue path
pub(crate) struct Ingress {
    sender: Sender<BytesMut>,
    closed: RwLock<bool>,
    write_timeout: Duration,
    pool: Arc<BufferPool>,
    metrics: Arc<WriterMetrics>,
    fallback: Arc<Fallback>,
}

impl Ingress {
    pub(crate) fn new(
        sender: Sender<BytesMut>,
        write_timeout: Duration,
        pool: Arc<BufferPool>,
        metrics: Arc<WriterMetrics>,
        fallback: Arc<Fallback>,
    ) -> Self {
        Self {
            sender,
            closed: RwLock::new(false),
            write_timeout,
            pool,
            metrics,
            fallback,
        }
    }

    pub(crate) fn write(&self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let closed = self.closed.read();
        if *closed {
            drop(closed);
            self.metrics.record_closed();
            self.fallback.emit(buf);
            return Err(WriterError::Closed);
        }

        let mut record = self.pool.get();
        record.extend_from_slice(buf);

        let rejected = if self.write_timeout.is_zero() {
            match self.sender.try_send(record) {
                Ok(()) => None,
                Err(TrySendError::Full(record)) => Some((record, WriterError::QueueFull)),
                Err(TrySendError::Disconnected(record)) => {
                    Some((record, WriterError::DaemonPanicked))
                }
            }
        } else {
            match self.sender.send_timeout(record, self.write_timeout) {
                Ok(()) => None,
                Err(SendTimeoutError::Timeout(record)) => Some((record, WriterError::QueueFull)),
                Err(SendTimeoutError::Disconnected(record)) => {
                    Some((record, WriterError::DaemonPanicked))
                }
            }
        };
        drop(closed);

        match rejected {
            None => {
                self.metrics.record_accepted(buf.len() as u64);
                Ok(buf.len())
            }
            Some((record, WriterError::QueueFull)) => {
                self.pool.put(record);
                self.metrics.record_queue_full();
                Err(WriterError::QueueFull)
            }
            // the receiver only goes away early if the daemon died
            Some((record, err)) => {
                self.pool.put(record);
                self.fallback.emit(buf);
                Err(err)
            }
        }
    }

    /// Flip the gate; returns false if it was already closed
    pub(crate) fn shut(&self) -> bool {
        let mut closed = self.closed.write();
        !std::mem::replace(&mut *closed, true)
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed.read()
    }
}

/// Asynchronous rotating file writer
///
/// `write` never touches the disk: bytes are queued and a background
/// thread aggregates them into the active file, rotating it by time bucket
/// and size. Dropping the writer closes it.
///
/// ```no_run
/// use flog_filewriter::{FileWriter, WriterConfig};
///
/// let writer = FileWriter::new("logs/app.log", WriterConfig::default())?;
/// writer.write(b"hello\n")?;
/// writer.close()?;
/// # Ok::<(), flog_filewriter::WriterError>(())
/// ```
pub struct FileWriter {
    path: PathBuf,
    ingress: Ingress,
    shutdown: Mutex<Option<Sender<()>>>,
    daemon: Mutex<Option<JoinHandle<()>>>,
}

impl FileWriter {
    /// Open `path` and start the daemon; rejected bytes go to stderr
    pub fn new(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self> {
        Self::with_fallback(path, config, io::stderr())
    }

    /// Like [`FileWriter::new`] with a custom fallback stream
    pub fn with_fallback(
        path: impl AsRef<Path>,
        config: WriterConfig,
        fallback: impl io::Write + Send + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let file = RotatingFile::open(path.as_ref(), &config, Local::now())?;
        let path = file.path().to_path_buf();

        let (sender, records) = channel::bounded(config.queue_size);
        let (shutdown, shutdown_rx) = channel::bounded::<()>(0);
        let pool = Arc::new(BufferPool::new(config.pool_size, config.buffer_capacity));
        let metrics = Arc::new(WriterMetrics::new());
        let fallback = Arc::new(Fallback::new(fallback));

        let daemon = Daemon::new(
            file,
            Arc::clone(&pool),
            config.flush_interval,
            config.rotate_interval,
            Arc::clone(&metrics),
            Arc::clone(&fallback),
        );
        let handle = thread::Builder::new()
            .name(DAEMON_THREAD_NAME.into())
            .spawn(move || daemon.run(records, shutdown_rx))
            .map_err(WriterError::Spawn)?;

        tracing::info!(
            path = %path.display(),
            queue_size = config.queue_size,
            rotation = config.rotation.format(),
            max_size = config.max_size,
            max_files = config.max_files,
            "file writer started"
        );

        Ok(Self {
            path,
            ingress: Ingress::new(sender, config.write_timeout, pool, metrics, fallback),
            shutdown: Mutex::new(Some(shutdown)),
            daemon: Mutex::new(Some(handle)),
        })
    }

    /// Queue `buf` for writing
    ///
    /// Returns `buf.len()` once the bytes are queued (never a partial
    /// count), [`WriterError::QueueFull`] when no slot frees up within the
    /// configured timeout, and [`WriterError::Closed`] after `close`. Bytes
    /// rejected because the writer is closed are copied to the fallback.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        self.ingress.write(buf)
    }

    /// Stop accepting writes, drain the queue to disk and join the daemon
    ///
    /// Calling it again is a no-op.
    pub fn close(&self) -> Result<()> {
        if !self.ingress.shut() {
            return Ok(());
        }

        // dropping the sender wakes the daemon
        drop(self.shutdown.lock().take());

        let handle = self.daemon.lock().take();
        let joined = match handle {
            Some(handle) => handle.join().map_err(|_| WriterError::DaemonPanicked),
            None => Ok(()),
        };

        let metrics = self.metrics();
        tracing::info!(
            path = %self.path.display(),
            records = metrics.records_accepted,
            bytes_written = metrics.bytes_written,
            queue_full = metrics.queue_full,
            rotations = metrics.rotations,
            "file writer closed"
        );
        joined
    }

    pub fn is_closed(&self) -> bool {
        self.ingress.is_closed()
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.ingress.metrics.snapshot()
    }

    pub fn pool_metrics(&self) -> PoolSnapshot {
        self.ingress.pool.metrics().snapshot()
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(path = %self.path.display(), error = %e, "close on drop failed");
        }
    }
}

impl io::Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FileWriter::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FileWriter::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod writer_test;
