//! Aggregation daemon
//!
//! The only thread that touches the log file. It waits on four events:
//!
//! ```text
//! rotate tick ──▶ flush, then run the rotation policy
//! record      ──▶ append to the scratch buffer, return the pooled buffer
//! flush tick  ──▶ write the scratch buffer in one call
//! shutdown    ──▶ flush, drain the queue record by record, fsync, exit
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use chrono::Local;
use crossbeam::channel::{self, Receiver};
use crossbeam::select;

use crate::buffer_pool::BufferPool;
use crate::fallback::Fallback;
use crate::metrics::WriterMetrics;
use crate::rate_limited_logger::RateLimitedLogger;
use crate::rotation::{Outcome, RotatingFile};

/// Scratch size that triggers a flush before the next tick
const MAX_AGGREGATE_BYTES: usize = 4 * 1024 * 1024;

pub(crate) struct Daemon {
    file: RotatingFile,
    scratch: BytesMut,
    pool: Arc<BufferPool>,
    flush_interval: Duration,
    rotate_interval: Duration,
    metrics: Arc<WriterMetrics>,
    fallback: Arc<Fallback>,
    errors: RateLimitedLogger,
}

impl Daemon {
    pub(crate) fn new(
        file: RotatingFile,
        pool: Arc<BufferPool>,
        flush_interval: Duration,
        rotate_interval: Duration,
        metrics: Arc<WriterMetrics>,
        fallback: Arc<Fallback>,
    ) -> Self {
        Self {
            file,
            scratch: BytesMut::with_capacity(64 * 1024),
            pool,
            flush_interval,
            rotate_interval,
            metrics,
            fallback,
            errors: RateLimitedLogger::default(),
        }
    }

    /// Run until `shutdown` fires (or every record sender is gone), then
    /// drain whatever is still queued.
    pub(crate) fn run(mut self, records: Receiver<BytesMut>, shutdown: Receiver<()>) {
        let rotate_tick = channel::tick(self.rotate_interval);
        let flush_tick = channel::tick(self.flush_interval);

        tracing::debug!(path = %self.file.path().display(), "writer daemon started");

        loop {
            select! {
                recv(rotate_tick) -> _ => {
                    self.flush();
                    self.rotate();
                }
                recv(records) -> record => match record {
                    Ok(record) => self.aggregate(record),
                    Err(_) => break,
                },
                recv(flush_tick) -> _ => self.flush(),
                recv(shutdown) -> _ => break,
            }
        }

        self.drain(&records);
    }

    fn aggregate(&mut self, record: BytesMut) {
        self.scratch.extend_from_slice(&record);
        self.pool.put(record);
        if self.scratch.len() >= MAX_AGGREGATE_BYTES {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.scratch.is_empty() {
            return;
        }
        let mut scratch = std::mem::take(&mut self.scratch);
        self.write_out(&scratch);
        scratch.clear();
        self.scratch = scratch;
    }

    fn rotate(&mut self) {
        let check = self.file.check(Local::now());
        if !check.evicted.is_empty() {
            self.metrics.record_evicted(check.evicted.len() as u64);
        }
        match check.outcome {
            Outcome::Rotated(_) => self.metrics.record_rotation(),
            Outcome::Failed => self.metrics.record_rotation_error(),
            Outcome::Skipped => {}
        }
    }

    fn write_out(&mut self, bytes: &[u8]) {
        let had_file = self.file.is_writable();
        let before = self.file.size();

        match self.file.write(bytes) {
            Ok(n) => self.metrics.record_flush(n as u64),
            Err(e) => {
                let partial = if had_file {
                    self.file.size().saturating_sub(before)
                } else {
                    0
                };
                self.metrics.record_write_error(partial);
                self.errors
                    .error(&self.file.path().display(), "write log error", &e);
                if !self.file.is_writable() {
                    self.fallback.emit(bytes);
                }
            }
        }
    }

    fn drain(&mut self, records: &Receiver<BytesMut>) {
        self.flush();

        let mut drained = 0u64;
        while let Ok(record) = records.try_recv() {
            self.write_out(&record);
            self.pool.put(record);
            drained += 1;
        }

        if let Err(e) = self.file.sync() {
            tracing::error!(path = %self.file.path().display(), error = %e, "final sync failed");
        }

        tracing::debug!(
            path = %self.file.path().display(),
            drained,
            "writer daemon stopped"
        );
    }
}
