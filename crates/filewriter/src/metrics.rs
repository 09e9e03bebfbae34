//! Writer counters
//!
//! Producers bump the `accepted`/`rejected` counters; the daemon bumps the
//! rest. Everything is `Relaxed`: the numbers are for observation only.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the front door and the daemon
#[derive(Debug, Default)]
pub struct WriterMetrics {
    /// Records placed on the queue
    pub records_accepted: AtomicU64,

    /// Bytes placed on the queue
    pub bytes_accepted: AtomicU64,

    /// Writes rejected because the queue was full
    pub queue_full: AtomicU64,

    /// Writes rejected because the writer was closed
    pub closed_rejections: AtomicU64,

    /// Flushes of the aggregation buffer
    pub flushes: AtomicU64,

    /// Bytes that reached the active file
    pub bytes_written: AtomicU64,

    /// Failed or short file writes
    pub write_errors: AtomicU64,

    /// Completed rotations
    pub rotations: AtomicU64,

    /// Aborted rotations
    pub rotation_errors: AtomicU64,

    /// Archives deleted by retention
    pub files_evicted: AtomicU64,
}

impl WriterMetrics {
    pub const fn new() -> Self {
        Self {
            records_accepted: AtomicU64::new(0),
            bytes_accepted: AtomicU64::new(0),
            queue_full: AtomicU64::new(0),
            closed_rejections: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            rotation_errors: AtomicU64::new(0),
            files_evicted: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_accepted(&self, bytes: u64) {
        self.records_accepted.fetch_add(1, Ordering::Relaxed);
        self.bytes_accepted.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_queue_full(&self) {
        self.queue_full.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_closed(&self) {
        self.closed_rejections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_flush(&self, bytes: u64) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write_error(&self, partial_bytes: u64) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(partial_bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rotation_error(&self) {
        self.rotation_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_evicted(&self, files: u64) {
        self.files_evicted.fetch_add(files, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            bytes_accepted: self.bytes_accepted.load(Ordering::Relaxed),
            queue_full: self.queue_full.load(Ordering::Relaxed),
            closed_rejections: self.closed_rejections.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            rotation_errors: self.rotation_errors.load(Ordering::Relaxed),
            files_evicted: self.files_evicted.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`WriterMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_accepted: u64,
    pub bytes_accepted: u64,
    pub queue_full: u64,
    pub closed_rejections: u64,
    pub flushes: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
    pub rotations: u64,
    pub rotation_errors: u64,
    pub files_evicted: u64,
}
