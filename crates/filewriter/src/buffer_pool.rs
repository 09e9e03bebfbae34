//! Recycled record buffers
//!
//! Every `write` copies the caller's bytes into a buffer checked out from
//! this pool; the daemon returns the buffer once the bytes are aggregated.
//! The pool is a lock-free `ArrayQueue`, so producers and the daemon never
//! contend on a lock.
//!
//! Recycling is an optimization only: an empty pool allocates, a full pool
//! drops, and nothing depends on which buffer a caller receives.

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Buffers that grew past this multiple of the nominal capacity are not
/// recycled, so one huge record cannot pin memory forever.
const OVERSIZE_FACTOR: usize = 64;

/// Lock-free pool of reusable `BytesMut` buffers
pub struct BufferPool {
    queue: ArrayQueue<BytesMut>,
    buffer_capacity: usize,
    metrics: BufferPoolMetrics,
}

/// Buffer pool counters
#[derive(Debug, Default)]
pub struct BufferPoolMetrics {
    /// Checkouts served from the pool
    pub hits: AtomicU64,

    /// Checkouts that had to allocate
    pub misses: AtomicU64,

    /// Buffers returned to the pool
    pub returns: AtomicU64,

    /// Buffers dropped on return (pool full or buffer oversized)
    pub drops: AtomicU64,
}

impl BufferPoolMetrics {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`BufferPoolMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

impl PoolSnapshot {
    /// Fraction of checkouts served without allocating (1.0 when idle)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl BufferPool {
    /// Create a pool holding `pool_size` pre-allocated buffers of
    /// `buffer_capacity` bytes each
    pub fn new(pool_size: usize, buffer_capacity: usize) -> Self {
        // ArrayQueue panics on zero capacity
        let queue = ArrayQueue::new(pool_size.max(1));
        for _ in 0..pool_size {
            let _ = queue.push(BytesMut::with_capacity(buffer_capacity));
        }

        Self {
            queue,
            buffer_capacity,
            metrics: BufferPoolMetrics::new(),
        }
    }

    /// Check out a cleared buffer
    #[inline]
    pub fn get(&self) -> BytesMut {
        match self.queue.pop() {
            Some(buf) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                BytesMut::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Return a buffer; its content is cleared before it is pooled
    #[inline]
    pub fn put(&self, mut buf: BytesMut) {
        buf.clear();

        if buf.capacity() > self.buffer_capacity.max(1) * OVERSIZE_FACTOR {
            self.metrics.drops.fetch_add(1, Ordering::Relaxed);
            return;
        }

        match self.queue.push(buf) {
            Ok(()) => {
                self.metrics.returns.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.metrics.drops.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Buffers currently idle in the pool
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of idle buffers
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Nominal capacity of each buffer
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    #[inline]
    pub fn metrics(&self) -> &BufferPoolMetrics {
        &self.metrics
    }
}

#[cfg(test)]
#[path = "buffer_pool_test.rs"]
mod buffer_pool_test;
