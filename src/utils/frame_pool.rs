//! Recycled luminance buffers for the live scan pipeline
//!
//! Camera frames arrive at a steady size, so the buffer released by one analysis
//! can hold the next frame. The pool is shared between the producer (which fills
//! buffers) and the analysis thread (which gives them back).

use std::sync::Arc;

use parking_lot::Mutex;

/// Upper bound on idle buffers kept around
const DEFAULT_MAX_IDLE: usize = 3;

/// A shared pool of reusable `Vec<u8>` frame buffers
#[derive(Clone)]
pub struct FramePool {
    inner: Arc<Mutex<PoolState>>,
}

struct PoolState {
    idle: Vec<Vec<u8>>,
    max_idle: usize,
    stats: AllocationStats,
}

impl FramePool {
    /// Create a pool retaining up to three idle buffers
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Create a pool retaining up to `max_idle` idle buffers
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolState {
                idle: Vec::with_capacity(max_idle),
                max_idle,
                stats: AllocationStats::default(),
            })),
        }
    }

    /// Take a zeroed buffer of exactly `size` bytes, reusing an idle one if possible
    pub fn take(&self, size: usize) -> Vec<u8> {
        let mut state = self.inner.lock();
        match state.idle.pop() {
            Some(mut buf) => {
                state.stats.reuses += 1;
                state.stats.bytes_reused += size.min(buf.capacity());
                buf.clear();
                buf.resize(size, 0);
                buf
            }
            None => {
                state.stats.allocations += 1;
                vec![0u8; size]
            }
        }
    }

    /// Return a buffer to the pool; dropped if the pool is already full
    pub fn recycle(&self, buf: Vec<u8>) {
        let mut state = self.inner.lock();
        if state.idle.len() < state.max_idle {
            state.idle.push(buf);
        }
    }

    /// Number of idle buffers currently held
    pub fn idle(&self) -> usize {
        self.inner.lock().idle.len()
    }

    /// Snapshot of allocation counters
    pub fn stats(&self) -> AllocationStats {
        self.inner.lock().stats
    }

    /// Drop all idle buffers
    pub fn clear(&self) {
        self.inner.lock().idle.clear();
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for monitoring allocation patterns
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocationStats {
    /// Buffers handed out from the idle list
    pub reuses: usize,
    /// Buffers freshly allocated
    pub allocations: usize,
    /// Bytes served from reused buffers
    pub bytes_reused: usize,
}
