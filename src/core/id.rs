/*!
 * ID Generation System
 * Handle values and the recycling allocator that hands them out
 */

use crossbeam_queue::SegQueue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Type-Safe ID Wrappers
// ============================================================================

/// Opaque per-process reference to an emulated kernel object
///
/// The low two bits of an NT handle are reserved for tag bits, so live
/// handle values are always multiples of [`HANDLE_STRIDE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub u64);

impl Handle {
    /// The null handle (`NULL` / no parent directory)
    pub const NULL: Handle = Handle(0);

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Handle {
    #[inline]
    fn from(raw: u64) -> Self {
        Handle(raw)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Distance between consecutive handle values
pub const HANDLE_STRIDE: u64 = 4;

// ============================================================================
// ID Generator Trait
// ============================================================================

/// Generic ID generator interface
pub trait IdGenerator<T> {
    /// Generate next ID
    fn next(&self) -> T;

    /// Recycle an ID for reuse
    fn recycle(&self, id: T);

    /// Get current counter value (for debugging)
    fn current(&self) -> T;
}

// ============================================================================
// Recycling Generator
// ============================================================================

/// Handle value generator with recycling support
///
/// Released values go to a FIFO free list and are handed out again before
/// the counter advances. A value only enters the free list through
/// [`IdGenerator::recycle`], so a value is never issued twice while live.
pub struct RecyclingGenerator {
    counter: AtomicU64,
    stride: u64,
    free_list: SegQueue<u64>,
}

impl RecyclingGenerator {
    /// Create a generator issuing `start`, `start + stride`, ...
    #[inline]
    pub fn new(start: u64, stride: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
            stride: stride.max(1),
            free_list: SegQueue::new(),
        }
    }

    /// Number of released values waiting for reuse
    #[inline]
    pub fn recycled(&self) -> usize {
        self.free_list.len()
    }
}

impl IdGenerator<Handle> for RecyclingGenerator {
    #[inline]
    fn next(&self) -> Handle {
        let raw = self
            .free_list
            .pop()
            .unwrap_or_else(|| self.counter.fetch_add(self.stride, Ordering::SeqCst));
        Handle(raw)
    }

    #[inline]
    fn recycle(&self, id: Handle) {
        self.free_list.push(id.0);
    }

    #[inline]
    fn current(&self) -> Handle {
        Handle(self.counter.load(Ordering::Relaxed))
    }
}

/// Handle generator used by every process handle table
pub type HandleGenerator = RecyclingGenerator;

// ============================================================================
// Tests
// ============================================================================
