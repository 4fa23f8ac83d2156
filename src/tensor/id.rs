//! Unique tensor identifiers

use std::sync::atomic::{AtomicU64, Ordering};

/// Globally unique identifier for a tensor
///
/// Every logical tensor (including zero-copy views) gets a fresh id, so two
/// views of the same storage are still distinguishable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl TensorId {
    /// Allocate a new unique id
    pub fn new() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for TensorId {
    fn default() -> Self {
        Self::new()
    }
}
