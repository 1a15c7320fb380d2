use std::sync::atomic::{AtomicU64, Ordering};

use crate::sequencer::RequestId;

/// Source of cast request identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RequestId;
}

/// Monotonic counter, starting at 1 by default.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> RequestId {
        RequestId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
