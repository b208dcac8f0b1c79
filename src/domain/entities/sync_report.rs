use serde::{Deserialize, Serialize};

/// Outcome of a single replay pass over the delivery queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncReport {
    pub replayed_count: u32,
    pub failed_count: u32,
    /// Entries removed after exceeding the configured attempt cap.
    pub dropped_count: u32,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && self.dropped_count == 0
    }
}
