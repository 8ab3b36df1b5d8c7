//! Rating gate.

use serde::{Deserialize, Serialize};

/// Condition controlling whether the rated set is appended to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingGate {
    pub enabled: bool,
    pub use_count: u64,
    pub threshold: u64,
}

impl RatingGate {
    pub fn new(enabled: bool, use_count: u64, threshold: u64) -> Self {
        Self {
            enabled,
            use_count,
            threshold,
        }
    }

    /// Open iff rating is enabled and the use count is strictly above the threshold.
    pub fn is_open(&self) -> bool {
        self.enabled && self.use_count > self.threshold
    }

    /// Whether a successful open should still bump the use count.
    pub fn counting(&self) -> bool {
        self.use_count <= self.threshold
    }
}
