//! Per-heap counters.
//!
//! Every [`TypedHeap`](crate::TypedHeap) keeps a [`HeapStats`] snapshot that can be
//! read at any time, including after a drain, and rendered as JSON for reporting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::AddAssign;

/// Insert and compaction counters for one heap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapStats {
    /// Values offered to `insert` that the ordering admitted.
    pub offered: u64,
    /// Offered values that entered the heap.
    pub accepted: u64,
    /// Offered values ignored because the heap was full and they did not beat the worst kept value.
    pub rejected: u64,
    /// Kept values pushed out by a better one.
    pub evicted: u64,
    /// Store rebuilds.
    pub compactions: u64,
    /// Store slots freed by all rebuilds.
    pub reclaimed: u64,
}

impl HeapStats {
    /// The counters as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl AddAssign for HeapStats {
    fn add_assign(&mut self, rhs: Self) {
        self.offered += rhs.offered;
        self.accepted += rhs.accepted;
        self.rejected += rhs.rejected;
        self.evicted += rhs.evicted;
        self.compactions += rhs.compactions;
        self.reclaimed += rhs.reclaimed;
    }
}
