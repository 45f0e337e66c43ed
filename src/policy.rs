//! Compaction policy for the heap's value store.
//!
//! Accepted values are appended to the store even when they later get evicted,
//! so the store accumulates dead entries. The policy decides when the store is
//! rebuilt to hold only live values.
//!
//! Two knobs, both tunable:
//! - `garbage_ratio`: fraction of the store that must be dead before a rebuild.
//!   After a rebuild the store holds at most `capacity` live values, so the next
//!   rebuild needs at least `capacity * r / (1 - r)` evictions; the rebuild cost
//!   is therefore amortised O(1) per insert. Higher ratios trade peak memory for
//!   fewer rebuilds.
//! - `min_store_len`: stores shorter than this are never rebuilt, so tiny heaps
//!   do not compact on every eviction.
//!
//! ```
//! use ironheap::CompactionPolicy;
//!
//! let policy = CompactionPolicy::from_json_str(r#"{ "garbage_ratio": 0.5 }"#)?;
//! assert_eq!(policy.min_store_len, CompactionPolicy::DEFAULT_MIN_STORE_LEN);
//! # Ok::<(), ironheap::HeapError>(())
//! ```

use crate::error::{HeapError, Result};
use serde::{Deserialize, Serialize};

/// When to rebuild the value store.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionPolicy {
    /// Dead fraction of the store, in `(0, 1)`, that triggers a rebuild.
    pub garbage_ratio: f64,
    /// Minimum store length (in positions) before a rebuild is considered.
    pub min_store_len: usize,
}

impl CompactionPolicy {
    /// Rebuild once two thirds of the store are dead (store >= 3x live).
    pub const DEFAULT_GARBAGE_RATIO: f64 = 2.0 / 3.0;
    pub const DEFAULT_MIN_STORE_LEN: usize = 4096;

    /// Rebuild as soon as half the store is dead, regardless of its length.
    ///
    /// Keeps memory at its tightest; mostly useful for small heaps and tests.
    #[must_use]
    pub const fn eager() -> Self {
        Self {
            garbage_ratio: 0.5,
            min_store_len: 0,
        }
    }

    /// Check the knobs are usable.
    ///
    /// # Errors
    /// `InvalidArgument` when `garbage_ratio` is not a finite number in `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        let r = self.garbage_ratio;
        if !r.is_finite() || r <= 0.0 || r >= 1.0 {
            return Err(HeapError::invalid(format!(
                "compaction garbage_ratio must be in (0, 1), got {r}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a policy from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// `InvalidArgument` for malformed JSON or an invalid policy.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| HeapError::invalid(format!("compaction policy: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn should_compact(&self, store_len: usize, garbage: usize) -> bool {
        store_len > 0
            && store_len >= self.min_store_len
            && garbage as f64 >= self.garbage_ratio * store_len as f64
    }
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            garbage_ratio: Self::DEFAULT_GARBAGE_RATIO,
            min_store_len: Self::DEFAULT_MIN_STORE_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_for_minimum_length() {
        let p = CompactionPolicy::default();
        assert!(!p.should_compact(100, 99));
        assert!(p.should_compact(9000, 6000));
        assert!(!p.should_compact(9000, 5000));
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        for r in [0.0, 1.0, -0.1, f64::NAN, f64::INFINITY] {
            let p = CompactionPolicy {
                garbage_ratio: r,
                ..CompactionPolicy::default()
            };
            assert!(p.validate().unwrap_err().is_invalid_argument());
        }
        assert!(CompactionPolicy::eager().validate().is_ok());
    }

    #[test]
    fn json_fills_defaults() {
        let p = CompactionPolicy::from_json_str(r#"{"min_store_len": 16}"#).unwrap();
        assert_eq!(p.min_store_len, 16);
        assert!((p.garbage_ratio - CompactionPolicy::DEFAULT_GARBAGE_RATIO).abs() < f64::EPSILON);
        assert!(CompactionPolicy::from_json_str(r#"{"garbage_ratio": 2}"#).is_err());
        assert!(CompactionPolicy::from_json_str("not json").is_err());
    }
}
