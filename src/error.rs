//! Error type shared by the heap, the combiners and the grouped driver.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HeapError>;

/// Failures surfaced by [`TypedHeap`](crate::TypedHeap) and the layers built on it.
///
/// Every failure is a deterministic function of the input; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// A caller-supplied argument cannot be honoured (zero capacity, null value,
    /// a value the ordering cannot place, mismatched blocks, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not valid in the structure's current lifecycle state.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl HeapError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    /// True for [`HeapError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// True for [`HeapError::IllegalState`].
    #[must_use]
    pub const fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState(_))
    }
}
