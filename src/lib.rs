//! # Ironheap
//!
//! A **bounded top-N selection heap** for columnar aggregation engines. It backs
//! ordered "keep only the N best values" aggregations such as `max(x, n)`,
//! `min(x, n)` and `max_by`-style functions: a stream of any length goes in, at
//! most N values are retained in O(N) memory, and a single drain emits them in a
//! well-defined order.
//!
//! ## Key Features
//!
//! - **One heap, both directions** - the N largest or N smallest, chosen by the
//!   [`ValueOrdering`] passed at construction (natural or reversed)
//! - **Columnar input and output** - reads candidates from any [`ValueBlock`] by
//!   position, writes results into any [`BlockBuilder`]; Arrow arrays plug in
//!   with the `arrow` feature
//! - **Position handles over an owned arena** - the heap shuffles `usize`
//!   positions; accepted values are copied once into a private store
//! - **Bounded memory** - evicted values become garbage and a tunable
//!   [`CompactionPolicy`] rebuilds the store, amortised O(1) per insert
//! - **Aggregation layer** - [`combiners`] (`MaxN`, `MinN`, `TopNBy`) and a
//!   per-group driver, [`GroupedTopN`], with sequential or rayon-parallel drains
//!
//! ## Quick Start
//!
//! ```
//! use ironheap::{TypedHeap, ValueOrdering};
//! # fn main() -> Result<(), ironheap::HeapError> {
//! let input: Vec<i64> = (0..10_000).collect();
//!
//! // Keep the 3 largest.
//! let mut largest = TypedHeap::new(ValueOrdering::<i64>::natural(), 3)?;
//! largest.insert_all(&input)?;
//! let mut out = Vec::new();
//! largest.pop_all(&mut out)?;
//! assert_eq!(out, vec![9_999, 9_998, 9_997]);
//!
//! // Keep the 3 smallest: same heap, reversed ordering.
//! let mut smallest = TypedHeap::new(ValueOrdering::<i64>::natural().reversed(), 3)?;
//! smallest.insert_all(&input)?;
//! let mut out = Vec::new();
//! smallest.pop_all(&mut out)?;
//! assert_eq!(out, vec![0, 1, 2]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Drain order
//!
//! [`TypedHeap::pop_all`] always emits values **comparator-descending** for the
//! ordering the heap was built with. Under the natural ordering that is largest
//! first; under the reversed ordering it is smallest first. There is no separate
//! sort step.
//!
//! ### Lifecycle
//!
//! A heap is built once per aggregation group, fed any number of batches, and
//! drained exactly once. After the drain only accessors work; everything else
//! returns [`HeapError::IllegalState`].
//!
//! ### Errors
//!
//! [`HeapError::InvalidArgument`] covers zero capacity, null inputs and values the
//! ordering cannot place (NaN under [`ValueOrdering::partial`]). A value that
//! loses against a full heap is *not* an error; it is simply ignored.
//!
//! ## Feature Flags
//!
//! - `arrow` (default) - [`ValueBlock`] / [`BlockBuilder`] impls for Arrow
//!   primitive and string arrays and builders
//!
//! ## Module Overview
//!
//! - [`heap`] - [`TypedHeap`], the bounded selection structure
//! - [`ordering`] - [`ValueOrdering`] and [`SortOrder`]
//! - [`block`] - columnar read/write contracts and a nullable [`Column`]
//! - [`policy`] - [`CompactionPolicy`]
//! - [`combiners`] - aggregation combiners built on the heap
//! - [`aggregate`] - [`GroupedTopN`], grouped aggregation driver
//! - [`stats`] - [`HeapStats`] counters

pub mod aggregate;
pub mod block;
pub mod combiners;
pub mod error;
pub mod heap;
pub mod ordering;
pub mod policy;
pub mod stats;
mod store;

// General re-exports
pub use aggregate::{ExecMode, GroupedTopN};
pub use block::{BlockBuilder, Column, ColumnBuilder, ValueBlock};
pub use combiners::{CombineFn, LiftableCombiner, MaxN, MinN, TopNBy};
pub use error::{HeapError, Result};
pub use heap::TypedHeap;
pub use ordering::{SortOrder, ValueOrdering};
pub use policy::CompactionPolicy;
pub use stats::HeapStats;
