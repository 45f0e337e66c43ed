//! Heap-backed top-N combiners for the aggregation layer.
//!
//! A combiner describes an aggregation as four steps over an accumulator `A`:
//! `create` an empty one, `add_input` values into it, `merge` partial
//! accumulators built elsewhere, and `finish` into the output `O`. The combiners
//! here all use a [`TypedHeap`](crate::TypedHeap) as accumulator and a `Vec<T>`
//! as output:
//!
//! - [`MaxN<T>`] -- the `n` largest values, largest first (`max(x, n)`).
//! - [`MinN<T>`] -- the `n` smallest values, smallest first (`min(x, n)`).
//! - [`TopNBy<T>`] -- the `n` greatest values under any [`ValueOrdering`](crate::ValueOrdering).
//!
//! # Examples
//! ```
//! use ironheap::combiners::{CombineFn, MaxN, MinN};
//!
//! let max = MaxN::<u32>::new(2);
//! let mut acc = max.create()?;
//! for v in [3, 7, 5] {
//!     max.add_input(&mut acc, v)?;
//! }
//! assert_eq!(max.finish(acc)?, vec![7, 5]);
//!
//! let min = MinN::<u32>::new(2);
//! let mut left = min.create()?;
//! let mut right = min.create()?;
//! min.add_input(&mut left, 9)?;
//! min.add_input(&mut right, 4)?;
//! min.add_input(&mut right, 6)?;
//! min.merge(&mut left, right)?;
//! assert_eq!(min.finish(left)?, vec![4, 6]);
//! # Ok::<(), ironheap::HeapError>(())
//! ```

mod topn;

use crate::error::Result;

pub use topn::{MaxN, MinN, TopNBy, TopNSpec};

/// An aggregation expressed over an accumulator.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> Result<A>;
    fn add_input(&self, acc: &mut A, v: V) -> Result<()>;
    fn merge(&self, acc: &mut A, other: A) -> Result<()>;
    fn finish(&self, acc: A) -> Result<O>;
}

/// Combiners that can build an accumulator straight from a whole group of values.
pub trait LiftableCombiner<V, A, O>: CombineFn<V, A, O> {
    fn build_from_group(&self, values: &[V]) -> Result<A>;
}

/// Run a combiner over one group of values.
///
/// # Errors
/// Propagates the combiner's errors.
pub fn combine_group<V, A, O, C>(comb: &C, values: &[V]) -> Result<O>
where
    C: LiftableCombiner<V, A, O>,
{
    let acc = comb.build_from_group(values)?;
    comb.finish(acc)
}
