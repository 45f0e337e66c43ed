//! `MaxN`, `MinN` and `TopNBy`

use crate::combiners::{CombineFn, LiftableCombiner};
use crate::error::Result;
use crate::heap::TypedHeap;
use crate::ordering::ValueOrdering;
use crate::policy::CompactionPolicy;
use std::marker::PhantomData;

/// Parameters of a heap-backed top-N combiner.
///
/// Anything implementing this is a [`CombineFn`] and a [`LiftableCombiner`]
/// with a [`TypedHeap`] accumulator and a `Vec<T>` output in the heap's drain
/// order.
pub trait TopNSpec<T>: Send + Sync + 'static {
    /// Number of values kept.
    fn n(&self) -> usize;

    /// Ordering under which the greatest `n` values are kept.
    fn ordering(&self) -> ValueOrdering<T>;

    fn policy(&self) -> CompactionPolicy {
        CompactionPolicy::default()
    }
}

impl<T, S> CombineFn<T, TypedHeap<T>, Vec<T>> for S
where
    T: Clone + 'static,
    S: TopNSpec<T>,
{
    fn create(&self) -> Result<TypedHeap<T>> {
        TypedHeap::with_policy(self.ordering(), self.n(), self.policy())
    }

    fn add_input(&self, acc: &mut TypedHeap<T>, v: T) -> Result<()> {
        acc.insert(v)
    }

    fn merge(&self, acc: &mut TypedHeap<T>, other: TypedHeap<T>) -> Result<()> {
        if acc.is_empty() && !acc.is_drained() && !other.is_drained() {
            *acc = other;
            return Ok(());
        }
        acc.merge(&other)
    }

    fn finish(&self, mut acc: TypedHeap<T>) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(acc.size());
        acc.pop_all(&mut out)?;
        Ok(out)
    }
}

impl<T, S> LiftableCombiner<T, TypedHeap<T>, Vec<T>> for S
where
    T: Clone + 'static,
    S: TopNSpec<T>,
{
    fn build_from_group(&self, values: &[T]) -> Result<TypedHeap<T>> {
        let mut heap = self.create()?;
        heap.insert_all(values)?;
        Ok(heap)
    }
}

/* ===================== MaxN<T> ===================== */

/// The `n` largest values (requires `Ord`), output largest first.
///
/// - Accumulator: `TypedHeap<T>` under the natural ordering
/// - Output: `Vec<T>` sorted descending, at most `n` long
///
/// `n == 0` fails at `create`.
#[derive(Clone, Copy, Debug)]
pub struct MaxN<T> {
    pub n: usize,
    pub policy: CompactionPolicy,
    _m: PhantomData<fn() -> T>,
}

impl<T> MaxN<T> {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            n,
            policy: CompactionPolicy::default(),
            _m: PhantomData,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CompactionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<T: Ord + 'static> TopNSpec<T> for MaxN<T> {
    fn n(&self) -> usize {
        self.n
    }

    fn ordering(&self) -> ValueOrdering<T> {
        ValueOrdering::natural()
    }

    fn policy(&self) -> CompactionPolicy {
        self.policy
    }
}

/* ===================== MinN<T> ===================== */

/// The `n` smallest values (requires `Ord`), output smallest first.
///
/// - Accumulator: `TypedHeap<T>` under the reversed natural ordering
/// - Output: `Vec<T>` sorted ascending, at most `n` long
#[derive(Clone, Copy, Debug)]
pub struct MinN<T> {
    pub n: usize,
    pub policy: CompactionPolicy,
    _m: PhantomData<fn() -> T>,
}

impl<T> MinN<T> {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            n,
            policy: CompactionPolicy::default(),
            _m: PhantomData,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CompactionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<T: Ord + 'static> TopNSpec<T> for MinN<T> {
    fn n(&self) -> usize {
        self.n
    }

    fn ordering(&self) -> ValueOrdering<T> {
        ValueOrdering::natural().reversed()
    }

    fn policy(&self) -> CompactionPolicy {
        self.policy
    }
}

/* ===================== TopNBy<T> ===================== */

/// The `n` comparator-greatest values under a caller-chosen ordering.
///
/// Useful for types without `Ord` (floats via
/// [`ValueOrdering::float_nan_last`]) or for ordering by a projection.
#[derive(Clone, Debug)]
pub struct TopNBy<T> {
    pub n: usize,
    pub ordering: ValueOrdering<T>,
    pub policy: CompactionPolicy,
}

impl<T> TopNBy<T> {
    #[must_use]
    pub fn new(n: usize, ordering: ValueOrdering<T>) -> Self {
        Self {
            n,
            ordering,
            policy: CompactionPolicy::default(),
        }
    }
}

impl<T: 'static> TopNSpec<T> for TopNBy<T> {
    fn n(&self) -> usize {
        self.n
    }

    fn ordering(&self) -> ValueOrdering<T> {
        self.ordering.clone()
    }

    fn policy(&self) -> CompactionPolicy {
        self.policy
    }
}
