//! Grouped top-N aggregation over columnar batches.
//!
//! [`GroupedTopN`] is the driver an aggregation operator uses for
//! `GROUP BY k ... max(x, n)`: every group owns its own [`TypedHeap`], rows are
//! routed by key, partial states from other workers can be merged in, and the
//! final drain runs either sequentially or with one rayon task per group.
//!
//! ```
//! use ironheap::{Column, ExecMode, GroupedTopN, ValueOrdering};
//!
//! let mut agg = GroupedTopN::new(ValueOrdering::<i64>::natural(), 2)?;
//! let keys = vec!["a", "b", "a", "a", "b"];
//! let values: Column<i64> = vec![Some(1), Some(5), None, Some(3), Some(4)].into();
//! agg.add_batch(&keys, &values)?;
//!
//! let out = agg.finish(ExecMode::Sequential)?;
//! assert_eq!(out, vec![("a", vec![3, 1]), ("b", vec![5, 4])]);
//! # Ok::<(), ironheap::HeapError>(())
//! ```

use crate::block::ValueBlock;
use crate::error::{HeapError, Result};
use crate::heap::TypedHeap;
use crate::ordering::ValueOrdering;
use crate::policy::CompactionPolicy;
use crate::stats::HeapStats;
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use tracing::trace;

/// How [`GroupedTopN::finish`] drains its groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    #[default]
    Sequential,
    /// One task per group on a rayon pool; `threads: None` uses the global pool.
    Parallel { threads: Option<usize> },
}

/// Per-group bounded selection.
#[derive(Debug)]
pub struct GroupedTopN<K, T> {
    ordering: ValueOrdering<T>,
    capacity: usize,
    policy: CompactionPolicy,
    groups: HashMap<K, TypedHeap<T>>,
}

impl<K, T> GroupedTopN<K, T>
where
    K: Eq + Hash + Ord + Clone + Send,
    T: Clone + Send + 'static,
{
    /// Keep `capacity` values per group under `ordering`.
    ///
    /// # Errors
    /// `InvalidArgument` when `capacity` is zero.
    pub fn new(ordering: ValueOrdering<T>, capacity: usize) -> Result<Self> {
        Self::with_policy(ordering, capacity, CompactionPolicy::default())
    }

    /// As [`GroupedTopN::new`], with the compaction policy every group heap uses.
    ///
    /// # Errors
    /// `InvalidArgument` when `capacity` is zero or `policy` is invalid.
    pub fn with_policy(
        ordering: ValueOrdering<T>,
        capacity: usize,
        policy: CompactionPolicy,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(HeapError::invalid("per-group capacity must be positive"));
        }
        policy.validate()?;
        Ok(Self {
            ordering,
            capacity,
            policy,
            groups: HashMap::new(),
        })
    }

    /// Route one batch of `(key, value)` rows into their groups.
    ///
    /// Null values do not take part in the aggregation and are skipped; a group
    /// whose every value is null therefore never appears.
    ///
    /// # Errors
    /// `InvalidArgument` when the blocks differ in length or a key is null
    /// (checked before any row is routed), plus the errors of
    /// [`TypedHeap::insert`].
    pub fn add_batch<KB, VB>(&mut self, keys: &KB, values: &VB) -> Result<()>
    where
        KB: ValueBlock<K> + ?Sized,
        VB: ValueBlock<T> + ?Sized,
    {
        let rows = keys.position_count();
        if rows != values.position_count() {
            return Err(HeapError::invalid(format!(
                "key block has {rows} positions but value block has {}",
                values.position_count()
            )));
        }
        if keys.null_count() > 0 {
            return Err(HeapError::invalid("group keys must not be null"));
        }

        for position in 0..rows {
            if values.is_null(position) {
                continue;
            }
            self.route(keys.value(position), values.value(position))?;
        }
        Ok(())
    }

    /// Offer a single value to `key`'s group.
    ///
    /// # Errors
    /// See [`TypedHeap::insert`].
    pub fn add(&mut self, key: K, value: T) -> Result<()> {
        self.route(key, value)
    }

    /// Fold another partial aggregation into this one, group by group.
    ///
    /// Both sides must keep the same number of values per group in the same
    /// direction.
    ///
    /// # Errors
    /// `InvalidArgument` when `other` differs in capacity or ordering direction,
    /// plus the errors of [`TypedHeap::merge`].
    pub fn merge(&mut self, other: Self) -> Result<()> {
        if other.capacity != self.capacity {
            return Err(HeapError::invalid(format!(
                "cannot merge an aggregation keeping {} values per group into one keeping {}",
                other.capacity, self.capacity
            )));
        }
        if other.ordering.is_reversed() != self.ordering.is_reversed() {
            return Err(HeapError::invalid(
                "cannot merge aggregations ordered in opposite directions",
            ));
        }
        for (key, heap) in other.groups {
            match self.groups.entry(key) {
                Entry::Occupied(mut e) => e.get_mut().merge(&heap)?,
                Entry::Vacant(e) => {
                    e.insert(heap);
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Summed counters over every group heap.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        let mut total = HeapStats::default();
        for heap in self.groups.values() {
            total += *heap.stats();
        }
        total
    }

    /// Drain every group, returning `(key, values)` sorted by key, each value
    /// list in the heap's drain order.
    ///
    /// # Errors
    /// `InvalidArgument` when a dedicated thread pool cannot be built, plus the
    /// errors of [`TypedHeap::pop_all`].
    pub fn finish(self, mode: ExecMode) -> Result<Vec<(K, Vec<T>)>> {
        let mut groups: Vec<(K, TypedHeap<T>)> = self.groups.into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        match mode {
            ExecMode::Sequential => groups.into_iter().map(drain_group).collect(),
            ExecMode::Parallel { threads } => {
                let run = move || {
                    groups
                        .into_par_iter()
                        .map(drain_group)
                        .collect::<Result<Vec<_>>>()
                };
                match threads {
                    Some(t) => rayon::ThreadPoolBuilder::new()
                        .num_threads(t)
                        .build()
                        .map_err(|e| {
                            HeapError::invalid(format!("cannot build a {t}-thread pool: {e}"))
                        })?
                        .install(run),
                    None => run(),
                }
            }
        }
    }

    /// A group is created only for a value its heap will take, so a refused
    /// value never leaves an empty group behind.
    fn route(&mut self, key: K, value: T) -> Result<()> {
        if !self.ordering.admits(&value) {
            return Err(HeapError::invalid(
                "value cannot be placed by the aggregation's ordering",
            ));
        }
        self.group_mut(key)?.insert(value)
    }

    fn group_mut(&mut self, key: K) -> Result<&mut TypedHeap<T>> {
        let known = self.groups.len();
        match self.groups.entry(key) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                trace!(groups = known + 1, "new aggregation group");
                let heap =
                    TypedHeap::with_policy(self.ordering.clone(), self.capacity, self.policy)?;
                Ok(e.insert(heap))
            }
        }
    }
}

fn drain_group<K, T: Clone + 'static>((key, mut heap): (K, TypedHeap<T>)) -> Result<(K, Vec<T>)> {
    let mut out = Vec::with_capacity(heap.size());
    heap.pop_all(&mut out)?;
    Ok((key, out))
}
