//! Bounded top-N selection heap over an owned value store.

use crate::block::{BlockBuilder, ValueBlock};
use crate::error::{HeapError, Result};
use crate::ordering::ValueOrdering;
use crate::policy::CompactionPolicy;
use crate::stats::HeapStats;
use crate::store::ValueStore;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Upper bound on what construction pre-allocates. Larger capacities still
/// work; the heap simply grows into them.
const LARGEST_REASONABLE_ALLOCATION: usize = 1 << 16;

/// Keeps the N comparator-greatest values seen so far.
///
/// Values are copied into a private append-only store; the heap itself is an
/// array of store positions. The root is the *least* retained value under the
/// ordering, i.e. the next eviction candidate, so deciding whether a newcomer
/// gets in is a single comparison.
///
/// - Keep the N largest: pass [`ValueOrdering::natural`]. `pop_all` emits
///   largest first.
/// - Keep the N smallest: pass the reversed ordering. `pop_all` emits smallest
///   first.
///
/// In both cases the drain order is "comparator-descending" for the ordering the
/// heap was built with.
///
/// Ties at the admission boundary go to the value that arrived first: a
/// newcomer equal to the worst retained value is ignored.
///
/// A heap is drained once. After [`TypedHeap::pop_all`] every mutating call
/// returns [`HeapError::IllegalState`].
///
/// ```
/// use ironheap::{TypedHeap, ValueOrdering};
///
/// let mut heap = TypedHeap::new(ValueOrdering::<i64>::natural(), 3)?;
/// heap.insert_all(&vec![5, 1, 9, 7, 3])?;
///
/// let mut out = Vec::new();
/// heap.pop_all(&mut out)?;
/// assert_eq!(out, vec![9, 7, 5]);
/// # Ok::<(), ironheap::HeapError>(())
/// ```
#[derive(Debug)]
pub struct TypedHeap<T> {
    ordering: ValueOrdering<T>,
    capacity: usize,
    policy: CompactionPolicy,
    /// Store positions arranged as a binary min-heap under `ordering`.
    heap: Vec<usize>,
    store: ValueStore<T>,
    stats: HeapStats,
    drained: bool,
}

impl<T: Clone + 'static> TypedHeap<T> {
    /// A heap keeping at most `capacity` values, with the default compaction policy.
    ///
    /// # Errors
    /// `InvalidArgument` when `capacity` is zero.
    pub fn new(ordering: ValueOrdering<T>, capacity: usize) -> Result<Self> {
        Self::with_policy(ordering, capacity, CompactionPolicy::default())
    }

    /// A heap with an explicit compaction policy.
    ///
    /// # Errors
    /// `InvalidArgument` when `capacity` is zero or `policy` is invalid.
    pub fn with_policy(
        ordering: ValueOrdering<T>,
        capacity: usize,
        policy: CompactionPolicy,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(HeapError::invalid("heap capacity must be positive"));
        }
        policy.validate()?;

        let prealloc = capacity.min(LARGEST_REASONABLE_ALLOCATION);
        Ok(Self {
            ordering,
            capacity,
            policy,
            heap: Vec::with_capacity(prealloc),
            store: ValueStore::with_capacity(prealloc),
            stats: HeapStats::default(),
            drained: false,
        })
    }

    /// Offer one value.
    ///
    /// While the heap has room the value always enters. Once full, it enters only
    /// if it is comparator-greater than the worst retained value, which it then
    /// replaces.
    ///
    /// # Errors
    /// - `InvalidArgument` when the ordering cannot place `value` (NaN under a
    ///   partial ordering). The heap is left untouched.
    /// - `IllegalState` after [`TypedHeap::pop_all`].
    pub fn insert(&mut self, value: T) -> Result<()> {
        self.ensure_live("insert")?;
        if !self.ordering.admits(&value) {
            return Err(HeapError::invalid(
                "value cannot be placed by the heap's ordering",
            ));
        }
        self.stats.offered += 1;

        if self.heap.len() < self.capacity {
            let pos = self.store.append(value);
            self.heap.push(pos);
            self.sift_up(self.heap.len() - 1);
        } else {
            let worst = self.store.get(self.heap[0]);
            let ord = self.ordering.compare(&value, worst).ok_or_else(|| {
                HeapError::invalid("value is not comparable with the retained values")
            })?;
            if ord != Ordering::Greater {
                self.stats.rejected += 1;
                return Ok(());
            }
            let pos = self.store.append(value);
            self.heap[0] = pos;
            self.store.mark_garbage();
            self.stats.evicted += 1;
            self.sift_down(0, self.heap.len());
        }

        self.stats.accepted += 1;
        self.compact_if_necessary();
        Ok(())
    }

    /// Offer the value at `position` of a columnar block.
    ///
    /// # Errors
    /// `InvalidArgument` when `position` is out of range or null, plus the errors
    /// of [`TypedHeap::insert`].
    pub fn insert_from<B>(&mut self, block: &B, position: usize) -> Result<()>
    where
        B: ValueBlock<T> + ?Sized,
    {
        self.ensure_live("insert")?;
        let count = block.position_count();
        if position >= count {
            return Err(HeapError::invalid(format!(
                "position {position} out of range for a block of {count} positions"
            )));
        }
        if block.is_null(position) {
            return Err(HeapError::invalid(format!(
                "null value at position {position}"
            )));
        }
        self.insert(block.value(position))
    }

    /// Offer every position of a columnar block, in order.
    ///
    /// A block containing nulls is refused as a whole before anything is inserted.
    /// A value the ordering cannot place stops the batch at that position; earlier
    /// positions stay inserted.
    ///
    /// # Errors
    /// See [`TypedHeap::insert`].
    pub fn insert_all<B>(&mut self, block: &B) -> Result<()>
    where
        B: ValueBlock<T> + ?Sized,
    {
        self.ensure_live("insert_all")?;
        let nulls = block.null_count();
        if nulls > 0 {
            return Err(HeapError::invalid(format!(
                "block contains {nulls} null value(s)"
            )));
        }
        for position in 0..block.position_count() {
            self.insert(block.value(position))?;
        }
        Ok(())
    }

    /// Offer every value retained by `other`; used to combine partial states.
    ///
    /// `other` is left as it was.
    ///
    /// # Errors
    /// `IllegalState` when either heap has been drained, plus the errors of
    /// [`TypedHeap::insert`].
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        self.ensure_live("merge")?;
        other.ensure_live("merge from")?;
        for &pos in &other.heap {
            self.insert(other.store.get(pos).clone())?;
        }
        Ok(())
    }

    /// Drain every retained value into `sink`, comparator-greatest first.
    ///
    /// Writes exactly [`TypedHeap::size`] values. Afterwards the heap is empty,
    /// its store released, and it only answers accessors.
    ///
    /// # Errors
    /// `IllegalState` when the heap was already drained.
    pub fn pop_all<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: BlockBuilder<T> + ?Sized,
    {
        self.ensure_live("pop_all")?;

        // In-place heap sort: each round parks the current worst at the end of
        // the shrinking prefix, leaving the array comparator-descending.
        let n = self.heap.len();
        for end in (1..n).rev() {
            self.heap.swap(0, end);
            self.sift_down(0, end);
        }
        for &pos in &self.heap {
            sink.append(self.store.get(pos).clone());
        }

        trace!(values = n, store_len = self.store.len(), "drained heap");
        self.heap = Vec::new();
        self.store.clear();
        self.drained = true;
        Ok(())
    }

    /// Write the retained values into `sink` without draining, in heap order.
    ///
    /// The order is unspecified; use it to persist intermediate state that will
    /// be re-inserted into a heap later.
    ///
    /// # Errors
    /// `IllegalState` when the heap was drained.
    pub fn write_all<S>(&self, sink: &mut S) -> Result<()>
    where
        S: BlockBuilder<T> + ?Sized,
    {
        self.ensure_live("write_all")?;
        for &pos in &self.heap {
            sink.append(self.store.get(pos).clone());
        }
        Ok(())
    }

    /// Number of retained values.
    #[must_use]
    pub fn size(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn ordering(&self) -> &ValueOrdering<T> {
        &self.ordering
    }

    #[must_use]
    pub const fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }

    /// Store slots no longer referenced by the heap.
    #[must_use]
    pub const fn garbage(&self) -> usize {
        self.store.garbage()
    }

    /// Total store slots, live and dead.
    #[must_use]
    pub fn store_len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub const fn stats(&self) -> &HeapStats {
        &self.stats
    }

    #[must_use]
    pub const fn is_drained(&self) -> bool {
        self.drained
    }

    fn ensure_live(&self, op: &str) -> Result<()> {
        if self.drained {
            return Err(HeapError::illegal_state(format!(
                "{op} called on a drained heap"
            )));
        }
        Ok(())
    }

    fn compact_if_necessary(&mut self) {
        let store_len = self.store.len();
        let garbage = self.store.garbage();
        if !self.policy.should_compact(store_len, garbage) {
            return;
        }
        let reclaimed = self.store.compact(&mut self.heap);
        self.stats.compactions += 1;
        self.stats.reclaimed += reclaimed as u64;
        debug!(
            store_len,
            garbage,
            reclaimed,
            live = self.heap.len(),
            "compacted heap value store"
        );
    }

    /// Whether the value at heap slot `a` orders strictly before the one at `b`.
    ///
    /// Retained values were all admitted by the ordering, so an unresolved pair
    /// is treated as equal.
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        let va = self.store.get(self.heap[a]);
        let vb = self.store.get(self.heap[b]);
        self.ordering.compare(va, vb) == Some(Ordering::Less)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    /// Restore the heap property below `i` within the prefix `heap[..len]`.
    fn sift_down(&mut self, mut i: usize, len: usize) {
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, i) {
                break;
            }
            self.heap.swap(i, child);
            i = child;
        }
    }
}
