//! Runtime-selected value orderings.
//!
//! A [`ValueOrdering`] is a first-class three-way comparator handed to a
//! [`TypedHeap`](crate::TypedHeap) at construction. The heap always keeps the
//! N *comparator-greatest* values, so "largest N" and "smallest N" differ only in
//! which ordering is passed:
//!
//! ```
//! use ironheap::ValueOrdering;
//! use std::cmp::Ordering;
//!
//! let max_n = ValueOrdering::<i64>::natural();
//! let min_n = max_n.reversed();
//! assert_eq!(max_n.compare(&1, &2), Some(Ordering::Less));
//! assert_eq!(min_n.compare(&1, &2), Some(Ordering::Greater));
//! ```

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type CompareFn<T> = dyn Fn(&T, &T) -> Option<Ordering> + Send + Sync;

/// Which end of the value domain an aggregation keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the greatest values, emitted largest first (`max(x, n)`).
    #[default]
    Descending,
    /// Keep the smallest values, emitted smallest first (`min(x, n)`).
    Ascending,
}

/// A three-way comparison over values of type `T`.
///
/// `compare` returns `None` when the pair cannot be ordered (for example NaN under
/// [`ValueOrdering::partial`]). The heap refuses such values instead of guessing.
pub struct ValueOrdering<T> {
    cmp: Arc<CompareFn<T>>,
    reversed: bool,
}

impl<T> Clone for ValueOrdering<T> {
    fn clone(&self) -> Self {
        Self {
            cmp: Arc::clone(&self.cmp),
            reversed: self.reversed,
        }
    }
}

impl<T> fmt::Debug for ValueOrdering<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueOrdering")
            .field("reversed", &self.reversed)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ValueOrdering<T> {
    /// Build from a total comparison closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            cmp: Arc::new(move |a: &T, b: &T| Some(f(a, b))),
            reversed: false,
        }
    }

    /// Build from a closure that may report a pair as unordered.
    pub fn from_partial_fn<F>(f: F) -> Self
    where
        F: Fn(&T, &T) -> Option<Ordering> + Send + Sync + 'static,
    {
        Self {
            cmp: Arc::new(f),
            reversed: false,
        }
    }

    /// The same comparator with its arguments swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            cmp: Arc::clone(&self.cmp),
            reversed: !self.reversed,
        }
    }

    /// Whether this ordering has been flipped an odd number of times.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Three-way comparison of `a` against `b`.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        if self.reversed {
            (self.cmp)(b, a)
        } else {
            (self.cmp)(a, b)
        }
    }

    /// A value is admissible when the ordering can place it relative to itself.
    #[inline]
    pub fn admits(&self, value: &T) -> bool {
        (self.cmp)(value, value).is_some()
    }
}

impl<T: Ord + 'static> ValueOrdering<T> {
    /// `T`'s own total order.
    #[must_use]
    pub fn natural() -> Self {
        Self::from_fn(<T as Ord>::cmp)
    }

    /// Natural order for [`SortOrder::Descending`], reversed for [`SortOrder::Ascending`].
    #[must_use]
    pub fn for_order(order: SortOrder) -> Self {
        match order {
            SortOrder::Descending => Self::natural(),
            SortOrder::Ascending => Self::natural().reversed(),
        }
    }
}

impl<T: PartialOrd + 'static> ValueOrdering<T> {
    /// `T`'s partial order; incomparable values (NaN) are rejected on insert.
    #[must_use]
    pub fn partial() -> Self {
        Self::from_partial_fn(<T as PartialOrd>::partial_cmp)
    }
}

macro_rules! float_orderings {
    ($($t:ty),*) => {
        $(
            impl ValueOrdering<$t> {
                /// Total order over floats that places NaN after every other value,
                /// so NaN is kept by "largest N" and dropped first by "smallest N".
                #[must_use]
                pub fn float_nan_last() -> Self {
                    Self::from_fn(|a: &$t, b: &$t| OrderedFloat(*a).cmp(&OrderedFloat(*b)))
                }
            }
        )*
    };
}

float_orderings!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_twice_is_identity() {
        let o = ValueOrdering::<i32>::natural();
        let rr = o.reversed().reversed();
        assert!(!rr.is_reversed());
        assert_eq!(rr.compare(&3, &4), o.compare(&3, &4));
    }

    #[test]
    fn partial_rejects_nan() {
        let o = ValueOrdering::<f64>::partial();
        assert!(!o.admits(&f64::NAN));
        assert!(o.admits(&1.5));
        assert_eq!(o.compare(&f64::NAN, &1.0), None);
    }

    #[test]
    fn nan_last_orders_nan_greatest() {
        let o = ValueOrdering::<f64>::float_nan_last();
        assert!(o.admits(&f64::NAN));
        assert_eq!(o.compare(&f64::NAN, &f64::INFINITY), Some(Ordering::Greater));
        assert_eq!(o.reversed().compare(&f64::NAN, &0.0), Some(Ordering::Less));
    }

    #[test]
    fn for_order_picks_direction() {
        let asc = ValueOrdering::<u8>::for_order(SortOrder::Ascending);
        let desc = ValueOrdering::<u8>::for_order(SortOrder::Descending);
        assert_eq!(asc.compare(&1, &2), Some(Ordering::Greater));
        assert_eq!(desc.compare(&1, &2), Some(Ordering::Less));
    }
}
