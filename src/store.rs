//! Append-only value arena addressed by position.

/// Owned storage for the values a heap has accepted.
///
/// Heap entries are plain `usize` positions into `values`. Evicting an entry
/// only bumps `garbage`; the value stays until [`ValueStore::compact`] rebuilds
/// the arena around the positions that are still live.
#[derive(Clone, Debug)]
pub(crate) struct ValueStore<T> {
    values: Vec<T>,
    garbage: usize,
}

impl<T> Default for ValueStore<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> ValueStore<T> {
    pub(crate) fn with_capacity(positions: usize) -> Self {
        Self {
            values: Vec::with_capacity(positions),
            garbage: 0,
        }
    }

    /// Append `value`, returning its position.
    #[inline]
    pub(crate) fn append(&mut self, value: T) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    #[inline]
    pub(crate) fn get(&self, position: usize) -> &T {
        &self.values[position]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) const fn garbage(&self) -> usize {
        self.garbage
    }

    /// Record that one stored value lost its last heap reference.
    #[inline]
    pub(crate) fn mark_garbage(&mut self) {
        self.garbage += 1;
        debug_assert!(self.garbage <= self.values.len());
    }

    /// Drop every value not referenced by `live` and rewrite `live` in place to
    /// the new positions. Relative order of surviving values is preserved.
    ///
    /// `live` must hold distinct, in-range positions. Returns the number of
    /// slots reclaimed.
    pub(crate) fn compact(&mut self, live: &mut [usize]) -> usize {
        const DEAD: usize = usize::MAX;

        let before = self.values.len();
        let mut remap = vec![DEAD; before];
        for &p in live.iter() {
            remap[p] = 0;
        }
        let mut next = 0;
        for slot in &mut remap {
            if *slot != DEAD {
                *slot = next;
                next += 1;
            }
        }

        let mut idx = 0;
        self.values.retain(|_| {
            let keep = remap[idx] != DEAD;
            idx += 1;
            keep
        });
        for p in live.iter_mut() {
            *p = remap[*p];
        }

        self.garbage = 0;
        before - self.values.len()
    }

    pub(crate) fn clear(&mut self) {
        self.values = Vec::new();
        self.garbage = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_keeps_only_live_and_remaps() {
        let mut store = ValueStore::default();
        for s in ["a", "b", "c", "d", "e"] {
            store.append(s.to_string());
        }
        store.mark_garbage();
        store.mark_garbage();
        store.mark_garbage();

        let mut live = vec![4, 1];
        let reclaimed = store.compact(&mut live);

        assert_eq!(reclaimed, 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.garbage(), 0);
        assert_eq!(store.get(live[0]), "e");
        assert_eq!(store.get(live[1]), "b");
    }

    #[test]
    fn compact_with_nothing_dead_is_identity() {
        let mut store = ValueStore::with_capacity(3);
        for v in [10, 20, 30] {
            store.append(v);
        }
        let mut live = vec![2, 0, 1];
        assert_eq!(store.compact(&mut live), 0);
        assert_eq!(live, vec![2, 0, 1]);
        assert_eq!(*store.get(live[0]), 30);
    }
}
