//! Columnar block contracts.
//!
//! The heap never sees rows or boxed values. It reads candidates from a
//! [`ValueBlock`] by position and writes results into a [`BlockBuilder`]. Both
//! traits are deliberately narrow so any columnar representation can plug in:
//!
//! - `Vec<T>`: a dense, never-null block and an append-only sink.
//! - [`Column<T>`] / [`ColumnBuilder<T>`]: a nullable column.
//! - Arrow arrays and builders (feature `arrow`): `PrimitiveArray<P>`,
//!   `StringArray`, `PrimitiveBuilder<P>`, `StringBuilder`.

/// Positional, random-access read of a single value type.
pub trait ValueBlock<T> {
    /// Number of positions (rows) in the block.
    fn position_count(&self) -> usize;

    /// Whether the value at `position` is null.
    fn is_null(&self, position: usize) -> bool;

    /// Number of null positions.
    fn null_count(&self) -> usize {
        (0..self.position_count())
            .filter(|&p| self.is_null(p))
            .count()
    }

    /// Owned copy of the value at `position`.
    ///
    /// Only called for non-null positions.
    fn value(&self, position: usize) -> T;
}

/// Append-only writes of a single value type.
pub trait BlockBuilder<T> {
    fn append(&mut self, value: T);

    /// Number of positions written so far.
    fn position_count(&self) -> usize;
}

impl<T: Clone> ValueBlock<T> for Vec<T> {
    fn position_count(&self) -> usize {
        self.len()
    }

    fn is_null(&self, _position: usize) -> bool {
        false
    }

    fn null_count(&self) -> usize {
        0
    }

    fn value(&self, position: usize) -> T {
        self[position].clone()
    }
}

impl<T: Clone> ValueBlock<T> for [T] {
    fn position_count(&self) -> usize {
        self.len()
    }

    fn is_null(&self, _position: usize) -> bool {
        false
    }

    fn null_count(&self) -> usize {
        0
    }

    fn value(&self, position: usize) -> T {
        self[position].clone()
    }
}

impl<T> BlockBuilder<T> for Vec<T> {
    fn append(&mut self, value: T) {
        self.push(value);
    }

    fn position_count(&self) -> usize {
        self.len()
    }
}

/* ===================== Column<T> ===================== */

/// An immutable nullable column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column<T> {
    values: Vec<Option<T>>,
    nulls: usize,
}

impl<T> Column<T> {
    /// A column without nulls.
    #[must_use]
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
            nulls: 0,
        }
    }

    /// Iterate over the column, `None` marking nulls.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> {
        self.values.iter().map(Option::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the value at `position`, `None` when null or out of range.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&T> {
        self.values.get(position).and_then(Option::as_ref)
    }
}

impl<T> From<Vec<Option<T>>> for Column<T> {
    fn from(values: Vec<Option<T>>) -> Self {
        let nulls = values.iter().filter(|v| v.is_none()).count();
        Self { values, nulls }
    }
}

impl<T> FromIterator<Option<T>> for Column<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Clone> ValueBlock<T> for Column<T> {
    fn position_count(&self) -> usize {
        self.values.len()
    }

    fn is_null(&self, position: usize) -> bool {
        self.values[position].is_none()
    }

    fn null_count(&self) -> usize {
        self.nulls
    }

    fn value(&self, position: usize) -> T {
        match &self.values[position] {
            Some(v) => v.clone(),
            None => panic!("value() read a null position {position}"),
        }
    }
}

/// Builder for [`Column<T>`].
#[derive(Clone, Debug)]
pub struct ColumnBuilder<T> {
    values: Vec<Option<T>>,
    nulls: usize,
}

impl<T> Default for ColumnBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ColumnBuilder<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            nulls: 0,
        }
    }

    /// Pre-size for `positions` expected entries.
    #[must_use]
    pub fn with_capacity(positions: usize) -> Self {
        Self {
            values: Vec::with_capacity(positions),
            nulls: 0,
        }
    }

    pub fn append_null(&mut self) {
        self.values.push(None);
        self.nulls += 1;
    }

    #[must_use]
    pub fn build(self) -> Column<T> {
        Column {
            values: self.values,
            nulls: self.nulls,
        }
    }
}

impl<T> BlockBuilder<T> for ColumnBuilder<T> {
    fn append(&mut self, value: T) {
        self.values.push(Some(value));
    }

    fn position_count(&self) -> usize {
        self.values.len()
    }
}

/* ===================== Arrow ===================== */

#[cfg(feature = "arrow")]
mod arrow_blocks {
    use super::{BlockBuilder, ValueBlock};
    use arrow::array::{
        Array, ArrayBuilder, PrimitiveArray, PrimitiveBuilder, StringArray, StringBuilder,
    };
    use arrow::datatypes::ArrowPrimitiveType;

    impl<P: ArrowPrimitiveType> ValueBlock<P::Native> for PrimitiveArray<P> {
        fn position_count(&self) -> usize {
            self.len()
        }

        fn is_null(&self, position: usize) -> bool {
            Array::is_null(self, position)
        }

        fn null_count(&self) -> usize {
            Array::null_count(self)
        }

        fn value(&self, position: usize) -> P::Native {
            PrimitiveArray::value(self, position)
        }
    }

    impl ValueBlock<String> for StringArray {
        fn position_count(&self) -> usize {
            self.len()
        }

        fn is_null(&self, position: usize) -> bool {
            Array::is_null(self, position)
        }

        fn null_count(&self) -> usize {
            Array::null_count(self)
        }

        fn value(&self, position: usize) -> String {
            StringArray::value(self, position).to_owned()
        }
    }

    impl<P: ArrowPrimitiveType> BlockBuilder<P::Native> for PrimitiveBuilder<P> {
        fn append(&mut self, value: P::Native) {
            self.append_value(value);
        }

        fn position_count(&self) -> usize {
            ArrayBuilder::len(self)
        }
    }

    impl BlockBuilder<String> for StringBuilder {
        fn append(&mut self, value: String) {
            self.append_value(value);
        }

        fn position_count(&self) -> usize {
            ArrayBuilder::len(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_tracks_nulls() {
        let col: Column<i32> = vec![Some(1), None, Some(3)].into();
        assert_eq!(col.position_count(), 3);
        assert_eq!(ValueBlock::null_count(&col), 1);
        assert!(col.is_null(1));
        assert_eq!(col.value(2), 3);
        assert_eq!(col.get(1), None);
    }

    #[test]
    fn builder_round_trips_into_column() {
        let mut b = ColumnBuilder::with_capacity(3);
        b.append("a".to_string());
        b.append_null();
        b.append("c".to_string());
        assert_eq!(BlockBuilder::position_count(&b), 3);
        let col = b.build();
        assert_eq!(col.iter().flatten().count(), 2);
        assert_eq!(ValueBlock::null_count(&col), 1);
    }
}
