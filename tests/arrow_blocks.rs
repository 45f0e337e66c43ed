#![cfg(feature = "arrow")]

use anyhow::Result;
use arrow::array::{Array, Int64Array, Int64Builder, StringArray, StringBuilder};
use ironheap::{ExecMode, GroupedTopN, TypedHeap, ValueBlock, ValueOrdering};

#[test]
fn int64_array_in_int64_builder_out() -> Result<()> {
    let input = Int64Array::from_iter_values((0..50_000).map(|i| (i * 7_919) % 50_021));

    let mut heap = TypedHeap::new(ValueOrdering::<i64>::natural(), 5)?;
    heap.insert_all(&input)?;

    let mut builder = Int64Builder::new();
    heap.pop_all(&mut builder)?;
    let result = builder.finish();

    let mut expected: Vec<i64> = input.values().to_vec();
    expected.sort_unstable_by(|a, b| b.cmp(a));
    expected.truncate(5);

    assert_eq!(result.len(), 5);
    assert_eq!(result.values().to_vec(), expected);
    Ok(())
}

#[test]
fn nullable_array_is_refused_whole_but_positions_work() -> Result<()> {
    let input = Int64Array::from(vec![Some(3), None, Some(9), Some(1)]);
    assert_eq!(ValueBlock::null_count(&input), 1);

    let mut heap = TypedHeap::new(ValueOrdering::<i64>::natural().reversed(), 2)?;
    assert!(heap.insert_all(&input).unwrap_err().is_invalid_argument());
    assert!(heap.is_empty());

    for position in 0..input.len() {
        if !Array::is_null(&input, position) {
            heap.insert_from(&input, position)?;
        }
    }
    let mut out = Vec::new();
    heap.pop_all(&mut out)?;
    assert_eq!(out, vec![1, 3]);
    Ok(())
}

#[test]
fn string_array_round_trip() -> Result<()> {
    let input = StringArray::from(vec!["delta", "alpha", "echo", "charlie", "bravo"]);

    let mut heap = TypedHeap::new(ValueOrdering::<String>::natural(), 3)?;
    heap.insert_all(&input)?;

    let mut builder = StringBuilder::new();
    heap.pop_all(&mut builder)?;
    let result = builder.finish();

    let got: Vec<&str> = (0..result.len()).map(|i| result.value(i)).collect();
    assert_eq!(got, vec!["echo", "delta", "charlie"]);
    Ok(())
}

#[test]
fn grouped_over_arrow_columns() -> Result<()> {
    let keys = StringArray::from(vec!["x", "y", "x", "y", "x"]);
    let values = Int64Array::from(vec![Some(5), Some(2), None, Some(8), Some(1)]);

    let mut agg = GroupedTopN::new(ValueOrdering::<i64>::natural(), 1)?;
    agg.add_batch(&keys, &values)?;
    let out = agg.finish(ExecMode::Sequential)?;
    assert_eq!(
        out,
        vec![("x".to_string(), vec![5]), ("y".to_string(), vec![8])]
    );
    Ok(())
}
