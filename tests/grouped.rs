use anyhow::Result;
use ironheap::{Column, ExecMode, GroupedTopN, SortOrder, ValueOrdering};
use std::collections::BTreeMap;

fn sample_batch(rows: u32) -> (Vec<String>, Column<u32>) {
    let keys = (0..rows).map(|i| format!("k{}", i % 5)).collect();
    let values = (0..rows)
        .map(|i| if i % 11 == 0 { None } else { Some((i * 7_919) % 10_007) })
        .collect();
    (keys, values)
}

fn reference(keys: &[String], values: &Column<u32>, n: usize) -> Vec<(String, Vec<u32>)> {
    let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (k, v) in keys.iter().zip(values.iter()) {
        if let Some(v) = v {
            groups.entry(k.clone()).or_default().push(*v);
        }
    }
    groups
        .into_iter()
        .map(|(k, mut vs)| {
            vs.sort_unstable_by(|a, b| b.cmp(a));
            vs.truncate(n);
            (k, vs)
        })
        .collect()
}

#[test]
fn sequential_matches_reference() -> Result<()> {
    let (keys, values) = sample_batch(10_000);
    let mut agg = GroupedTopN::new(ValueOrdering::<u32>::for_order(SortOrder::Descending), 4)?;
    agg.add_batch(&keys, &values)?;
    assert_eq!(agg.group_count(), 5);

    let out = agg.finish(ExecMode::Sequential)?;
    assert_eq!(out, reference(&keys, &values, 4));
    Ok(())
}

#[test]
fn parallel_matches_sequential() -> Result<()> {
    let (keys, values) = sample_batch(20_000);

    let mut seq = GroupedTopN::new(ValueOrdering::<u32>::natural().reversed(), 8)?;
    let mut par = GroupedTopN::new(ValueOrdering::<u32>::natural().reversed(), 8)?;
    seq.add_batch(&keys, &values)?;
    par.add_batch(&keys, &values)?;

    let seq = seq.finish(ExecMode::Sequential)?;
    let par = par.finish(ExecMode::Parallel { threads: Some(2) })?;
    assert_eq!(seq, par);
    assert!(seq.iter().all(|(_, vs)| vs.windows(2).all(|w| w[0] <= w[1])));
    Ok(())
}

#[test]
fn merged_partials_match_single_aggregation() -> Result<()> {
    let (keys, values) = sample_batch(6_000);
    let ordering = ValueOrdering::<u32>::natural();

    let mut whole = GroupedTopN::new(ordering.clone(), 3)?;
    whole.add_batch(&keys, &values)?;

    // Two workers each see half of the rows.
    let half = keys.len() / 2;
    let left_values: Column<u32> = values.iter().take(half).map(|v| v.copied()).collect();
    let right_values: Column<u32> = values.iter().skip(half).map(|v| v.copied()).collect();

    let mut left = GroupedTopN::new(ordering.clone(), 3)?;
    let mut right = GroupedTopN::new(ordering, 3)?;
    left.add_batch(&keys[..half], &left_values)?;
    right.add_batch(&keys[half..], &right_values)?;
    left.merge(right)?;

    assert_eq!(
        left.finish(ExecMode::Parallel { threads: None })?,
        whole.finish(ExecMode::Sequential)?
    );
    Ok(())
}

#[test]
fn all_null_group_never_appears() -> Result<()> {
    let keys = vec![1u8, 2, 1, 2];
    let values: Column<i64> = vec![Some(10), None, Some(-4), None].into();

    let mut agg = GroupedTopN::new(ValueOrdering::natural(), 2)?;
    agg.add_batch(&keys, &values)?;
    agg.add(3, 7)?;

    assert_eq!(
        agg.finish(ExecMode::Sequential)?,
        vec![(1, vec![10, -4]), (3, vec![7])]
    );
    Ok(())
}

#[test]
fn malformed_batches_are_rejected() -> Result<()> {
    let mut agg = GroupedTopN::<u8, u8>::new(ValueOrdering::natural(), 2)?;

    let err = agg.add_batch(&vec![1u8, 2], &vec![1u8]).unwrap_err();
    assert!(err.is_invalid_argument());

    let null_keys: Column<u8> = vec![Some(1), None].into();
    let err = agg.add_batch(&null_keys, &vec![5u8, 6]).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(agg.group_count(), 0);

    assert!(GroupedTopN::<u8, u8>::new(ValueOrdering::natural(), 0).is_err());
    Ok(())
}

#[test]
fn stats_sum_over_groups() -> Result<()> {
    let mut agg = GroupedTopN::new(ValueOrdering::<i32>::natural(), 1)?;
    for (k, v) in [("a", 1), ("a", 2), ("b", 5), ("b", 3)] {
        agg.add(k, v)?;
    }
    let stats = agg.stats();
    assert_eq!(stats.offered, 4);
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.evicted, 1);
    Ok(())
}

#[test]
fn refused_value_leaves_no_empty_group() -> Result<()> {
    let mut agg = GroupedTopN::new(ValueOrdering::<f64>::partial(), 2)?;
    let err = agg.add_batch(&vec![1u8, 2], &vec![1.0, f64::NAN]).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(agg.add(3, f64::NAN).unwrap_err().is_invalid_argument());
    assert_eq!(agg.group_count(), 1);

    assert_eq!(agg.finish(ExecMode::Sequential)?, vec![(1, vec![1.0])]);
    Ok(())
}

#[test]
fn merge_requires_matching_capacity_and_direction() -> Result<()> {
    let mut largest_one = GroupedTopN::new(ValueOrdering::<i32>::natural(), 1)?;
    largest_one.add(1, 3)?;

    let mut smallest_five = GroupedTopN::new(ValueOrdering::<i32>::natural().reversed(), 5)?;
    let mut largest_five = GroupedTopN::new(ValueOrdering::<i32>::natural(), 5)?;
    let mut smallest_one = GroupedTopN::new(ValueOrdering::<i32>::natural().reversed(), 1)?;
    for v in 0..5 {
        smallest_five.add(2, v)?;
        largest_five.add(2, v)?;
        smallest_one.add(2, v)?;
    }

    assert!(largest_one.merge(smallest_five).unwrap_err().is_invalid_argument());
    assert!(largest_one.merge(largest_five).unwrap_err().is_invalid_argument());
    assert!(largest_one.merge(smallest_one).unwrap_err().is_invalid_argument());
    assert_eq!(largest_one.group_count(), 1);

    let mut same_shape = GroupedTopN::new(ValueOrdering::<i32>::natural(), 1)?;
    same_shape.add(2, 4)?;
    same_shape.add(2, 9)?;
    largest_one.merge(same_shape)?;
    assert_eq!(
        largest_one.finish(ExecMode::Sequential)?,
        vec![(1, vec![3]), (2, vec![9])]
    );
    Ok(())
}
