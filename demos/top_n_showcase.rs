//! Top-N showcase.
//!
//! Demonstrates the bounded heap and the layers built on it:
//! - `TypedHeap`: largest and smallest N of a stream
//! - Combiners: `MaxN`, `MinN`, `TopNBy` with partial merges
//! - `GroupedTopN`: per-key top N, sequential and parallel
//! - `CompactionPolicy` loaded from JSON
//!
//! Run with: `cargo run --example top_n_showcase`

use anyhow::Result;
use ironheap::combiners::combine_group;
use ironheap::{
    CombineFn, CompactionPolicy, ExecMode, GroupedTopN, MaxN, MinN, TopNBy, TypedHeap,
    ValueOrdering,
};

#[allow(clippy::too_many_lines)]
fn main() -> Result<()> {
    println!("Top-N Showcase Example\n");

    // Sample e-commerce transaction data, prices in cents
    let transactions: Vec<(String, u64)> = vec![
        ("Electronics", 59_999),
        ("Books", 1_999),
        ("Electronics", 129_999),
        ("Clothing", 4_999),
        ("Books", 2_499),
        ("Electronics", 79_999),
        ("Clothing", 7_999),
        ("Books", 1_499),
        ("Clothing", 3_999),
        ("Electronics", 44_999),
    ]
    .into_iter()
    .map(|(cat, price)| (cat.to_string(), price))
    .collect();
    let prices: Vec<u64> = transactions.iter().map(|(_, p)| *p).collect();

    // =============================================================================
    // The heap itself
    // =============================================================================
    println!("BOUNDED HEAP\n");

    let mut largest = TypedHeap::new(ValueOrdering::<u64>::natural(), 3)?;
    largest.insert_all(&prices)?;
    let mut top = Vec::new();
    largest.pop_all(&mut top)?;
    println!("Three most expensive items: {}", cents(&top));

    let mut smallest = TypedHeap::new(ValueOrdering::<u64>::natural().reversed(), 3)?;
    smallest.insert_all(&prices)?;
    let mut bottom = Vec::new();
    smallest.pop_all(&mut bottom)?;
    println!("Three cheapest items:       {}", cents(&bottom));
    println!("Heap stats: {}", smallest.stats().to_json());

    // =============================================================================
    // Combiners
    // =============================================================================
    println!("\nCOMBINERS\n");

    println!("max(price, 2) = {}", cents(&combine_group(&MaxN::<u64>::new(2), &prices)?));
    println!("min(price, 2) = {}", cents(&combine_group(&MinN::<u64>::new(2), &prices)?));

    // max_by(category, price, 2): rank whole rows by the price column
    let by_price = ValueOrdering::<(String, u64)>::from_fn(|a, b| a.1.cmp(&b.1));
    let rows = combine_group(&TopNBy::new(2, by_price), &transactions)?;
    println!("\nTwo priciest rows:");
    for (category, price) in &rows {
        println!("  {category}: ${}.{:02}", price / 100, price % 100);
    }

    // Partial accumulators from two "workers", merged before finishing
    let comb = MaxN::<u64>::new(3);
    let (left, right) = prices.split_at(prices.len() / 2);
    let mut acc = comb.create()?;
    let mut other = comb.create()?;
    for &p in left {
        comb.add_input(&mut acc, p)?;
    }
    for &p in right {
        comb.add_input(&mut other, p)?;
    }
    comb.merge(&mut acc, other)?;
    println!("\nMerged partials, top 3: {}", cents(&comb.finish(acc)?));

    // =============================================================================
    // Grouped aggregation
    // =============================================================================
    println!("\nGROUPED TOP-N\n");

    let (keys, values): (Vec<String>, Vec<u64>) = transactions.iter().cloned().unzip();

    let mut per_category = GroupedTopN::new(ValueOrdering::<u64>::natural(), 2)?;
    per_category.add_batch(&keys, &values)?;
    println!("Two most expensive per category ({} groups):", per_category.group_count());
    for (category, top) in per_category.finish(ExecMode::Sequential)? {
        println!("  {category}: {}", cents(&top));
    }

    let mut cheapest = GroupedTopN::new(ValueOrdering::<u64>::natural().reversed(), 1)?;
    cheapest.add_batch(&keys, &values)?;
    println!("\nCheapest per category (parallel drain):");
    for (category, low) in cheapest.finish(ExecMode::Parallel { threads: Some(2) })? {
        println!("  {category}: {}", cents(&low));
    }

    // =============================================================================
    // Compaction policy
    // =============================================================================
    println!("\nCOMPACTION POLICY\n");

    let policy = CompactionPolicy::from_json_str(r#"{ "garbage_ratio": 0.5, "min_store_len": 64 }"#)?;
    let mut heap = TypedHeap::with_policy(ValueOrdering::<u64>::natural(), 10, policy)?;
    heap.insert_all(&(0..100_000u64).collect::<Vec<_>>())?;
    let stats = heap.stats();
    println!(
        "100000 ascending inserts into a 10-slot heap: {} evictions, {} compactions, store holds {} values",
        stats.evicted,
        stats.compactions,
        heap.store_len()
    );

    println!("\nTop-N showcase complete!");
    Ok(())
}

fn cents(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| format!("${}.{:02}", v / 100, v % 100))
        .collect::<Vec<_>>()
        .join(", ")
}
