//! # Fused Pipelines
//!
//! Chain `map` and `filter` stages over one or more sequences and
//! materialize the result into a container.
//!
//! Run: `cargo run --example typed_pipeline`

use fusepipe::{PipelineConfig, Record, Value, from, from_zip};
use std::collections::{BTreeMap, BTreeSet};

fn main() -> fusepipe::Result<()> {
    println!("=== Fused Pipeline Examples ===\n");

    // Example 1: map and filter with local indices
    println!("--- Map, Filter, Index ---");
    let pipeline = from(1..=6)
        .filter(|v: &i32, _| v % 2 == 0) // 2, 4, 6
        .map(|v, _| v * v) // 4, 16, 36
        .filter(|v, _| *v != 16) // 4, 36
        .map(|v, i| (v, i)); // index counts survivors only
    println!("Stages: {:?}", pipeline.stages());
    println!("Pairs: {:?}", pipeline.collect_into(Vec::new())?);

    // Example 2: zipping sequences of different types
    println!("\n--- Zip ---");
    let names = vec!["ada", "grace", "linus", "barbara"];
    let years = vec![1815, 1906, 1969];
    let born = from_zip((names, years)).collect_into(BTreeMap::new())?;
    println!("Birth years (shortest input wins): {:?}", born);

    // Example 3: containers decide how values combine
    println!("\n--- Containers ---");
    let words = from(vec!["b", "a", "c", "a"]);
    println!("Set: {:?}", words.collect_into(BTreeSet::new())?);
    println!("Text: {:?}", words.collect_into(String::new())?);
    println!("Count: {}", words.map(|_, _| 1usize).collect_into(0usize)?);

    let record = from(vec![1, 2, 3, 4, 5])
        .map(|v: i32, i| (v * v, i))
        .collect_into(Record::new())?;
    println!("Record: {:?}", record);

    // Example 4: dynamic values and a type mismatch
    println!("\n--- Dynamic Values ---");
    let rows = vec![Value::from(("x", 1)), Value::from(true), Value::from(("y", 2))];
    let mut partial = Record::new();
    match from(rows).extend_into(&mut partial) {
        Ok(()) => println!("Unexpected success"),
        Err(e) => println!("Aborted: {} (kept {} entries)", e, partial.len()),
    }

    // Example 5: bounded run over an infinite source
    println!("\n--- Element Limit ---");
    let config = PipelineConfig::new()
        .with_label("multiples-of-seven")
        .with_element_limit(50);
    let sevens = from(1u64..)
        .with_config(config)
        .filter(|v: &u64, _| v % 7 == 0)
        .collect_into(Vec::new())?;
    println!("Multiples of 7 in the first 50 naturals: {:?}", sevens);

    Ok(())
}
