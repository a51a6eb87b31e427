use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use rh_hash::HashTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1024)]
    target_capacity: usize,

    /// Remove every nth entry after filling, to show tombstone impact.
    /// 0 disables removal.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    let capacity = args.target_capacity.next_power_of_two().max(4);
    println!(
        "Creating HashTable with target capacity: {} (rounded to {})",
        args.target_capacity, capacity
    );

    let mut table: HashTable<u64> =
        HashTable::new(capacity).expect("rounded capacity is a power of two of at least 4");

    println!("Filling table to just below the growth threshold...");

    // One below the 3/4 threshold, so the table never grows.
    let num_values = capacity / 4 * 3 - 1;
    for i in 0..num_values {
        let value = i as u64;
        let hash = hash_u64(value);
        if !table.insert(hash, value, |a, b| a == b) {
            panic!("Value already exists in table: {}", value);
        }
    }

    if args.remove_every > 0 {
        for i in (0..num_values).step_by(args.remove_every) {
            let value = i as u64;
            table.remove(hash_u64(value), |&v| v == value);
        }
        println!(
            "Removed every {}th value ({} tombstones)",
            args.remove_every,
            num_values.div_ceil(args.remove_every)
        );
    }

    println!("Inserted {} values into table", table.len());
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    println!("Probe distance histogram:");
    let histogram = table.probe_histogram();
    for (dist, count) in histogram.iter().enumerate() {
        if *count > 0 {
            println!("{dist:>4}: {count}");
        }
    }

    let total_probes: usize = histogram
        .iter()
        .enumerate()
        .map(|(dist, count)| dist * count)
        .sum();
    println!(
        "Mean probe distance: {:.3}",
        total_probes as f64 / table.len() as f64
    );
}
