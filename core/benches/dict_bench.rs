use std::time::{Duration, Instant};

use iris::{Dict, Int, Value};

fn bench_insert_operations(n: usize) -> Duration {
    let start = Instant::now();

    let mut dict = Dict::new();
    for i in 0..n {
        dict.insert(format!("var{i}").as_str(), Value::Int(i as Int));
    }

    start.elapsed()
}

fn bench_lookup_operations(n: usize) -> Duration {
    let mut dict = Dict::new();
    for i in 0..n {
        dict.insert(i as Int, Value::Int(i as Int));
    }

    let start = Instant::now();
    for i in 0..n {
        std::hint::black_box(dict.get_view(i as Int));
    }
    start.elapsed()
}

fn main() {
    println!("Dict::insert() Performance Benchmark");
    println!("====================================\n");

    for size in [10, 100, 1000, 10000, 100000] {
        let duration = bench_insert_operations(size);
        let per_op = duration.as_nanos() / size as u128;
        println!("{size:6} insertions: {duration:?} ({per_op} ns/op)");
    }

    println!("\nDict::get_view() Performance Benchmark");
    println!("======================================\n");

    for size in [10, 100, 1000, 10000, 100000] {
        let duration = bench_lookup_operations(size);
        let per_op = duration.as_nanos() / size as u128;
        println!("{size:6} lookups: {duration:?} ({per_op} ns/op)");
    }
}
