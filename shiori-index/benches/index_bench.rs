//! NameIndex Throughput Benchmarks
//!
//! Run with: cargo bench --package shiori-index

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::seq::SliceRandom;

use shiori_core::config::IndexConfig;
use shiori_core::metrics::Metrics;
use shiori_index::NameIndex;
use shiori_store::{MemorySkipList, MemorySortedSet};

const NAMES: usize = 10_000;

fn new_index(batch_size: usize) -> NameIndex {
    NameIndex::new(
        Arc::new(MemorySkipList::default()),
        Arc::new(MemorySortedSet::new()),
        IndexConfig {
            prefix: "bench/".to_string(),
            batch_size,
        },
        Arc::new(Metrics::new()),
    )
    .unwrap()
}

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{:08}", i)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let batch_sizes = [16, 256, 1024];

    let mut group = c.benchmark_group("insert");

    for batch_size in batch_sizes {
        let mut shuffled = names(NAMES);
        shuffled.shuffle(&mut rand::thread_rng());

        group.throughput(Throughput::Elements(NAMES as u64));
        group.bench_function(format!("batch_{}", batch_size), |bencher| {
            bencher.iter(|| {
                let index = new_index(batch_size);
                for name in &shuffled {
                    index.insert(black_box(name.as_bytes())).unwrap();
                }
            })
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let batch_sizes = [16, 1024];

    let mut group = c.benchmark_group("scan");

    for batch_size in batch_sizes {
        let index = new_index(batch_size);
        for name in names(NAMES) {
            index.insert(name.as_bytes()).unwrap();
        }

        group.throughput(Throughput::Elements(NAMES as u64));
        group.bench_function(format!("batch_{}", batch_size), |bencher| {
            bencher.iter(|| {
                let mut count = 0usize;
                index
                    .scan(b"", |name| {
                        black_box(name);
                        count += 1;
                        true
                    })
                    .unwrap();
                count
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_scan);
criterion_main!(benches);
