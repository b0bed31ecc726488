//! Benchmarks for epochkv index operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use epochkv::{VersionedEntry, VersionedIndex};

fn populated_index(keys: usize, versions: i64) -> VersionedIndex {
    let mut index = VersionedIndex::new();
    for k in 0..keys {
        for v in 0..versions {
            index.upsert(VersionedEntry::new(
                format!("key{:06}", k),
                format!("value{}", v),
                v,
            ));
        }
    }
    index
}

fn index_benchmarks(c: &mut Criterion) {
    c.bench_function("upsert 10k distinct versions", |b| {
        b.iter(|| {
            let mut index = VersionedIndex::new();
            for v in 0..10_000 {
                index.upsert(VersionedEntry::new("hot-key", "value", v));
            }
            black_box(index.len())
        })
    });

    let index = populated_index(1_000, 10);
    c.bench_function("lookup in 10k-entry index", |b| {
        b.iter(|| black_box(index.lookup("key000500", 5)))
    });

    c.bench_function("snapshot copy of 10k-entry index", |b| {
        b.iter(|| black_box(index.snapshot_copy().len()))
    });
}

criterion_group!(benches, index_benchmarks);
criterion_main!(benches);
