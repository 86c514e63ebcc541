use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rollkey_index::LineageIndex;
use rollkey_types::{Key, KeyComponent};

fn lineage(systems: usize, depth: usize) -> (LineageIndex, Vec<Key>) {
    let mut index = LineageIndex::new();
    let now = Utc::now();
    let mut keys = Vec::with_capacity(systems);

    for system in 0..systems {
        let mut key = Key::root(KeyComponent::new(format!("system-{}", system)).unwrap());
        for generation in 1..depth {
            key = key.extend(KeyComponent::new(format!("r{}", generation)).unwrap());
        }
        index.extend_from(&key, 0, now).unwrap();
        keys.push(key);
    }

    (index, keys)
}

fn bench_longest_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("longest_prefix");

    for depth in [1usize, 4, 16] {
        let (index, keys) = lineage(10_000, depth);
        group.bench_with_input(BenchmarkId::new("exact", depth), &keys, |b, keys| {
            let mut i = 0;
            b.iter(|| {
                let key = &keys[i % keys.len()];
                i += 1;
                black_box(index.snapshot(key))
            })
        });

        let continued: Vec<Key> = keys
            .iter()
            .map(|k| k.extend(KeyComponent::new("next").unwrap()))
            .collect();
        group.bench_with_input(BenchmarkId::new("continuation", depth), &continued, |b, keys| {
            let mut i = 0;
            b.iter(|| {
                let key = &keys[i % keys.len()];
                i += 1;
                black_box(index.snapshot(key))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_longest_prefix);
criterion_main!(benches);
