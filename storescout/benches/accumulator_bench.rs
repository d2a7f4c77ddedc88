//! Benchmarks for merging search pages.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use storescout::accumulator::ResultAccumulator;
use storescout::models::{NewsletterFlag, SearchResult};

fn page(start: usize, len: usize) -> Vec<SearchResult> {
    (start..start + len)
        .filter_map(|i| {
            SearchResult::new(
                format!("https://shop-{i}.example"),
                Some(format!("Shop {i}")),
                None,
                NewsletterFlag::from(i % 2 == 0),
                "logo.svg",
            )
        })
        .collect()
}

fn accumulator_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulator_add");
    for pages in [10usize, 100] {
        // Consecutive pages overlap by half.
        let batches: Vec<_> = (0..pages).map(|p| page(p * 10, 20)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(pages), &batches, |b, batches| {
            b.iter(|| {
                let mut acc = ResultAccumulator::new();
                for batch in batches {
                    acc.add(batch.iter().cloned());
                }
                black_box(acc.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, accumulator_benchmark);
criterion_main!(benches);
