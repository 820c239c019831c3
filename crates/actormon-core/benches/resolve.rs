//! Name resolution benchmarks.
//!
//! Exact names hit the map directly; qualified names scan every definition.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use actormon_core::metrics::{resolve, CustomMetrics, MetricRegistry, BUILT_IN_COUNTER_NAMES};

fn registry_with(extra: usize) -> MetricRegistry {
    let ext = (0..extra).fold(CustomMetrics::new(), |ext, i| {
        ext.with_counter(format!("CustomCounter{i}"))
    });
    MetricRegistry::build("Akka", BUILT_IN_COUNTER_NAMES, Some(&ext))
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for extra in [0, 50, 500] {
        let registry = registry_with(extra);
        let counters = registry.counters();

        group.bench_with_input(BenchmarkId::new("exact", extra), &extra, |b, _| {
            b.iter(|| black_box(resolve(black_box("ReceivedMessages"), counters)));
        });

        group.bench_with_input(BenchmarkId::new("qualified", extra), &extra, |b, _| {
            b.iter(|| {
                black_box(resolve(
                    black_box("system/user/worker-7/ReceivedMessages"),
                    counters,
                ))
            });
        });

        group.bench_with_input(BenchmarkId::new("miss", extra), &extra, |b, _| {
            b.iter(|| black_box(resolve(black_box("system/user/NotARealMetric"), counters)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
