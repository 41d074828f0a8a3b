//! Benchmarks for the cell write/notify hot path.
//!
//! Run with: cargo bench -p superstate-reactive --bench notify_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use superstate_reactive::{Listener, Observable, Tracker, ValueCell};

// =============================================================================
// Write + fan-out
// =============================================================================

fn bench_set_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell/set");

    for listeners in [0usize, 1, 8, 64] {
        let cell = ValueCell::detached(0u64);
        for _ in 0..listeners {
            cell.add_listener(Listener::new(|| {
                black_box(());
            }));
        }
        let mut next = 0u64;
        group.bench_with_input(BenchmarkId::from_parameter(listeners), &listeners, |b, _| {
            b.iter(|| {
                next = next.wrapping_add(1);
                cell.set(black_box(next)).unwrap();
            })
        });
    }

    group.bench_function("textually_equal", |b| {
        let cell = ValueCell::detached(String::from("steady"));
        b.iter(|| cell.set(black_box("steady".to_string())).unwrap())
    });

    group.finish();
}

// =============================================================================
// Tracked reads
// =============================================================================

fn bench_tracked_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker/session");

    let tracker = Tracker::new();
    let cells: Vec<ValueCell<u32>> = (0..16).map(|i| ValueCell::new(&tracker, i)).collect();

    group.bench_function("read_16_and_harvest", |b| {
        b.iter(|| {
            let (sum, merged) = tracker
                .track(|| cells.iter().map(ValueCell::get).sum::<u32>())
                .unwrap();
            black_box((sum, merged.len()))
        })
    });

    group.bench_function("untracked_read_16", |b| {
        b.iter(|| black_box(cells.iter().map(ValueCell::get).sum::<u32>()))
    });

    group.finish();
}

criterion_group!(benches, bench_set_fanout, bench_tracked_reads);
criterion_main!(benches);
