//! Ghost-buffer tracker benchmarks.
//!
//! # Running
//! ```bash
//! cargo bench --package floortrack-core --bench ghost_buffer_tracker
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use floortrack_core::{GhostBufferConfig, GhostBufferTracker, IouAssociator};
use floortrack_models::{Bbox, ClassId, Detection};

fn detections_at(n: usize, frame_offset: f64) -> Vec<Detection> {
    (0..n)
        .map(|i| {
            let x = i as f64 * 120.0 + frame_offset;
            Detection::new(Bbox::new(x, 100.0, x + 80.0, 280.0), 0.9, ClassId::PERSON)
        })
        .collect()
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghost_buffer_tracker/steady_state");

    for &people in &[1usize, 10, 50] {
        group.throughput(Throughput::Elements(people as u64));
        group.bench_with_input(BenchmarkId::new("people", people), &people, |b, &people| {
            b.iter_batched(
                || {
                    let config = GhostBufferConfig::default();
                    let mut tracker =
                        GhostBufferTracker::new(IouAssociator::new(config), config).unwrap();
                    for _ in 0..(config.minimum_consecutive_frames + 1) {
                        tracker.update(&detections_at(people, 0.0));
                    }
                    tracker
                },
                |mut tracker| {
                    let out = tracker.update(black_box(&detections_at(people, 1.0)));
                    black_box(out)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_occlusion_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghost_buffer_tracker/occlusion_recovery");
    group.throughput(Throughput::Elements(1));

    group.bench_function("restore_after_gap", |b| {
        b.iter_batched(
            || {
                let config = GhostBufferConfig::default();
                let mut tracker =
                    GhostBufferTracker::new(IouAssociator::new(config), config).unwrap();
                tracker.update(&detections_at(1, 0.0));
                tracker.update(&detections_at(1, 0.0));
                for _ in 0..30 {
                    tracker.update(&[]);
                }
                tracker
            },
            |mut tracker| {
                let out = tracker.update(black_box(&detections_at(1, 5.0)));
                black_box(out)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_steady_state, bench_occlusion_recovery);
criterion_main!(benches);
