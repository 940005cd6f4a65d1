//! Benchmarks for the repetition counter and the frame pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pushup_counter::{
    config::Config,
    pipeline::FramePipeline,
    profile::BodySide,
    rep_counter::{RepCounter, Thresholds},
    skeleton::{KeypointIndex, Skeleton},
};

fn benchmark_counter(c: &mut Criterion) {
    // Noisy push-up signal between roughly 80 and 160 degrees
    let angles: Vec<f64> = (0..1000)
        .map(|i| {
            let t = f64::from(i) * 0.05;
            120.0 + 40.0 * t.sin() + 2.0 * rand::random::<f64>()
        })
        .collect();

    c.bench_function("rep_counter_1000", |b| {
        b.iter(|| {
            let mut counter = RepCounter::new(Thresholds::default());
            for &angle in &angles {
                black_box(counter.update(black_box(angle)));
            }
            counter.state()
        });
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = Config::default();

    let coords: Vec<(f64, f64)> = (0..KeypointIndex::COUNT)
        .map(|i| (300.0 + 40.0 * i as f64, 300.0 + 7.0 * i as f64))
        .collect();
    let skeleton = Skeleton::from_xy(&coords);

    for view in [BodySide::Left, BodySide::Front] {
        let Ok(mut pipeline) = FramePipeline::new(view, &config) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("process", view), &skeleton, |b, skeleton| {
            b.iter(|| pipeline.process(black_box(Some(skeleton))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_counter, benchmark_pipeline);
criterion_main!(benches);
