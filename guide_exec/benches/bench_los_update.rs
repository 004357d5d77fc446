//! # LOS Guidance Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use guide_lib::los::{Criterion as SwitchCriterion, LosGuidance, Params, Waypoint};
use nalgebra::Vector2;

fn los_update_benchmark(c: &mut Criterion) {
    // ---- Build guidance tracking a long sequence ----

    let waypoints: Vec<Waypoint> = (0..1000)
        .map(|i| Vector2::new(i as f64 * 100.0, (i % 2) as f64 * 50.0))
        .collect();

    let build = |criterion| {
        let mut guidance = LosGuidance::new(Params {
            switch_criterion: criterion,
            ..Default::default()
        })
        .unwrap();
        guidance.set_waypoints(waypoints.clone()).unwrap();
        guidance
    };

    let mut circle = build(SwitchCriterion::CircleOfAcceptance);
    let mut progress = build(SwitchCriterion::ProgressAlongPath);

    // ---- Benchmark a single tracking update ----

    c.bench_function("los_update_circle", |b| {
        b.iter(|| circle.update(black_box(-40.0), black_box(3.0)))
    });

    c.bench_function("los_update_progress", |b| {
        b.iter(|| progress.update(black_box(-40.0), black_box(3.0)))
    });

    // ---- Benchmark passing many closely spaced waypoints in one update ----

    let dense: Vec<Waypoint> = (0..1000)
        .map(|i| Vector2::new(i as f64 * 0.01, 0.0))
        .collect();

    c.bench_function("los_update_multi_switch", |b| {
        b.iter_batched(
            || {
                let mut g = LosGuidance::new(Params::default()).unwrap();
                g.set_waypoints(dense.clone()).unwrap();
                g
            },
            |mut g| g.update(black_box(5.0), black_box(0.0)),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, los_update_benchmark);
criterion_main!(benches);
