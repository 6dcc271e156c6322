//! Benchmarks for the per-step simulation path.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use particle_fx::prelude::*;

const DT: f64 = 1.0 / 60.0;

/// Run an effect until its live count has roughly settled.
fn warmed(kind: EffectKind, count: usize) -> Box<dyn Effect> {
    let mut effect = create_effect(kind, count).expect("effect");
    for _ in 0..240 {
        effect.update(DT);
        effect.cpu_update(DT);
    }
    effect
}

fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("effect_step");

    for count in [10_000usize, 100_000] {
        group.throughput(Throughput::Elements(count as u64));
        for kind in EffectKind::ALL {
            let mut effect = warmed(kind, count);
            group.bench_with_input(BenchmarkId::new(kind.name(), count), &count, |b, _| {
                b.iter(|| {
                    effect.update(DT);
                    effect.cpu_update(black_box(DT));
                })
            });
        }
    }

    group.finish();
}

fn full_store(count: usize) -> ParticleSystem {
    let mut system = ParticleSystem::new(count).expect("system").with_emitter(
        ParticleEmitter::new(count as f32 * 1_000.0)
            .with_seed(7)
            .with_generator(SpherePosGen::new(Vec4::ZERO, 1.0).expect("radius"))
            .with_generator(SphereVelGen::new(0.1, 1.0).expect("speed"))
            .with_generator(BasicTimeGen::new(1.0e6, 1.0e6).expect("lifetime")),
    );
    system.update(1.0);
    system
}

fn bench_updaters(c: &mut Criterion) {
    let count = 100_000;
    let mut group = c.benchmark_group("updater");
    group.throughput(Throughput::Elements(count as u64));

    let attractors = AttractorUpdater::new()
        .with_attractor(Attractor::new(Vec3::new(0.0, 0.0, 0.75), 1.0))
        .and_then(|a| a.with_attractor(Attractor::new(Vec3::new(0.0, 0.0, -0.75), 1.0)))
        .and_then(|a| a.with_attractor(Attractor::new(Vec3::new(0.0, 0.75, 0.0), 1.0)))
        .and_then(|a| a.with_attractor(Attractor::new(Vec3::new(0.0, -0.75, 0.0), 1.0)))
        .expect("attractors");

    let cases: Vec<(&str, Updater)> = vec![
        ("euler", EulerUpdater::new(Vec4::new(0.0, -9.8, 0.0, 0.0)).into()),
        ("floor", FloorUpdater::default().into()),
        ("attractor_x4", attractors.into()),
        ("basic_color", Updater::BasicColor),
        (
            "vel_color",
            Updater::VelColor(RangeColorUpdater::new(Vec4::splat(-1.0), Vec4::splat(1.0)).expect("range")),
        ),
    ];

    for (name, updater) in cases {
        let mut system = full_store(count);
        group.bench_function(name, |b| {
            b.iter(|| updater.update(black_box(DT as f32), system.data_mut()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_effects, bench_updaters);
criterion_main!(benches);
