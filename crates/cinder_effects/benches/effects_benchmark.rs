//! # Effects Benchmark
//!
//! The per-frame pass runs once per rendered frame over the whole pool;
//! composers run in bursts when many events land in one snapshot.
//!
//! Run with: `cargo bench --package cinder_effects`

// Benchmarks don't need docs
#![allow(missing_docs)]

use cinder_core::Vec3;
use cinder_effects::{
    EffectAssets, Effects, EffectsConfig, EntityId, OpenAir, RenderCapabilities, Renderable,
    SequentialResolver, Viewpoint, Weapon, Wound,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn effects(capacity: usize) -> Effects {
    let config = EffectsConfig {
        seed: Some(42),
        pool_capacity: capacity,
        ..EffectsConfig::default()
    };
    let assets = EffectAssets::resolve(&mut SequentialResolver::new());
    Effects::new(config, RenderCapabilities::default(), assets).unwrap()
}

/// Benchmark: collection pass over a full pool of mixed, live effects.
fn bench_update_and_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_and_collect");

    for capacity in [256usize, 512, 2048] {
        let mut fx = effects(capacity);
        let view = Viewpoint::new(EntityId(0));
        let wound = Wound {
            origin: Vec3::new(0.0, 0.0, 32.0),
            direction: Some(Vec3::X),
            victim: EntityId(1),
            weapon: Weapon::RocketLauncher,
        };
        while fx.pool().occupied() < capacity {
            fx.bleed(0, &OpenAir, &view, &wound).unwrap();
            fx.gib_player(0, Vec3::ZERO);
        }

        let mut frame: Vec<Renderable> = Vec::with_capacity(capacity);
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            b.iter(|| {
                frame.clear();
                black_box(fx.update_and_collect(black_box(400), &mut frame))
            });
        });
    }

    group.finish();
}

/// Benchmark: a rocket hit, the heaviest spray.
fn bench_bleed(c: &mut Criterion) {
    let mut fx = effects(512);
    let view = Viewpoint::new(EntityId(0));
    let wound = Wound {
        origin: Vec3::ZERO,
        direction: Some(Vec3::new(0.5, 0.5, 0.1)),
        victim: EntityId(3),
        weapon: Weapon::RocketLauncher,
    };
    c.bench_function("bleed_rocket", |b| {
        b.iter(|| fx.bleed(black_box(0), &OpenAir, &view, &wound).unwrap());
    });
}

/// Benchmark: full gib volley.
fn bench_gib_player(c: &mut Criterion) {
    let mut fx = effects(512);
    c.bench_function("gib_player", |b| {
        b.iter(|| fx.gib_player(black_box(0), Vec3::ZERO));
    });
}

criterion_group!(benches, bench_update_and_collect, bench_bleed, bench_gib_player);
criterion_main!(benches);
