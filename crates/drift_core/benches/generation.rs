//! World generation and enemy tick benchmarks for drift_core.
//!
//! Run with: `cargo bench -p drift_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drift_core::collision::CollisionMap;
use drift_core::enemies::{EnemySimConfig, EnemySimulation};
use drift_core::islands::WorldConfig;
use drift_core::map_generation::generate_world;
use drift_core::placement::generate_world_buildings;
use drift_core::players::{PlayerId, PlayerState};

/// Generates archipelagos of increasing size.
pub fn generation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_world");
    for (size, islands) in [(100_u32, 4_u32), (200, 10), (400, 30)] {
        let config = WorldConfig::default()
            .with_size(size, size)
            .with_island_count(islands);
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            b.iter(|| generate_world(black_box(config)));
        });
    }
    group.finish();
}

/// Runs enemy ticks against a generated world with one player on land.
pub fn tick_benchmark(c: &mut Criterion) {
    let Ok(world) = generate_world(&WorldConfig::default()) else {
        return;
    };
    let buildings = generate_world_buildings(&world, 16);
    let Some(&(col, row)) = world.island_centers().first() else {
        return;
    };
    let Ok(map) = CollisionMap::new(world.grid, 16) else {
        return;
    };
    let map = map.with_buildings(buildings);

    let mut players = BTreeMap::new();
    players.insert(
        PlayerId(1),
        PlayerState::new(col as f32 * 16.0, row as f32 * 16.0),
    );

    c.bench_function("enemy_tick", |b| {
        let Ok(mut sim) = EnemySimulation::new(EnemySimConfig::default().with_max_enemies(12))
        else {
            return;
        };
        let mut now = 0;
        b.iter(|| {
            now += 400;
            black_box(sim.tick(now, &map, &mut players))
        });
    });
}

criterion_group!(benches, generation_benchmark, tick_benchmark);
criterion_main!(benches);
