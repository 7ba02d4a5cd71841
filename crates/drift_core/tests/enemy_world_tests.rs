use drift_core::enemies::{EnemySimConfig, MIN_BUILDING_DISTANCE};
use drift_core::events::EnemyEvent;
use drift_core::islands::WorldConfig;
use drift_core::players::{PlayerId, PlayerState};
use drift_test_utils::fixtures::{first_island_px, generated_map, players, EnemyScenario};

fn island_scenario(seed: u32) -> EnemyScenario {
    let (world, map) = generated_map(&WorldConfig::default().with_seed(seed)).unwrap();
    let (x, y) = first_island_px(&world).unwrap();
    let config = EnemySimConfig::default()
        .with_seed(seed)
        .with_max_enemies(6)
        .with_spawn_interval(800);
    EnemyScenario::new(map, players(&[(1, PlayerState::new(x, y))]), config).unwrap()
}

#[test]
fn enemies_never_enter_water() {
    let mut scenario = island_scenario(12345);
    for _ in 0..300 {
        scenario.step();
        for enemy in scenario.sim.live_enemies() {
            let size = enemy.size();
            assert!(
                scenario.map.is_walkable(enemy.x, enemy.y, size, size),
                "{} at ({}, {}) is off land",
                enemy.id,
                enemy.x,
                enemy.y
            );
        }
    }
}

#[test]
fn spawns_keep_clear_of_buildings() {
    let mut scenario = island_scenario(777);
    scenario.run(60);

    for event in &scenario.events {
        let EnemyEvent::EnemySpawn { enemies } = event else {
            continue;
        };
        for view in enemies {
            let half = view.size as f32 / 2.0;
            let (cx, cy) = (view.x as f32 + half, view.y as f32 + half);
            for building in scenario.map.buildings() {
                assert!(building.bounds().distance_to_point(cx, cy) >= MIN_BUILDING_DISTANCE);
            }
        }
    }
}

#[test]
fn population_never_exceeds_cap() {
    let mut scenario = island_scenario(4);
    for _ in 0..100 {
        scenario.step();
        assert!(scenario.sim.live_count() <= 6);
    }
}

#[test]
fn inactive_players_are_never_damaged() {
    let mut scenario = island_scenario(21);
    if let Some(player) = scenario.players.get_mut(&PlayerId(1)) {
        player.is_spectator = true;
    }
    scenario.run(200);

    assert!(!scenario
        .events
        .iter()
        .any(|event| matches!(event, EnemyEvent::PlayerDamage { .. })));
    assert_eq!(scenario.players[&PlayerId(1)].health, 100);
}
