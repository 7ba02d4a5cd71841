//! Test fixtures and helpers.
//!
//! Pre-built maps, player snapshots and enemy scenarios for consistent
//! testing across crates.

use drift_core::collision::{CollisionMap, TILE_SIZE};
use drift_core::enemies::{EnemySimConfig, EnemySimulation};
use drift_core::error::Result;
use drift_core::events::EnemyEvent;
use drift_core::islands::WorldConfig;
use drift_core::map_generation::{generate_world, GeneratedWorld};
use drift_core::placement::generate_world_buildings;
use drift_core::players::{PlayerId, PlayerSnapshot, PlayerState};
use drift_core::terrain::{Tile, WorldGrid};

use crate::determinism::compute_bytes_hash;

/// An all-land collision map of `width` x `height` tiles.
///
/// # Panics
///
/// Never in practice: the tile size is a non-zero constant.
#[must_use]
pub fn land_map(width: u32, height: u32) -> CollisionMap {
    CollisionMap::new(WorldGrid::filled(width, height, Tile::Land), TILE_SIZE)
        .expect("TILE_SIZE is non-zero")
}

/// A land rectangle surrounded by `border` tiles of water.
///
/// # Panics
///
/// Never in practice: the tile size is a non-zero constant.
#[must_use]
pub fn island_map(width: u32, height: u32, border: u32) -> CollisionMap {
    let mut grid = WorldGrid::ocean(width, height);
    let border = i64::from(border);
    for y in border..i64::from(height) - border {
        for x in border..i64::from(width) - border {
            grid.set(x, y, Tile::Land);
        }
    }
    CollisionMap::new(grid, TILE_SIZE).expect("TILE_SIZE is non-zero")
}

/// Generate a world and wrap it in a collision map with procedural buildings.
pub fn generated_map(config: &WorldConfig) -> Result<(GeneratedWorld, CollisionMap)> {
    let world = generate_world(config)?;
    let buildings = generate_world_buildings(&world, TILE_SIZE);
    let map = CollisionMap::new(world.grid.clone(), TILE_SIZE)?.with_buildings(buildings);
    Ok((world, map))
}

/// Pixel position of the first island center, if any.
#[must_use]
pub fn first_island_px(world: &GeneratedWorld) -> Option<(f32, f32)> {
    let ts = TILE_SIZE as f32;
    world
        .island_centers()
        .first()
        .map(|&(col, row)| (col as f32 * ts, row as f32 * ts))
}

/// A snapshot holding the given players, keyed by id.
#[must_use]
pub fn players(entries: &[(u32, PlayerState)]) -> PlayerSnapshot {
    entries
        .iter()
        .map(|(id, state)| (PlayerId(*id), state.clone()))
        .collect()
}

/// A snapshot with one active player at a position.
#[must_use]
pub fn single_player(x: f32, y: f32) -> PlayerSnapshot {
    players(&[(1, PlayerState::new(x, y))])
}

/// A self-contained enemy simulation run: map, players and clock.
#[derive(Debug)]
pub struct EnemyScenario {
    /// Static world.
    pub map: CollisionMap,
    /// Live player snapshot.
    pub players: PlayerSnapshot,
    /// Simulation under test.
    pub sim: EnemySimulation,
    /// Current simulated time.
    pub now_ms: u64,
    /// Every event emitted so far.
    pub events: Vec<EnemyEvent>,
}

impl EnemyScenario {
    /// Build a scenario. The spawn clock starts at zero.
    pub fn new(map: CollisionMap, players: PlayerSnapshot, config: EnemySimConfig) -> Result<Self> {
        let sim = EnemySimulation::new(config)?;
        Ok(Self {
            map,
            players,
            sim,
            now_ms: 0,
            events: Vec::new(),
        })
    }

    /// A 60x60 land map with one player in the middle and `max_enemies` enemies.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration is rejected.
    #[must_use]
    pub fn open_field(seed: u32, max_enemies: usize) -> Self {
        let config = EnemySimConfig::default()
            .with_seed(seed)
            .with_max_enemies(max_enemies)
            .with_spawn_interval(0);
        Self::new(land_map(60, 60), single_player(480.0, 480.0), config)
            .expect("default enemy config is valid")
    }

    /// Advance one tick interval.
    pub fn step(&mut self) {
        self.now_ms += self.sim.config().tick_interval_ms;
        let events = self.sim.tick(self.now_ms, &self.map, &mut self.players);
        self.events.extend(events);
    }

    /// Advance `ticks` tick intervals.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Hash of the enemy snapshot and player snapshot.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let enemies = bincode::serialize(&self.sim.snapshot()).unwrap_or_default();
        let players = bincode::serialize(&self.players).unwrap_or_default();
        compute_bytes_hash(&[enemies.as_slice(), players.as_slice()])
    }
}
