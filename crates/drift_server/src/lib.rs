//! # Drift World Server
//!
//! Headless host for one archipelago.
//!
//! Generates the world at startup, owns the enemy simulation and the live
//! player snapshot, drives ticks from a [`TickScheduler`] and forwards every
//! [`EnemyEvent`] over a broadcast channel. Connection handling and wire
//! framing belong to the session layer on top.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod scheduler;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use drift_core::collision::CollisionMap;
use drift_core::combat::{AttackOutcome, AttackRequest};
use drift_core::enemies::{EnemySimConfig, EnemySimulation, NearbyEnemy};
use drift_core::error::GameError;
use drift_core::events::{EnemyEvent, EnemyView};
use drift_core::map_generation::{generate_world, GeneratedWorld};
use drift_core::placement::generate_world_buildings;
use drift_core::players::{PlayerId, PlayerSnapshot, PlayerState};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info};

pub use config::{ConfigError, ServerConfig};
pub use scheduler::TickScheduler;

/// Error type for server operations.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// World or simulation setup failed.
    #[error("World setup failed")]
    Game(#[from] GameError),
    /// Event could not be encoded for the wire.
    #[error("Failed to encode event")]
    Encode(#[from] serde_json::Error),
    /// `start` was called on a running server.
    #[error("Server is already running")]
    AlreadyRunning,
}

/// Mutable state shared with the tick loop.
#[derive(Debug)]
struct ServerState {
    sim: EnemySimulation,
    players: PlayerSnapshot,
}

/// One running archipelago.
#[derive(Debug)]
pub struct GameServer {
    world: Option<Arc<GeneratedWorld>>,
    map: Arc<CollisionMap>,
    state: Arc<Mutex<ServerState>>,
    events: broadcast::Sender<EnemyEvent>,
    tick_interval: Duration,
    epoch: Instant,
    scheduler: Option<TickScheduler>,
}

impl GameServer {
    /// Generate the world and set up the simulation from a configuration.
    ///
    /// Buildings come from the configured registry, or are placed
    /// procedurally when none is configured.
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let world = generate_world(&config.world)?;
        let buildings = match config.load_buildings()? {
            Some(buildings) => buildings,
            None => generate_world_buildings(&world, config.tile_size),
        };
        let decorations = config.load_decorations()?;
        info!(
            buildings = buildings.len(),
            decorations = decorations.len(),
            npcs = config.npcs.len(),
            "Registries loaded"
        );

        let map = CollisionMap::new(world.grid.clone(), config.tile_size)?
            .with_buildings(buildings)
            .with_decorations(decorations)
            .with_npcs(&config.npcs);

        let mut server = Self::with_map(map, config.enemies.clone(), config.event_capacity)?;
        server.world = Some(Arc::new(world));
        Ok(server)
    }

    /// Run the simulation over a prebuilt collision map.
    pub fn with_map(
        map: CollisionMap,
        enemies: EnemySimConfig,
        event_capacity: usize,
    ) -> Result<Self, ServerError> {
        if event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity.into());
        }
        let tick_interval = Duration::from_millis(enemies.tick_interval_ms);
        let sim = EnemySimulation::new(enemies)?;
        let (events, _) = broadcast::channel(event_capacity);

        Ok(Self {
            world: None,
            map: Arc::new(map),
            state: Arc::new(Mutex::new(ServerState {
                sim,
                players: PlayerSnapshot::new(),
            })),
            events,
            tick_interval,
            epoch: Instant::now(),
            scheduler: None,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        lock_state(&self.state)
    }

    /// The generated world, when built from a [`ServerConfig`].
    #[must_use]
    pub fn world(&self) -> Option<&GeneratedWorld> {
        self.world.as_deref()
    }

    /// Static collision world.
    #[must_use]
    pub fn map(&self) -> &CollisionMap {
        &self.map
    }

    /// Receive every event emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EnemyEvent> {
        self.events.subscribe()
    }

    /// Milliseconds since the server was created.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    // ========================================================================
    // Collision queries
    // ========================================================================

    /// Returns true if a box at `(x, y)` collides with anything static.
    #[must_use]
    pub fn is_blocked(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.map.is_blocked(x, y, width, height)
    }

    /// Returns true if a box at `(x, y)` may stand there.
    #[must_use]
    pub fn is_walkable(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.map.is_walkable(x, y, width, height)
    }

    // ========================================================================
    // Player snapshot
    // ========================================================================

    /// Insert or replace a player.
    pub fn upsert_player(&self, id: PlayerId, player: PlayerState) {
        self.lock().players.insert(id, player);
    }

    /// Update a player in place. Returns false if the player is unknown.
    pub fn update_player<F>(&self, id: PlayerId, update: F) -> bool
    where
        F: FnOnce(&mut PlayerState),
    {
        match self.lock().players.get_mut(&id) {
            Some(player) => {
                update(player);
                true
            }
            None => false,
        }
    }

    /// Remove a player.
    pub fn remove_player(&self, id: PlayerId) -> Option<PlayerState> {
        self.lock().players.remove(&id)
    }

    /// Copy of one player's state.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<PlayerState> {
        self.lock().players.get(&id).cloned()
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Run one tick at `now_ms` and broadcast its events.
    ///
    /// The scheduler calls this; tests may call it directly.
    pub fn tick(&self, now_ms: u64) -> usize {
        run_tick(&self.state, &self.map, &self.events, now_ms)
    }

    /// Resolve a player's attack at the current time.
    pub fn resolve_attack(&self, request: &AttackRequest) -> AttackOutcome {
        self.resolve_attack_at(self.now_ms(), request)
    }

    /// Resolve a player's attack at an explicit time and broadcast its events.
    pub fn resolve_attack_at(&self, now_ms: u64, request: &AttackRequest) -> AttackOutcome {
        let resolution = {
            let mut state = self.lock();
            let ServerState { sim, players } = &mut *state;
            sim.resolve_attack(now_ms, players, request)
        };
        for event in resolution.events {
            let _ = self.events.send(event);
        }
        resolution.outcome
    }

    /// Live enemies within `radius` of a point, nearest first.
    #[must_use]
    pub fn nearby_enemies(&self, x: f32, y: f32, radius: f32) -> Vec<NearbyEnemy> {
        self.lock().sim.nearby_enemies(x, y, radius)
    }

    /// Every live enemy, for late joiners.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EnemyView> {
        self.lock().sim.snapshot()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Returns true while the tick loop runs.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(TickScheduler::is_running)
    }

    /// Start the tick loop. Must be called inside a tokio runtime.
    pub fn start(&mut self) -> Result<(), ServerError> {
        if self.is_running() {
            return Err(ServerError::AlreadyRunning);
        }

        let started_at = self.now_ms();
        self.lock().sim.reset_spawn_clock(started_at);

        let state = Arc::clone(&self.state);
        let map = Arc::clone(&self.map);
        let events = self.events.clone();
        let epoch = self.epoch;
        self.scheduler = Some(TickScheduler::spawn(self.tick_interval, move |_| {
            let now_ms = epoch.elapsed().as_millis() as u64;
            run_tick(&state, &map, &events, now_ms);
        }));

        info!(
            tick_ms = self.tick_interval.as_millis() as u64,
            "Enemy simulation started"
        );
        Ok(())
    }

    /// Stop the tick loop and wait for the in-flight tick to finish.
    pub async fn stop(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            let ticks = scheduler.stop().await;
            info!(ticks, "Enemy simulation stopped");
        }
    }
}

/// Serialize an event for the wire.
pub fn encode_event(event: &EnemyEvent) -> Result<String, ServerError> {
    Ok(serde_json::to_string(event)?)
}

fn lock_state(state: &Mutex<ServerState>) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_tick(
    state: &Mutex<ServerState>,
    map: &CollisionMap,
    events: &broadcast::Sender<EnemyEvent>,
    now_ms: u64,
) -> usize {
    let emitted = {
        let mut state = lock_state(state);
        let ServerState { sim, players } = &mut *state;
        sim.tick(now_ms, map, players)
    };
    let count = emitted.len();
    for event in emitted {
        // No receivers is fine.
        let _ = events.send(event);
    }
    if count > 0 {
        debug!(now_ms, count, "Broadcast tick events");
    }
    count
}

#[cfg(test)]
mod tests {
    use drift_core::combat::Weapon;
    use drift_core::enemies::Enemy;
    use drift_core::players::Direction;
    use drift_test_utils::fixtures::land_map;

    use super::*;

    fn server(enemies: EnemySimConfig) -> GameServer {
        GameServer::with_map(land_map(60, 60), enemies, 64).unwrap()
    }

    #[test]
    fn test_new_generates_world_and_buildings() {
        let server = GameServer::new(&ServerConfig::default()).unwrap();
        let world = server.world().unwrap();
        assert!(world.is_connected());
        assert!(!server.map().buildings().is_empty());
    }

    #[test]
    fn test_invalid_config_fails_before_start() {
        let mut config = ServerConfig::default();
        config.world.island_count = 0;
        assert!(matches!(
            GameServer::new(&config),
            Err(ServerError::Config(ConfigError::Invalid(_)))
        ));
        assert!(GameServer::with_map(land_map(4, 4), EnemySimConfig::default(), 0).is_err());
    }

    #[test]
    fn test_tick_broadcasts_spawns() {
        let server = server(EnemySimConfig::default().with_spawn_interval(0));
        let mut rx = server.subscribe();
        server.upsert_player(PlayerId(1), PlayerState::new(480.0, 480.0));

        let count = server.tick(400);
        assert!(count >= 1);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind(), "enemy_spawn");
        assert_eq!(server.snapshot().len(), 1);
    }

    #[test]
    fn test_attack_through_server() {
        let server = server(EnemySimConfig::default().with_max_enemies(0));
        let mut rx = server.subscribe();
        server.upsert_player(
            PlayerId(1),
            PlayerState::new(100.0, 100.0).facing(Direction::Down),
        );
        {
            let mut state = server.lock();
            state.sim.insert(Enemy::new(
                drift_core::enemies::EnemyId(0),
                drift_core::archetype::EnemyArchetype::Skitter,
                100.0,
                120.0,
                0.0,
            ));
        }

        let request = AttackRequest::new(PlayerId(1)).with_weapon(Weapon::default());
        let outcome = server.resolve_attack_at(1_000, &request);
        assert!(outcome.hit);
        assert_eq!(outcome.damage, Some(10));
        assert_eq!(rx.try_recv().unwrap().kind(), "enemy_damage");

        let nearby = server.nearby_enemies(100.0, 100.0, 50.0);
        assert_eq!(nearby.len(), 1);
    }

    #[test]
    fn test_player_updates() {
        let server = server(EnemySimConfig::default());
        assert!(!server.update_player(PlayerId(9), |p| p.health = 1));
        server.upsert_player(PlayerId(9), PlayerState::new(0.0, 0.0));
        assert!(server.update_player(PlayerId(9), |p| p.connected = false));
        assert!(!server.player(PlayerId(9)).unwrap().connected);
        assert!(server.remove_player(PlayerId(9)).is_some());
        assert!(server.player(PlayerId(9)).is_none());
    }

    #[test]
    fn test_encode_event_is_tagged() {
        let event = EnemyEvent::EnemySpawn { enemies: vec![] };
        let json = encode_event(&event).unwrap();
        assert_eq!(json, r#"{"type":"enemy_spawn","enemies":[]}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_stop_lifecycle() {
        let mut server = server(EnemySimConfig::default().with_spawn_interval(0));
        server.upsert_player(PlayerId(1), PlayerState::new(480.0, 480.0));
        let mut rx = server.subscribe();

        server.start().unwrap();
        assert!(server.is_running());
        assert!(matches!(server.start(), Err(ServerError::AlreadyRunning)));

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        server.stop().await;
        assert!(!server.is_running());

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.kind());
        }
        assert!(kinds.contains(&"enemy_spawn"));

        // Stopped: nothing more arrives.
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert!(rx.try_recv().is_err());
    }
}
