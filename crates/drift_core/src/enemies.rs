//! Server-authoritative enemy simulation.
//!
//! [`EnemySimulation`] owns every enemy record and its own RNG. The scheduler
//! calls [`EnemySimulation::tick`] on a fixed interval; the session layer calls
//! [`EnemySimulation::resolve_attack`] when a player swings. Both return the
//! events to broadcast and never fail: blocked moves, skipped spawns and missed
//! attacks are ordinary results.
//!
//! # Tick order
//!
//! 1. Respawn dead enemies whose timer elapsed, retiring them instead when the
//!    live population is already at target
//! 2. Spawn one new enemy if the live count is below target and off cooldown
//! 3. Steer, move and attack with every live enemy, in id order
//! 4. Batch position updates for enemies that drifted past the threshold

use std::collections::BTreeMap;
use std::f32::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::archetype::EnemyArchetype;
use crate::collision::{Body, BodyId, CollisionMap};
use crate::combat::{
    attack_hitbox, nearest_in_hitbox, roll_loot, AttackOutcome, AttackRequest, MissReason, Weapon,
};
use crate::error::{GameError, Result};
use crate::events::{EnemyEvent, EnemyMove, EnemyView};
use crate::geometry::Rect;
use crate::players::{active_players, PlayerId, PlayerSnapshot, PlayerState};
use crate::rng::SeededRng;

/// Candidate locations sampled per spawn.
pub const SPAWN_ATTEMPTS: u32 = 40;

/// Closest a spawn candidate is placed to its anchor.
pub const SPAWN_MIN_DISTANCE: f32 = 196.0;

/// Width of the ring spawn candidates are sampled from.
pub const SPAWN_RING_WIDTH: f32 = 250.0;

/// Minimum distance from an enemy's center to any building footprint.
pub const MIN_BUILDING_DISTANCE: f32 = 100.0;

/// Minimum distance between a new enemy and any live enemy.
pub const MIN_ENEMY_SPACING: f32 = 60.0;

/// Per-axis drift that triggers a move broadcast.
pub const MOVE_BROADCAST_EPSILON: f32 = 2.0;

/// Moves this short are skipped.
const MIN_STEP: f32 = 0.1;

/// Wandering enemies move at this fraction of their speed.
const WANDER_SPEED_FACTOR: f32 = 0.6;

/// Shortest wander dwell in seconds.
const WANDER_DWELL_MIN: f32 = 1.5;

/// Random extra wander dwell in seconds.
const WANDER_DWELL_SPREAD: f32 = 2.5;

/// Stable enemy identifier. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy_{}", self.0)
    }
}

/// AI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyState {
    /// Drifting on a random heading.
    #[default]
    Wandering,
    /// Heading for a player.
    Chasing,
    /// Hit a player this tick.
    Attacking,
    /// Killed; waiting for its respawn timer.
    Dead,
}

/// One enemy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Identifier.
    pub id: EnemyId,
    /// Archetype.
    pub archetype: EnemyArchetype,
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Heading in radians.
    pub heading: f32,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// AI state.
    pub state: EnemyState,
    /// Player being chased.
    pub target: Option<PlayerId>,
    /// Earliest time of the next hit on a player.
    pub next_attack_ms: u64,
    /// Position last sent in a spawn or move event.
    pub last_broadcast: (f32, f32),
    /// Seconds left before the wander heading changes.
    pub wander_timer: f32,
    /// When a dead enemy comes back.
    pub respawn_at_ms: Option<u64>,
}

impl Enemy {
    /// A fresh, wandering enemy at full health.
    #[must_use]
    pub fn new(id: EnemyId, archetype: EnemyArchetype, x: f32, y: f32, heading: f32) -> Self {
        let health = archetype.stats().health;
        Self {
            id,
            archetype,
            x,
            y,
            heading,
            health,
            max_health: health,
            state: EnemyState::Wandering,
            target: None,
            next_attack_ms: 0,
            last_broadcast: (x, y),
            wander_timer: 0.0,
            respawn_at_ms: None,
        }
    }

    /// Body edge in pixels.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.archetype.stats().size
    }

    /// Body box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::new(self.x, self.y, size, size)
    }

    /// Returns true unless dead.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }

    /// Records with non-finite coordinates or no health pool cannot be simulated.
    #[must_use]
    pub fn is_corrupted(&self) -> bool {
        !self.x.is_finite()
            || !self.y.is_finite()
            || !self.heading.is_finite()
            || self.max_health == 0
    }
}

/// Tunables for the enemy simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySimConfig {
    /// Target number of live enemies.
    pub max_enemies: usize,
    /// Minimum time between fresh spawns.
    pub spawn_interval_ms: u64,
    /// Tick period; also the simulated time step.
    pub tick_interval_ms: u64,
    /// Time a killed enemy stays dead.
    pub respawn_delay_ms: u64,
    /// Minimum time between one player's swings.
    pub player_attack_cooldown_ms: u64,
    /// Global movement speed scale.
    pub speed_multiplier: f32,
    /// Weapon used when an attack does not name one.
    pub weapon: Weapon,
    /// Seed for spawn placement, wandering and loot.
    pub seed: u32,
}

impl Default for EnemySimConfig {
    fn default() -> Self {
        Self {
            max_enemies: 3,
            spawn_interval_ms: 15_000,
            tick_interval_ms: 400,
            respawn_delay_ms: 15_000,
            player_attack_cooldown_ms: 350,
            speed_multiplier: 1.0,
            weapon: Weapon::default(),
            seed: 12345,
        }
    }
}

impl EnemySimConfig {
    /// Set the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set the population target.
    #[must_use]
    pub const fn with_max_enemies(mut self, max_enemies: usize) -> Self {
        self.max_enemies = max_enemies;
        self
    }

    /// Set the spawn cooldown.
    #[must_use]
    pub const fn with_spawn_interval(mut self, ms: u64) -> Self {
        self.spawn_interval_ms = ms;
        self
    }

    /// Set the tick period.
    #[must_use]
    pub const fn with_tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the respawn delay.
    #[must_use]
    pub const fn with_respawn_delay(mut self, ms: u64) -> Self {
        self.respawn_delay_ms = ms;
        self
    }

    /// Set the per-player swing cooldown.
    #[must_use]
    pub const fn with_player_attack_cooldown(mut self, ms: u64) -> Self {
        self.player_attack_cooldown_ms = ms;
        self
    }

    /// Set the movement speed scale.
    #[must_use]
    pub const fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.speed_multiplier = multiplier;
        self
    }

    /// Set the default weapon.
    #[must_use]
    pub const fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = weapon;
        self
    }

    /// Reject settings the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSimConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidSimConfig(
                "tick interval must be positive".to_string(),
            ));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier < 0.0 {
            return Err(GameError::InvalidSimConfig(format!(
                "speed multiplier must be a non-negative number, got {}",
                self.speed_multiplier
            )));
        }
        if !self.weapon.range.is_finite() || self.weapon.range <= 0.0 {
            return Err(GameError::InvalidSimConfig(format!(
                "weapon range must be positive, got {}",
                self.weapon.range
            )));
        }
        if !self.weapon.sweep.is_finite() || self.weapon.sweep < 0.0 {
            return Err(GameError::InvalidSimConfig(format!(
                "weapon sweep must be non-negative, got {}",
                self.weapon.sweep
            )));
        }
        Ok(())
    }
}

/// Outcome of an attack plus the events it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackResolution {
    /// Result for the attacker.
    pub outcome: AttackOutcome,
    /// Events to broadcast.
    pub events: Vec<EnemyEvent>,
}

/// Proximity query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyEnemy {
    /// Enemy id.
    pub id: EnemyId,
    /// Archetype.
    pub archetype: EnemyArchetype,
    /// Distance from the query point to the enemy's top-left corner.
    pub distance: f32,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
}

/// All enemies and the state needed to advance them.
#[derive(Debug, Clone)]
pub struct EnemySimulation {
    config: EnemySimConfig,
    rng: SeededRng,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_id: u32,
    last_spawn_ms: u64,
    last_player_attack: BTreeMap<PlayerId, u64>,
}

impl EnemySimulation {
    /// Create an empty simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`EnemySimConfig::validate`].
    pub fn new(config: EnemySimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: SeededRng::new(config.seed),
            config,
            enemies: BTreeMap::new(),
            next_id: 1,
            last_spawn_ms: 0,
            last_player_attack: BTreeMap::new(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EnemySimConfig {
        &self.config
    }

    /// Restart the spawn cooldown from `now_ms`, as when the scheduler starts.
    pub fn reset_spawn_clock(&mut self, now_ms: u64) {
        self.last_spawn_ms = now_ms;
    }

    /// Look up an enemy, dead or alive.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Every record in id order, dead ones included.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Live enemies in id order.
    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values().filter(|enemy| enemy.is_alive())
    }

    /// Number of live enemies.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_enemies().count()
    }

    /// Insert or replace a record, e.g. when restoring saved state.
    pub fn insert(&mut self, enemy: Enemy) {
        self.next_id = self.next_id.max(enemy.id.0.saturating_add(1));
        self.enemies.insert(enemy.id, enemy);
    }

    /// Advance one tick at `now_ms`.
    pub fn tick(
        &mut self,
        now_ms: u64,
        map: &CollisionMap,
        players: &mut PlayerSnapshot,
    ) -> Vec<EnemyEvent> {
        let mut events = Vec::new();
        self.respawn_due(now_ms, map, players, &mut events);
        self.maintain_population(now_ms, map, players, &mut events);
        self.update_enemies(now_ms, map, players, &mut events);
        events
    }

    fn respawn_due(
        &mut self,
        now_ms: u64,
        map: &CollisionMap,
        players: &PlayerSnapshot,
        events: &mut Vec<EnemyEvent>,
    ) {
        let due: Vec<(EnemyId, EnemyArchetype)> = self
            .enemies
            .values()
            .filter(|enemy| !enemy.is_alive() && enemy.respawn_at_ms.is_some_and(|at| at <= now_ms))
            .map(|enemy| (enemy.id, enemy.archetype))
            .collect();

        let mut live = self.live_count();
        for (id, archetype) in due {
            if live >= self.config.max_enemies {
                debug!(enemy = %id, "Population at target, retiring dead enemy");
                self.enemies.remove(&id);
                continue;
            }
            let spot = find_spawn_position(&mut self.rng, map, players, archetype, &self.enemies);
            let Some((x, y)) = spot else {
                debug!(enemy = %id, "No respawn location, retrying next tick");
                continue;
            };
            let heading = self.rng.next_f32() * TAU;
            let Some(enemy) = self.enemies.get_mut(&id) else {
                continue;
            };
            *enemy = Enemy::new(id, archetype, x, y, heading);
            live += 1;
            debug!(enemy = %id, x, y, "Enemy respawned");
            events.push(EnemyEvent::EnemySpawn {
                enemies: vec![EnemyView::from(&*enemy)],
            });
        }
    }

    fn maintain_population(
        &mut self,
        now_ms: u64,
        map: &CollisionMap,
        players: &PlayerSnapshot,
        events: &mut Vec<EnemyEvent>,
    ) {
        if self.live_count() >= self.config.max_enemies
            || now_ms.saturating_sub(self.last_spawn_ms) < self.config.spawn_interval_ms
        {
            return;
        }

        let archetype = EnemyArchetype::ALL[self.rng.next_below(EnemyArchetype::ALL.len())];
        let spot = find_spawn_position(&mut self.rng, map, players, archetype, &self.enemies);
        let Some((x, y)) = spot else {
            debug!(?archetype, "No spawn location found");
            return;
        };

        let id = EnemyId(self.next_id);
        self.next_id += 1;
        let enemy = Enemy::new(id, archetype, x, y, self.rng.next_f32() * TAU);
        debug!(enemy = %id, ?archetype, x, y, "Enemy spawned");
        events.push(EnemyEvent::EnemySpawn {
            enemies: vec![EnemyView::from(&enemy)],
        });
        self.enemies.insert(id, enemy);
        self.last_spawn_ms = now_ms;
    }

    fn update_enemies(
        &mut self,
        now_ms: u64,
        map: &CollisionMap,
        players: &mut PlayerSnapshot,
        events: &mut Vec<EnemyEvent>,
    ) {
        let dt = self.config.tick_interval_ms as f32 / 1000.0;
        let mut bodies: Vec<Body> = self
            .live_enemies()
            .filter(|enemy| !enemy.is_corrupted())
            .map(|enemy| Body {
                id: BodyId::Enemy(enemy.id.0),
                bounds: enemy.bounds(),
            })
            .collect();
        let mut moved = Vec::new();

        for enemy in self.enemies.values_mut() {
            if !enemy.is_alive() {
                continue;
            }
            if enemy.is_corrupted() {
                warn!(
                    enemy = %enemy.id,
                    x = enemy.x,
                    y = enemy.y,
                    "Skipping corrupted enemy record"
                );
                continue;
            }

            steer(enemy, players, &mut self.rng, dt);
            if let Some(target) = enemy.target {
                if let Some(player) = players.get_mut(&target) {
                    try_damage_player(enemy, target, player, now_ms, events);
                }
            }

            let speed_factor = if enemy.state == EnemyState::Wandering {
                WANDER_SPEED_FACTOR
            } else {
                1.0
            };
            let speed = enemy.archetype.stats().speed * speed_factor * self.config.speed_multiplier;
            let distance = speed * dt;
            if distance <= MIN_STEP {
                continue;
            }

            move_enemy(enemy, distance, map, &bodies, &mut self.rng);
            if let Some(body) = bodies.iter_mut().find(|b| b.id == BodyId::Enemy(enemy.id.0)) {
                body.bounds = enemy.bounds();
            }

            let (last_x, last_y) = enemy.last_broadcast;
            if (enemy.x - last_x).abs() > MOVE_BROADCAST_EPSILON
                || (enemy.y - last_y).abs() > MOVE_BROADCAST_EPSILON
            {
                enemy.last_broadcast = (enemy.x, enemy.y);
                moved.push(EnemyMove {
                    id: enemy.id,
                    x: enemy.x.round() as i32,
                    y: enemy.y.round() as i32,
                    state: enemy.state,
                });
            }
        }

        if !moved.is_empty() {
            events.push(EnemyEvent::EnemyMove { enemies: moved });
        }
    }

    /// Resolve a player's swing at `now_ms`.
    pub fn resolve_attack(
        &mut self,
        now_ms: u64,
        players: &mut PlayerSnapshot,
        request: &AttackRequest,
    ) -> AttackResolution {
        let miss = |reason| AttackResolution {
            outcome: AttackOutcome::miss(reason),
            events: Vec::new(),
        };

        let Some(player) = players.get_mut(&request.attacker) else {
            return miss(MissReason::UnknownAttacker);
        };
        if !player.is_active() {
            return miss(MissReason::AttackerInactive);
        }
        if let Some(&last) = self.last_player_attack.get(&request.attacker) {
            if now_ms < last.saturating_add(self.config.player_attack_cooldown_ms) {
                return miss(MissReason::OnCooldown);
            }
        }
        self.last_player_attack.insert(request.attacker, now_ms);

        let direction = request.direction.unwrap_or(player.direction);
        let weapon = request.weapon.unwrap_or(self.config.weapon);
        let hitbox = attack_hitbox(player.x, player.y, direction, &weapon);

        let target = match request.target {
            Some(id) => match self.enemies.get(&id) {
                Some(enemy) if enemy.is_alive() && hitbox.touches(&enemy.bounds()) => id,
                _ => return miss(MissReason::InvalidTarget),
            },
            None => {
                let candidates = self
                    .enemies
                    .values()
                    .filter(|enemy| enemy.is_alive() && !enemy.is_corrupted())
                    .map(|enemy| (enemy.id, enemy.bounds()));
                match nearest_in_hitbox(&hitbox, candidates) {
                    Some(id) => id,
                    None => return miss(MissReason::NoEnemyInRange),
                }
            }
        };

        let Some(enemy) = self.enemies.get_mut(&target) else {
            return miss(MissReason::InvalidTarget);
        };
        enemy.health = enemy.health.saturating_sub(weapon.damage);

        let mut outcome = AttackOutcome {
            hit: true,
            enemy_id: Some(target),
            damage: Some(weapon.damage),
            enemy_health: Some(enemy.health),
            died: Some(false),
            loot: None,
            miss: None,
        };
        let mut events = Vec::new();

        if enemy.health == 0 {
            enemy.state = EnemyState::Dead;
            enemy.target = None;
            enemy.respawn_at_ms = Some(now_ms.saturating_add(self.config.respawn_delay_ms));

            let loot = roll_loot(enemy.archetype, &mut self.rng);
            player.tokens = player.tokens.saturating_add(loot.tokens);
            debug!(
                enemy = %target,
                killer = request.attacker.0,
                tokens = loot.tokens,
                "Enemy killed"
            );

            outcome.died = Some(true);
            outcome.loot = Some(loot.clone());
            events.push(EnemyEvent::EnemyDeath {
                enemy_id: target,
                killer_id: request.attacker,
                loot,
            });
        } else {
            events.push(EnemyEvent::EnemyDamage {
                enemy_id: target,
                health: enemy.health,
                max_health: enemy.max_health,
                attacker_id: request.attacker,
            });
        }

        AttackResolution { outcome, events }
    }

    /// Live enemies whose top-left corner is within `radius` of a point,
    /// nearest first.
    #[must_use]
    pub fn nearby_enemies(&self, x: f32, y: f32, radius: f32) -> Vec<NearbyEnemy> {
        let mut nearby: Vec<NearbyEnemy> = self
            .live_enemies()
            .filter_map(|enemy| {
                let distance = (enemy.x - x).hypot(enemy.y - y);
                (distance <= radius).then(|| NearbyEnemy {
                    id: enemy.id,
                    archetype: enemy.archetype,
                    distance,
                    health: enemy.health,
                    max_health: enemy.max_health,
                })
            })
            .collect();
        nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        nearby
    }

    /// Live enemies for a client that just joined.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EnemyView> {
        self.live_enemies().map(EnemyView::from).collect()
    }
}

/// Chase the nearest active player within twice the aggro range, otherwise
/// wander on a heading that is re-rolled when its dwell runs out.
fn steer(enemy: &mut Enemy, players: &PlayerSnapshot, rng: &mut SeededRng, dt: f32) {
    let chase_range = enemy.archetype.stats().aggro_range * 2.0;
    let (cx, cy) = enemy.bounds().center();

    let mut nearest: Option<(f32, PlayerId, f32, f32)> = None;
    for (id, player) in active_players(players) {
        let (px, py) = player.center();
        let dist = (px - cx).hypot(py - cy);
        if dist <= chase_range && nearest.map_or(true, |(d, ..)| dist < d) {
            nearest = Some((dist, id, px, py));
        }
    }

    if let Some((_, id, px, py)) = nearest {
        enemy.state = EnemyState::Chasing;
        enemy.target = Some(id);
        enemy.heading = (py - cy).atan2(px - cx);
        return;
    }

    enemy.state = EnemyState::Wandering;
    enemy.target = None;
    enemy.wander_timer -= dt;
    if enemy.wander_timer <= 0.0 {
        enemy.heading = rng.next_f32() * TAU;
        enemy.wander_timer = WANDER_DWELL_MIN + rng.next_f32() * WANDER_DWELL_SPREAD;
    }
}

/// Hit the chased player if in range and off cooldown.
fn try_damage_player(
    enemy: &mut Enemy,
    player_id: PlayerId,
    player: &mut PlayerState,
    now_ms: u64,
    events: &mut Vec<EnemyEvent>,
) {
    if !player.is_active() || player.health == 0 || now_ms < enemy.next_attack_ms {
        return;
    }

    let stats = enemy.archetype.stats();
    let (ex, ey) = enemy.bounds().center();
    let (px, py) = player.center();
    if (px - ex).hypot(py - ey) > stats.attack_range {
        return;
    }

    let amount = stats.damage.max(1);
    player.health = player.health.saturating_sub(amount);
    enemy.next_attack_ms = now_ms.saturating_add(stats.attack_cooldown_ms);
    enemy.state = EnemyState::Attacking;

    events.push(EnemyEvent::PlayerDamage {
        player_id,
        amount,
        health: player.health,
        max_health: player.max_health,
        enemy_id: enemy.id,
        enemy_type: enemy.archetype,
    });
}

/// Step each axis independently; a blocked axis re-rolls the heading.
fn move_enemy(
    enemy: &mut Enemy,
    distance: f32,
    map: &CollisionMap,
    bodies: &[Body],
    rng: &mut SeededRng,
) {
    let size = enemy.size();
    let me = Some(BodyId::Enemy(enemy.id.0));
    let new_x = enemy.x + enemy.heading.cos() * distance;
    let new_y = enemy.y + enemy.heading.sin() * distance;

    if map.is_blocked_by(&Rect::new(new_x, enemy.y, size, size), bodies, me) {
        enemy.heading = rng.next_f32() * TAU;
    } else {
        enemy.x = new_x;
    }

    if map.is_blocked_by(&Rect::new(enemy.x, new_y, size, size), bodies, me) {
        enemy.heading = rng.next_f32() * TAU;
    } else {
        enemy.y = new_y;
    }
}

/// Returns true if an enemy of this archetype may appear at `(x, y)`.
///
/// The box must be walkable, its center at least [`MIN_BUILDING_DISTANCE`]
/// from every building footprint, and its corner at least
/// [`MIN_ENEMY_SPACING`] from every live enemy's corner.
#[must_use]
pub fn is_valid_spawn<'a>(
    map: &CollisionMap,
    x: f32,
    y: f32,
    archetype: EnemyArchetype,
    live: impl IntoIterator<Item = &'a Enemy>,
) -> bool {
    let size = archetype.stats().size;
    if map.is_blocked(x, y, size, size) {
        return false;
    }

    let (cx, cy) = (x + size / 2.0, y + size / 2.0);
    if map
        .buildings()
        .iter()
        .any(|building| building.bounds().distance_to_point(cx, cy) < MIN_BUILDING_DISTANCE)
    {
        return false;
    }

    live.into_iter()
        .filter(|enemy| enemy.is_alive() && !enemy.is_corrupted())
        .all(|enemy| {
            let (dx, dy) = (enemy.x - x, enemy.y - y);
            dx * dx + dy * dy >= MIN_ENEMY_SPACING * MIN_ENEMY_SPACING
        })
}

/// Sample candidate spawn points in a widening ring around a random active
/// player, or the world center when nobody is online.
fn find_spawn_position(
    rng: &mut SeededRng,
    map: &CollisionMap,
    players: &PlayerSnapshot,
    archetype: EnemyArchetype,
    enemies: &BTreeMap<EnemyId, Enemy>,
) -> Option<(f32, f32)> {
    let active: Vec<&PlayerState> = active_players(players).map(|(_, player)| player).collect();
    let (anchor_x, anchor_y) = if active.is_empty() {
        (map.world_width_px() / 2.0, map.world_height_px() / 2.0)
    } else {
        let player = active[rng.next_below(active.len())];
        (player.x, player.y)
    };

    let size = archetype.stats().size;
    let max_x = map.world_width_px() - size;
    let max_y = map.world_height_px() - size;

    for attempt in 0..SPAWN_ATTEMPTS {
        let angle = rng.next_f32() * TAU;
        let spread = (attempt as f32 + rng.next_f32()) / SPAWN_ATTEMPTS as f32;
        let distance = SPAWN_MIN_DISTANCE + SPAWN_RING_WIDTH * spread;

        let x = (anchor_x + angle.cos() * distance).min(max_x).max(size).round();
        let y = (anchor_y + angle.sin() * distance).min(max_y).max(size).round();

        if is_valid_spawn(map, x, y, archetype, enemies.values()) {
            return Some((x, y));
        }
    }
    None
}
