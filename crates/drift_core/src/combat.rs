//! Melee combat rules shared by player attacks and enemy hits.
//!
//! This module holds the pure parts of combat:
//! - Directional hitboxes in front of the attacker
//! - Target selection among overlapping enemies
//! - Loot rolls on death
//!
//! State changes (health, tokens, events) live in
//! [`EnemySimulation`](crate::enemies::EnemySimulation).

use serde::{Deserialize, Serialize};

use crate::archetype::EnemyArchetype;
use crate::collision::{CHARACTER_HEIGHT, CHARACTER_WIDTH};
use crate::enemies::EnemyId;
use crate::geometry::Rect;
use crate::players::{Direction, PlayerId};
use crate::rng::SeededRng;

/// Default melee reach in pixels.
pub const WEAPON_RANGE: f32 = 18.0;

/// Default lateral sweep in pixels.
pub const WEAPON_SWEEP: f32 = 12.0;

/// Default damage per hit.
pub const DEFAULT_WEAPON_DAMAGE: u32 = 10;

/// A melee weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Damage per hit.
    pub damage: u32,
    /// Reach in front of the attacker.
    pub range: f32,
    /// Extra width across the swing.
    pub sweep: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            damage: DEFAULT_WEAPON_DAMAGE,
            range: WEAPON_RANGE,
            sweep: WEAPON_SWEEP,
        }
    }
}

impl Weapon {
    /// Set damage.
    #[must_use]
    pub const fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Set range.
    #[must_use]
    pub const fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }
}

/// Hitbox swept by an attack from a character box at `(px, py)`.
///
/// Vertical swings are widened by the full sweep, centered on the character.
/// Horizontal swings start a third of the sweep above the head and extend
/// `0.66 * sweep` below the feet.
#[must_use]
pub fn attack_hitbox(px: f32, py: f32, direction: Direction, weapon: &Weapon) -> Rect {
    let Weapon { range, sweep, .. } = *weapon;
    match direction {
        Direction::Up => Rect::new(px - sweep / 2.0, py - range, CHARACTER_WIDTH + sweep, range),
        Direction::Down => Rect::new(
            px - sweep / 2.0,
            py + CHARACTER_HEIGHT,
            CHARACTER_WIDTH + sweep,
            range,
        ),
        Direction::Left => Rect::new(
            px - range,
            py - sweep / 3.0,
            range,
            CHARACTER_HEIGHT + sweep * 0.66,
        ),
        Direction::Right => Rect::new(
            px + CHARACTER_WIDTH,
            py - sweep / 3.0,
            range,
            CHARACTER_HEIGHT + sweep * 0.66,
        ),
    }
}

/// Pick the candidate whose center is closest to the hitbox center.
///
/// Only candidates touching the hitbox qualify. Ties go to the first
/// candidate in iteration order.
pub fn nearest_in_hitbox<I>(hitbox: &Rect, candidates: I) -> Option<EnemyId>
where
    I: IntoIterator<Item = (EnemyId, Rect)>,
{
    let (hx, hy) = hitbox.center();
    let mut best: Option<(f32, EnemyId)> = None;

    for (id, bounds) in candidates {
        if !hitbox.touches(&bounds) {
            continue;
        }
        let (ex, ey) = bounds.center();
        let dist = (hx - ex).hypot(hy - ey);
        if best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, id));
        }
    }
    best.map(|(_, id)| id)
}

/// Rewards for a kill.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loot {
    /// Tokens credited to the killer.
    pub tokens: u64,
    /// Dropped item ids.
    pub items: Vec<String>,
}

/// Roll loot: 1 to 3 tokens plus one independent roll per loot table entry.
pub fn roll_loot(archetype: EnemyArchetype, rng: &mut SeededRng) -> Loot {
    let tokens = 1 + rng.next_below(3) as u64;
    let items = archetype
        .stats()
        .loot
        .iter()
        .filter(|entry| rng.chance(entry.chance))
        .map(|entry| entry.item_id.to_string())
        .collect();
    Loot { tokens, items }
}

/// Why an attack did not land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// No such player in the snapshot.
    UnknownAttacker,
    /// Attacker is a spectator or disconnected.
    AttackerInactive,
    /// Attacker's last swing was too recent.
    OnCooldown,
    /// Explicit target is dead, unknown or outside the hitbox.
    InvalidTarget,
    /// Nothing overlapped the hitbox.
    NoEnemyInRange,
}

/// A player's attack as received from the session layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Who swings.
    pub attacker: PlayerId,
    /// Facing override; defaults to the player's current facing.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Enemy the client believes it is hitting.
    #[serde(default)]
    pub target: Option<EnemyId>,
    /// Weapon override; defaults to the simulation's weapon.
    #[serde(default)]
    pub weapon: Option<Weapon>,
}

impl AttackRequest {
    /// Attack in the player's current facing with the default weapon.
    #[must_use]
    pub const fn new(attacker: PlayerId) -> Self {
        Self {
            attacker,
            direction: None,
            target: None,
            weapon: None,
        }
    }

    /// Face a direction.
    #[must_use]
    pub const fn facing(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Aim at a specific enemy.
    #[must_use]
    pub const fn at(mut self, target: EnemyId) -> Self {
        self.target = Some(target);
        self
    }

    /// Use a specific weapon.
    #[must_use]
    pub const fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }
}

/// Result reported back to the attacker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Whether an enemy took damage.
    pub hit: bool,
    /// Enemy that was hit.
    pub enemy_id: Option<EnemyId>,
    /// Damage dealt.
    pub damage: Option<u32>,
    /// Enemy health after the hit.
    pub enemy_health: Option<u32>,
    /// Whether the hit killed the enemy.
    pub died: Option<bool>,
    /// Rewards, present only on a kill.
    pub loot: Option<Loot>,
    /// Present only on a miss.
    pub miss: Option<MissReason>,
}

impl AttackOutcome {
    /// A miss for the given reason.
    #[must_use]
    pub fn miss(reason: MissReason) -> Self {
        Self {
            miss: Some(reason),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hitbox_shapes() {
        let weapon = Weapon::default();
        assert_eq!(
            attack_hitbox(100.0, 100.0, Direction::Up, &weapon),
            Rect::new(94.0, 82.0, 28.0, 18.0)
        );
        assert_eq!(
            attack_hitbox(100.0, 100.0, Direction::Down, &weapon),
            Rect::new(94.0, 124.0, 28.0, 18.0)
        );

        let left = attack_hitbox(100.0, 100.0, Direction::Left, &weapon);
        assert_eq!((left.x, left.y, left.width), (82.0, 96.0, 18.0));
        assert!((left.height - 31.92).abs() < 1e-4);

        let right = attack_hitbox(100.0, 100.0, Direction::Right, &weapon);
        assert_eq!((right.x, right.y, right.width), (116.0, 96.0, 18.0));
    }

    #[test]
    fn test_longer_weapon_reaches_further() {
        let spear = Weapon::default().with_range(30.0);
        let hitbox = attack_hitbox(0.0, 100.0, Direction::Up, &spear);
        assert_eq!(hitbox.y, 70.0);
        assert_eq!(hitbox.height, 30.0);
    }

    #[test]
    fn test_nearest_in_hitbox() {
        let hitbox = Rect::new(0.0, 0.0, 20.0, 20.0);
        let candidates = vec![
            (EnemyId(1), Rect::new(15.0, 15.0, 10.0, 10.0)),
            (EnemyId(2), Rect::new(6.0, 6.0, 8.0, 8.0)),
            (EnemyId(3), Rect::new(50.0, 50.0, 10.0, 10.0)),
        ];
        assert_eq!(nearest_in_hitbox(&hitbox, candidates), Some(EnemyId(2)));
    }

    #[test]
    fn test_touching_edge_counts() {
        let hitbox = Rect::new(0.0, 0.0, 20.0, 20.0);
        let candidates = vec![(EnemyId(9), Rect::new(20.0, 5.0, 10.0, 10.0))];
        assert_eq!(nearest_in_hitbox(&hitbox, candidates), Some(EnemyId(9)));
        assert_eq!(nearest_in_hitbox(&hitbox, Vec::new()), None);
    }

    #[test]
    fn test_loot_token_range() {
        let mut rng = SeededRng::new(5);
        for _ in 0..200 {
            let loot = roll_loot(EnemyArchetype::Skitter, &mut rng);
            assert!((1..=3).contains(&loot.tokens));
            assert!(loot.items.len() <= 2);
        }
    }

    #[test]
    fn test_miss_outcome() {
        let outcome = AttackOutcome::miss(MissReason::OnCooldown);
        assert!(!outcome.hit);
        assert_eq!(outcome.enemy_id, None);
        assert_eq!(outcome.miss, Some(MissReason::OnCooldown));
    }
}
