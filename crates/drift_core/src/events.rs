//! Discrete events emitted by the enemy simulation.
//!
//! Events are plain records tagged by `type` for the broadcast layer. Positions
//! are rounded to whole pixels on the wire.

use serde::{Deserialize, Serialize};

use crate::archetype::EnemyArchetype;
use crate::combat::Loot;
use crate::enemies::{Enemy, EnemyId, EnemyState};
use crate::players::PlayerId;

/// Full public view of one enemy, used for spawns and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    /// Enemy id.
    pub id: EnemyId,
    /// Archetype.
    #[serde(rename = "type")]
    pub archetype: EnemyArchetype,
    /// Archetype display name.
    pub name: String,
    /// Rounded left edge.
    pub x: i32,
    /// Rounded top edge.
    pub y: i32,
    /// Body edge in pixels.
    pub size: u32,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// AI state.
    pub state: EnemyState,
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        let stats = enemy.archetype.stats();
        Self {
            id: enemy.id,
            archetype: enemy.archetype,
            name: stats.name.to_string(),
            x: enemy.x.round() as i32,
            y: enemy.y.round() as i32,
            size: stats.size as u32,
            health: enemy.health,
            max_health: enemy.max_health,
            state: enemy.state,
        }
    }
}

/// Position update for one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyMove {
    /// Enemy id.
    pub id: EnemyId,
    /// Rounded left edge.
    pub x: i32,
    /// Rounded top edge.
    pub y: i32,
    /// AI state.
    pub state: EnemyState,
}

/// Everything the simulation tells the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyEvent {
    /// Enemies appeared or respawned.
    EnemySpawn {
        /// New enemies.
        enemies: Vec<EnemyView>,
    },
    /// Enemies that drifted past the broadcast threshold this tick.
    EnemyMove {
        /// Moved enemies.
        enemies: Vec<EnemyMove>,
    },
    /// An enemy survived a hit.
    EnemyDamage {
        /// Enemy hit.
        enemy_id: EnemyId,
        /// Health after the hit.
        health: u32,
        /// Maximum health.
        max_health: u32,
        /// Who hit it.
        attacker_id: PlayerId,
    },
    /// An enemy was killed.
    EnemyDeath {
        /// Enemy killed.
        enemy_id: EnemyId,
        /// Who killed it.
        killer_id: PlayerId,
        /// Rewards credited to the killer.
        loot: Loot,
    },
    /// An enemy hit a player.
    PlayerDamage {
        /// Player hit.
        player_id: PlayerId,
        /// Damage dealt.
        amount: u32,
        /// Health after the hit.
        health: u32,
        /// Maximum health.
        max_health: u32,
        /// Attacker.
        enemy_id: EnemyId,
        /// Attacker's archetype.
        enemy_type: EnemyArchetype,
    },
}

impl EnemyEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EnemySpawn { .. } => "enemy_spawn",
            Self::EnemyMove { .. } => "enemy_move",
            Self::EnemyDamage { .. } => "enemy_damage",
            Self::EnemyDeath { .. } => "enemy_death",
            Self::PlayerDamage { .. } => "player_damage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_tagged_by_type() {
        let event = EnemyEvent::EnemyDamage {
            enemy_id: EnemyId(4),
            health: 5,
            max_health: 15,
            attacker_id: PlayerId(1),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "enemy_damage");
        assert_eq!(json["enemy_id"], 4);
        assert_eq!(json["health"], 5);
        assert_eq!(event.kind(), "enemy_damage");
    }

    #[test]
    fn test_move_event_round_trips() {
        let event = EnemyEvent::EnemyMove {
            enemies: vec![EnemyMove {
                id: EnemyId(2),
                x: 10,
                y: -3,
                state: EnemyState::Chasing,
            }],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"enemy_move\""));
        assert!(json.contains("\"state\":\"chasing\""));
        let back: EnemyEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
