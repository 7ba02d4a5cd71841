//! Drift fauna archetypes.
//!
//! Every enemy belongs to one of a closed set of archetypes sharing a single
//! stat schema. Stats are plain data so the simulation never branches on the
//! archetype itself.
//!
//! # Example
//!
//! ```
//! use drift_core::archetype::EnemyArchetype;
//!
//! let stats = EnemyArchetype::Skitter.stats();
//! assert_eq!(stats.health, 15);
//! assert_eq!(stats.aggro_range, 80.0);
//! ```

use serde::{Deserialize, Serialize};

/// One possible item drop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LootEntry {
    /// Item identifier.
    pub item_id: &'static str,
    /// Probability in `[0, 1]`.
    pub chance: f64,
}

/// Shared stat schema for every archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArchetypeStats {
    /// Display name.
    pub name: &'static str,
    /// Maximum health.
    pub health: u32,
    /// Damage per hit on a player.
    pub damage: u32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Square body edge in pixels.
    pub size: f32,
    /// Detection radius in pixels; chase starts within twice this.
    pub aggro_range: f32,
    /// Center distance at which the enemy can hit a player.
    pub attack_range: f32,
    /// Milliseconds between attacks.
    pub attack_cooldown_ms: u64,
    /// Independent item drop rolls.
    pub loot: &'static [LootEntry],
}

/// The closed set of enemy archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    /// Small and twitchy; fast but fragile.
    Skitter,
    /// Slow cloud with the heaviest hit.
    HazeDrifter,
    /// Mid-weight, repeats its pattern.
    Loopling,
}

const SKITTER: ArchetypeStats = ArchetypeStats {
    name: "Skitter",
    health: 15,
    damage: 5,
    speed: 60.0,
    size: 10.0,
    aggro_range: 80.0,
    attack_range: 20.0,
    attack_cooldown_ms: 800,
    loot: &[
        LootEntry { item_id: "shell_fragment", chance: 0.4 },
        LootEntry { item_id: "red_essence", chance: 0.15 },
    ],
};

const HAZE_DRIFTER: ArchetypeStats = ArchetypeStats {
    name: "Haze Drifter",
    health: 25,
    damage: 8,
    speed: 25.0,
    size: 16.0,
    aggro_range: 64.0,
    attack_range: 16.0,
    attack_cooldown_ms: 1200,
    loot: &[
        LootEntry { item_id: "haze_wisp", chance: 0.3 },
        LootEntry { item_id: "red_essence", chance: 0.2 },
    ],
};

const LOOPLING: ArchetypeStats = ArchetypeStats {
    name: "Loopling",
    health: 20,
    damage: 6,
    speed: 45.0,
    size: 14.0,
    aggro_range: 72.0,
    attack_range: 18.0,
    attack_cooldown_ms: 1000,
    loot: &[
        LootEntry { item_id: "loop_crystal", chance: 0.35 },
        LootEntry { item_id: "red_essence", chance: 0.1 },
    ],
};

impl EnemyArchetype {
    /// All archetypes in spawn-table order.
    pub const ALL: [Self; 3] = [Self::Skitter, Self::HazeDrifter, Self::Loopling];

    /// Stats for this archetype.
    #[must_use]
    pub const fn stats(self) -> &'static ArchetypeStats {
        match self {
            Self::Skitter => &SKITTER,
            Self::HazeDrifter => &HAZE_DRIFTER,
            Self::Loopling => &LOOPLING,
        }
    }
}
