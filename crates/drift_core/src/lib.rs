//! # Drift Core
//!
//! Deterministic world logic for the Drift Archipelago server.
//!
//! This crate contains **only** game rules:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math during world generation (uses fixed-point)
//!
//! Every host regenerates the same archipelago from a shared seed, so the
//! generator is bit-exact. The enemy simulation runs on the server only and
//! works in `f32` pixels.
//!
//! ## Crate Structure
//!
//! - [`map_generation`] - Island layout, rasterization and bridges
//! - [`collision`] - Walkability queries against tiles, buildings and decorations
//! - [`enemies`] - Spawning, AI, combat resolution and respawns
//! - [`events`] - Records emitted for the broadcast layer
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod archetype;
pub mod bridges;
pub mod buildings;
pub mod collision;
pub mod combat;
pub mod decorations;
pub mod enemies;
pub mod error;
pub mod events;
pub mod geometry;
pub mod islands;
pub mod map_generation;
pub mod math;
pub mod placement;
pub mod players;
pub mod regions;
pub mod rng;
pub mod terrain;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::archetype::EnemyArchetype;
    pub use crate::buildings::{Building, BuildingKind};
    pub use crate::collision::{CollisionMap, CHARACTER_HEIGHT, CHARACTER_WIDTH, TILE_SIZE};
    pub use crate::combat::{AttackOutcome, AttackRequest, Loot, MissReason, Weapon};
    pub use crate::decorations::Decoration;
    pub use crate::enemies::{
        AttackResolution, Enemy, EnemyId, EnemySimConfig, EnemySimulation, EnemyState,
        NearbyEnemy,
    };
    pub use crate::error::{GameError, Result};
    pub use crate::events::EnemyEvent;
    pub use crate::geometry::Rect;
    pub use crate::islands::{Island, WorldConfig};
    pub use crate::map_generation::{generate_world, GeneratedWorld};
    pub use crate::math::Fixed;
    pub use crate::players::{Direction, PlayerId, PlayerSnapshot, PlayerState};
    pub use crate::rng::SeededRng;
    pub use crate::terrain::{Tile, WorldGrid};
}
