//! Deterministic archipelago generation.
//!
//! Runs the full pipeline once at startup:
//!
//! 1. [`layout_islands`] places island descriptors on a jittered grid
//! 2. [`rasterize_islands`] stamps their noisy footprints into an ocean grid
//! 3. [`build_bridge_network`] carves corridors until every island is connected
//!
//! Every host given the same [`WorldConfig`] produces a bit-identical
//! [`GeneratedWorld`], so the grid never needs to be transmitted.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::bridges::{build_bridge_network, Bridge};
use crate::error::{GameError, Result};
use crate::islands::{layout_islands, Island, WorldConfig};
use crate::regions::all_reachable;
use crate::rng::SeededRng;
use crate::terrain::{rasterize_islands, WorldGrid};

/// Output of world generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedWorld {
    /// Configuration the world was generated from.
    pub config: WorldConfig,
    /// Final terrain, bridges included.
    pub grid: WorldGrid,
    /// Placed islands, in layout order.
    pub islands: Vec<Island>,
    /// Bridges in the order they were carved.
    pub bridges: Vec<Bridge>,
}

impl GeneratedWorld {
    /// Island centers as tile coordinates.
    #[must_use]
    pub fn island_centers(&self) -> Vec<(i64, i64)> {
        self.islands
            .iter()
            .map(|island| (i64::from(island.x), i64::from(island.y)))
            .collect()
    }

    /// Returns true if every island center is reachable over land from the first.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        all_reachable(&self.grid, &self.island_centers())
    }

    /// Canonical byte encoding, identical across hosts for the same seed.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::Serialization(e.to_string()))
    }

    /// Islands alone, rasterized onto open sea without bridges.
    ///
    /// Every land tile here is also land in [`Self::grid`].
    #[must_use]
    pub fn island_grid(&self) -> WorldGrid {
        let mut grid = WorldGrid::ocean(self.config.width, self.config.height);
        rasterize_islands(&mut grid, &self.islands);
        grid
    }

    /// Hash of the grid and island list.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.grid.hash(&mut hasher);
        self.islands.hash(&mut hasher);
        self.bridges.hash(&mut hasher);
        hasher.finish()
    }
}

/// Generate a world from a configuration.
///
/// # Errors
///
/// Returns an error if the configuration fails [`WorldConfig::validate`].
pub fn generate_world(config: &WorldConfig) -> Result<GeneratedWorld> {
    config.validate()?;

    let mut rng = SeededRng::new(config.seed);
    let islands = layout_islands(config, &mut rng)?;

    let mut grid = WorldGrid::ocean(config.width, config.height);
    rasterize_islands(&mut grid, &islands);
    let bridges = build_bridge_network(&mut grid, &islands);

    tracing::info!(
        seed = config.seed,
        width = config.width,
        height = config.height,
        islands = islands.len(),
        bridges = bridges.len(),
        land_tiles = grid.land_count(),
        "Generated world"
    );

    Ok(GeneratedWorld {
        config: config.clone(),
        grid,
        islands,
        bridges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world_is_connected() {
        let world = generate_world(&WorldConfig::default()).unwrap();
        assert!(!world.islands.is_empty());
        assert_eq!(world.bridges.len(), world.islands.len() - 1);
        assert!(world.is_connected());
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let config = WorldConfig::default().with_seed(4242);
        let a = generate_world(&config).unwrap();
        let b = generate_world(&config).unwrap();
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_world(&WorldConfig::default().with_seed(1)).unwrap();
        let b = generate_world(&WorldConfig::default().with_seed(2)).unwrap();
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_worlds_dedupe_by_value() {
        use std::collections::HashSet;

        let worlds: HashSet<GeneratedWorld> = [7, 7, 8]
            .into_iter()
            .map(|seed| generate_world(&WorldConfig::default().with_seed(seed)).unwrap())
            .collect();
        assert_eq!(worlds.len(), 2);

        let configs: HashSet<WorldConfig> = worlds.iter().map(|w| w.config.clone()).collect();
        assert!(configs.contains(&WorldConfig::default().with_seed(8)));
    }

    #[test]
    fn test_island_centers_are_land() {
        let world = generate_world(&WorldConfig::default().with_seed(77)).unwrap();
        for (x, y) in world.island_centers() {
            assert!(world.grid.is_land(x, y));
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = WorldConfig::default().with_island_count(0);
        assert_eq!(
            generate_world(&config),
            Err(GameError::InvalidIslandCount(0))
        );
    }
}
