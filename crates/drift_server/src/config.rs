//! Server configuration.
//!
//! Everything the server needs before the first tick: world generation
//! parameters, enemy tunables and optional hand-authored registries. Loaded
//! from RON and validated up front, so a bad file fails at startup instead of
//! mid-game.

use std::path::{Path, PathBuf};

use drift_core::buildings::Building;
use drift_core::collision::TILE_SIZE;
use drift_core::decorations::Decoration;
use drift_core::enemies::EnemySimConfig;
use drift_core::error::GameError;
use drift_core::islands::WorldConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read {}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse RON.
    #[error("Failed to parse {}", path.display())]
    Parse {
        /// File that could not be parsed.
        path: PathBuf,
        /// Underlying RON error.
        #[source]
        source: ron::error::SpannedError,
    },
    /// Values the world or simulation cannot run with.
    #[error("Invalid configuration")]
    Invalid(#[from] GameError),
    /// Event channel needs room for at least one event.
    #[error("Event capacity must be non-zero")]
    ZeroEventCapacity,
}

/// Full server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// World generation parameters.
    pub world: WorldConfig,
    /// Enemy simulation tunables.
    pub enemies: EnemySimConfig,
    /// Pixels per tile.
    pub tile_size: u32,
    /// Building registry file. Buildings are placed procedurally when absent.
    pub buildings: Option<PathBuf>,
    /// Decoration registry file.
    pub decorations: Option<PathBuf>,
    /// Static NPC positions, top-left corners in pixels.
    pub npcs: Vec<(f32, f32)>,
    /// Broadcast channel capacity.
    pub event_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            enemies: EnemySimConfig::default(),
            tile_size: TILE_SIZE,
            buildings: None,
            decorations: None,
            npcs: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a RON file and validate it.
    ///
    /// Relative registry paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config: Self = read_ron(path)?;
        if let Some(dir) = path.parent() {
            config.buildings = config.buildings.map(|p| dir.join(p));
            config.decorations = config.decorations.map(|p| dir.join(p));
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a RON string and validate it.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(ron).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Override the world seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.world.seed = seed;
        self
    }

    /// Replace the enemy tunables.
    #[must_use]
    pub fn with_enemies(mut self, enemies: EnemySimConfig) -> Self {
        self.enemies = enemies;
        self
    }

    /// Reject anything the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.enemies.validate()?;
        if self.tile_size == 0 {
            return Err(GameError::InvalidTileSize(self.tile_size).into());
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }

    /// Load the building registry, if one is configured.
    pub fn load_buildings(&self) -> Result<Option<Vec<Building>>, ConfigError> {
        self.buildings
            .as_deref()
            .map(read_ron::<Vec<Building>>)
            .transpose()
    }

    /// Load the decoration registry, or an empty list.
    pub fn load_decorations(&self) -> Result<Vec<Decoration>, ConfigError> {
        Ok(self
            .decorations
            .as_deref()
            .map(read_ron::<Vec<Decoration>>)
            .transpose()?
            .unwrap_or_default())
    }
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use drift_core::buildings::BuildingKind;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = ServerConfig::from_ron_str("(world: (seed: 99), enemies: (max_enemies: 5))")
            .unwrap();
        assert_eq!(config.world.seed, 99);
        assert_eq!(config.world.island_count, 10);
        assert_eq!(config.enemies.max_enemies, 5);
        assert_eq!(config.enemies.tick_interval_ms, 400);
        assert_eq!(config.tile_size, 16);
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        let zero_islands = ServerConfig::from_ron_str("(world: (island_count: 0))");
        assert!(matches!(
            zero_islands,
            Err(ConfigError::Invalid(GameError::InvalidIslandCount(0)))
        ));

        let zero_tick = ServerConfig::from_ron_str("(enemies: (tick_interval_ms: 0))");
        assert!(matches!(zero_tick, Err(ConfigError::Invalid(_))));

        let zero_tile = ServerConfig::from_ron_str("(tile_size: 0)");
        assert!(matches!(
            zero_tile,
            Err(ConfigError::Invalid(GameError::InvalidTileSize(0)))
        ));
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        let result = ServerConfig::from_ron_str("(world: ");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_resolves_registry_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("buildings.ron"),
            r#"[(x: 32.0, y: 48.0, width: 96.0, height: 80.0, type: inn, name: "Inn")]"#,
        )
        .unwrap();
        let config_path = dir.path().join("server.ron");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, r#"(buildings: Some("buildings.ron"), world: (seed: 7))"#).unwrap();

        let config = ServerConfig::load(&config_path).unwrap();
        assert_eq!(config.world.seed, 7);

        let buildings = config.load_buildings().unwrap().unwrap();
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].kind, BuildingKind::Inn);
        assert_eq!(buildings[0].name, "Inn");
        assert!(config.load_decorations().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::load(dir.path().join("nope.ron"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
