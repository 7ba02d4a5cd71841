//! Error types for world generation and simulation setup.
//!
//! Runtime queries never fail: blocked positions, missed attacks and skipped
//! spawns are ordinary results. Errors only describe configurations that must
//! be rejected before the first tick.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the simulation core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// World dimensions must be non-zero.
    #[error("Invalid world size: {width}x{height} tiles")]
    InvalidWorldSize {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },

    /// At least one island is required.
    #[error("Island count must be positive, got {0}")]
    InvalidIslandCount(u32),

    /// Island radii must be positive and ordered.
    #[error("Invalid island size range: min {min}, max {max}")]
    InvalidIslandSize {
        /// Minimum island radius in tiles.
        min: u32,
        /// Maximum island radius in tiles.
        max: u32,
    },

    /// Islands this large cannot fit inside the world.
    #[error("Islands of radius {radius} do not fit in a {width}x{height} world")]
    IslandsDoNotFit {
        /// Largest island radius in tiles.
        radius: u32,
        /// World width in tiles.
        width: u32,
        /// World height in tiles.
        height: u32,
    },

    /// Tile size in world units must be positive.
    #[error("Tile size must be positive, got {0}")]
    InvalidTileSize(u32),

    /// A simulation parameter is out of range.
    #[error("Invalid simulation config: {0}")]
    InvalidSimConfig(String),

    /// Failed to encode state for hashing or transfer.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}
