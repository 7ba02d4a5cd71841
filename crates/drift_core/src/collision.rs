//! Movement legality over terrain, buildings, decorations and moving bodies.
//!
//! [`CollisionMap`] is a read-only query object built once after world
//! generation. The enemy simulation and external movement validation share it;
//! nothing here mutates during a query.
//!
//! A box is blocked when any of these hold:
//!
//! - **Tiles**: a tile it overlaps is water or outside the world
//! - **Buildings**: one of its three feet points lands in a solid building area
//! - **Decorations**: it touches a decoration's collision sub-box
//! - **Bodies**: it strictly overlaps a registered NPC or a supplied body

use serde::{Deserialize, Serialize};

use crate::buildings::Building;
use crate::decorations::Decoration;
use crate::error::{GameError, Result};
use crate::geometry::Rect;
use crate::terrain::WorldGrid;

/// Default tile edge length in pixels.
pub const TILE_SIZE: u32 = 16;

/// Character box width in pixels.
pub const CHARACTER_WIDTH: f32 = 16.0;

/// Character box height in pixels.
pub const CHARACTER_HEIGHT: f32 = 24.0;

/// Identity of a dynamic body taking part in collision queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyId {
    /// A registered NPC, by registry index.
    Npc(u32),
    /// A live enemy.
    Enemy(u32),
}

/// A moving entity's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Who this is.
    pub id: BodyId,
    /// Current footprint.
    pub bounds: Rect,
}

/// What stopped a box, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blocker {
    /// Box is not finite.
    InvalidBounds,
    /// Water or out-of-world tile.
    Tile {
        /// Tile column.
        col: i64,
        /// Tile row.
        row: i64,
    },
    /// Building, by registry index.
    Building(usize),
    /// Decoration, by registry index.
    Decoration(usize),
    /// Dynamic body.
    Body(BodyId),
}

/// Static collision world plus registered NPCs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionMap {
    grid: WorldGrid,
    tile_size: u32,
    buildings: Vec<Building>,
    decorations: Vec<Decoration>,
    npcs: Vec<Rect>,
}

impl CollisionMap {
    /// Create a collision map over a generated grid.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidTileSize`] for a zero tile size.
    pub fn new(grid: WorldGrid, tile_size: u32) -> Result<Self> {
        if tile_size == 0 {
            return Err(GameError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            grid,
            tile_size,
            buildings: Vec::new(),
            decorations: Vec::new(),
            npcs: Vec::new(),
        })
    }

    /// Replace the building registry.
    #[must_use]
    pub fn with_buildings(mut self, buildings: Vec<Building>) -> Self {
        self.buildings = buildings;
        self
    }

    /// Replace the decoration registry.
    #[must_use]
    pub fn with_decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    /// Register NPCs by their top-left position; each occupies a character box.
    #[must_use]
    pub fn with_npcs(mut self, positions: &[(f32, f32)]) -> Self {
        self.npcs = positions
            .iter()
            .map(|&(x, y)| Rect::new(x, y, CHARACTER_WIDTH, CHARACTER_HEIGHT))
            .collect();
        self
    }

    /// Underlying terrain.
    #[must_use]
    pub const fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// Tile edge length in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Building registry.
    #[must_use]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Decoration registry.
    #[must_use]
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// World width in pixels.
    #[must_use]
    pub fn world_width_px(&self) -> f32 {
        (self.grid.width() * self.tile_size) as f32
    }

    /// World height in pixels.
    #[must_use]
    pub fn world_height_px(&self) -> f32 {
        (self.grid.height() * self.tile_size) as f32
    }

    /// Returns true if a box at this position cannot be occupied.
    #[must_use]
    pub fn is_blocked(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.blocker(&Rect::new(x, y, width, height), &[], None).is_some()
    }

    /// Inverse of [`Self::is_blocked`].
    #[must_use]
    pub fn is_walkable(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        !self.is_blocked(x, y, width, height)
    }

    /// Blocked check that also considers moving bodies, ignoring `exclude`.
    #[must_use]
    pub fn is_blocked_by(&self, bounds: &Rect, bodies: &[Body], exclude: Option<BodyId>) -> bool {
        self.blocker(bounds, bodies, exclude).is_some()
    }

    /// First source found blocking the box, if any.
    #[must_use]
    pub fn blocker(
        &self,
        bounds: &Rect,
        bodies: &[Body],
        exclude: Option<BodyId>,
    ) -> Option<Blocker> {
        if !bounds.is_finite() {
            return Some(Blocker::InvalidBounds);
        }

        self.tile_blocker(bounds)
            .or_else(|| self.building_blocker(bounds))
            .or_else(|| self.decoration_blocker(bounds))
            .or_else(|| self.body_blocker(bounds, bodies, exclude))
    }

    fn tile_blocker(&self, bounds: &Rect) -> Option<Blocker> {
        let ts = self.tile_size as f32;
        let left = (bounds.x / ts).floor() as i64;
        let right = ((bounds.x + bounds.width - 1.0) / ts).floor() as i64;
        let top = (bounds.y / ts).floor() as i64;
        let bottom = ((bounds.y + bounds.height - 1.0) / ts).floor() as i64;

        for row in top..=bottom {
            // Out-of-world rows would otherwise be scanned tile by tile.
            if !self.grid.in_bounds(0, row) {
                return Some(Blocker::Tile { col: left, row });
            }
            for col in left..=right {
                if !self.grid.is_land(col, row) {
                    return Some(Blocker::Tile { col, row });
                }
            }
        }
        None
    }

    fn building_blocker(&self, bounds: &Rect) -> Option<Blocker> {
        let feet = feet_points(bounds);
        self.buildings
            .iter()
            .position(|building| feet.iter().any(|&(px, py)| building.is_solid_at(px, py)))
            .map(Blocker::Building)
    }

    fn decoration_blocker(&self, bounds: &Rect) -> Option<Blocker> {
        self.decorations
            .iter()
            .position(|decoration| decoration.blocks(bounds))
            .map(Blocker::Decoration)
    }

    fn body_blocker(
        &self,
        bounds: &Rect,
        bodies: &[Body],
        exclude: Option<BodyId>,
    ) -> Option<Blocker> {
        let npc_hit = self.npcs.iter().enumerate().find_map(|(index, npc)| {
            let id = BodyId::Npc(index as u32);
            (Some(id) != exclude && npc.overlaps(bounds)).then_some(id)
        });
        npc_hit
            .or_else(|| {
                bodies
                    .iter()
                    .find(|body| Some(body.id) != exclude && body.bounds.overlaps(bounds))
                    .map(|body| body.id)
            })
            .map(Blocker::Body)
    }
}

/// The three points sampled against buildings: both lower corners inset by
/// 2 px and 4 px up, and the bottom center 2 px up.
#[must_use]
pub fn feet_points(bounds: &Rect) -> [(f32, f32); 3] {
    let foot_y = bounds.bottom() - 4.0;
    [
        (bounds.x + 2.0, foot_y),
        (bounds.right() - 2.0, foot_y),
        (bounds.x + bounds.width / 2.0, bounds.bottom() - 2.0),
    ]
}
