//! Procedural building registry for generated worlds.
//!
//! When no hand-authored registry is supplied, buildings are placed on the
//! land regions with a deterministic spiral search. Generated worlds are
//! searched island by island, before bridges merge them into one region. The search uses no
//! RNG, so every host derives the same registry from the same grid.

use serde::{Deserialize, Serialize};

use crate::buildings::{Building, BuildingKind};
use crate::map_generation::GeneratedWorld;
use crate::math::{fixed_cos, fixed_floor, fixed_sin, Fixed, FIXED_TAU};
use crate::regions::{land_regions, LandRegion};
use crate::terrain::WorldGrid;

/// Regions smaller than this many tiles are ignored.
pub const MIN_REGION_TILES: usize = 5;

/// Secondary regions need at least this extent to receive a building.
const SECONDARY_MIN_EXTENT: i64 = 8;

/// Secondary regions above this extent receive two buildings.
const SECONDARY_DOUBLE_EXTENT: i64 = 12;

/// Spiral samples tried per building.
const SPIRAL_ATTEMPTS: i32 = 100;

/// Minimum gap in tiles between buildings on the same region.
const PLACEMENT_PADDING: i64 = 3;

/// Tiles of clearance required below the sprite for the entrance.
const ENTRANCE_ROWS: i64 = 2;

const MAIN_BUILDINGS: [(BuildingKind, &str); 6] = [
    (BuildingKind::Inn, "The Drift-In Inn"),
    (BuildingKind::Shop, "Continuity Goods"),
    (BuildingKind::Lighthouse, "Current's Edge Light"),
    (BuildingKind::House, "Anchor House"),
    (BuildingKind::House, "Molting Den"),
    (BuildingKind::House, "Shell & Stay"),
];

const SECONDARY_BUILDINGS: [(BuildingKind, &str); 4] = [
    (BuildingKind::House, "Beach Hut"),
    (BuildingKind::House, "Shell Cottage"),
    (BuildingKind::Shop, "Tide Shop"),
    (BuildingKind::House, "Driftwood Cabin"),
];

/// A reserved block of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFootprint {
    /// Left column.
    pub col: i64,
    /// Top row.
    pub row: i64,
    /// Width in tiles.
    pub width: i64,
    /// Height in tiles.
    pub height: i64,
}

impl TileFootprint {
    fn clear_of(&self, other: &TileFootprint) -> bool {
        self.col + self.width + PLACEMENT_PADDING < other.col
            || self.col > other.col + other.width + PLACEMENT_PADDING
            || self.row + self.height + PLACEMENT_PADDING < other.row
            || self.row > other.row + other.height + PLACEMENT_PADDING
    }

    fn on_land(&self, grid: &WorldGrid) -> bool {
        (self.row..self.row + self.height)
            .all(|r| (self.col..self.col + self.width).all(|c| grid.is_land(c, r)))
    }
}

/// Tile footprint for a building kind: sprite size rounded up, plus entrance rows.
#[must_use]
pub fn footprint_tiles(kind: BuildingKind, tile_size: u32) -> (i64, i64) {
    let (w, h) = kind.default_size();
    let ts = f64::from(tile_size.max(1));
    let tiles_w = (f64::from(w) / ts).ceil() as i64;
    let tiles_h = (f64::from(h) / ts).ceil() as i64;
    (tiles_w, tiles_h + ENTRANCE_ROWS)
}

/// Spiral outward from the region center looking for a free all-land block.
///
/// Sample `i` sits at angle `i/100 * 2π` and radius `(i % 10)/10 * extent * 0.7`.
#[must_use]
pub fn find_building_location(
    grid: &WorldGrid,
    region: &LandRegion,
    width: i64,
    height: i64,
    placed: &[TileFootprint],
) -> Option<TileFootprint> {
    let (center_col, center_row) = region.center();
    let extent = Fixed::from_num(region.extent());

    for attempt in 0..SPIRAL_ATTEMPTS {
        let angle = Fixed::from_num(attempt) * FIXED_TAU / Fixed::from_num(SPIRAL_ATTEMPTS);
        let radius =
            Fixed::from_num(attempt % 10) * extent * Fixed::from_num(7) / Fixed::from_num(100);

        let candidate = TileFootprint {
            col: center_col + i64::from(fixed_floor(fixed_cos(angle) * radius)),
            row: center_row + i64::from(fixed_floor(fixed_sin(angle) * radius)),
            width,
            height,
        };

        if candidate.on_land(grid) && placed.iter().all(|p| candidate.clear_of(p)) {
            return Some(candidate);
        }
    }
    None
}

/// Build the procedural registry for a generated grid.
///
/// The largest region gets the town (inn, shop, lighthouse and houses). Other
/// regions with an extent of at least 8 tiles get one building, or two above
/// 12 tiles. Buildings that find no spot are dropped.
#[must_use]
pub fn generate_buildings(grid: &WorldGrid, tile_size: u32) -> Vec<Building> {
    let mut regions = land_regions(grid, MIN_REGION_TILES);
    regions.sort_by(|a, b| b.extent().cmp(&a.extent()));

    let Some((main, secondary)) = regions.split_first() else {
        tracing::warn!("No land regions found for building placement");
        return Vec::new();
    };

    let mut buildings = Vec::new();
    let mut placed = Vec::new();
    for (kind, name) in MAIN_BUILDINGS {
        place_one(grid, main, kind, name, tile_size, &mut placed, &mut buildings);
    }

    for (index, region) in secondary.iter().enumerate() {
        if region.extent() < SECONDARY_MIN_EXTENT {
            continue;
        }
        let count = if region.extent() > SECONDARY_DOUBLE_EXTENT { 2 } else { 1 };
        let mut region_placed = Vec::new();
        for slot in 0..count {
            let (kind, name) = SECONDARY_BUILDINGS[(index + 1 + slot) % SECONDARY_BUILDINGS.len()];
            place_one(grid, region, kind, name, tile_size, &mut region_placed, &mut buildings);
        }
    }

    tracing::debug!(count = buildings.len(), "Placed procedural buildings");
    buildings
}

/// Build the procedural registry for a generated world.
///
/// Regions come from the bridgeless island grid, so the largest island gets
/// the town and the others get their own buildings.
#[must_use]
pub fn generate_world_buildings(world: &GeneratedWorld, tile_size: u32) -> Vec<Building> {
    generate_buildings(&world.island_grid(), tile_size)
}

fn place_one(
    grid: &WorldGrid,
    region: &LandRegion,
    kind: BuildingKind,
    name: &str,
    tile_size: u32,
    placed: &mut Vec<TileFootprint>,
    buildings: &mut Vec<Building>,
) {
    let (tiles_w, tiles_h) = footprint_tiles(kind, tile_size);
    match find_building_location(grid, region, tiles_w, tiles_h, placed) {
        Some(spot) => {
            placed.push(spot);
            let ts = tile_size as f32;
            buildings.push(
                Building::new(kind, spot.col as f32 * ts, spot.row as f32 * ts).with_name(name),
            );
        }
        None => tracing::debug!(name, region = region.id, "No room for building"),
    }
}
