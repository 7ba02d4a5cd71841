//! LAND/WATER tile grid and island rasterization.

use serde::{Deserialize, Serialize};

use crate::islands::Island;
use crate::math::{fixed_cos, fixed_ratio, fixed_sin, fixed_sqrt, Fixed};

/// A single terrain tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable ground.
    Land,
    /// Impassable sea.
    #[default]
    Water,
}

impl Tile {
    /// Returns true if entities may stand on this tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Land)
    }
}

/// The terrain grid shared by every host.
///
/// Stored in row-major order. Only the generator mutates it, and only before
/// it is handed to the collision layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// Create a grid where every tile is `fill`.
    #[must_use]
    pub fn filled(width: u32, height: u32, fill: Tile) -> Self {
        let cell_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![fill; cell_count],
        }
    }

    /// Create an all-water grid.
    #[must_use]
    pub fn ocean(width: u32, height: u32) -> Self {
        Self::filled(width, height, Tile::Water)
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major tile slice.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if signed coordinates are within grid bounds.
    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Tile at the given coordinates, `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    /// Returns true if the tile exists and is land.
    #[must_use]
    pub fn is_land(&self, x: i64, y: i64) -> bool {
        self.get(x, y).is_some_and(Tile::is_walkable)
    }

    /// Set a tile. Out-of-bounds writes are clipped.
    pub fn set(&mut self, x: i64, y: i64, tile: Tile) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// Number of land tiles.
    #[must_use]
    pub fn land_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_walkable()).count()
    }

    /// Render as text (`#` land, `~` water), one row per line.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            for tile in row {
                out.push(if tile.is_walkable() { '#' } else { '~' });
            }
            out.push('\n');
        }
        out
    }
}

/// Stamp one island's irregular footprint into the grid.
///
/// A cell becomes land when its distance from the island center, perturbed
/// by `sin(dx * 0.3) * cos(dy * 0.3) * 0.5`, is within the island radius.
pub fn rasterize_island(grid: &mut WorldGrid, island: &Island) {
    let frequency = fixed_ratio(3, 10);
    let amplitude = fixed_ratio(1, 2);
    let radius = Fixed::from_num(island.size);

    for dy in -island.size..=island.size {
        let y = i64::from(island.y + dy);
        let cos_term = fixed_cos(Fixed::from_num(dy) * frequency);
        for dx in -island.size..=island.size {
            let x = i64::from(island.x + dx);
            if !grid.in_bounds(x, y) {
                continue;
            }

            let distance = fixed_sqrt(Fixed::from_num(dx * dx + dy * dy));
            let noise = fixed_sin(Fixed::from_num(dx) * frequency) * cos_term * amplitude;

            if distance + noise <= radius {
                grid.set(x, y, Tile::Land);
            }
        }
    }
}

/// Stamp every island in layout order.
pub fn rasterize_islands(grid: &mut WorldGrid, islands: &[Island]) {
    for island in islands {
        rasterize_island(grid, island);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island(x: i32, y: i32, size: i32) -> Island {
        Island {
            id: 0,
            x,
            y,
            size,
            row: 0,
            col: 0,
        }
    }

    #[test]
    fn test_center_always_land() {
        let mut grid = WorldGrid::ocean(40, 40);
        rasterize_island(&mut grid, &island(20, 20, 5));
        assert!(grid.is_land(20, 20));
    }

    #[test]
    fn test_far_cells_stay_water() {
        let mut grid = WorldGrid::ocean(40, 40);
        rasterize_island(&mut grid, &island(20, 20, 5));
        assert!(!grid.is_land(20, 27));
        assert!(!grid.is_land(0, 0));
        // Corner of the bounding square is ~7 tiles out, beyond any noise.
        assert!(!grid.is_land(25, 25));
    }

    #[test]
    fn test_footprint_is_not_a_perfect_disc() {
        let mut grid = WorldGrid::ocean(60, 60);
        rasterize_island(&mut grid, &island(30, 30, 12));

        // (12, 1) lies just outside the radius, but sin(3.6) pulls it inside.
        assert!(grid.is_land(42, 31));
        // (-6, 10) lies inside the radius, but the noise pushes it out.
        assert!(!grid.is_land(24, 40));
    }

    #[test]
    fn test_edge_islands_are_clipped() {
        let mut grid = WorldGrid::ocean(10, 10);
        rasterize_island(&mut grid, &island(0, 0, 4));
        assert!(grid.is_land(0, 0));
        assert!(grid.land_count() > 0);
        assert_eq!(grid.tiles().len(), 100);
    }

    #[test]
    fn test_out_of_bounds_reads() {
        let grid = WorldGrid::filled(4, 4, Tile::Land);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(3, 3), Some(Tile::Land));
        assert!(!grid.is_land(0, 4));
    }

    #[test]
    fn test_ascii_rendering() {
        let mut grid = WorldGrid::ocean(3, 2);
        grid.set(1, 0, Tile::Land);
        assert_eq!(grid.to_ascii(), "~#~\n~~~\n");
    }
}
