//! Connected land regions discovered by 4-neighbour flood fill.
//!
//! Used to verify that bridge construction produced a single walkable
//! component and to rank islands by area for building placement.

use serde::{Deserialize, Serialize};

use crate::terrain::WorldGrid;

const NEIGHBOURS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A connected patch of land tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandRegion {
    /// Rank by area, largest first.
    pub id: u32,
    /// Number of land tiles in the region.
    pub tile_count: usize,
    /// Leftmost column.
    pub min_col: i64,
    /// Rightmost column.
    pub max_col: i64,
    /// Topmost row.
    pub min_row: i64,
    /// Bottommost row.
    pub max_row: i64,
}

impl LandRegion {
    /// Center of the bounding box in tiles.
    #[must_use]
    pub fn center(&self) -> (i64, i64) {
        (
            (self.min_col + self.max_col).div_euclid(2),
            (self.min_row + self.max_row).div_euclid(2),
        )
    }

    /// Larger side of the bounding box in tiles.
    #[must_use]
    pub fn extent(&self) -> i64 {
        (self.max_col - self.min_col).max(self.max_row - self.min_row)
    }
}

/// Flood fill over land from a starting tile.
///
/// Returns a row-major mask of reached tiles. Starting on water or outside the
/// grid reaches nothing.
#[must_use]
pub fn flood_fill_land(grid: &WorldGrid, start_x: i64, start_y: i64) -> Vec<bool> {
    let width = grid.width() as usize;
    let mut visited = vec![false; grid.tiles().len()];
    fill_from(grid, start_x, start_y, &mut visited, |_, _| {});
    debug_assert_eq!(visited.len(), width * grid.height() as usize);
    visited
}

fn fill_from(
    grid: &WorldGrid,
    start_x: i64,
    start_y: i64,
    visited: &mut [bool],
    mut on_visit: impl FnMut(i64, i64),
) {
    let width = i64::from(grid.width());
    let mut stack = vec![(start_x, start_y)];

    while let Some((x, y)) = stack.pop() {
        if !grid.is_land(x, y) {
            continue;
        }
        let idx = (y * width + x) as usize;
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        on_visit(x, y);

        for (dx, dy) in NEIGHBOURS {
            stack.push((x + dx, y + dy));
        }
    }
}

/// Returns true if every listed tile is reachable from the first one.
#[must_use]
pub fn all_reachable(grid: &WorldGrid, points: &[(i64, i64)]) -> bool {
    let Some(&(sx, sy)) = points.first() else {
        return true;
    };
    let mask = flood_fill_land(grid, sx, sy);
    let width = i64::from(grid.width());
    points
        .iter()
        .all(|&(x, y)| grid.in_bounds(x, y) && mask[(y * width + x) as usize])
}

/// Find all land regions with at least `min_tiles` tiles, largest first.
///
/// Regions of equal area keep their scan order (row-major by first tile).
#[must_use]
pub fn land_regions(grid: &WorldGrid, min_tiles: usize) -> Vec<LandRegion> {
    let mut visited = vec![false; grid.tiles().len()];
    let mut regions = Vec::new();

    for y in 0..i64::from(grid.height()) {
        for x in 0..i64::from(grid.width()) {
            let idx = (y * i64::from(grid.width()) + x) as usize;
            if visited[idx] || !grid.is_land(x, y) {
                continue;
            }

            let mut region = LandRegion {
                id: 0,
                tile_count: 0,
                min_col: x,
                max_col: x,
                min_row: y,
                max_row: y,
            };
            fill_from(grid, x, y, &mut visited, |tx, ty| {
                region.tile_count += 1;
                region.min_col = region.min_col.min(tx);
                region.max_col = region.max_col.max(tx);
                region.min_row = region.min_row.min(ty);
                region.max_row = region.max_row.max(ty);
            });

            if region.tile_count >= min_tiles {
                regions.push(region);
            }
        }
    }

    // Stable sort keeps scan order among equals.
    regions.sort_by(|a, b| b.tile_count.cmp(&a.tile_count));
    for (rank, region) in regions.iter_mut().enumerate() {
        region.id = rank as u32;
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Tile;

    fn grid_from(rows: &[&str]) -> WorldGrid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut grid = WorldGrid::ocean(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set(x as i64, y as i64, Tile::Land);
                }
            }
        }
        grid
    }

    #[test]
    fn test_flood_fill_stops_at_water() {
        let grid = grid_from(&["##~#", "##~#", "~~~#"]);
        let mask = flood_fill_land(&grid, 0, 0);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 4);
        assert!(!mask[3]);
    }

    #[test]
    fn test_diagonals_do_not_connect() {
        let grid = grid_from(&["#~", "~#"]);
        assert!(!all_reachable(&grid, &[(0, 0), (1, 1)]));
    }

    #[test]
    fn test_flood_fill_from_water_is_empty() {
        let grid = grid_from(&["~#"]);
        assert!(flood_fill_land(&grid, 0, 0).iter().all(|&v| !v));
    }

    #[test]
    fn test_regions_sorted_by_area() {
        let grid = grid_from(&["#~###", "#~###", "~~~~~", "##~~#"]);
        let regions = land_regions(&grid, 1);

        assert_eq!(regions.len(), 4);
        assert_eq!(regions[0].tile_count, 6);
        assert_eq!(regions[0].center(), (3, 0));
        assert_eq!(regions[0].extent(), 2);
        assert_eq!(regions[1].tile_count, 2);
        assert_eq!(regions[3].tile_count, 1);
        assert_eq!(regions.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_small_regions_filtered() {
        let grid = grid_from(&["#~###", "#~###"]);
        let regions = land_regions(&grid, 5);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].tile_count, 6);
    }
}
