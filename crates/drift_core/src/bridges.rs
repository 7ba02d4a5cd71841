//! Land bridges that join every island into one walkable component.
//!
//! The network is a spanning tree grown greedily from island 0: each round
//! links the closest (connected, unconnected) pair of island centers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::islands::Island;
use crate::terrain::{Tile, WorldGrid};

/// Corridor half-width in tiles on each side of the center line.
const BRIDGE_HALF_WIDTH: i64 = 1;

/// A carved corridor between two islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bridge {
    /// Island that was already part of the network.
    pub from: u32,
    /// Island linked in by this bridge.
    pub to: u32,
}

/// Carve a straight three-tile-wide land corridor between two island centers.
///
/// Points along the center line are interpolated with integer floor division,
/// and widened perpendicular to the dominant axis so the corridor stays
/// 4-connected even on diagonals.
pub fn carve_bridge(grid: &mut WorldGrid, from: &Island, to: &Island) {
    let (x0, y0) = (i64::from(from.x), i64::from(from.y));
    let dx = i64::from(to.x) - x0;
    let dy = i64::from(to.y) - y0;
    let steps = dx.abs().max(dy.abs());
    let widen_vertically = dx.abs() >= dy.abs();

    for i in 0..=steps {
        let (x, y) = if steps == 0 {
            (x0, y0)
        } else {
            (x0 + (dx * i).div_euclid(steps), y0 + (dy * i).div_euclid(steps))
        };

        for offset in -BRIDGE_HALF_WIDTH..=BRIDGE_HALF_WIDTH {
            if widen_vertically {
                grid.set(x, y + offset, Tile::Land);
            } else {
                grid.set(x + offset, y, Tile::Land);
            }
        }
    }
}

/// Connect every island, returning the bridges in the order they were carved.
///
/// Produces exactly `islands.len() - 1` bridges for two or more islands and
/// none otherwise. Ties on distance go to the lowest connected id, then the
/// lowest unconnected id.
pub fn build_bridge_network(grid: &mut WorldGrid, islands: &[Island]) -> Vec<Bridge> {
    if islands.len() < 2 {
        return Vec::new();
    }

    let mut connected: BTreeSet<usize> = BTreeSet::from([0]);
    let mut unconnected: BTreeSet<usize> = (1..islands.len()).collect();
    let mut bridges = Vec::with_capacity(islands.len() - 1);

    while !unconnected.is_empty() {
        let mut best: Option<(i64, usize, usize)> = None;

        for &c in &connected {
            for &u in &unconnected {
                let dist_sq = islands[c].distance_squared(&islands[u]);
                if best.map_or(true, |(d, _, _)| dist_sq < d) {
                    best = Some((dist_sq, c, u));
                }
            }
        }

        let Some((_, c, u)) = best else {
            break;
        };

        carve_bridge(grid, &islands[c], &islands[u]);
        bridges.push(Bridge {
            from: islands[c].id,
            to: islands[u].id,
        });
        connected.insert(u);
        unconnected.remove(&u);
    }

    bridges
}
