//! The externally owned player snapshot.
//!
//! The session layer owns the snapshot. The simulation reads positions and
//! writes only `health` and `tokens`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collision::{CHARACTER_HEIGHT, CHARACTER_WIDTH};
use crate::geometry::Rect;

/// Default maximum player health.
pub const PLAYER_MAX_HEALTH: u32 = 100;

/// Stable player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward negative y.
    Up,
    /// Toward positive y.
    #[default]
    Down,
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
}

/// One player's state as seen by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Left edge of the character box.
    pub x: f32,
    /// Top edge of the character box.
    pub y: f32,
    /// Facing direction.
    #[serde(default)]
    pub direction: Direction,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Token balance.
    #[serde(default)]
    pub tokens: u64,
    /// Spectators never interact with enemies.
    #[serde(default)]
    pub is_spectator: bool,
    /// Disconnected players are ignored.
    pub connected: bool,
}

impl PlayerState {
    /// A connected, full-health player at a position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            direction: Direction::Down,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            tokens: 0,
            is_spectator: false,
            connected: true,
        }
    }

    /// Set the facing direction.
    #[must_use]
    pub const fn facing(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Mark as a spectator.
    #[must_use]
    pub const fn spectating(mut self) -> Self {
        self.is_spectator = true;
        self
    }

    /// Returns true if the player takes part in the simulation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.connected && !self.is_spectator
    }

    /// Character box.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, CHARACTER_WIDTH, CHARACTER_HEIGHT)
    }

    /// Center of the character box.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }
}

/// All players, ordered by id for deterministic iteration.
pub type PlayerSnapshot = BTreeMap<PlayerId, PlayerState>;

/// Active players in id order.
pub fn active_players(players: &PlayerSnapshot) -> impl Iterator<Item = (PlayerId, &PlayerState)> {
    players
        .iter()
        .filter(|(_, player)| player.is_active())
        .map(|(&id, player)| (id, player))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_players_participate() {
        let mut players = PlayerSnapshot::new();
        players.insert(PlayerId(3), PlayerState::new(0.0, 0.0));
        players.insert(PlayerId(1), PlayerState::new(0.0, 0.0).spectating());
        let mut gone = PlayerState::new(0.0, 0.0);
        gone.connected = false;
        players.insert(PlayerId(2), gone);
        players.insert(PlayerId(0), PlayerState::new(5.0, 5.0));

        let ids: Vec<PlayerId> = active_players(&players).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![PlayerId(0), PlayerId(3)]);
    }

    #[test]
    fn test_center() {
        assert_eq!(PlayerState::new(100.0, 100.0).center(), (108.0, 112.0));
    }
}
