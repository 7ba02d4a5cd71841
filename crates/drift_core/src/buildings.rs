//! Buildings and their door zones.
//!
//! A building is solid everywhere inside its footprint except its door, a
//! 20 px tall strip near the bottom edge whose width and offsets depend on the
//! building kind.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Height of every door zone in pixels.
pub const DOOR_HEIGHT: f32 = 20.0;

/// Building kinds with known door layouts.
///
/// Unknown kinds deserialize to [`BuildingKind::Other`], which gets a centered
/// door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Inn.
    Inn,
    /// Shop.
    Shop,
    /// House.
    House,
    /// Lighthouse.
    Lighthouse,
    /// Dock.
    Dock,
    /// Temple.
    Temple,
    /// Market.
    Market,
    /// Any other building.
    #[serde(other)]
    Other,
}

impl BuildingKind {
    /// Door width in pixels.
    #[must_use]
    pub const fn door_width(self) -> f32 {
        match self {
            Self::Inn | Self::Dock | Self::Market => 16.0,
            Self::Shop | Self::Other => 12.0,
            Self::House | Self::Lighthouse => 10.0,
            Self::Temple => 14.0,
        }
    }

    /// Door offset from the left edge, or `None` for a centered door.
    #[must_use]
    pub const fn door_offset_x(self) -> Option<f32> {
        match self {
            Self::Inn | Self::Market => Some(40.0),
            Self::Shop => Some(42.0),
            Self::House | Self::Lighthouse => Some(19.0),
            Self::Dock => Some(16.0),
            Self::Temple => Some(24.0),
            Self::Other => None,
        }
    }

    /// Door offset up from the bottom edge.
    #[must_use]
    pub const fn door_offset_y(self) -> f32 {
        match self {
            Self::House => 1.0,
            Self::Lighthouse => 5.0,
            _ => 0.0,
        }
    }

    /// Default sprite size in pixels.
    #[must_use]
    pub const fn default_size(self) -> (f32, f32) {
        match self {
            Self::Inn => (96.0, 72.0),
            Self::Shop => (72.0, 55.0),
            Self::Lighthouse => (48.0, 96.0),
            Self::Temple => (64.0, 80.0),
            Self::Market => (96.0, 64.0),
            Self::House | Self::Dock | Self::Other => (48.0, 48.0),
        }
    }
}

/// A placed building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Kind, selects the door layout.
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Building {
    /// Create a building of the kind's default size.
    #[must_use]
    pub fn new(kind: BuildingKind, x: f32, y: f32) -> Self {
        let (width, height) = kind.default_size();
        Self {
            x,
            y,
            width,
            height,
            kind,
            name: String::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set an explicit size.
    #[must_use]
    pub const fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// The full footprint.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The door zone.
    #[must_use]
    pub fn door_rect(&self) -> Rect {
        let door_width = self.kind.door_width();
        let offset_x = self
            .kind
            .door_offset_x()
            .unwrap_or_else(|| ((self.width - door_width) / 2.0).floor());
        Rect::new(
            self.x + offset_x,
            self.y + self.height - DOOR_HEIGHT - self.kind.door_offset_y(),
            door_width,
            DOOR_HEIGHT,
        )
    }

    /// Returns true if the point is inside the footprint (right and bottom
    /// edges excluded).
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Returns true if the point is inside the door zone.
    #[must_use]
    pub fn in_door(&self, px: f32, py: f32) -> bool {
        let door = self.door_rect();
        px >= door.x && px < door.right() && py >= door.y && py < door.bottom()
    }

    /// Returns true if the point hits the solid part of the building.
    #[must_use]
    pub fn is_solid_at(&self, px: f32, py: f32) -> bool {
        self.contains(px, py) && !self.in_door(px, py)
    }
}
