//! Decorations and their optional collision sub-boxes.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Decoration kinds that are painted on the ground and never block.
pub const PATH_KINDS: [&str; 2] = ["dirt_path", "cobblestone_path"];

/// Solid part of a decoration, relative to its top-left corner.
///
/// Missing fields fall back to the decoration's visual size, a horizontally
/// centered offset and a bottom-aligned offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionBox {
    /// Horizontal offset in pixels.
    #[serde(default)]
    pub offset_x: Option<f32>,
    /// Vertical offset in pixels.
    #[serde(default)]
    pub offset_y: Option<f32>,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<f32>,
    /// Height in pixels.
    #[serde(default)]
    pub height: Option<f32>,
}

/// A placed decoration such as a tree, rock or fence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Visual width in pixels.
    pub width: f32,
    /// Visual height in pixels.
    pub height: f32,
    /// Decoration type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ground-layer decorations never block.
    #[serde(default)]
    pub ground: bool,
    /// Solid sub-box, `None` for purely visual decorations.
    #[serde(default)]
    pub collision: Option<CollisionBox>,
}

impl Decoration {
    /// Create a purely visual decoration.
    #[must_use]
    pub fn new(kind: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind: kind.into(),
            ground: false,
            collision: None,
        }
    }

    /// Attach a collision sub-box.
    #[must_use]
    pub const fn with_collision(mut self, collision: CollisionBox) -> Self {
        self.collision = Some(collision);
        self
    }

    /// Mark as a ground-layer decoration.
    #[must_use]
    pub const fn on_ground(mut self) -> Self {
        self.ground = true;
        self
    }

    /// Solid area in world pixels, `None` if the decoration never blocks.
    #[must_use]
    pub fn solid_rect(&self) -> Option<Rect> {
        if self.ground || PATH_KINDS.contains(&self.kind.as_str()) {
            return None;
        }
        let collision = self.collision?;

        let width = collision.width.unwrap_or(self.width);
        let height = collision.height.unwrap_or(self.height);
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let offset_x = collision
            .offset_x
            .unwrap_or_else(|| ((self.width - width) / 2.0).round());
        let offset_y = collision
            .offset_y
            .unwrap_or_else(|| (self.height - height).max(0.0));

        Some(Rect::new(self.x + offset_x, self.y + offset_y, width, height))
    }

    /// Returns true if the box touches the solid area (shared edges count).
    #[must_use]
    pub fn blocks(&self, bounds: &Rect) -> bool {
        self.solid_rect().is_some_and(|solid| solid.touches(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Decoration {
        Decoration::new("palm_tree", 100.0, 100.0, 32.0, 48.0).with_collision(CollisionBox {
            width: Some(12.0),
            height: Some(8.0),
            ..CollisionBox::default()
        })
    }

    #[test]
    fn test_default_offsets_center_and_bottom_align() {
        assert_eq!(tree().solid_rect(), Some(Rect::new(110.0, 140.0, 12.0, 8.0)));
    }

    #[test]
    fn test_explicit_offsets() {
        let rock = Decoration::new("rock", 0.0, 0.0, 16.0, 16.0).with_collision(CollisionBox {
            offset_x: Some(2.0),
            offset_y: Some(3.0),
            width: Some(4.0),
            height: Some(5.0),
        });
        assert_eq!(rock.solid_rect(), Some(Rect::new(2.0, 3.0, 4.0, 5.0)));
    }

    #[test]
    fn test_missing_size_uses_visual_size() {
        let crate_box =
            Decoration::new("crate", 10.0, 20.0, 16.0, 16.0).with_collision(CollisionBox::default());
        assert_eq!(crate_box.solid_rect(), Some(Rect::new(10.0, 20.0, 16.0, 16.0)));
    }

    #[test]
    fn test_non_solid_decorations() {
        assert_eq!(Decoration::new("flower", 0.0, 0.0, 16.0, 16.0).solid_rect(), None);
        assert_eq!(tree().on_ground().solid_rect(), None);

        let mut path = tree();
        path.kind = "dirt_path".to_string();
        assert_eq!(path.solid_rect(), None);

        let flat = Decoration::new("rug", 0.0, 0.0, 16.0, 16.0).with_collision(CollisionBox {
            height: Some(0.0),
            ..CollisionBox::default()
        });
        assert_eq!(flat.solid_rect(), None);
    }

    #[test]
    fn test_blocks_is_inclusive() {
        let tree = tree();
        // Solid area spans x 110..=122; a box ending exactly at 110 still touches.
        assert!(tree.blocks(&Rect::new(100.0, 140.0, 10.0, 4.0)));
        assert!(!tree.blocks(&Rect::new(100.0, 140.0, 9.0, 4.0)));
    }
}
