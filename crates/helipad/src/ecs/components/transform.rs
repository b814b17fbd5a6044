//! Transform component
//!
//! Position in world units, rotation in degrees (clockwise on screen) and a
//! per-axis scale.

use crate::foundation::math::{utils, Vec2};

/// Spatial state of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComponent {
    /// World position
    pub position: Vec2,

    /// Rotation in degrees
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Transform at a position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Unit vector the entity faces; `(0, 1)` at zero rotation
    pub fn forward(&self) -> Vec2 {
        utils::forward_from_degrees(self.rotation)
    }

    /// Unit vector to the entity's right; `(1, 0)` at zero rotation
    pub fn right(&self) -> Vec2 {
        utils::right_from_degrees(self.rotation)
    }
}
