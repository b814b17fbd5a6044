//! Velocity component
//!
//! Linear and angular velocity with drag and speed limits, integrated by
//! [`system_physics_update`](crate::ecs::systems::system_physics_update).

use crate::foundation::math::{utils, Vec2};

/// Velocity of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityComponent {
    /// Linear velocity in world units per second
    pub linear: Vec2,

    /// Fraction of linear velocity lost per second
    pub linear_drag: f32,

    /// Maximum linear speed (0 = no limit)
    pub linear_max: f32,

    /// Angular velocity in degrees per second
    pub angular: f32,

    /// Fraction of angular velocity lost per second
    pub angular_drag: f32,

    /// Maximum angular speed (0 = no limit)
    pub angular_max: f32,
}

impl VelocityComponent {
    /// Velocity moving at a constant linear rate
    pub fn with_linear(linear: Vec2) -> Self {
        Self {
            linear,
            ..Self::default()
        }
    }

    /// Velocity spinning at a constant rate
    pub fn with_angular(angular: f32) -> Self {
        Self {
            angular,
            ..Self::default()
        }
    }

    /// Apply drag and limits for one step of `delta_time` seconds
    pub fn damp(&mut self, delta_time: f32) {
        self.linear *= (1.0 - self.linear_drag * delta_time).max(0.0);
        self.linear = utils::clamp_length(self.linear, self.linear_max);

        self.angular *= (1.0 - self.angular_drag * delta_time).max(0.0);
        if self.angular_max > 0.0 {
            self.angular = self.angular.clamp(-self.angular_max, self.angular_max);
        }
    }
}
