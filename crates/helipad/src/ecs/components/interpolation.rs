//! Interpolation component
//!
//! Remembers where an entity was before the latest physics tick so frames
//! rendered between ticks can blend toward the current transform.

use super::TransformComponent;
use crate::foundation::math::{lerp, lerp_vec2, Vec2};

/// Transform snapshot taken before the latest tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InterpolationComponent {
    /// Position before the latest tick
    pub previous_position: Vec2,

    /// Rotation before the latest tick
    pub previous_rotation: f32,

    /// False until the first snapshot; blends report the current transform
    captured: bool,
}

impl InterpolationComponent {
    /// Snapshot of a transform
    pub fn from_transform(transform: &TransformComponent) -> Self {
        Self {
            previous_position: transform.position,
            previous_rotation: transform.rotation,
            captured: true,
        }
    }

    /// Whether a snapshot has been taken since the component was created
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    /// Store the transform as the new "previous" state
    pub fn capture(&mut self, transform: &TransformComponent) {
        *self = Self::from_transform(transform);
    }

    /// Position blended toward `current` by `fraction`
    pub fn position(&self, current: &TransformComponent, fraction: f32) -> Vec2 {
        if !self.captured {
            return current.position;
        }
        lerp_vec2(&self.previous_position, &current.position, fraction)
    }

    /// Rotation blended toward `current` by `fraction`
    pub fn rotation(&self, current: &TransformComponent, fraction: f32) -> f32 {
        if !self.captured {
            return current.rotation;
        }
        lerp(self.previous_rotation, current.rotation, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;
    use approx::assert_relative_eq;

    #[test]
    fn test_uncaptured_reports_current_transform() {
        let interpolation = InterpolationComponent::default();
        let transform = TransformComponent {
            position: vec2(100.0, 50.0),
            rotation: 30.0,
            ..TransformComponent::default()
        };

        assert!(!interpolation.is_captured());
        assert_eq!(interpolation.position(&transform, 0.0), vec2(100.0, 50.0));
        assert_relative_eq!(interpolation.rotation(&transform, 0.5), 30.0);
    }

    #[test]
    fn test_blend_after_capture() {
        let mut transform = TransformComponent::default();
        let mut interpolation = InterpolationComponent::default();
        interpolation.capture(&transform);
        transform.position = vec2(10.0, 20.0);
        transform.rotation = 90.0;

        assert!(interpolation.is_captured());
        assert_relative_eq!(interpolation.position(&transform, 0.5), vec2(5.0, 10.0));
        assert_relative_eq!(interpolation.rotation(&transform, 0.25), 22.5);
    }
}
