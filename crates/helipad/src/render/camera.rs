//! 2D camera
//!
//! A camera is a named world position plus a zoom factor. It does not know
//! where it is drawn; pairing it with a [`Viewport`](super::Viewport) yields
//! the actual world-to-screen transform.

use crate::foundation::math::{lerp_vec2, Vec2};

/// Axis-aligned world rectangle the camera center may not leave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl CameraBounds {
    /// Bounds from two corners, in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
}

/// Named 2D camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    name: String,
    position: Vec2,
    zoom: f32,
    bounds: Option<CameraBounds>,
}

impl Camera {
    /// Smallest zoom the camera accepts
    pub const MIN_ZOOM: f32 = 0.01;

    /// Camera at the world origin with zoom 1
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec2::zeros(),
            zoom: 1.0,
            bounds: None,
        }
    }

    /// Camera name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World position the camera is centered on
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Zoom factor, always positive
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Clamp bounds, if any
    pub fn bounds(&self) -> Option<CameraBounds> {
        self.bounds
    }

    /// Center the camera on a world position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move the camera by a world offset
    pub fn move_position(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Set the zoom factor
    ///
    /// Non-positive or non-finite values are rejected with a warning and the
    /// zoom is clamped to [`Camera::MIN_ZOOM`].
    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() || zoom <= 0.0 {
            log::warn!(
                "Camera '{}': rejected zoom {}, clamping to {}",
                self.name,
                zoom,
                Self::MIN_ZOOM
            );
            self.zoom = Self::MIN_ZOOM;
            return;
        }
        self.zoom = zoom.max(Self::MIN_ZOOM);
    }

    /// Add to the zoom factor
    pub fn zoom_additive(&mut self, amount: f32) {
        self.set_zoom(self.zoom + amount);
    }

    /// Multiply the zoom factor
    pub fn zoom_multiplicative(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Snap the camera onto a target
    pub fn follow_target(&mut self, target: Vec2) {
        self.position = target;
    }

    /// Move part of the way toward a target
    ///
    /// `smoothing` is the fraction of the remaining distance covered per
    /// second; the step is clamped so the camera never overshoots.
    pub fn follow_target_smooth(&mut self, target: Vec2, smoothing: f32, delta_time: f32) {
        let t = (smoothing * delta_time).clamp(0.0, 1.0);
        self.position = lerp_vec2(&self.position, &target, t);
    }

    /// Restrict the camera center to a world rectangle
    pub fn set_bounds(&mut self, bounds: CameraBounds) {
        self.bounds = Some(bounds);
    }

    /// Remove the clamp bounds
    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Clamp the position so a view of `half_extent` stays inside the bounds
    ///
    /// When the bounds are smaller than the view along an axis the camera is
    /// centered on the bounds along that axis.
    pub fn clamp_to_bounds(&mut self, half_extent: Vec2) {
        let Some(bounds) = self.bounds else {
            return;
        };

        self.position.x = clamp_axis(self.position.x, bounds.min.x, bounds.max.x, half_extent.x);
        self.position.y = clamp_axis(self.position.y, bounds.min.y, bounds.max.y, half_extent.y);
    }
}

fn clamp_axis(value: f32, min: f32, max: f32, half_extent: f32) -> f32 {
    let low = min + half_extent;
    let high = max - half_extent;
    if low > high {
        (min + max) * 0.5
    } else {
        value.clamp(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_camera() {
        let camera = Camera::new("main");
        assert_eq!(camera.name(), "main");
        assert_eq!(camera.position(), Vec2::zeros());
        assert_eq!(camera.zoom(), 1.0);
        assert!(camera.bounds().is_none());
    }

    #[test]
    fn test_invalid_zoom_is_clamped() {
        let mut camera = Camera::new("main");
        camera.set_zoom(0.0);
        assert_eq!(camera.zoom(), Camera::MIN_ZOOM);
        camera.set_zoom(-3.0);
        assert_eq!(camera.zoom(), Camera::MIN_ZOOM);
        camera.set_zoom(f32::NAN);
        assert_eq!(camera.zoom(), Camera::MIN_ZOOM);

        camera.set_zoom(2.0);
        camera.zoom_additive(-5.0);
        assert!(camera.zoom() > 0.0);
    }

    #[test]
    fn test_zoom_helpers() {
        let mut camera = Camera::new("main");
        camera.zoom_additive(0.5);
        assert_relative_eq!(camera.zoom(), 1.5);
        camera.zoom_multiplicative(2.0);
        assert_relative_eq!(camera.zoom(), 3.0);
    }

    #[test]
    fn test_follow_smooth_never_overshoots() {
        let mut camera = Camera::new("main");
        camera.follow_target_smooth(vec2(100.0, 0.0), 5.0, 0.1);
        assert_relative_eq!(camera.position().x, 50.0);

        camera.follow_target_smooth(vec2(100.0, 0.0), 100.0, 1.0);
        assert_relative_eq!(camera.position().x, 100.0);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let mut camera = Camera::new("main");
        camera.set_bounds(CameraBounds::new(vec2(1000.0, 1000.0), vec2(0.0, 0.0)));

        camera.set_position(vec2(-50.0, 2000.0));
        camera.clamp_to_bounds(vec2(100.0, 100.0));
        assert_eq!(camera.position(), vec2(100.0, 900.0));

        // Bounds narrower than the view center the camera
        camera.clamp_to_bounds(vec2(600.0, 100.0));
        assert_eq!(camera.position().x, 500.0);

        camera.clear_bounds();
        camera.set_position(vec2(-50.0, 0.0));
        camera.clamp_to_bounds(vec2(100.0, 100.0));
        assert_eq!(camera.position(), vec2(-50.0, 0.0));
    }
}
