//! Viewports
//!
//! A viewport is a normalized rectangle of the render output. Its pixel
//! rectangle is recomputed from the output size at every draw begin, and all
//! world/screen conversions use that cached rectangle.

use super::camera::Camera;
use crate::foundation::math::{Mat3, Vec2, Vec3};
use crate::platform::PixelRect;

/// Named region of the render output
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    name: String,
    position: Vec2,
    size: Vec2,
    cached_position_pixels: Vec2,
    cached_size_pixels: Vec2,
}

impl Viewport {
    /// Create a viewport from a normalized position and size
    ///
    /// Components outside `[0, 1]` are logged and clamped.
    pub fn new(name: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        let name = name.into();
        for (label, value) in [("size x", size.x), ("size y", size.y)] {
            if !(0.0..=1.0).contains(&value) {
                log::warn!("Viewport '{name}': {label} component out of range [0, 1]: {value}");
            }
        }

        let mut viewport = Self {
            name,
            position: Vec2::zeros(),
            size: Vec2::zeros(),
            cached_position_pixels: Vec2::zeros(),
            cached_size_pixels: Vec2::zeros(),
        };
        viewport.set_rect(position, size);
        viewport
    }

    /// Viewport covering the whole output
    pub fn full(name: impl Into<String>) -> Self {
        Self::new(name, Vec2::zeros(), Vec2::new(1.0, 1.0))
    }

    /// Viewport name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized top-left corner
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Normalized size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Top-left corner in pixels, as of the last [`Viewport::apply`]
    pub fn position_pixels(&self) -> Vec2 {
        self.cached_position_pixels
    }

    /// Size in pixels, as of the last [`Viewport::apply`]
    pub fn size_pixels(&self) -> Vec2 {
        self.cached_size_pixels
    }

    /// Set the normalized top-left corner, clamped into `[0, 1]`
    pub fn set_position(&mut self, position: Vec2) {
        self.position = clamp_unit(position);
    }

    /// Set the normalized size, clamped into `[0, 1]`
    pub fn set_size(&mut self, size: Vec2) {
        self.size = clamp_unit(size);
    }

    /// Set position and size together
    pub fn set_rect(&mut self, position: Vec2, size: Vec2) {
        self.set_position(position);
        self.set_size(size);
    }

    /// Recompute the pixel rectangle for an output size
    ///
    /// Pixels are floored, so a 0.5 wide viewport of a 801 pixel output is 400
    /// pixels wide.
    pub fn apply(&mut self, output_size: Vec2) -> PixelRect {
        self.cached_position_pixels = self.position.component_mul(&output_size).map(f32::floor);
        self.cached_size_pixels = self.size.component_mul(&output_size).map(f32::floor);

        PixelRect::new(
            self.cached_position_pixels.x as i32,
            self.cached_position_pixels.y as i32,
            self.cached_size_pixels.x as i32,
            self.cached_size_pixels.y as i32,
        )
    }

    fn screen_center(&self) -> Vec2 {
        self.cached_position_pixels + self.cached_size_pixels * 0.5
    }

    /// Homogeneous world-to-screen matrix for a camera
    ///
    /// `screen = (world - camera) * zoom + viewport_top_left + viewport_size / 2`
    pub fn view_matrix(&self, camera: &Camera) -> Mat3 {
        let zoom = camera.zoom();
        let translation = self.screen_center() - camera.position() * zoom;

        Mat3::new(
            zoom, 0.0, translation.x, //
            0.0, zoom, translation.y, //
            0.0, 0.0, 1.0,
        )
    }

    /// Project a world position onto the screen
    pub fn world_to_screen(&self, camera: &Camera, world_position: Vec2) -> Vec2 {
        let screen = self.view_matrix(camera) * Vec3::new(world_position.x, world_position.y, 1.0);
        Vec2::new(screen.x, screen.y)
    }

    /// Unproject a screen position into the world
    pub fn screen_to_world(&self, camera: &Camera, screen_position: Vec2) -> Vec2 {
        camera.position() + (screen_position - self.screen_center()) / camera.zoom()
    }

    /// Half of the visible area in world units
    pub fn half_extent_world(&self, camera: &Camera) -> Vec2 {
        (self.cached_size_pixels * 0.5) / camera.zoom()
    }

    /// Visible world rectangle as `(min, max)`
    pub fn visible_area_world(&self, camera: &Camera) -> (Vec2, Vec2) {
        let half = self.half_extent_world(camera);
        let center = camera.position();
        (center - half, center + half)
    }

    /// Does a box centered at `position` with extent `size` intersect the view?
    pub fn is_in_view(&self, camera: &Camera, position: Vec2, size: Vec2) -> bool {
        let (min, max) = self.visible_area_world(camera);
        let half = size * 0.5;

        !(position.x + half.x < min.x
            || position.x - half.x > max.x
            || position.y + half.y < min.y
            || position.y - half.y > max.y)
    }

    /// Clamp a camera to its bounds given this viewport's visible extent
    pub fn clamp_camera_to_bounds(&self, camera: &mut Camera) {
        let half = self.half_extent_world(camera);
        camera.clamp_to_bounds(half);
    }
}

fn clamp_unit(value: Vec2) -> Vec2 {
    Vec2::new(value.x.clamp(0.0, 1.0), value.y.clamp(0.0, 1.0))
}
