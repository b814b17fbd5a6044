//! Sprites
//!
//! A sprite is a drawable view of a loaded texture with its own size, pivot,
//! scale, rotation and tint. Many sprites may share one texture.

use crate::foundation::math::Vec2;
use crate::platform::{Color, TextureId};

/// Drawable texture reference
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    texture: TextureId,
    texture_path: String,
    size: Vec2,
    origin: Vec2,
    scale: Vec2,
    rotation: f32,
    tint: Color,
}

impl Sprite {
    /// Sprite covering a whole texture, pivoting on its top-left corner
    pub fn new(texture: TextureId, texture_path: impl Into<String>, size: Vec2) -> Self {
        Self {
            texture,
            texture_path: texture_path.into(),
            size,
            origin: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            tint: Color::WHITE,
        }
    }

    /// Backend texture
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Path of the texture file
    pub fn texture_path(&self) -> &str {
        &self.texture_path
    }

    /// Unscaled size in pixels
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Size after scaling
    pub fn scaled_size(&self) -> Vec2 {
        self.size.component_mul(&self.scale)
    }

    /// Pivot relative to the top-left corner, unscaled
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Scale factors
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Clockwise rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Color modulation
    pub fn tint(&self) -> Color {
        self.tint
    }

    /// Override the drawn size
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Set the pivot
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Pivot on the center of the sprite
    pub fn set_origin_centered(&mut self) {
        self.origin = self.size * 0.5;
    }

    /// Set the scale factors
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Set the rotation in degrees
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    /// Set the color modulation
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }
}
