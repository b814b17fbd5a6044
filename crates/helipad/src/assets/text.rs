//! Text objects
//!
//! [`StaticText`] is cheap UI text drawn at a fixed pixel size in screen space.
//! [`DynamicText`] can also be scaled, rotated and placed in the world, where
//! it follows the camera zoom.

use super::ResourceError;
use crate::foundation::math::Vec2;
use crate::platform::{Color, FontId, TextId, TextInfo};
use crate::render::Renderer;

/// Content used when a text is created without any
pub const DEFAULT_TEXT_CONTENT: &str = "Text";

fn reshape(
    renderer: &mut Renderer,
    text: TextId,
    content: &str,
) -> Result<TextInfo, ResourceError> {
    renderer
        .backend_mut()
        .update_text(text, content)
        .map_err(|source| ResourceError::Text {
            content: content.to_string(),
            source,
        })
}

/// Screen-space UI text
#[derive(Debug, Clone, PartialEq)]
pub struct StaticText {
    text: TextId,
    font: FontId,
    content: String,
    size: Vec2,
    origin: Vec2,
    color: Color,
}

impl StaticText {
    pub(crate) fn new(info: TextInfo, font: FontId, content: &str) -> Self {
        Self {
            text: info.id,
            font,
            content: content.to_string(),
            size: info.size,
            origin: Vec2::zeros(),
            color: Color::WHITE,
        }
    }

    /// Backend text object
    pub fn text_id(&self) -> TextId {
        self.text
    }

    /// Font the text was shaped with
    pub fn font(&self) -> FontId {
        self.font
    }

    /// Current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Rendered size in pixels
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Pivot relative to the top-left corner
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Text color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Replace the content and reshape
    pub fn set_text(&mut self, renderer: &mut Renderer, content: &str) -> Result<(), ResourceError> {
        if content == self.content {
            return Ok(());
        }
        let info = reshape(renderer, self.text, content)?;
        self.size = info.size;
        content.clone_into(&mut self.content);
        Ok(())
    }

    /// Set the text color
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Set the pivot
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Pivot on the center of the text
    pub fn set_origin_centered(&mut self) {
        self.origin = self.size * 0.5;
    }
}

/// Scalable, rotatable text that may live in the world
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicText {
    text: TextId,
    font: FontId,
    content: String,
    size: Vec2,
    origin: Vec2,
    scale: Vec2,
    rotation: f32,
    color: Color,
    centered: bool,
}

impl DynamicText {
    pub(crate) fn new(info: TextInfo, font: FontId, content: &str) -> Self {
        Self {
            text: info.id,
            font,
            content: content.to_string(),
            size: info.size,
            origin: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            color: Color::WHITE,
            centered: false,
        }
    }

    /// Backend text object
    pub fn text_id(&self) -> TextId {
        self.text
    }

    /// Font the text was shaped with
    pub fn font(&self) -> FontId {
        self.font
    }

    /// Current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Unscaled rendered size in pixels
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

    /// Text color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Replace the content and reshape
    ///
    /// A centered pivot stays centered on the new size.
    pub fn set_text(&mut self, renderer: &mut Renderer, content: &str) -> Result<(), ResourceError> {
        if content == self.content {
            return Ok(());
        }
        let info = reshape(renderer, self.text, content)?;
        self.size = info.size;
        content.clone_into(&mut self.content);
        if self.centered {
            self.origin = self.size * 0.5;
        }
        Ok(())
    }

    /// Set the text color
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Set the pivot
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        self.centered = false;
    }

    /// Pivot on the center of the text, also after content changes
    pub fn set_origin_centered(&mut self) {
        self.origin = self.size * 0.5;
        self.centered = true;
    }

    /// Set the scale factors
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Set the rotation in degrees
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }
}
