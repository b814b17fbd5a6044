//! Resource cache
//!
//! Every scene owns one [`Resources`]. Assets are looked up by string key and
//! created on first request; later requests with the same key return the
//! cached entry. Textures are keyed by file path, fonts by `"path:size"`.
//!
//! Sprites and texts live in slot maps and are handed out as copyable
//! handles. A handle to a destroyed entry simply resolves to `None`.
//!
//! Backend objects can only be released through the renderer, so the owner
//! must call [`Resources::clear`] before dropping the cache. The scene manager
//! does this when a scene is unloaded.

use super::sprite::Sprite;
use super::text::{DynamicText, StaticText};
use crate::platform::{BackendError, FontId, TextureInfo};
use crate::render::Renderer;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use thiserror::Error;

new_key_type! {
    /// Handle to a cached [`Sprite`]
    pub struct SpriteHandle;

    /// Handle to a cached [`StaticText`]
    pub struct StaticTextHandle;

    /// Handle to a cached [`DynamicText`]
    pub struct DynamicTextHandle;
}

/// Resource cache errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Texture file could not be loaded
    #[error("Failed to load the texture at '{path}': {source}")]
    Texture {
        /// Requested path
        path: String,
        /// Backend failure
        source: BackendError,
    },

    /// Font file could not be opened
    #[error("Failed to load the font at '{path}' (size {size}): {source}")]
    Font {
        /// Requested path
        path: String,
        /// Requested point size
        size: f32,
        /// Backend failure
        source: BackendError,
    },

    /// Text could not be shaped
    #[error("Failed to create text '{content}': {source}")]
    Text {
        /// Requested content
        content: String,
        /// Backend failure
        source: BackendError,
    },

    /// Font sizes must be positive
    #[error("Invalid font size {0}")]
    InvalidFontSize(f32),
}

/// Cache key of a font at a point size
pub fn font_key(path: &str, size: f32) -> String {
    format!("{path}:{size}")
}

/// Per-scene asset cache
#[derive(Debug, Default)]
pub struct Resources {
    textures: HashMap<String, TextureInfo>,
    fonts: HashMap<String, FontId>,
    sprites: SlotMap<SpriteHandle, Sprite>,
    sprite_keys: HashMap<String, SpriteHandle>,
    static_texts: SlotMap<StaticTextHandle, StaticText>,
    static_text_keys: HashMap<String, StaticTextHandle>,
    dynamic_texts: SlotMap<DynamicTextHandle, DynamicText>,
    dynamic_text_keys: HashMap<String, DynamicTextHandle>,
}

impl Resources {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Is nothing cached?
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
            && self.fonts.is_empty()
            && self.sprites.is_empty()
            && self.static_texts.is_empty()
            && self.dynamic_texts.is_empty()
    }

    // ---- Textures ----

    /// Load a texture, or return the cached one for this path
    pub fn texture_get_or_create(
        &mut self,
        renderer: &mut Renderer,
        path: &str,
    ) -> Result<TextureInfo, ResourceError> {
        if let Some(info) = self.textures.get(path) {
            return Ok(*info);
        }

        let info = renderer
            .backend_mut()
            .load_texture(path)
            .map_err(|source| ResourceError::Texture {
                path: path.to_string(),
                source,
            })?;
        self.textures.insert(path.to_string(), info);

        log::info!("Loaded texture: {path}");
        Ok(info)
    }

    /// Cached texture for a path
    pub fn texture_get(&self, path: &str) -> Option<TextureInfo> {
        self.textures.get(path).copied()
    }

    /// Is a texture cached for this path?
    pub fn is_texture_loaded(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    /// Release a texture. Sprites using it are left dangling.
    pub fn texture_destroy(&mut self, renderer: &mut Renderer, path: &str) {
        if let Some(info) = self.textures.remove(path) {
            renderer.backend_mut().destroy_texture(info.id);
            log::info!("Unloaded texture: {path}");
        }
    }

    /// Release every texture
    pub fn textures_clear(&mut self, renderer: &mut Renderer) {
        for (path, info) in self.textures.drain() {
            renderer.backend_mut().destroy_texture(info.id);
            log::info!("Destroyed texture: {path}");
        }
    }

    /// Number of cached textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // ---- Fonts ----

    /// Open a font at a size, or return the cached one
    pub fn font_get_or_create(
        &mut self,
        renderer: &mut Renderer,
        path: &str,
        size: f32,
    ) -> Result<FontId, ResourceError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(ResourceError::InvalidFontSize(size));
        }

        let key = font_key(path, size);
        if let Some(font) = self.fonts.get(&key) {
            log::debug!("Using cached font: {key}");
            return Ok(*font);
        }

        let font = renderer
            .backend_mut()
            .load_font(path, size)
            .map_err(|source| ResourceError::Font {
                path: path.to_string(),
                size,
                source,
            })?;
        log::info!("Loaded font: {key}");
        self.fonts.insert(key, font);
        Ok(font)
    }

    /// Is the font cached at this size?
    pub fn is_font_loaded(&self, path: &str, size: f32) -> bool {
        self.fonts.contains_key(&font_key(path, size))
    }

    /// Close a font
    pub fn font_destroy(&mut self, renderer: &mut Renderer, path: &str, size: f32) {
        let key = font_key(path, size);
        if let Some(font) = self.fonts.remove(&key) {
            renderer.backend_mut().close_font(font);
            log::info!("Unloaded font: {key}");
        }
    }

    /// Close every font
    pub fn fonts_clear(&mut self, renderer: &mut Renderer) {
        for (key, font) in self.fonts.drain() {
            renderer.backend_mut().close_font(font);
            log::info!("Destroyed font: {key}");
        }
    }

    // ---- Sprites ----

    /// Sprite for a key, created from a texture path on first request
    pub fn sprite_get_or_create(
        &mut self,
        renderer: &mut Renderer,
        key: &str,
        texture_path: &str,
    ) -> Result<SpriteHandle, ResourceError> {
        if let Some(handle) = self.sprite_keys.get(key) {
            return Ok(*handle);
        }

        let texture = self.texture_get_or_create(renderer, texture_path)?;
        let handle = self
            .sprites
            .insert(Sprite::new(texture.id, texture_path, texture.size));
        self.sprite_keys.insert(key.to_string(), handle);

        log::info!("Created sprite: {key}");
        Ok(handle)
    }

    /// Handle of the sprite cached under a key
    pub fn sprite_get(&self, key: &str) -> Option<SpriteHandle> {
        self.sprite_keys.get(key).copied()
    }

    /// Resolve a sprite handle
    pub fn sprite(&self, handle: SpriteHandle) -> Option<&Sprite> {
        self.sprites.get(handle)
    }

    /// Resolve a sprite handle for modification
    pub fn sprite_mut(&mut self, handle: SpriteHandle) -> Option<&mut Sprite> {
        self.sprites.get_mut(handle)
    }

    /// Forget a sprite. The texture stays cached.
    pub fn sprite_destroy(&mut self, key: &str) {
        if let Some(handle) = self.sprite_keys.remove(key) {
            self.sprites.remove(handle);
            log::info!("Destroyed sprite: {key}");
        }
    }

    /// Forget every sprite
    pub fn sprites_clear(&mut self) {
        self.sprites.clear();
        self.sprite_keys.clear();
    }

    /// Number of cached sprites
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    // ---- Texts ----

    /// Static text for a key, created on first request
    pub fn text_static_get_or_create(
        &mut self,
        renderer: &mut Renderer,
        key: &str,
        font_path: &str,
        font_size: f32,
        content: &str,
    ) -> Result<StaticTextHandle, ResourceError> {
        if let Some(handle) = self.static_text_keys.get(key) {
            return Ok(*handle);
        }

        let font = self.font_get_or_create(renderer, font_path, font_size)?;
        let info = renderer
            .backend_mut()
            .create_text(font, content)
            .map_err(|source| ResourceError::Text {
                content: content.to_string(),
                source,
            })?;
        let handle = self.static_texts.insert(StaticText::new(info, font, content));
        self.static_text_keys.insert(key.to_string(), handle);

        log::info!("Created static text: {key}");
        Ok(handle)
    }

    /// Handle of the static text cached under a key
    pub fn text_static_get(&self, key: &str) -> Option<StaticTextHandle> {
        self.static_text_keys.get(key).copied()
    }

    /// Resolve a static text handle
    pub fn static_text(&self, handle: StaticTextHandle) -> Option<&StaticText> {
        self.static_texts.get(handle)
    }

    /// Resolve a static text handle for modification
    pub fn static_text_mut(&mut self, handle: StaticTextHandle) -> Option<&mut StaticText> {
        self.static_texts.get_mut(handle)
    }

    /// Release a static text
    pub fn text_static_destroy(&mut self, renderer: &mut Renderer, key: &str) {
        if let Some(text) = self
            .static_text_keys
            .remove(key)
            .and_then(|handle| self.static_texts.remove(handle))
        {
            renderer.backend_mut().destroy_text(text.text_id());
            log::info!("Destroyed static text: {key}");
        }
    }

    /// Dynamic text for a key, created on first request
    pub fn text_dynamic_get_or_create(
        &mut self,
        renderer: &mut Renderer,
        key: &str,
        font_path: &str,
        font_size: f32,
        content: &str,
    ) -> Result<DynamicTextHandle, ResourceError> {
        if let Some(handle) = self.dynamic_text_keys.get(key) {
            return Ok(*handle);
        }

        let font = self.font_get_or_create(renderer, font_path, font_size)?;
        let info = renderer
            .backend_mut()
            .create_text(font, content)
            .map_err(|source| ResourceError::Text {
                content: content.to_string(),
                source,
            })?;
        let handle = self.dynamic_texts.insert(DynamicText::new(info, font, content));
        self.dynamic_text_keys.insert(key.to_string(), handle);

        log::info!("Created dynamic text: {key}");
        Ok(handle)
    }

    /// Handle of the dynamic text cached under a key
    pub fn text_dynamic_get(&self, key: &str) -> Option<DynamicTextHandle> {
        self.dynamic_text_keys.get(key).copied()
    }

    /// Resolve a dynamic text handle
    pub fn dynamic_text(&self, handle: DynamicTextHandle) -> Option<&DynamicText> {
        self.dynamic_texts.get(handle)
    }

    /// Resolve a dynamic text handle for modification
    pub fn dynamic_text_mut(&mut self, handle: DynamicTextHandle) -> Option<&mut DynamicText> {
        self.dynamic_texts.get_mut(handle)
    }

    /// Release a dynamic text
    pub fn text_dynamic_destroy(&mut self, renderer: &mut Renderer, key: &str) {
        if let Some(text) = self
            .dynamic_text_keys
            .remove(key)
            .and_then(|handle| self.dynamic_texts.remove(handle))
        {
            renderer.backend_mut().destroy_text(text.text_id());
            log::info!("Destroyed dynamic text: {key}");
        }
    }

    /// Release every text object
    pub fn texts_clear(&mut self, renderer: &mut Renderer) {
        for (_, text) in self.static_texts.drain() {
            renderer.backend_mut().destroy_text(text.text_id());
        }
        for (_, text) in self.dynamic_texts.drain() {
            renderer.backend_mut().destroy_text(text.text_id());
        }
        self.static_text_keys.clear();
        self.dynamic_text_keys.clear();
    }

    /// Release everything, texts first and fonts last
    pub fn clear(&mut self, renderer: &mut Renderer) {
        self.texts_clear(renderer);
        self.sprites_clear();
        self.textures_clear(renderer);
        self.fonts_clear(renderer);
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        if !self.is_empty() {
            log::warn!(
                "Resource cache dropped without clear: {} textures, {} fonts and {} texts leaked",
                self.textures.len(),
                self.fonts.len(),
                self.static_texts.len() + self.dynamic_texts.len()
            );
        }
    }
}
