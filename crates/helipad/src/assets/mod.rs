//! Asset management
//!
//! Per-scene caches of textures, fonts, sprites and text objects. Loading
//! goes through the renderer's backend.

pub mod resource_manager;
pub mod sprite;
pub mod text;

pub use resource_manager::{
    font_key, DynamicTextHandle, ResourceError, Resources, SpriteHandle, StaticTextHandle,
};
pub use sprite::Sprite;
pub use text::{DynamicText, StaticText, DEFAULT_TEXT_CONTENT};
