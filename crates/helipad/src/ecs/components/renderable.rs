//! Renderable component for entities that can be drawn

use crate::assets::{DynamicTextHandle, SpriteHandle};

/// What an entity looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    /// A cached sprite
    Sprite(SpriteHandle),
    /// A cached dynamic text
    Text(DynamicTextHandle),
}

/// Component for entities that can be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderableComponent {
    /// Visual to draw
    pub visual: Visual,

    /// Whether this object is visible
    pub visible: bool,

    /// Rendering layer for sorting (higher values render later)
    pub layer: i32,
}

impl RenderableComponent {
    /// Visible renderable on layer 0
    pub fn new(visual: Visual) -> Self {
        Self {
            visual,
            visible: true,
            layer: 0,
        }
    }

    /// Visible sprite on layer 0
    pub fn sprite(sprite: SpriteHandle) -> Self {
        Self::new(Visual::Sprite(sprite))
    }

    /// Visible dynamic text on layer 0
    pub fn text(text: DynamicTextHandle) -> Self {
        Self::new(Visual::Text(text))
    }
}
