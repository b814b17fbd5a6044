//! Platform abstraction layer
//!
//! The engine never talks to an OS window, a GPU or an input device directly.
//! Everything goes through the traits in this module, which a concrete
//! windowing/graphics stack implements. [`headless::HeadlessPlatform`] is the
//! in-tree implementation used by tests and the demo game.

pub mod headless;

use crate::config::WindowConfig;
use crate::foundation::math::Vec2;
use crate::input::{KeyCode, MouseButton};
use thiserror::Error;

pub use headless::{HeadlessPlatform, HeadlessScript, RenderCall};

/// Errors reported by platform backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Window could not be created
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Renderer could not be created
    #[error("Failed to create renderer: {0}")]
    RendererCreation(String),

    /// Text engine could not be created
    #[error("Failed to create text engine: {0}")]
    TextEngineCreation(String),

    /// A file could not be loaded
    #[error("Failed to load '{path}': {reason}")]
    Load {
        /// Requested path
        path: String,
        /// Backend-specific reason
        reason: String,
    },

    /// A text object could not be created or updated
    #[error("Text error: {0}")]
    Text(String),
}

/// Integer pixel rectangle in window space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl PixelRect {
    /// Create a new pixel rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Backend identifier of a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Backend identifier of an opened font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u64);

/// Backend identifier of a shaped text object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextId(pub u64);

/// Metadata returned when a texture is loaded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureInfo {
    /// Backend handle
    pub id: TextureId,
    /// Size in pixels
    pub size: Vec2,
}

/// Metadata returned when a text object is created or updated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextInfo {
    /// Backend handle
    pub id: TextId,
    /// Rendered size in pixels
    pub size: Vec2,
}

/// A fully resolved textured quad, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDraw {
    /// Texture to draw
    pub texture: TextureId,
    /// Top-left corner on screen
    pub position: Vec2,
    /// Destination size on screen
    pub size: Vec2,
    /// Rotation pivot relative to `position`
    pub origin: Vec2,
    /// Clockwise rotation in degrees
    pub rotation: f32,
    /// Color modulation
    pub tint: Color,
}

/// A text object placed on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDraw {
    /// Text to draw
    pub text: TextId,
    /// Top-left corner on screen
    pub position: Vec2,
    /// Destination size on screen
    pub size: Vec2,
    /// Rotation pivot relative to `position`
    pub origin: Vec2,
    /// Clockwise rotation in degrees
    pub rotation: f32,
    /// Text color
    pub color: Color,
}

/// Window related notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// The window was resized to a new logical size
    Resized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// The window gained focus
    FocusGained,
    /// The window lost focus
    FocusLost,
}

/// Raw event produced by the platform each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// The user asked to close the application
    Quit,
    /// Keyboard key changed state
    Key {
        /// Key that changed
        key: KeyCode,
        /// Whether it is now down
        pressed: bool,
    },
    /// Mouse button changed state
    MouseButton {
        /// Button that changed
        button: MouseButton,
        /// Whether it is now down
        pressed: bool,
    },
    /// Mouse moved to a new window position
    MouseMotion {
        /// X in window pixels
        x: f32,
        /// Y in window pixels
        y: f32,
    },
    /// Mouse wheel scrolled
    MouseWheel {
        /// Horizontal amount
        x: f32,
        /// Vertical amount
        y: f32,
    },
    /// Window notification
    Window(WindowEvent),
}

/// An OS window plus its event source
pub trait WindowBackend {
    /// Current title
    fn title(&self) -> String;

    /// Change the title
    fn set_title(&mut self, title: &str);

    /// Size in logical (DPI independent) units
    fn logical_size(&self) -> (u32, u32);

    /// Request a new logical size
    fn set_logical_size(&mut self, width: u32, height: u32);

    /// Size of the drawable area in pixels
    fn pixel_size(&self) -> (u32, u32);

    /// Set the window icon from an image path
    fn set_icon(&mut self, path: &str) -> Result<(), BackendError>;

    /// Drain every event that arrived since the previous call
    fn poll_events(&mut self) -> Vec<PlatformEvent>;
}

/// 2D draw backend attached to a window
pub trait RenderBackend {
    /// Size of the render output in pixels
    fn output_size(&self) -> (u32, u32);

    /// Clear the frame
    fn begin_frame(&mut self, clear: Color);

    /// Present the frame
    fn end_frame(&mut self);

    /// Restrict drawing (and the coordinate origin) to a rectangle, or reset
    /// to the full window with `None`
    fn set_clip_rect(&mut self, rect: Option<PixelRect>);

    /// Load and decode an image file
    fn load_texture(&mut self, path: &str) -> Result<TextureInfo, BackendError>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureId);

    /// Open a font at a point size
    fn load_font(&mut self, path: &str, size: f32) -> Result<FontId, BackendError>;

    /// Close a font
    fn close_font(&mut self, font: FontId);

    /// Shape a text string with a font
    fn create_text(&mut self, font: FontId, content: &str) -> Result<TextInfo, BackendError>;

    /// Replace the content of an existing text object
    fn update_text(&mut self, text: TextId, content: &str) -> Result<TextInfo, BackendError>;

    /// Release a text object
    fn destroy_text(&mut self, text: TextId);

    /// Draw a textured quad
    fn draw_texture(&mut self, draw: &TextureDraw);

    /// Draw a text object
    fn draw_text(&mut self, draw: &TextDraw);
}

/// Factory for the window and renderer backends
pub trait Platform {
    /// Create the main window
    fn create_window(&mut self, config: &WindowConfig)
        -> Result<Box<dyn WindowBackend>, BackendError>;

    /// Create a renderer attached to a window
    fn create_renderer(
        &mut self,
        window: &mut dyn WindowBackend,
    ) -> Result<Box<dyn RenderBackend>, BackendError>;
}
