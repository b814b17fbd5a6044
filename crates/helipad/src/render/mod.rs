//! Rendering system
//!
//! Cameras, viewports, the camera-aware [`Renderer`] and the [`Window`]
//! handle. Low-level drawing is delegated to a
//! [`RenderBackend`](crate::platform::RenderBackend).

pub mod camera;
pub mod renderer;
pub mod viewport;
pub mod window;

pub use camera::{Camera, CameraBounds};
pub use renderer::{RenderStats, Renderer, ViewBinding};
pub use viewport::Viewport;
pub use window::Window;
