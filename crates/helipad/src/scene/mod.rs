//! Scenes and their lifecycle
//!
//! A [`Scene`] bundles an entity world, a resource cache and named cameras
//! and viewports. The [`SceneManager`] owns every loaded scene and forwards
//! engine events to the active one, where a [`SceneHandler`] reacts to them.

pub mod context;
pub mod game_scene;
pub mod scene_manager;

pub use context::{FrameTiming, SceneCommand, SceneContext, SceneHandler};
pub use game_scene::{Scene, MAIN_CAMERA, MAIN_VIEWPORT};
pub use scene_manager::{SceneError, SceneManager};
