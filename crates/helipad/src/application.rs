//! Application trait and lifecycle management

use crate::assets::ResourceError;
use crate::engine::{Engine, EngineError};
use crate::scene::SceneError;
use thiserror::Error;

/// Engine-global lifecycle hooks
///
/// Implement this trait to run code outside of any scene: loading the first
/// scene at start, cleaning up at the end, or per-tick/per-frame work that
/// must happen regardless of which scene is active. Every hook has an empty
/// default, and `()` implements the trait for engines that need no hooks.
pub trait Application {
    /// Called once after the engine is initialized
    ///
    /// Use this to load and activate the first scene.
    fn on_start(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    /// Called once at shutdown, before the engine's subsystems are dropped
    ///
    /// Scenes still loaded afterwards are deactivated and unloaded by the
    /// engine.
    fn on_end(&mut self, _engine: &mut Engine) {}

    /// Called every simulation tick, after the active scene's tick
    fn on_tick(&mut self, _engine: &mut Engine, _tick_interval: f32) -> Result<(), AppError> {
        Ok(())
    }

    /// Called every frame, after the active scene's frame
    fn on_frame(&mut self, _engine: &mut Engine, _frame_interval: f32) -> Result<(), AppError> {
        Ok(())
    }

    /// Called every frame between draw begin and draw end, after the active
    /// scene's draw
    fn on_draw(
        &mut self,
        _engine: &mut Engine,
        _fraction_to_next_tick: f32,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

impl Application for () {}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene management error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Asset loading error
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
