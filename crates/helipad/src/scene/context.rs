//! Scene callbacks and the context they run in
//!
//! Scene hooks get the scene itself plus a [`SceneContext`]: read access to
//! input and timing, the renderer, and a queue of scene commands. Commands
//! cannot run while a scene is borrowed, so the engine applies them right
//! after the hook returns, in the order they were queued.

use super::game_scene::Scene;
use crate::application::AppError;
use crate::input::Input;
use crate::render::Renderer;

/// Per-scene lifecycle and event hooks
///
/// Every hook has an empty default. Returning an error from `on_input`,
/// `on_tick`, `on_frame` or `on_draw` stops the engine loop; errors from the
/// lifecycle hooks fail the scene operation that triggered them.
pub trait SceneHandler {
    /// The scene was loaded; create entities and resources here
    fn on_load(&mut self, _scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        Ok(())
    }

    /// The scene is about to be destroyed
    fn on_unload(&mut self, _scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        Ok(())
    }

    /// The scene became the active one
    fn on_activate(
        &mut self,
        _scene: &mut Scene,
        _ctx: &mut SceneContext<'_>,
    ) -> Result<(), AppError> {
        Ok(())
    }

    /// The scene stopped being the active one
    fn on_deactivate(
        &mut self,
        _scene: &mut Scene,
        _ctx: &mut SceneContext<'_>,
    ) -> Result<(), AppError> {
        Ok(())
    }

    /// New input is available for this frame
    fn on_input(&mut self, _scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        Ok(())
    }

    /// One fixed simulation step
    fn on_tick(
        &mut self,
        _scene: &mut Scene,
        _ctx: &mut SceneContext<'_>,
        _tick_interval: f32,
    ) -> Result<(), AppError> {
        Ok(())
    }

    /// Once per rendered frame, before drawing
    fn on_frame(
        &mut self,
        _scene: &mut Scene,
        _ctx: &mut SceneContext<'_>,
        _frame_interval: f32,
    ) -> Result<(), AppError> {
        Ok(())
    }

    /// Once per rendered frame, between draw begin and draw end
    fn on_draw(
        &mut self,
        _scene: &mut Scene,
        _ctx: &mut SceneContext<'_>,
        _fraction_to_next_tick: f32,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

/// Scene operation requested from inside a hook
pub enum SceneCommand {
    /// Load a scene
    Load {
        /// Scene name
        name: String,
        /// Its hooks
        handler: Box<dyn SceneHandler>,
    },
    /// Unload a scene
    Unload(String),
    /// Make a scene the active one
    Activate(String),
    /// Deactivate the active scene
    DeactivateCurrent,
}

impl std::fmt::Debug for SceneCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load { name, .. } => f.debug_tuple("Load").field(name).finish(),
            Self::Unload(name) => f.debug_tuple("Unload").field(name).finish(),
            Self::Activate(name) => f.debug_tuple("Activate").field(name).finish(),
            Self::DeactivateCurrent => f.write_str("DeactivateCurrent"),
        }
    }
}

/// Loop timing as seen by the current hook
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    /// Fixed tick interval in seconds
    pub tick_interval: f32,
    /// Duration of the current frame in seconds
    pub frame_interval: f32,
    /// Progress toward the next tick, in `[0, 1)`
    pub fraction_to_next_tick: f32,
}

/// What a scene hook may touch besides its scene
pub struct SceneContext<'a> {
    input: &'a Input,
    renderer: &'a mut Renderer,
    timing: FrameTiming,
    commands: Vec<SceneCommand>,
    stop_requested: bool,
}

impl<'a> SceneContext<'a> {
    /// Context over the engine's input and renderer
    pub fn new(input: &'a Input, renderer: &'a mut Renderer, timing: FrameTiming) -> Self {
        Self {
            input,
            renderer,
            timing,
            commands: Vec::new(),
            stop_requested: false,
        }
    }

    /// Input snapshot of the current frame
    pub fn input(&self) -> &Input {
        self.input
    }

    /// The renderer
    pub fn renderer(&mut self) -> &mut Renderer {
        &mut *self.renderer
    }

    /// Loop timing
    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    /// Fixed tick interval in seconds
    pub fn tick_interval(&self) -> f32 {
        self.timing.tick_interval
    }

    /// Duration of the current frame in seconds
    pub fn frame_interval(&self) -> f32 {
        self.timing.frame_interval
    }

    /// Progress toward the next tick
    pub fn fraction_to_next_tick(&self) -> f32 {
        self.timing.fraction_to_next_tick
    }

    /// Ask the engine to stop after the current iteration
    pub fn stop_running(&mut self) {
        self.stop_requested = true;
    }

    /// Was a stop requested through this context?
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Queue loading a scene
    pub fn load_scene(&mut self, name: impl Into<String>, handler: impl SceneHandler + 'static) {
        self.commands.push(SceneCommand::Load {
            name: name.into(),
            handler: Box::new(handler),
        });
    }

    /// Queue unloading a scene
    pub fn unload_scene(&mut self, name: impl Into<String>) {
        self.commands.push(SceneCommand::Unload(name.into()));
    }

    /// Queue activating a scene
    pub fn activate_scene(&mut self, name: impl Into<String>) {
        self.commands.push(SceneCommand::Activate(name.into()));
    }

    /// Queue deactivating the active scene
    pub fn deactivate_scene(&mut self) {
        self.commands.push(SceneCommand::DeactivateCurrent);
    }

    /// Commands queued so far
    pub fn pending_commands(&self) -> &[SceneCommand] {
        &self.commands
    }

    /// Take the queued commands and the stop request
    pub fn finish(self) -> (Vec<SceneCommand>, bool) {
        (self.commands, self.stop_requested)
    }
}

impl std::fmt::Debug for SceneContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneContext")
            .field("timing", &self.timing)
            .field("commands", &self.commands)
            .field("stop_requested", &self.stop_requested)
            .finish_non_exhaustive()
    }
}
