//! Scene manager
//!
//! Owns every loaded scene and tracks the single active one.
//!
//! ```text
//! unloaded --load--> loaded --activate--> active
//!    ^                 |  ^                  |
//!    +-----unload------+  +---deactivate-----+
//! ```
//!
//! Invalid transitions are logged, rejected with a [`SceneError`] and leave
//! the manager untouched. Events are delivered to the active scene only.

use super::context::{SceneCommand, SceneContext, SceneHandler};
use super::game_scene::{Scene, MAIN_CAMERA, MAIN_VIEWPORT};
use crate::application::AppError;
use crate::render::ViewBinding;
use std::collections::HashMap;
use thiserror::Error;

/// Scene management errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A scene with this name is already loaded
    #[error("Scene '{0}' is already loaded")]
    AlreadyLoaded(String),

    /// No scene with this name is loaded
    #[error("Scene '{0}' is not loaded")]
    NotLoaded(String),

    /// The scene is active and must be deactivated first
    #[error("Scene '{0}' is active; deactivate it before unloading")]
    ActiveScene(String),

    /// The scene is already the active one
    #[error("Scene '{0}' is already active")]
    AlreadyActive(String),

    /// No scene is active
    #[error("No scene is active")]
    NoActiveScene,

    /// Scene names must not be empty
    #[error("Scene name cannot be empty")]
    EmptyName,

    /// A lifecycle hook failed
    #[error("Scene '{scene}' failed in {hook}: {message}")]
    Hook {
        /// Scene name
        scene: String,
        /// Hook that failed
        hook: &'static str,
        /// Error reported by the hook
        message: String,
    },
}

impl SceneError {
    fn hook(scene: &str, hook: &'static str, error: &AppError) -> Self {
        Self::Hook {
            scene: scene.to_string(),
            hook,
            message: error.to_string(),
        }
    }
}

struct LoadedScene {
    scene: Scene,
    handler: Box<dyn SceneHandler>,
}

/// Registry of loaded scenes
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, LoadedScene>,
    active: Option<String>,
}

impl SceneManager {
    /// Manager without scenes
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Queries ----

    /// Number of loaded scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Are no scenes loaded?
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Is a scene with this name loaded?
    pub fn is_scene_loaded(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Is this the active scene?
    pub fn is_scene_active(&self, name: &str) -> bool {
        self.active.as_deref() == Some(name)
    }

    /// Name of the active scene
    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active scene
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.as_deref().and_then(|name| self.scene(name))
    }

    /// The active scene, mutably
    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        let name = self.active.as_deref()?;
        self.scenes.get_mut(name).map(|loaded| &mut loaded.scene)
    }

    /// A loaded scene by name
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name).map(|loaded| &loaded.scene)
    }

    /// A loaded scene by name, mutably
    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name).map(|loaded| &mut loaded.scene)
    }

    /// Names of every loaded scene, sorted
    pub fn scene_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scenes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Visit every loaded scene
    pub fn for_each_scene(&self, mut visit: impl FnMut(&Scene)) {
        for loaded in self.scenes.values() {
            visit(&loaded.scene);
        }
    }

    // ---- Lifecycle ----

    /// Load a scene and fire its `on_load`
    ///
    /// If `on_load` fails the scene is discarded and its resources released.
    pub fn load_scene(
        &mut self,
        name: &str,
        handler: Box<dyn SceneHandler>,
        ctx: &mut SceneContext<'_>,
    ) -> Result<(), SceneError> {
        if name.is_empty() {
            log::warn!("Scene name cannot be empty.");
            return Err(SceneError::EmptyName);
        }
        if self.scenes.contains_key(name) {
            log::warn!("Scene '{name}' is already loaded.");
            return Err(SceneError::AlreadyLoaded(name.to_string()));
        }

        let mut loaded = LoadedScene {
            scene: Scene::new(name),
            handler,
        };

        if let Err(e) = loaded.handler.on_load(&mut loaded.scene, ctx) {
            log::error!("Scene '{name}' failed to load: {e}");
            loaded.scene.resources.clear(ctx.renderer());
            return Err(SceneError::hook(name, "on_load", &e));
        }

        self.scenes.insert(name.to_string(), loaded);
        log::info!("Scene '{name}' loaded.");
        Ok(())
    }

    /// Fire `on_unload` and destroy a scene with everything it owns
    ///
    /// The active scene cannot be unloaded. The scene is destroyed even if
    /// `on_unload` fails.
    pub fn unload_scene(&mut self, name: &str, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if self.is_scene_active(name) {
            log::warn!("Trying to unload active scene '{name}'. Deactivate it first.");
            return Err(SceneError::ActiveScene(name.to_string()));
        }
        let Some(mut loaded) = self.scenes.remove(name) else {
            log::warn!("Trying to unload scene '{name}' which is not loaded.");
            return Err(SceneError::NotLoaded(name.to_string()));
        };

        let result = loaded.handler.on_unload(&mut loaded.scene, ctx);
        loaded.scene.entities.clear();
        loaded.scene.resources.clear(ctx.renderer());
        log::info!("Scene '{name}' unloaded.");

        result.map_err(|e| {
            log::error!("Scene '{name}' failed to unload cleanly: {e}");
            SceneError::hook(name, "on_unload", &e)
        })
    }

    /// Make a scene the active one
    ///
    /// The previous scene is deactivated first. The renderer is bound to the
    /// new scene's main camera and viewport once its `on_activate` succeeds.
    pub fn activate_scene(&mut self, name: &str, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            log::warn!("Trying to activate scene '{name}' which is not loaded.");
            return Err(SceneError::NotLoaded(name.to_string()));
        }
        if self.is_scene_active(name) {
            log::warn!("Scene '{name}' is already active.");
            return Err(SceneError::AlreadyActive(name.to_string()));
        }

        if self.active.is_some() {
            self.deactivate_current(ctx)?;
        }

        let Some(loaded) = self.scenes.get_mut(name) else {
            return Err(SceneError::NotLoaded(name.to_string()));
        };
        if let Err(e) = loaded.handler.on_activate(&mut loaded.scene, ctx) {
            log::error!("Scene '{name}' failed to activate: {e}");
            return Err(SceneError::hook(name, "on_activate", &e));
        }

        self.active = Some(name.to_string());
        ctx.renderer()
            .bind_view(ViewBinding::new(MAIN_CAMERA, MAIN_VIEWPORT));
        log::info!("Scene '{name}' activated.");
        Ok(())
    }

    /// Deactivate the active scene
    ///
    /// The scene is deactivated and the renderer unbound even if
    /// `on_deactivate` fails.
    pub fn deactivate_current(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        let Some(name) = self.active.take() else {
            log::warn!("No active scene to deactivate.");
            return Err(SceneError::NoActiveScene);
        };

        let result = match self.scenes.get_mut(&name) {
            Some(loaded) => loaded.handler.on_deactivate(&mut loaded.scene, ctx),
            None => Ok(()),
        };
        ctx.renderer().unbind_view();
        log::info!("Scene '{name}' deactivated.");

        result.map_err(|e| {
            log::error!("Scene '{name}' failed to deactivate cleanly: {e}");
            SceneError::hook(&name, "on_deactivate", &e)
        })
    }

    /// Run a queued command
    pub fn apply_command(
        &mut self,
        command: SceneCommand,
        ctx: &mut SceneContext<'_>,
    ) -> Result<(), SceneError> {
        match command {
            SceneCommand::Load { name, handler } => self.load_scene(&name, handler, ctx),
            SceneCommand::Unload(name) => self.unload_scene(&name, ctx),
            SceneCommand::Activate(name) => self.activate_scene(&name, ctx),
            SceneCommand::DeactivateCurrent => self.deactivate_current(ctx),
        }
    }

    /// Deactivate the active scene and unload every scene
    pub fn unload_all(&mut self, ctx: &mut SceneContext<'_>) {
        if self.active.is_some() {
            if let Err(e) = self.deactivate_current(ctx) {
                log::warn!("{e}");
            }
        }
        for name in self.scene_names() {
            if let Err(e) = self.unload_scene(&name, ctx) {
                log::warn!("{e}");
            }
        }
    }

    // ---- Event dispatch ----

    fn with_active(
        &mut self,
        dispatch: impl FnOnce(&mut dyn SceneHandler, &mut Scene) -> Result<(), AppError>,
    ) -> Result<(), AppError> {
        let Some(name) = self.active.as_deref() else {
            return Ok(());
        };
        match self.scenes.get_mut(name) {
            Some(loaded) => dispatch(loaded.handler.as_mut(), &mut loaded.scene),
            None => Ok(()),
        }
    }

    /// Deliver the input event to the active scene
    pub fn dispatch_input(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        self.with_active(|handler, scene| handler.on_input(scene, ctx))
    }

    /// Deliver a tick to the active scene
    pub fn dispatch_tick(&mut self, ctx: &mut SceneContext<'_>, tick_interval: f32) -> Result<(), AppError> {
        self.with_active(|handler, scene| handler.on_tick(scene, ctx, tick_interval))
    }

    /// Deliver a frame to the active scene
    pub fn dispatch_frame(&mut self, ctx: &mut SceneContext<'_>, frame_interval: f32) -> Result<(), AppError> {
        self.with_active(|handler, scene| handler.on_frame(scene, ctx, frame_interval))
    }

    /// Deliver the draw event to the active scene
    pub fn dispatch_draw(
        &mut self,
        ctx: &mut SceneContext<'_>,
        fraction_to_next_tick: f32,
    ) -> Result<(), AppError> {
        self.with_active(|handler, scene| handler.on_draw(scene, ctx, fraction_to_next_tick))
    }
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneManager")
            .field("scenes", &self.scene_names())
            .field("active", &self.active)
            .finish()
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        for name in self.scene_names() {
            log::info!("Scene '{name}' unloaded during cleanup.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RendererConfig, WindowConfig};
    use crate::input::Input;
    use crate::platform::{HeadlessPlatform, Platform};
    use crate::render::Renderer;
    use crate::scene::FrameTiming;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        fail_load: bool,
        activate_on_load: Option<&'static str>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Box<Self> {
            Box::new(Self {
                name,
                log: Rc::clone(log),
                fail_load: false,
                activate_on_load: None,
            })
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}:{event}", self.name));
        }
    }

    impl SceneHandler for Recorder {
        fn on_load(&mut self, scene: &mut Scene, ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
            self.record("load");
            scene
                .resources
                .sprite_get_or_create(ctx.renderer(), "ship", "ship.png")?;
            if let Some(next) = self.activate_on_load {
                ctx.activate_scene(next);
            }
            if self.fail_load {
                return Err(AppError::Custom("boom".to_string()));
            }
            Ok(())
        }

        fn on_unload(&mut self, _scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
            self.record("unload");
            Ok(())
        }

        fn on_activate(&mut self, _scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
            self.record("activate");
            Ok(())
        }

        fn on_deactivate(&mut self, _scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
            self.record("deactivate");
            Ok(())
        }

        fn on_tick(
            &mut self,
            _scene: &mut Scene,
            _ctx: &mut SceneContext<'_>,
            _tick_interval: f32,
        ) -> Result<(), AppError> {
            self.record("tick");
            Ok(())
        }
    }

    struct Fixture {
        platform: HeadlessPlatform,
        renderer: Renderer,
        input: Input,
    }

    impl Fixture {
        fn new() -> Self {
            let mut platform = HeadlessPlatform::default();
            let mut window = platform.create_window(&WindowConfig::default()).unwrap();
            let backend = platform.create_renderer(window.as_mut()).unwrap();
            Self {
                platform,
                renderer: Renderer::new(backend, &RendererConfig::default()),
                input: Input::new(),
            }
        }

        fn ctx(&mut self) -> SceneContext<'_> {
            SceneContext::new(&self.input, &mut self.renderer, FrameTiming::default())
        }
    }

    #[test]
    fn test_load_fires_on_load_once() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        scenes.load_scene("a", Recorder::new("a", &log), &mut fixture.ctx()).unwrap();
        let again = scenes.load_scene("a", Recorder::new("a2", &log), &mut fixture.ctx());

        assert_eq!(again, Err(SceneError::AlreadyLoaded("a".to_string())));
        assert_eq!(*log.borrow(), vec!["a:load"]);
        assert_eq!(scenes.len(), 1);
        assert!(scenes.is_scene_loaded("a"));
        assert!(!scenes.is_scene_active("a"));

        scenes.unload_all(&mut fixture.ctx());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        let result = scenes.load_scene("", Recorder::new("x", &log), &mut fixture.ctx());
        assert_eq!(result, Err(SceneError::EmptyName));
        assert!(log.borrow().is_empty());
        assert!(scenes.is_empty());
    }

    #[test]
    fn test_failed_load_releases_resources() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        let mut handler = Recorder::new("bad", &log);
        handler.fail_load = true;
        let result = scenes.load_scene("bad", handler, &mut fixture.ctx());

        assert!(matches!(result, Err(SceneError::Hook { hook: "on_load", .. })));
        assert!(!scenes.is_scene_loaded("bad"));
        assert!(fixture
            .platform
            .calls()
            .contains(&crate::platform::RenderCall::LoadTexture("ship.png".to_string())));
        assert!(fixture
            .platform
            .calls()
            .iter()
            .any(|call| matches!(call, crate::platform::RenderCall::DestroyTexture(_))));
    }

    #[test]
    fn test_switching_deactivates_before_activating() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        scenes.load_scene("a", Recorder::new("a", &log), &mut fixture.ctx()).unwrap();
        scenes.load_scene("b", Recorder::new("b", &log), &mut fixture.ctx()).unwrap();
        scenes.activate_scene("a", &mut fixture.ctx()).unwrap();
        log.borrow_mut().clear();

        scenes.activate_scene("b", &mut fixture.ctx()).unwrap();
        assert_eq!(*log.borrow(), vec!["a:deactivate", "b:activate"]);
        assert_eq!(scenes.active_scene_name(), Some("b"));
        assert!(fixture.renderer.binding().is_some());

        scenes.unload_all(&mut fixture.ctx());
    }

    #[test]
    fn test_unloading_active_scene_is_rejected() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        scenes.load_scene("a", Recorder::new("a", &log), &mut fixture.ctx()).unwrap();
        scenes.activate_scene("a", &mut fixture.ctx()).unwrap();
        log.borrow_mut().clear();

        let result = scenes.unload_scene("a", &mut fixture.ctx());
        assert_eq!(result, Err(SceneError::ActiveScene("a".to_string())));
        assert!(log.borrow().is_empty());
        assert!(scenes.is_scene_loaded("a"));
        assert!(scenes.is_scene_active("a"));

        scenes.deactivate_current(&mut fixture.ctx()).unwrap();
        assert!(fixture.renderer.binding().is_none());
        scenes.unload_scene("a", &mut fixture.ctx()).unwrap();
        assert_eq!(*log.borrow(), vec!["a:deactivate", "a:unload"]);
        assert!(scenes.is_empty());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        assert_eq!(
            scenes.activate_scene("ghost", &mut fixture.ctx()),
            Err(SceneError::NotLoaded("ghost".to_string()))
        );
        assert_eq!(
            scenes.unload_scene("ghost", &mut fixture.ctx()),
            Err(SceneError::NotLoaded("ghost".to_string()))
        );
        assert_eq!(
            scenes.deactivate_current(&mut fixture.ctx()),
            Err(SceneError::NoActiveScene)
        );

        scenes.load_scene("a", Recorder::new("a", &log), &mut fixture.ctx()).unwrap();
        scenes.activate_scene("a", &mut fixture.ctx()).unwrap();
        assert_eq!(
            scenes.activate_scene("a", &mut fixture.ctx()),
            Err(SceneError::AlreadyActive("a".to_string()))
        );
        assert_eq!(*log.borrow(), vec!["a:load", "a:activate"]);

        scenes.unload_all(&mut fixture.ctx());
    }

    #[test]
    fn test_events_reach_only_the_active_scene() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        scenes.dispatch_tick(&mut fixture.ctx(), 0.1).unwrap();
        scenes.load_scene("a", Recorder::new("a", &log), &mut fixture.ctx()).unwrap();
        scenes.load_scene("b", Recorder::new("b", &log), &mut fixture.ctx()).unwrap();
        scenes.dispatch_tick(&mut fixture.ctx(), 0.1).unwrap();
        scenes.activate_scene("b", &mut fixture.ctx()).unwrap();
        log.borrow_mut().clear();

        scenes.dispatch_tick(&mut fixture.ctx(), 0.1).unwrap();
        scenes.dispatch_input(&mut fixture.ctx()).unwrap();
        assert_eq!(*log.borrow(), vec!["b:tick"]);

        scenes.unload_all(&mut fixture.ctx());
    }

    #[test]
    fn test_commands_are_queued_in_context() {
        let mut fixture = Fixture::new();
        let log = Log::default();
        let mut scenes = SceneManager::new();

        let mut handler = Recorder::new("a", &log);
        handler.activate_on_load = Some("a");
        let mut ctx = fixture.ctx();
        scenes.load_scene("a", handler, &mut ctx).unwrap();
        assert!(!scenes.is_scene_active("a"));

        let (commands, stop) = ctx.finish();
        assert!(!stop);
        assert_eq!(commands.len(), 1);

        let mut ctx = fixture.ctx();
        for command in commands {
            scenes.apply_command(command, &mut ctx).unwrap();
        }
        assert!(scenes.is_scene_active("a"));

        scenes.unload_all(&mut ctx);
        assert!(scenes.is_empty());
    }
}
