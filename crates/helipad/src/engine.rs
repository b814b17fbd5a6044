//! Core engine implementation
//!
//! The engine owns the window, renderer, input and scenes, and runs the
//! fixed-timestep loop:
//!
//! ```text
//! sample time -> poll input -> input
//!             -> tick x N (while the accumulator holds a full tick)
//!             -> fraction to next tick -> frame
//!             -> draw begin -> draw -> draw end
//! ```
//!
//! Simulation advances in fixed ticks; rendering happens once per loop
//! iteration and interpolates between the last two ticks.

use crate::application::{AppError, Application};
use crate::config::{ConfigError, EngineConfig};
use crate::foundation::time::{
    ticks_interval_to_rate, ticks_rate_to_interval, FrameTimer, PerformanceCounter, SystemCounter,
};
use crate::input::Input;
use crate::platform::Platform;
use crate::render::{Renderer, Window};
use crate::scene::{FrameTiming, SceneCommand, SceneContext, SceneError, SceneHandler, SceneManager};
use thiserror::Error;

/// Largest interpolation fraction handed to hooks
const MAX_FRACTION: f32 = 1.0 - f32::EPSILON;

/// Main engine struct
///
/// The engine coordinates all subsystems and manages the main loop.
pub struct Engine {
    window: Window,
    renderer: Renderer,
    input: Input,
    scenes: SceneManager,

    /// Global hooks; taken out while one of them runs
    app: Option<Box<dyn Application>>,

    timer: FrameTimer,
    running: bool,
    in_loop: bool,
    in_frame: bool,
    in_start: bool,
    shutdown_pending: bool,
    shut_down: bool,

    tick_interval: f32,
    seconds_since_last_tick: f32,
    fraction_to_next_tick: f32,
    frame_interval: f32,
    max_ticks_per_frame: Option<u32>,

    frame_count: u64,
    tick_count: u64,
}

impl Engine {
    /// Create the engine on a platform and start the application
    ///
    /// Fails if the configuration is invalid, if the window or renderer
    /// cannot be created, or if [`Application::on_start`] fails.
    pub fn new(
        config: EngineConfig,
        platform: &mut dyn Platform,
        app: impl Application + 'static,
    ) -> Result<Self, EngineError> {
        Self::with_counter(config, platform, app, Box::new(SystemCounter::new()))
    }

    /// Like [`Engine::new`] with a custom time source
    pub fn with_counter(
        config: EngineConfig,
        platform: &mut dyn Platform,
        app: impl Application + 'static,
        counter: Box<dyn PerformanceCounter>,
    ) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let mut window = Window::new(platform, &config.window)
            .map_err(|e| EngineError::InitializationFailed(format!("Window: {e}")))?;
        let backend = platform
            .create_renderer(window.backend_mut())
            .map_err(|e| EngineError::InitializationFailed(format!("Renderer: {e}")))?;
        let renderer = Renderer::new(backend, &config.renderer);

        let mut engine = Self {
            window,
            renderer,
            input: Input::new(),
            scenes: SceneManager::new(),
            app: None,
            timer: FrameTimer::new(counter),
            running: false,
            in_loop: false,
            in_frame: false,
            in_start: true,
            shutdown_pending: false,
            shut_down: false,
            tick_interval: ticks_rate_to_interval(config.timing.tick_rate),
            seconds_since_last_tick: 0.0,
            fraction_to_next_tick: 0.0,
            frame_interval: 0.0,
            max_ticks_per_frame: config.timing.max_ticks_per_frame,
            frame_count: 0,
            tick_count: 0,
        };
        log::info!("Tick rate: {} Hz", config.timing.tick_rate);

        let mut app: Box<dyn Application> = Box::new(app);
        let started = app.on_start(&mut engine);
        engine.in_start = false;
        if let Err(e) = started {
            return Err(EngineError::Application(format!("on_start: {e}")));
        }
        engine.app = Some(app);
        if engine.shutdown_pending {
            engine.shutdown();
        }

        Ok(engine)
    }

    /// Create an engine, run it until stopped, then shut it down
    pub fn run(
        config: EngineConfig,
        platform: &mut dyn Platform,
        app: impl Application + 'static,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config, platform, app)?;
        let result = engine.start_running();
        engine.shutdown();
        result
    }

    // ---- Main loop ----

    /// Run the loop until a stop is requested
    ///
    /// Calling this from inside the loop logs an error and does nothing.
    /// A stopped engine can be started again; a shut down one cannot.
    pub fn start_running(&mut self) -> Result<(), EngineError> {
        if self.in_loop {
            log::error!("Engine loop is already running");
            return Ok(());
        }
        if self.shut_down {
            log::error!("Engine has been shut down");
            return Ok(());
        }

        log::info!("Starting main loop...");
        self.in_loop = true;
        self.running = true;
        self.timer.reset();

        let mut result = Ok(());
        while self.running {
            if let Err(e) = self.run_frame() {
                log::error!("Engine loop aborted: {e}");
                result = Err(e);
                break;
            }
        }

        self.in_loop = false;
        log::info!(
            "Main loop finished after {} frames and {} ticks ({:.1} fps)",
            self.frame_count,
            self.tick_count,
            self.timer.average_fps()
        );
        if self.shutdown_pending {
            self.shutdown();
        }
        result
    }

    /// Run exactly one loop iteration
    ///
    /// Calling this from a hook of the current iteration logs an error and
    /// does nothing.
    pub fn run_frame(&mut self) -> Result<(), EngineError> {
        if self.in_frame {
            log::error!("Frame is already running");
            return Ok(());
        }
        self.in_frame = true;
        let result = self.step();
        self.in_frame = false;
        if self.shutdown_pending && !self.in_loop {
            self.shutdown();
        }
        result
    }

    fn step(&mut self) -> Result<(), EngineError> {
        self.frame_interval = self.timer.sample();
        self.seconds_since_last_tick += self.frame_interval;

        self.process_input();
        self.dispatch_scenes(|scenes, ctx| scenes.dispatch_input(ctx))?;

        let mut ticks_this_frame = 0;
        while self.seconds_since_last_tick >= self.tick_interval {
            if self.max_ticks_per_frame.is_some_and(|max| ticks_this_frame >= max) {
                let backlog = (self.seconds_since_last_tick / self.tick_interval).floor();
                log::warn!("Dropping {backlog} ticks of backlog after {ticks_this_frame} catch-up ticks");
                self.seconds_since_last_tick %= self.tick_interval;
                break;
            }
            self.tick()?;
            ticks_this_frame += 1;
        }

        self.fraction_to_next_tick =
            (self.seconds_since_last_tick / self.tick_interval).clamp(0.0, MAX_FRACTION);

        let frame_interval = self.frame_interval;
        self.dispatch_scenes(|scenes, ctx| scenes.dispatch_frame(ctx, frame_interval))?;
        self.with_app("on_frame", |app, engine| app.on_frame(engine, frame_interval))?;

        self.draw()?;
        self.frame_count += 1;
        Ok(())
    }

    fn process_input(&mut self) {
        self.input.update();
        for event in self.window.poll_events() {
            self.input.process_event(&event);
        }
        if self.input.quit_requested() {
            log::info!("Quit event received");
            self.stop_running();
        }
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        let tick_interval = self.tick_interval;
        self.dispatch_scenes(|scenes, ctx| scenes.dispatch_tick(ctx, tick_interval))?;
        self.with_app("on_tick", |app, engine| app.on_tick(engine, tick_interval))?;

        self.seconds_since_last_tick -= tick_interval;
        self.tick_count += 1;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), EngineError> {
        let binding = self.renderer.binding().cloned();
        let view = match (binding.as_ref(), self.scenes.active_scene_mut()) {
            (Some(binding), Some(scene)) => scene.view_mut(binding),
            _ => None,
        };
        self.renderer.draw_begin(view);

        let fraction = self.fraction_to_next_tick;
        let result = self
            .dispatch_scenes(|scenes, ctx| scenes.dispatch_draw(ctx, fraction))
            .and_then(|()| self.with_app("on_draw", |app, engine| app.on_draw(engine, fraction)));

        self.renderer.draw_end();
        result
    }

    /// Ask the loop to stop after the current iteration
    pub fn stop_running(&mut self) {
        if self.running {
            log::info!("Engine shutdown requested");
        }
        self.running = false;
    }

    /// Fire [`Application::on_end`] and unload every scene
    ///
    /// Runs at most once; dropping the engine calls it too. Called from a hook,
    /// it stops the loop and shuts down once the loop or frame returns.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        if self.in_loop || self.in_frame || self.in_start {
            log::info!("Shutdown deferred until the running hook returns");
            self.shutdown_pending = true;
            self.stop_running();
            return;
        }
        self.shut_down = true;
        self.running = false;

        if let Some(mut app) = self.app.take() {
            app.on_end(self);
        }

        let timing = self.timing();
        let mut ctx = SceneContext::new(&self.input, &mut self.renderer, timing);
        self.scenes.unload_all(&mut ctx);
        log::info!("Engine shutdown complete");
    }

    // ---- Hook plumbing ----

    fn timing(&self) -> FrameTiming {
        FrameTiming {
            tick_interval: self.tick_interval,
            frame_interval: self.frame_interval,
            fraction_to_next_tick: self.fraction_to_next_tick,
        }
    }

    fn with_app(
        &mut self,
        hook: &'static str,
        call: impl FnOnce(&mut dyn Application, &mut Self) -> Result<(), AppError>,
    ) -> Result<(), EngineError> {
        let Some(mut app) = self.app.take() else {
            return Ok(());
        };
        let result = call(app.as_mut(), self);
        self.app = Some(app);
        result.map_err(|e| EngineError::Application(format!("{hook}: {e}")))
    }

    fn dispatch_scenes(
        &mut self,
        dispatch: impl FnOnce(&mut SceneManager, &mut SceneContext<'_>) -> Result<(), AppError>,
    ) -> Result<(), EngineError> {
        let timing = self.timing();
        let mut ctx = SceneContext::new(&self.input, &mut self.renderer, timing);
        let result = dispatch(&mut self.scenes, &mut ctx);
        let finished = ctx.finish();
        self.finish_context(finished);
        result.map_err(|e| EngineError::Application(e.to_string()))
    }

    fn scene_operation(
        &mut self,
        operation: impl FnOnce(&mut SceneManager, &mut SceneContext<'_>) -> Result<(), SceneError>,
    ) -> Result<(), SceneError> {
        let timing = self.timing();
        let mut ctx = SceneContext::new(&self.input, &mut self.renderer, timing);
        let result = operation(&mut self.scenes, &mut ctx);
        let finished = ctx.finish();
        self.finish_context(finished);
        result
    }

    fn finish_context(&mut self, (commands, stop): (Vec<SceneCommand>, bool)) {
        if stop {
            self.stop_running();
        }
        self.apply_commands(commands);
    }

    /// Run commands queued by scene hooks, including the ones they queue in turn
    fn apply_commands(&mut self, mut commands: Vec<SceneCommand>) {
        while !commands.is_empty() {
            let timing = self.timing();
            let mut ctx = SceneContext::new(&self.input, &mut self.renderer, timing);
            for command in commands {
                log::debug!("Applying {command:?}");
                if let Err(e) = self.scenes.apply_command(command, &mut ctx) {
                    log::warn!("Scene command failed: {e}");
                }
            }
            let (next, stop) = ctx.finish();
            if stop {
                self.stop_running();
            }
            commands = next;
        }
    }

    // ---- Scenes ----

    /// Load a scene
    pub fn load_scene(
        &mut self,
        name: &str,
        handler: impl SceneHandler + 'static,
    ) -> Result<(), SceneError> {
        self.scene_operation(|scenes, ctx| scenes.load_scene(name, Box::new(handler), ctx))
    }

    /// Unload an inactive scene
    pub fn unload_scene(&mut self, name: &str) -> Result<(), SceneError> {
        self.scene_operation(|scenes, ctx| scenes.unload_scene(name, ctx))
    }

    /// Make a loaded scene the active one
    pub fn activate_scene(&mut self, name: &str) -> Result<(), SceneError> {
        self.scene_operation(|scenes, ctx| scenes.activate_scene(name, ctx))
    }

    /// Deactivate the active scene
    pub fn deactivate_scene(&mut self) -> Result<(), SceneError> {
        self.scene_operation(|scenes, ctx| scenes.deactivate_current(ctx))
    }

    // ---- Timing ----

    /// Change the simulation rate
    ///
    /// Non-positive or non-finite rates are rejected and the current rate
    /// is kept.
    pub fn set_tick_rate(&mut self, ticks_per_second: f32) -> Result<(), EngineError> {
        if !(ticks_per_second.is_finite() && ticks_per_second > 0.0) {
            log::warn!("Rejected tick rate {ticks_per_second}");
            return Err(EngineError::InvalidTickRate(ticks_per_second));
        }
        self.tick_interval = ticks_rate_to_interval(ticks_per_second);
        log::info!("Tick rate set to {ticks_per_second} Hz");
        Ok(())
    }

    /// Simulation rate in ticks per second
    pub fn tick_rate(&self) -> f32 {
        ticks_interval_to_rate(self.tick_interval)
    }

    /// Fixed tick interval in seconds
    pub fn tick_interval(&self) -> f32 {
        self.tick_interval
    }

    /// Progress toward the next tick, in `[0, 1)`
    pub fn fraction_to_next_tick(&self) -> f32 {
        self.fraction_to_next_tick
    }

    /// Duration of the last frame in seconds
    pub fn frame_interval(&self) -> f32 {
        self.frame_interval
    }

    /// Is the loop going to run another iteration?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Frame timer
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    // ---- Subsystems ----

    /// Get the window
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Get mutable access to the window
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// Get the renderer
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Get mutable access to the renderer
    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Get the input snapshot of the current frame
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Get the scene manager
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Get mutable access to the scene manager
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("running", &self.running)
            .field("tick_interval", &self.tick_interval)
            .field("fraction_to_next_tick", &self.fraction_to_next_tick)
            .field("frame_count", &self.frame_count)
            .field("tick_count", &self.tick_count)
            .field("scenes", &self.scenes)
            .finish_non_exhaustive()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A subsystem could not be created
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Tick rate must be positive and finite
    #[error("Invalid tick rate: {0}")]
    InvalidTickRate(f32),

    /// A hook returned an error
    #[error("Application error: {0}")]
    Application(String),

    /// Configuration could not be used
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
