//! # Helipad
//!
//! A 2D game engine runtime built around a fixed-timestep loop.
//!
//! ## Features
//!
//! - **Fixed-timestep loop**: simulation ticks decoupled from rendering, with
//!   interpolation between ticks
//! - **Scenes**: a load/activate lifecycle with one active scene at a time
//! - **ECS**: a per-scene entity world with physics and lifetime systems
//! - **Resources**: per-scene get-or-create caches for textures, fonts,
//!   sprites and texts
//! - **Cameras and viewports**: world/screen projection and culling
//! - **Pluggable platform**: windowing and drawing behind traits, with a
//!   headless implementation for tests and tools
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use helipad::prelude::*;
//!
//! struct Level;
//!
//! impl SceneHandler for Level {
//!     fn on_tick(
//!         &mut self,
//!         scene: &mut Scene,
//!         _ctx: &mut SceneContext<'_>,
//!         tick_interval: f32,
//!     ) -> Result<(), AppError> {
//!         scene.entities.system_physics_update(tick_interval);
//!         Ok(())
//!     }
//!
//!     fn on_draw(
//!         &mut self,
//!         scene: &mut Scene,
//!         ctx: &mut SceneContext<'_>,
//!         fraction_to_next_tick: f32,
//!     ) -> Result<(), AppError> {
//!         scene.render(ctx.renderer(), fraction_to_next_tick);
//!         Ok(())
//!     }
//! }
//!
//! struct Game;
//!
//! impl Application for Game {
//!     fn on_start(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.load_scene("level", Level)?;
//!         engine.activate_scene("level")?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut platform = HeadlessPlatform::default();
//!     Engine::run(EngineConfig::default(), &mut platform, Game)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod platform;
pub mod render;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{
            DynamicText, DynamicTextHandle, ResourceError, Resources, Sprite, SpriteHandle,
            StaticText, StaticTextHandle,
        },
        config::{Config, ConfigError, EngineConfig, TimingConfig, WindowConfig, WindowFlags},
        ecs::{
            Component, Entity, EntityWorld, InterpolationComponent, Lifetime,
            RenderableComponent, TransformComponent, VelocityComponent,
        },
        foundation::{
            math::{vec2, Vec2},
            time::{ticks_interval_to_rate, ticks_rate_to_interval},
        },
        input::{Input, KeyCode, MouseButton},
        platform::{Color, HeadlessPlatform, Platform, PlatformEvent},
        render::{Camera, Renderer, Viewport},
        scene::{Scene, SceneContext, SceneError, SceneHandler, MAIN_CAMERA, MAIN_VIEWPORT},
        AppError, Application, Engine, EngineError,
    };
}
