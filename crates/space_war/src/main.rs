//! Space War: a small top-down shooter running on Helipad
//!
//! Runs a scripted session on the headless platform. Pass a `.toml` or
//! `.ron` file as the first argument to override the configuration.

mod components;
mod config;
mod session;
mod space_scene;

use config::{GameConfig, GameplayConfig};
use helipad::foundation::logging;
use helipad::foundation::time::{ManualCounter, PerformanceCounter, SystemCounter};
use helipad::prelude::*;
use space_scene::{SpaceScene, PLAYER_TEXTURE};
use std::process::ExitCode;

const MAIN_SCENE: &str = "main_scene";

/// Engine-global hooks of the game
struct SpaceWar {
    gameplay: GameplayConfig,
}

impl Application for SpaceWar {
    fn on_start(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.load_scene(MAIN_SCENE, SpaceScene::new(self.gameplay.clone()))?;
        engine.activate_scene(MAIN_SCENE)?;
        Ok(())
    }

    fn on_end(&mut self, engine: &mut Engine) {
        if let Err(e) = engine.deactivate_scene() {
            log::warn!("{e}");
        }
        if let Err(e) = engine.unload_scene(MAIN_SCENE) {
            log::warn!("{e}");
        }
    }
}

fn run(config_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::load(config_path)?;

    let window = &config.engine.window;
    let mut platform = HeadlessPlatform::new(window.width, window.height)
        .with_texture_size(PLAYER_TEXTURE, 32.0, 48.0);
    for frame in session::scripted_session(config.session.frames) {
        platform.script().push_frame(frame);
    }

    let counter: Box<dyn PerformanceCounter> = match config.session.frame_rate {
        Some(rate) if rate > 0.0 => Box::new(ManualCounter::stepping(f64::from(rate.recip()))),
        _ => Box::new(SystemCounter::new()),
    };

    let app = SpaceWar {
        gameplay: config.gameplay.clone(),
    };
    let mut engine = Engine::with_counter(config.engine.clone(), &mut platform, app, counter)?;
    let result = engine.start_running();

    log::info!(
        "Session finished: {} frames, {} ticks, {} presented, {} sprites and {} texts drawn",
        engine.frame_count(),
        engine.tick_count(),
        platform.presented_frames(),
        platform.texture_draws().len(),
        platform.text_draws().len()
    );
    engine.shutdown();

    result?;
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    let config_path = std::env::args().nth(1);
    match run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Space War failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_runs_to_escape() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let frames = session::scripted_session(320);
        for frame in frames {
            platform.script().push_frame(frame);
        }

        let gameplay = GameplayConfig {
            seed: Some(3),
            ..GameplayConfig::default()
        };
        let mut engine = Engine::with_counter(
            EngineConfig::default(),
            &mut platform,
            SpaceWar { gameplay },
            Box::new(ManualCounter::stepping(1.0 / 60.0)),
        )
        .unwrap();

        engine.start_running().unwrap();
        assert_eq!(engine.frame_count(), 321);
        assert!(engine.scenes().is_scene_active(MAIN_SCENE));

        engine.shutdown();
        assert!(engine.scenes().is_empty());
    }
}
