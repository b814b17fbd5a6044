//! Game configuration

use helipad::config::{Config, ConfigError};
use helipad::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Scripted session settings
    pub session: SessionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::with_window("Space Warfare", 1280, 720),
            gameplay: GameplayConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load from a TOML or RON file, or use the defaults without a path
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading configuration from {path}");
                Self::load_from_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Number of asteroids spawned around the player
    pub asteroid_count: u32,

    /// Asteroids spawn within this distance of the player
    pub asteroid_field_radius: f32,

    /// Ship acceleration in units per second squared
    pub ship_acceleration: f32,

    /// Ship max speed
    pub ship_max_speed: f32,

    /// Free camera speed in units per second
    pub free_camera_speed: f32,

    /// Seed for asteroid placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            asteroid_count: 12,
            asteroid_field_radius: 900.0,
            ship_acceleration: 250.0,
            ship_max_speed: 500.0,
            free_camera_speed: 300.0,
            seed: None,
        }
    }
}

/// Scripted input session run on the headless platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames to run before Escape is pressed
    pub frames: u32,

    /// Simulated display rate; the wall clock is used when unset
    pub frame_rate: Option<f32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_rate: Some(60.0),
        }
    }
}
