//! Configuration system
//!
//! Engine settings are plain serde structs. Any type implementing [`Config`]
//! can be loaded from or saved to TOML or RON, picked by file extension.

use crate::platform::Color;
use bitflags::bitflags;
pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            Self::from_toml_str(&contents)
        } else if path.ends_with(".ron") {
            Self::from_ron_str(&contents)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse configuration from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

bitflags! {
    /// Window behaviour flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct WindowFlags: u32 {
        /// The user may resize the window
        const RESIZABLE = 1 << 0;
        /// No decorations
        const BORDERLESS = 1 << 1;
        /// Exclusive fullscreen
        const FULLSCREEN = 1 << 2;
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::RESIZABLE
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,

    /// Window behaviour
    pub flags: WindowFlags,

    /// Icon path, if any. A missing icon is logged, never fatal.
    pub icon_path: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Helipad Application".to_string(),
            width: 1280,
            height: 720,
            flags: WindowFlags::default(),
            icon_path: None,
        }
    }
}

/// Simulation timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed simulation rate in ticks per second
    pub tick_rate: f32,

    /// Upper bound on catch-up ticks per rendered frame
    ///
    /// `None` keeps the classic unbounded accumulator. When the cap is hit the
    /// remaining backlog is dropped.
    pub max_ticks_per_frame: Option<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate: 32.0,
            max_ticks_per_frame: None,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Color the frame is cleared to
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,

    /// Timing configuration
    pub timing: TimingConfig,

    /// Renderer configuration
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Config with a window title and size, everything else default
    pub fn with_window(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            window: WindowConfig {
                title: title.into(),
                width,
                height,
                ..WindowConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timing.tick_rate.is_finite() && self.timing.tick_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "timing.tick_rate",
                reason: format!("must be a positive number, got {}", self.timing.tick_rate),
            });
        }
        if self.timing.max_ticks_per_frame == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timing.max_ticks_per_frame",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!("size {}x{} is empty", self.window.width, self.window.height),
            });
        }
        Ok(())
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.timing.tick_rate, 32.0);
        assert_eq!(config.timing.max_ticks_per_frame, None);
        assert!(config.window.flags.contains(WindowFlags::RESIZABLE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [window]
            title = "Space Warfare"
            width = 800
            height = 600

            [timing]
            tick_rate = 60.0
            max_ticks_per_frame = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Space Warfare");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.timing.tick_rate, 60.0);
        assert_eq!(config.timing.max_ticks_per_frame, Some(5));
        assert_eq!(config.renderer.clear_color, Color::BLACK);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = EngineConfig::with_window("Demo", 320, 240);
        let text = ron::to_string(&config).unwrap();
        let parsed = EngineConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_bad_tick_rate() {
        let mut config = EngineConfig::default();
        config.timing.tick_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "timing.tick_rate", .. })
        ));

        config.timing.tick_rate = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::load_from_file("settings.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("[window\ntitle = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
