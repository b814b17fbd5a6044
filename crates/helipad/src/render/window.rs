//! High-level window handle for applications

use crate::config::WindowConfig;
use crate::platform::{BackendError, Platform, PlatformEvent, WindowBackend};

/// Application window wrapping a platform backend
pub struct Window {
    backend: Box<dyn WindowBackend>,
}

impl Window {
    /// Create the window and apply the configured icon
    ///
    /// A missing icon is logged and otherwise ignored.
    pub fn new(platform: &mut dyn Platform, config: &WindowConfig) -> Result<Self, BackendError> {
        let backend = platform.create_window(config)?;
        let mut window = Self { backend };

        if let Some(icon_path) = &config.icon_path {
            window.set_icon(icon_path);
        }

        log::info!(
            "Window '{}' created ({}x{})",
            config.title,
            config.width,
            config.height
        );
        Ok(window)
    }

    /// Window title
    pub fn title(&self) -> String {
        self.backend.title()
    }

    /// Change the window title
    pub fn set_title(&mut self, title: &str) {
        self.backend.set_title(title);
    }

    /// Size in logical units
    pub fn logical_size(&self) -> (u32, u32) {
        self.backend.logical_size()
    }

    /// Request a new logical size
    pub fn set_logical_size(&mut self, width: u32, height: u32) {
        self.backend.set_logical_size(width, height);
    }

    /// Drawable size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        self.backend.pixel_size()
    }

    /// Try to set the window icon, returning whether it worked
    pub fn set_icon(&mut self, path: &str) -> bool {
        match self.backend.set_icon(path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not set window icon: {e}");
                false
            }
        }
    }

    /// Drain pending platform events
    pub fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.backend.poll_events()
    }

    /// Backend the renderer attaches to
    pub(crate) fn backend_mut(&mut self) -> &mut dyn WindowBackend {
        self.backend.as_mut()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.backend.title())
            .field("logical_size", &self.backend.logical_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;

    #[test]
    fn test_missing_icon_is_not_fatal() {
        let mut platform = HeadlessPlatform::default().with_missing_asset("icon.png");
        let config = WindowConfig {
            icon_path: Some("icon.png".to_string()),
            ..WindowConfig::default()
        };

        let mut window = Window::new(&mut platform, &config).unwrap();
        assert!(!window.set_icon("icon.png"));
        assert!(window.set_icon("other.png"));
    }

    #[test]
    fn test_title_and_size() {
        let mut platform = HeadlessPlatform::new(1600, 900);
        let config = WindowConfig {
            title: "Space Warfare".to_string(),
            width: 800,
            height: 450,
            ..WindowConfig::default()
        };

        let mut window = Window::new(&mut platform, &config).unwrap();
        assert_eq!(window.title(), "Space Warfare");
        assert_eq!(window.logical_size(), (800, 450));
        assert_eq!(window.pixel_size(), (1600, 900));

        window.set_title("Paused");
        window.set_logical_size(640, 360);
        assert_eq!(window.title(), "Paused");
        assert_eq!(window.logical_size(), (640, 360));
    }
}
