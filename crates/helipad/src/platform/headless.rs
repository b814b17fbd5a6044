//! Headless platform
//!
//! A window/renderer pair that never touches the OS. Every renderer call is
//! appended to a shared log, input comes from a per-frame script, and assets
//! resolve to synthetic metadata. Used by the test suite, by the demo game and
//! for deterministic replays.

use super::{
    BackendError, Color, FontId, PixelRect, Platform, PlatformEvent, RenderBackend, TextDraw,
    TextId, TextInfo, TextureDraw, TextureId, TextureInfo, WindowBackend,
};
use crate::config::WindowConfig;
use crate::foundation::math::Vec2;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Size assigned to textures that were not registered explicitly
pub const DEFAULT_TEXTURE_SIZE: (f32, f32) = (32.0, 32.0);

/// One recorded renderer interaction
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    /// Frame started
    BeginFrame(Color),
    /// Frame presented
    EndFrame,
    /// Clip rectangle changed
    ClipRect(Option<PixelRect>),
    /// Texture loaded from a path
    LoadTexture(String),
    /// Texture released
    DestroyTexture(TextureId),
    /// Font opened
    LoadFont(String, f32),
    /// Font closed
    CloseFont(FontId),
    /// Text object created
    CreateText(String),
    /// Text object content replaced
    UpdateText(TextId, String),
    /// Text object released
    DestroyText(TextId),
    /// Textured quad drawn
    DrawTexture(TextureDraw),
    /// Text drawn
    DrawText(TextDraw),
}

/// Per-frame input script shared with the headless window
///
/// Each call to `poll_events` consumes one queued frame; an exhausted script
/// yields no events.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScript {
    frames: Rc<RefCell<VecDeque<Vec<PlatformEvent>>>>,
}

impl HeadlessScript {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the events delivered by the next unclaimed frame
    pub fn push_frame(&self, events: Vec<PlatformEvent>) {
        self.frames.borrow_mut().push_back(events);
    }

    /// Queue a number of frames without events
    pub fn push_idle_frames(&self, count: usize) {
        let mut frames = self.frames.borrow_mut();
        for _ in 0..count {
            frames.push_back(Vec::new());
        }
    }

    /// Frames still waiting to be delivered
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    fn next_frame(&self) -> Vec<PlatformEvent> {
        self.frames.borrow_mut().pop_front().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    output_size: (u32, u32),
    calls: Vec<RenderCall>,
    texture_sizes: HashMap<String, Vec2>,
    missing_assets: HashSet<String>,
    texts: HashMap<TextId, (FontId, String)>,
    font_sizes: HashMap<FontId, f32>,
    next_id: u64,
}

impl HeadlessState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn text_size(&self, font: FontId, content: &str) -> Vec2 {
        let point_size = self.font_sizes.get(&font).copied().unwrap_or(16.0);
        Vec2::new(content.chars().count() as f32 * point_size * 0.5, point_size)
    }
}

/// Platform whose window and renderer only record what they are asked to do
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    state: Rc<RefCell<HeadlessState>>,
    script: HeadlessScript,
    fail_window: bool,
    fail_renderer: bool,
}

impl HeadlessPlatform {
    /// Headless platform with the given output size in pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                output_size: (width, height),
                ..HeadlessState::default()
            })),
            script: HeadlessScript::new(),
            fail_window: false,
            fail_renderer: false,
        }
    }

    /// Make window creation fail
    pub fn with_window_failure(mut self) -> Self {
        self.fail_window = true;
        self
    }

    /// Make renderer creation fail
    pub fn with_renderer_failure(mut self) -> Self {
        self.fail_renderer = true;
        self
    }

    /// Register the pixel size reported for a texture path
    pub fn with_texture_size(self, path: &str, width: f32, height: f32) -> Self {
        self.state
            .borrow_mut()
            .texture_sizes
            .insert(path.to_string(), Vec2::new(width, height));
        self
    }

    /// Make loads of the given path fail
    pub fn with_missing_asset(self, path: &str) -> Self {
        self.state.borrow_mut().missing_assets.insert(path.to_string());
        self
    }

    /// Input script consumed by the window
    pub fn script(&self) -> &HeadlessScript {
        &self.script
    }

    /// Change the renderer output size, e.g. to emulate a resize
    pub fn set_output_size(&self, width: u32, height: u32) {
        self.state.borrow_mut().output_size = (width, height);
    }

    /// Copy of every renderer call recorded so far
    pub fn calls(&self) -> Vec<RenderCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget the recorded calls
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Every textured quad drawn so far
    pub fn texture_draws(&self) -> Vec<TextureDraw> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawTexture(draw) => Some(*draw),
                _ => None,
            })
            .collect()
    }

    /// Every text drawn so far
    pub fn text_draws(&self) -> Vec<TextDraw> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawText(draw) => Some(*draw),
                _ => None,
            })
            .collect()
    }

    /// Number of presented frames
    pub fn presented_frames(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, RenderCall::EndFrame))
            .count()
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(
        &mut self,
        config: &WindowConfig,
    ) -> Result<Box<dyn WindowBackend>, BackendError> {
        if self.fail_window {
            return Err(BackendError::WindowCreation("headless window disabled".to_string()));
        }

        Ok(Box::new(HeadlessWindow {
            title: config.title.clone(),
            logical_size: (config.width, config.height),
            icon: None,
            state: Rc::clone(&self.state),
            script: self.script.clone(),
        }))
    }

    fn create_renderer(
        &mut self,
        _window: &mut dyn WindowBackend,
    ) -> Result<Box<dyn RenderBackend>, BackendError> {
        if self.fail_renderer {
            return Err(BackendError::RendererCreation("headless renderer disabled".to_string()));
        }

        Ok(Box::new(HeadlessRenderer {
            state: Rc::clone(&self.state),
        }))
    }
}

struct HeadlessWindow {
    title: String,
    logical_size: (u32, u32),
    icon: Option<String>,
    state: Rc<RefCell<HeadlessState>>,
    script: HeadlessScript,
}

impl WindowBackend for HeadlessWindow {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn logical_size(&self) -> (u32, u32) {
        self.logical_size
    }

    fn set_logical_size(&mut self, width: u32, height: u32) {
        self.logical_size = (width, height);
    }

    fn pixel_size(&self) -> (u32, u32) {
        self.state.borrow().output_size
    }

    fn set_icon(&mut self, path: &str) -> Result<(), BackendError> {
        if self.state.borrow().missing_assets.contains(path) {
            return Err(BackendError::Load {
                path: path.to_string(),
                reason: "no such icon".to_string(),
            });
        }
        self.icon = Some(path.to_string());
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.script.next_frame()
    }
}

struct HeadlessRenderer {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessRenderer {
    fn record(&self, call: RenderCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl RenderBackend for HeadlessRenderer {
    fn output_size(&self) -> (u32, u32) {
        self.state.borrow().output_size
    }

    fn begin_frame(&mut self, clear: Color) {
        self.record(RenderCall::BeginFrame(clear));
    }

    fn end_frame(&mut self) {
        self.record(RenderCall::EndFrame);
    }

    fn set_clip_rect(&mut self, rect: Option<PixelRect>) {
        self.record(RenderCall::ClipRect(rect));
    }

    fn load_texture(&mut self, path: &str) -> Result<TextureInfo, BackendError> {
        let mut state = self.state.borrow_mut();
        if state.missing_assets.contains(path) {
            return Err(BackendError::Load {
                path: path.to_string(),
                reason: "no such file".to_string(),
            });
        }

        let size = state
            .texture_sizes
            .get(path)
            .copied()
            .unwrap_or_else(|| Vec2::new(DEFAULT_TEXTURE_SIZE.0, DEFAULT_TEXTURE_SIZE.1));
        let id = TextureId(state.allocate_id());
        state.calls.push(RenderCall::LoadTexture(path.to_string()));
        Ok(TextureInfo { id, size })
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.record(RenderCall::DestroyTexture(texture));
    }

    fn load_font(&mut self, path: &str, size: f32) -> Result<FontId, BackendError> {
        let mut state = self.state.borrow_mut();
        if state.missing_assets.contains(path) {
            return Err(BackendError::Load {
                path: path.to_string(),
                reason: "no such font".to_string(),
            });
        }

        let font = FontId(state.allocate_id());
        state.font_sizes.insert(font, size);
        state.calls.push(RenderCall::LoadFont(path.to_string(), size));
        Ok(font)
    }

    fn close_font(&mut self, font: FontId) {
        let mut state = self.state.borrow_mut();
        state.font_sizes.remove(&font);
        state.calls.push(RenderCall::CloseFont(font));
    }

    fn create_text(&mut self, font: FontId, content: &str) -> Result<TextInfo, BackendError> {
        let mut state = self.state.borrow_mut();
        if !state.font_sizes.contains_key(&font) {
            return Err(BackendError::Text(format!("unknown font {font:?}")));
        }

        let id = TextId(state.allocate_id());
        let size = state.text_size(font, content);
        state.texts.insert(id, (font, content.to_string()));
        state.calls.push(RenderCall::CreateText(content.to_string()));
        Ok(TextInfo { id, size })
    }

    fn update_text(&mut self, text: TextId, content: &str) -> Result<TextInfo, BackendError> {
        let mut state = self.state.borrow_mut();
        let font = match state.texts.get(&text) {
            Some((font, _)) => *font,
            None => return Err(BackendError::Text(format!("unknown text {text:?}"))),
        };

        let size = state.text_size(font, content);
        state.texts.insert(text, (font, content.to_string()));
        state.calls.push(RenderCall::UpdateText(text, content.to_string()));
        Ok(TextInfo { id: text, size })
    }

    fn destroy_text(&mut self, text: TextId) {
        let mut state = self.state.borrow_mut();
        state.texts.remove(&text);
        state.calls.push(RenderCall::DestroyText(text));
    }

    fn draw_texture(&mut self, draw: &TextureDraw) {
        self.record(RenderCall::DrawTexture(*draw));
    }

    fn draw_text(&mut self, draw: &TextDraw) {
        self.record(RenderCall::DrawText(*draw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_frames_are_consumed_in_order() {
        let script = HeadlessScript::new();
        script.push_frame(vec![PlatformEvent::Quit]);
        script.push_idle_frames(1);

        let mut platform = HeadlessPlatform::new(640, 480);
        platform.script = script.clone();
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();

        assert_eq!(window.poll_events(), vec![PlatformEvent::Quit]);
        assert!(window.poll_events().is_empty());
        assert!(window.poll_events().is_empty());
        assert_eq!(script.pending_frames(), 0);
    }

    #[test]
    fn test_renderer_records_calls() {
        let mut platform = HeadlessPlatform::new(640, 480).with_texture_size("ship.png", 16.0, 24.0);
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();
        let mut renderer = platform.create_renderer(window.as_mut()).unwrap();

        let texture = renderer.load_texture("ship.png").unwrap();
        assert_eq!(texture.size, Vec2::new(16.0, 24.0));
        renderer.begin_frame(Color::BLACK);
        renderer.end_frame();

        assert_eq!(
            platform.calls(),
            vec![
                RenderCall::LoadTexture("ship.png".to_string()),
                RenderCall::BeginFrame(Color::BLACK),
                RenderCall::EndFrame,
            ]
        );
        assert_eq!(platform.presented_frames(), 1);
    }

    #[test]
    fn test_missing_asset_fails_with_path() {
        let mut platform = HeadlessPlatform::default().with_missing_asset("gone.png");
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();
        let mut renderer = platform.create_renderer(window.as_mut()).unwrap();

        let error = renderer.load_texture("gone.png").unwrap_err();
        assert!(error.to_string().contains("gone.png"));
    }

    #[test]
    fn test_text_size_follows_content() {
        let mut platform = HeadlessPlatform::default();
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();
        let mut renderer = platform.create_renderer(window.as_mut()).unwrap();

        let font = renderer.load_font("roboto.ttf", 20.0).unwrap();
        let text = renderer.create_text(font, "abcd").unwrap();
        assert_eq!(text.size, Vec2::new(40.0, 20.0));

        let updated = renderer.update_text(text.id, "ab").unwrap();
        assert_eq!(updated.size, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_creation_failures() {
        let mut platform = HeadlessPlatform::default().with_window_failure();
        assert!(platform.create_window(&WindowConfig::default()).is_err());

        let mut platform = HeadlessPlatform::default().with_renderer_failure();
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();
        assert!(platform.create_renderer(window.as_mut()).is_err());
    }
}
