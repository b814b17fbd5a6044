//! 2D renderer
//!
//! Wraps a [`RenderBackend`] and knows which camera and viewport of the
//! active scene to draw through. The binding is by name; at every
//! [`Renderer::draw_begin`] the engine hands over the bound pair, the viewport
//! is applied to the output size and a snapshot is kept for the frame's world
//! draws.
//!
//! Without a binding the full window is used and world coordinates are
//! screen coordinates, with no culling.

use super::camera::Camera;
use super::viewport::Viewport;
use crate::assets::{DynamicText, Sprite, StaticText};
use crate::config::RendererConfig;
use crate::foundation::math::Vec2;
use crate::platform::{Color, RenderBackend, TextDraw, TextureDraw};

/// Names of the camera and viewport the renderer draws through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBinding {
    /// Camera name within the active scene
    pub camera: String,
    /// Viewport name within the active scene
    pub viewport: String,
}

impl ViewBinding {
    /// Binding to a camera and viewport by name
    pub fn new(camera: impl Into<String>, viewport: impl Into<String>) -> Self {
        Self {
            camera: camera.into(),
            viewport: viewport.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct FrameView {
    camera: Camera,
    viewport: Viewport,
}

/// Per-frame draw statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Objects submitted to the backend
    pub drawn: u32,
    /// World objects skipped by culling
    pub culled: u32,
}

/// Camera aware 2D renderer
pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    clear_color: Color,
    binding: Option<ViewBinding>,
    frame_view: Option<FrameView>,
    stats: RenderStats,
}

impl Renderer {
    /// Wrap a backend
    pub fn new(backend: Box<dyn RenderBackend>, config: &RendererConfig) -> Self {
        Self {
            backend,
            clear_color: config.clear_color,
            binding: None,
            frame_view: None,
            stats: RenderStats::default(),
        }
    }

    /// Direct backend access, used by the resource cache
    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    /// Output size in pixels
    pub fn output_size(&self) -> Vec2 {
        let (width, height) = self.backend.output_size();
        Vec2::new(width as f32, height as f32)
    }

    /// Frame clear color
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Change the frame clear color
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Draw through a named camera and viewport of the active scene
    pub fn bind_view(&mut self, binding: ViewBinding) {
        log::debug!(
            "Renderer bound to camera '{}' and viewport '{}'",
            binding.camera,
            binding.viewport
        );
        self.binding = Some(binding);
    }

    /// Drop the binding and draw in plain screen space
    pub fn unbind_view(&mut self) {
        self.binding = None;
        self.frame_view = None;
    }

    /// Current binding
    pub fn binding(&self) -> Option<&ViewBinding> {
        self.binding.as_ref()
    }

    /// Camera used for this frame's world draws
    pub fn frame_camera(&self) -> Option<&Camera> {
        self.frame_view.as_ref().map(|view| &view.camera)
    }

    /// Viewport used for this frame's world draws
    pub fn frame_viewport(&self) -> Option<&Viewport> {
        self.frame_view.as_ref().map(|view| &view.viewport)
    }

    /// Statistics of the current frame
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Start a frame
    ///
    /// `view` is the bound camera and viewport resolved from the active scene.
    /// The viewport's pixel rectangle is recomputed and becomes the clip
    /// rectangle; with no view the full window is used.
    pub fn draw_begin(&mut self, view: Option<(&Camera, &mut Viewport)>) {
        self.stats = RenderStats::default();

        match view {
            Some((camera, viewport)) => {
                let rect = viewport.apply(self.output_size());
                self.backend.set_clip_rect(Some(rect));
                self.frame_view = Some(FrameView {
                    camera: camera.clone(),
                    viewport: viewport.clone(),
                });
            }
            None => {
                if let Some(binding) = &self.binding {
                    log::trace!(
                        "Bound camera '{}' or viewport '{}' is missing, drawing full window",
                        binding.camera,
                        binding.viewport
                    );
                }
                self.backend.set_clip_rect(None);
                self.frame_view = None;
            }
        }

        self.backend.begin_frame(self.clear_color);
    }

    /// Present the frame
    pub fn draw_end(&mut self) {
        self.backend.end_frame();
    }

    fn zoom(&self) -> f32 {
        self.frame_view.as_ref().map_or(1.0, |view| view.camera.zoom())
    }

    /// Project a world position, or `None` when it is culled
    fn project(&mut self, world_position: Vec2, world_size: Vec2) -> Option<Vec2> {
        let Some(view) = &self.frame_view else {
            return Some(world_position);
        };

        if view.viewport.is_in_view(&view.camera, world_position, world_size) {
            Some(view.viewport.world_to_screen(&view.camera, world_position))
        } else {
            self.stats.culled += 1;
            None
        }
    }

    fn submit_texture(&mut self, sprite: &Sprite, screen_position: Vec2, rotation: f32, scale: Vec2) {
        let size = sprite.size().component_mul(&scale);
        let origin = sprite.origin().component_mul(&scale);
        self.backend.draw_texture(&TextureDraw {
            texture: sprite.texture(),
            position: screen_position - origin,
            size,
            origin,
            rotation,
            tint: sprite.tint(),
        });
        self.stats.drawn += 1;
    }

    fn submit_text(&mut self, text: &DynamicText, screen_position: Vec2, rotation: f32, scale: Vec2) {
        let size = text.size().component_mul(&scale);
        let origin = text.origin().component_mul(&scale);
        self.backend.draw_text(&TextDraw {
            text: text.text_id(),
            position: screen_position - origin,
            size,
            origin,
            rotation,
            color: text.color(),
        });
        self.stats.drawn += 1;
    }

    /// Draw a sprite at a world position using its own rotation and scale
    pub fn sprite_draw_world(&mut self, sprite: &Sprite, world_position: Vec2) -> bool {
        self.sprite_draw_world_transformed(sprite, world_position, sprite.rotation(), sprite.scale())
    }

    /// Draw a sprite at a world position with an explicit rotation and scale
    ///
    /// Returns `false` when the sprite is outside the bound view.
    pub fn sprite_draw_world_transformed(
        &mut self,
        sprite: &Sprite,
        world_position: Vec2,
        rotation: f32,
        scale: Vec2,
    ) -> bool {
        let Some(screen_position) =
            self.project(world_position, sprite.size().component_mul(&scale))
        else {
            return false;
        };

        let zoom = self.zoom();
        self.submit_texture(sprite, screen_position, rotation, scale * zoom);
        true
    }

    /// Draw a sprite at a screen position, ignoring the camera
    pub fn sprite_draw_screen(&mut self, sprite: &Sprite, screen_position: Vec2) {
        self.submit_texture(sprite, screen_position, sprite.rotation(), sprite.scale());
    }

    /// Draw a dynamic text at a world position using its own rotation and scale
    pub fn text_draw_world(&mut self, text: &DynamicText, world_position: Vec2) -> bool {
        self.text_draw_world_transformed(text, world_position, text.rotation(), text.scale())
    }

    /// Draw a dynamic text at a world position with an explicit rotation and scale
    ///
    /// Returns `false` when the text is outside the bound view.
    pub fn text_draw_world_transformed(
        &mut self,
        text: &DynamicText,
        world_position: Vec2,
        rotation: f32,
        scale: Vec2,
    ) -> bool {
        let Some(screen_position) = self.project(world_position, text.size().component_mul(&scale))
        else {
            return false;
        };

        let zoom = self.zoom();
        self.submit_text(text, screen_position, rotation, scale * zoom);
        true
    }

    /// Draw a dynamic text at a screen position, scaled by the camera zoom
    pub fn text_draw_screen(&mut self, text: &DynamicText, screen_position: Vec2) {
        let scale = text.scale() * self.zoom();
        self.submit_text(text, screen_position, text.rotation(), scale);
    }

    /// Draw a static text at a screen position
    ///
    /// Static text is never scaled; its position is snapped to whole pixels.
    pub fn static_text_draw_screen(&mut self, text: &StaticText, screen_position: Vec2) {
        let position = (screen_position - text.origin()).map(f32::floor);
        self.backend.draw_text(&TextDraw {
            text: text.text_id(),
            position,
            size: text.size(),
            origin: text.origin(),
            rotation: 0.0,
            color: text.color(),
        });
        self.stats.drawn += 1;
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("clear_color", &self.clear_color)
            .field("binding", &self.binding)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::foundation::math::vec2;
    use crate::platform::{HeadlessPlatform, PixelRect, Platform, RenderCall, TextureId};

    fn renderer(platform: &mut HeadlessPlatform) -> Renderer {
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();
        let backend = platform.create_renderer(window.as_mut()).unwrap();
        Renderer::new(backend, &RendererConfig::default())
    }

    fn ship() -> Sprite {
        let mut sprite = Sprite::new(TextureId(1), "ship.png", vec2(32.0, 32.0));
        sprite.set_origin_centered();
        sprite
    }

    #[test]
    fn test_unbound_world_equals_screen() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let mut renderer = renderer(&mut platform);

        renderer.draw_begin(None);
        assert!(renderer.sprite_draw_world(&ship(), vec2(-5000.0, 10.0)));
        renderer.draw_end();

        let draws = platform.texture_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].position, vec2(-5016.0, -6.0));
        assert_eq!(platform.calls()[0], RenderCall::ClipRect(None));
    }

    #[test]
    fn test_bound_view_centers_origin() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let mut renderer = renderer(&mut platform);
        let camera = Camera::new("main");
        let mut viewport = Viewport::full("main");

        renderer.draw_begin(Some((&camera, &mut viewport)));
        renderer.sprite_draw_world(&ship(), Vec2::zeros());
        renderer.draw_end();

        assert_eq!(viewport.size_pixels(), vec2(800.0, 600.0));
        assert_eq!(platform.calls()[0], RenderCall::ClipRect(Some(PixelRect::new(0, 0, 800, 600))));
        let draw = platform.texture_draws()[0];
        assert_eq!(draw.position + draw.origin, vec2(400.0, 300.0));
    }

    #[test]
    fn test_culling() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let mut renderer = renderer(&mut platform);
        let camera = Camera::new("main");
        let mut viewport = Viewport::full("main");

        renderer.draw_begin(Some((&camera, &mut viewport)));
        assert!(renderer.sprite_draw_world(&ship(), vec2(100.0, 100.0)));
        assert!(!renderer.sprite_draw_world(&ship(), vec2(1000.0, 0.0)));
        assert!(!renderer.sprite_draw_world(&ship(), vec2(0.0, -317.0)));
        renderer.draw_end();

        assert_eq!(renderer.stats(), RenderStats { drawn: 1, culled: 2 });
        assert_eq!(platform.texture_draws().len(), 1);
    }

    #[test]
    fn test_zoom_scales_size_and_origin() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let mut renderer = renderer(&mut platform);
        let mut camera = Camera::new("main");
        camera.set_zoom(2.0);
        let mut viewport = Viewport::full("main");

        renderer.draw_begin(Some((&camera, &mut viewport)));
        renderer.sprite_draw_world(&ship(), vec2(10.0, 0.0));

        let draw = platform.texture_draws()[0];
        assert_eq!(draw.size, vec2(64.0, 64.0));
        assert_eq!(draw.origin, vec2(32.0, 32.0));
        assert_eq!(draw.position, vec2(388.0, 268.0));
    }

    #[test]
    fn test_screen_draw_ignores_camera() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let mut renderer = renderer(&mut platform);
        let mut camera = Camera::new("main");
        camera.set_position(vec2(5000.0, 5000.0));
        let mut viewport = Viewport::full("main");

        renderer.draw_begin(Some((&camera, &mut viewport)));
        renderer.sprite_draw_screen(&ship(), vec2(16.0, 16.0));

        assert_eq!(platform.texture_draws()[0].position, Vec2::zeros());
    }

    #[test]
    fn test_binding_is_by_name() {
        let mut platform = HeadlessPlatform::default();
        let mut renderer = renderer(&mut platform);
        assert!(renderer.binding().is_none());

        renderer.bind_view(ViewBinding::new("main", "main"));
        assert_eq!(renderer.binding(), Some(&ViewBinding::new("main", "main")));

        renderer.unbind_view();
        assert!(renderer.binding().is_none());
        assert!(renderer.frame_camera().is_none());
    }
}
