//! Scenes
//!
//! A scene bundles an entity world, a resource cache and named cameras and
//! viewports. There is always a camera and a viewport called
//! [`MAIN_CAMERA`]/[`MAIN_VIEWPORT`]; the full-window main viewport is what
//! the renderer binds to when the scene is activated.

use crate::assets::Resources;
use crate::ecs::EntityWorld;
use crate::foundation::math::Vec2;
use crate::render::{Camera, Renderer, ViewBinding, Viewport};
use std::collections::HashMap;

/// Name of the camera every scene starts with
pub const MAIN_CAMERA: &str = "main";

/// Name of the viewport every scene starts with
pub const MAIN_VIEWPORT: &str = "main";

/// A self-contained game state
#[derive(Debug)]
pub struct Scene {
    name: String,

    /// Entities of this scene
    pub entities: EntityWorld,

    /// Assets of this scene
    pub resources: Resources,

    cameras: HashMap<String, Camera>,
    viewports: HashMap<String, Viewport>,
}

impl Scene {
    /// Empty scene with its main camera and viewport
    pub fn new(name: impl Into<String>) -> Self {
        let mut cameras = HashMap::new();
        cameras.insert(MAIN_CAMERA.to_string(), Camera::new(MAIN_CAMERA));

        let mut viewports = HashMap::new();
        viewports.insert(MAIN_VIEWPORT.to_string(), Viewport::full(MAIN_VIEWPORT));

        Self {
            name: name.into(),
            entities: EntityWorld::new(),
            resources: Resources::new(),
            cameras,
            viewports,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    // ---- Cameras ----

    /// Camera by name
    pub fn camera(&self, name: &str) -> Option<&Camera> {
        self.cameras.get(name)
    }

    /// Mutable camera by name
    pub fn camera_mut(&mut self, name: &str) -> Option<&mut Camera> {
        self.cameras.get_mut(name)
    }

    /// The main camera
    pub fn main_camera(&self) -> &Camera {
        &self.cameras[MAIN_CAMERA]
    }

    /// The main camera, mutably
    pub fn main_camera_mut(&mut self) -> &mut Camera {
        self.camera_get_or_create(MAIN_CAMERA)
    }

    /// Camera by name, created at the origin if missing
    pub fn camera_get_or_create(&mut self, name: &str) -> &mut Camera {
        self.cameras
            .entry(name.to_string())
            .or_insert_with(|| Camera::new(name))
    }

    /// Remove a camera. The main camera cannot be removed.
    pub fn camera_remove(&mut self, name: &str) -> bool {
        if name == MAIN_CAMERA {
            log::warn!("Scene '{}': the main camera cannot be removed", self.name);
            return false;
        }
        self.cameras.remove(name).is_some()
    }

    /// Names of every camera
    pub fn camera_names(&self) -> impl Iterator<Item = &str> {
        self.cameras.keys().map(String::as_str)
    }

    // ---- Viewports ----

    /// Viewport by name
    pub fn viewport(&self, name: &str) -> Option<&Viewport> {
        self.viewports.get(name)
    }

    /// Mutable viewport by name
    pub fn viewport_mut(&mut self, name: &str) -> Option<&mut Viewport> {
        self.viewports.get_mut(name)
    }

    /// The main viewport
    pub fn main_viewport(&self) -> &Viewport {
        &self.viewports[MAIN_VIEWPORT]
    }

    /// Viewport by name, created with the given normalized rect if missing
    pub fn viewport_get_or_create(&mut self, name: &str, position: Vec2, size: Vec2) -> &mut Viewport {
        self.viewports
            .entry(name.to_string())
            .or_insert_with(|| Viewport::new(name, position, size))
    }

    /// Remove a viewport. The main viewport cannot be removed.
    pub fn viewport_remove(&mut self, name: &str) -> bool {
        if name == MAIN_VIEWPORT {
            log::warn!("Scene '{}': the main viewport cannot be removed", self.name);
            return false;
        }
        self.viewports.remove(name).is_some()
    }

    /// Names of every viewport
    pub fn viewport_names(&self) -> impl Iterator<Item = &str> {
        self.viewports.keys().map(String::as_str)
    }

    /// Camera and viewport named by a binding
    pub fn view_mut(&mut self, binding: &ViewBinding) -> Option<(&Camera, &mut Viewport)> {
        let camera = self.cameras.get(&binding.camera)?;
        let viewport = self.viewports.get_mut(&binding.viewport)?;
        Some((camera, viewport))
    }

    /// Clamp a camera to its bounds as seen through a viewport
    pub fn clamp_camera(&mut self, camera: &str, viewport: &str) {
        if let (Some(camera), Some(viewport)) =
            (self.cameras.get_mut(camera), self.viewports.get(viewport))
        {
            viewport.clamp_camera_to_bounds(camera);
        }
    }

    /// Project a screen position into the world through the main view
    pub fn screen_to_world(&self, screen_position: Vec2) -> Vec2 {
        self.main_viewport()
            .screen_to_world(self.main_camera(), screen_position)
    }

    /// Draw the scene's entities
    pub fn render(&self, renderer: &mut Renderer, fraction_to_next_tick: f32) {
        self.entities
            .system_renderer_update(renderer, &self.resources, fraction_to_next_tick);
    }
}
