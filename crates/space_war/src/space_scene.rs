//! The main playfield: a ship, an asteroid field and a follow camera

use crate::components::{Asteroid, Player};
use crate::config::GameplayConfig;
use helipad::foundation::math::utils::right_from_degrees;
use helipad::prelude::*;
use helipad::render::CameraBounds;
use helipad::scene::MAIN_VIEWPORT;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FONT_PATH: &str = "assets/helipad/fonts/roboto_regular.ttf";

/// Texture of the player ship
pub const PLAYER_TEXTURE: &str = "assets/space_war/player/default.png";
const ASTEROID_TEXTURE: &str = "assets/space_war/asteroids/ice_1.png";
const BULLET_TEXTURE: &str = "assets/space_war/bullets/plasma.png";

const PLAYER_START: (f32, f32) = (200.0, 200.0);
const LABEL_OFFSET: f32 = 30.0;
const BULLET_SPEED: f32 = 700.0;
const BULLET_LIFETIME: f32 = 1.5;
const WORLD_HALF_SIZE: f32 = 2000.0;

/// Scene handler of the playfield
#[derive(Debug)]
pub struct SpaceScene {
    gameplay: GameplayConfig,
    player: Entity,
    player_label: Entity,
    asteroid: Entity,
    camera_mode_text: Option<StaticTextHandle>,
    bullet_sprite: Option<SpriteHandle>,
    is_free_camera: bool,
}

impl SpaceScene {
    /// Scene tuned by the gameplay settings
    pub fn new(gameplay: GameplayConfig) -> Self {
        Self {
            gameplay,
            player: Entity::default(),
            player_label: Entity::default(),
            asteroid: Entity::default(),
            camera_mode_text: None,
            bullet_sprite: None,
            is_free_camera: false,
        }
    }

    fn camera_mode_label(&self) -> &'static str {
        if self.is_free_camera {
            "Camera Mode: Free"
        } else {
            "Camera Mode: Follow"
        }
    }

    fn spawn_player(&mut self, scene: &mut Scene, renderer: &mut Renderer) -> Result<(), AppError> {
        let sprite = scene
            .resources
            .sprite_get_or_create(renderer, "player_sprite", PLAYER_TEXTURE)?;
        if let Some(sprite) = scene.resources.sprite_mut(sprite) {
            sprite.set_origin(vec2(16.0, 24.0));
        }

        let entities = &mut scene.entities;
        self.player = entities.sprite_create_interpolated(sprite);
        entities.set_transform_position(self.player, vec2(PLAYER_START.0, PLAYER_START.1));
        entities.set_velocity_linear_drag(self.player, 0.3);
        entities.set_velocity_linear_max(self.player, self.gameplay.ship_max_speed);
        entities.set_velocity_angular_drag(self.player, 0.3);
        entities.set_velocity_angular_max(self.player, 360.0);
        entities.set_renderable_layer(self.player, 1);
        entities.insert(self.player, Player::default());

        // Label that follows the ship and scales with the camera zoom
        let label = scene.resources.text_dynamic_get_or_create(
            renderer,
            "player_label",
            FONT_PATH,
            64.0,
            "player",
        )?;
        if let Some(text) = scene.resources.dynamic_text_mut(label) {
            text.set_origin_centered();
        }

        self.player_label = scene.entities.create_text_dynamic(label);
        scene.entities.set_transform_position(
            self.player_label,
            vec2(PLAYER_START.0, PLAYER_START.1 + LABEL_OFFSET),
        );
        scene.entities.set_transform_scale(self.player_label, vec2(0.25, 0.25));
        scene.entities.set_renderable_layer(self.player_label, 2);
        Ok(())
    }

    fn spawn_asteroids(&mut self, scene: &mut Scene, renderer: &mut Renderer) -> Result<(), AppError> {
        let sprite = scene
            .resources
            .sprite_get_or_create(renderer, "asteroid_sprite", ASTEROID_TEXTURE)?;
        if let Some(sprite) = scene.resources.sprite_mut(sprite) {
            sprite.set_size(vec2(64.0, 64.0));
            sprite.set_origin(sprite.size() * 0.5);
        }

        let mut rng = match self.gameplay.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // The first one sits next to the ship and can be moved with a click
        self.asteroid = scene.entities.sprite_create_interpolated(sprite);
        scene.entities.set_transform_position(self.asteroid, vec2(400.0, 200.0));
        scene.entities.set_velocity_angular(self.asteroid, 90.0);
        scene.entities.insert(self.asteroid, Asteroid::new(32.0));

        let radius = self.gameplay.asteroid_field_radius.max(1.0);
        for _ in 1..self.gameplay.asteroid_count {
            let angle: f32 = rng.gen_range(0.0..360.0);
            let distance: f32 = rng.gen_range(radius * 0.25..radius);
            let position = vec2(PLAYER_START.0, PLAYER_START.1)
                + right_from_degrees(angle) * distance;

            let asteroid = scene.entities.sprite_create_interpolated(sprite);
            scene.entities.set_transform_position(asteroid, position);
            scene
                .entities
                .set_velocity_angular(asteroid, rng.gen_range(-120.0..120.0));
            scene
                .entities
                .set_velocity_linear(asteroid, vec2(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)));
            scene.entities.insert(asteroid, Asteroid::new(32.0));
        }

        log::info!("Spawned {} asteroids", self.gameplay.asteroid_count.max(1));
        Ok(())
    }

    fn fire(&mut self, scene: &mut Scene) {
        let Some(sprite) = self.bullet_sprite else {
            return;
        };

        let entities = &mut scene.entities;
        let bullet = entities.sprite_create_interpolated(sprite);
        let position = entities.get_transform_position(self.player);
        let rotation = entities.get_transform_rotation(self.player);
        let ship_velocity = entities
            .get::<VelocityComponent>(self.player)
            .map_or_else(Vec2::zeros, |velocity| velocity.linear);

        // Ship forward is +Y; the nose points up the screen
        entities.teleport(bullet, position);
        entities.set_transform_rotation(bullet, rotation);
        entities.set_velocity_linear(bullet, ship_velocity);
        entities.add_impulse_backward(bullet, BULLET_SPEED);
        entities.set_lifetime(bullet, BULLET_LIFETIME);
        log::debug!("Fired bullet {bullet:?}");
    }
}

impl SceneHandler for SpaceScene {
    fn on_load(&mut self, scene: &mut Scene, ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        self.spawn_player(scene, ctx.renderer())?;
        self.spawn_asteroids(scene, ctx.renderer())?;

        let bullet = scene
            .resources
            .sprite_get_or_create(ctx.renderer(), "bullet_sprite", BULLET_TEXTURE)?;
        if let Some(sprite) = scene.resources.sprite_mut(bullet) {
            sprite.set_origin_centered();
        }
        self.bullet_sprite = Some(bullet);

        // Regular UI text
        let handle = scene.resources.text_static_get_or_create(
            ctx.renderer(),
            "camera_mode_text",
            FONT_PATH,
            18.0,
            self.camera_mode_label(),
        )?;
        self.camera_mode_text = Some(handle);

        scene.main_camera_mut().set_bounds(CameraBounds::new(
            vec2(-WORLD_HALF_SIZE, -WORLD_HALF_SIZE),
            vec2(WORLD_HALF_SIZE, WORLD_HALF_SIZE),
        ));
        Ok(())
    }

    fn on_unload(&mut self, scene: &mut Scene, _ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        let distance = scene
            .entities
            .get::<Player>(self.player)
            .map_or(0.0, |player| player.distance_flown);
        let moved: u32 = scene
            .entities
            .iter::<Asteroid>()
            .map(|(_, asteroid)| asteroid.times_moved)
            .sum();
        log::info!("Flew {distance:.0} units, moved asteroids {moved} times");
        Ok(())
    }

    fn on_input(&mut self, scene: &mut Scene, ctx: &mut SceneContext<'_>) -> Result<(), AppError> {
        let input = ctx.input();
        let quit = input.is_pressed(KeyCode::Escape);
        let toggle_camera = input.is_pressed(KeyCode::C);
        let zoom_out = input.is_pressed(KeyCode::O);
        let zoom_in = input.is_pressed(KeyCode::P);
        let fire = input.is_pressed(KeyCode::Space);

        if quit {
            ctx.stop_running();
        }
        if toggle_camera {
            self.is_free_camera = !self.is_free_camera;
            log::info!("{}", self.camera_mode_label());
        }
        if zoom_out {
            scene.main_camera_mut().zoom_additive(-0.2);
        }
        if zoom_in {
            scene.main_camera_mut().zoom_additive(0.2);
        }
        if fire {
            self.fire(scene);
        }
        Ok(())
    }

    fn on_tick(
        &mut self,
        scene: &mut Scene,
        _ctx: &mut SceneContext<'_>,
        tick_interval: f32,
    ) -> Result<(), AppError> {
        let entities = &mut scene.entities;
        entities.system_lifetime_update(tick_interval);
        entities.system_physics_update(tick_interval);

        let speed = entities
            .get::<VelocityComponent>(self.player)
            .map_or(0.0, |velocity| velocity.linear.norm());
        if let Some(player) = entities.get_mut::<Player>(self.player) {
            player.distance_flown += speed * tick_interval;
        }
        Ok(())
    }

    fn on_frame(
        &mut self,
        scene: &mut Scene,
        ctx: &mut SceneContext<'_>,
        frame_interval: f32,
    ) -> Result<(), AppError> {
        let input = ctx.input();
        let fraction = ctx.fraction_to_next_tick();
        let acceleration = self.gameplay.ship_acceleration;

        let movement = input.movement_wasd();
        if movement.x != 0.0 {
            scene
                .entities
                .add_impulse_right(self.player, movement.x * acceleration * frame_interval);
        }
        if movement.y != 0.0 {
            scene
                .entities
                .add_impulse_forward(self.player, movement.y * acceleration * frame_interval);
        }

        let player_position = scene.entities.get_interpolated_position(self.player, fraction);
        if self.is_free_camera {
            let pan = input.movement_arrows() * self.gameplay.free_camera_speed * frame_interval;
            scene.main_camera_mut().move_position(pan);
        } else {
            scene.main_camera_mut().follow_target(player_position);
        }
        scene.clamp_camera(MAIN_CAMERA, MAIN_VIEWPORT);

        if input.is_pressed(MouseButton::Left) {
            // Move the asteroid to where we clicked
            let target = scene.screen_to_world(input.mouse_position());
            scene.entities.teleport(self.asteroid, target);
            if let Some(asteroid) = scene.entities.get_mut::<Asteroid>(self.asteroid) {
                asteroid.times_moved += 1;
            }
        }

        scene
            .entities
            .set_transform_position(self.player_label, player_position + vec2(0.0, LABEL_OFFSET));
        Ok(())
    }

    fn on_draw(
        &mut self,
        scene: &mut Scene,
        ctx: &mut SceneContext<'_>,
        fraction_to_next_tick: f32,
    ) -> Result<(), AppError> {
        // Camera mode indicator as a UI overlay
        if let Some(handle) = self.camera_mode_text {
            let label = self.camera_mode_label();
            if let Some(text) = scene.resources.static_text_mut(handle) {
                if text.content() != label {
                    text.set_text(ctx.renderer(), label)?;
                }
                text.set_origin_centered();
            }
            if let Some(text) = scene.resources.static_text(handle) {
                let output_size = ctx.renderer().output_size();
                ctx.renderer()
                    .static_text_draw_screen(text, vec2(output_size.x * 0.5, 20.0));
            }
        }

        scene.render(ctx.renderer(), fraction_to_next_tick);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helipad::foundation::time::ManualCounter;

    fn gameplay() -> GameplayConfig {
        GameplayConfig {
            asteroid_count: 5,
            seed: Some(42),
            ..GameplayConfig::default()
        }
    }

    fn engine_on(platform: &mut HeadlessPlatform) -> Engine {
        let mut engine = Engine::with_counter(
            EngineConfig::with_window("Space Warfare", 800, 600),
            platform,
            (),
            Box::new(ManualCounter::stepping(1.0 / 60.0)),
        )
        .unwrap();
        engine.load_scene("main_scene", SpaceScene::new(gameplay())).unwrap();
        engine.activate_scene("main_scene").unwrap();
        engine
    }

    fn player_position(engine: &Engine) -> Vec2 {
        let scene = engine.scenes().active_scene().unwrap();
        let (player, _) = scene.entities.iter::<Player>().next().unwrap();
        scene.entities.get_transform_position(player)
    }

    #[test]
    fn test_load_populates_scene() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let engine = engine_on(&mut platform);
        let scene = engine.scenes().active_scene().unwrap();

        assert_eq!(scene.entities.iter::<Asteroid>().count(), 5);
        assert_eq!(scene.entities.iter::<Player>().count(), 1);
        // Player, label and asteroids
        assert_eq!(scene.entities.len(), 7);
        assert_eq!(scene.resources.sprite_count(), 3);
    }

    #[test]
    fn test_thrust_moves_ship_up_the_screen() {
        let mut platform = HeadlessPlatform::new(800, 600);
        platform.script().push_frame(vec![PlatformEvent::Key {
            key: KeyCode::W,
            pressed: true,
        }]);
        let mut engine = engine_on(&mut platform);

        for _ in 0..30 {
            engine.run_frame().unwrap();
        }

        let position = player_position(&engine);
        assert!(position.y < PLAYER_START.1, "ship at {position:?}");
    }

    #[test]
    fn test_escape_stops_the_game() {
        let mut platform = HeadlessPlatform::new(800, 600);
        platform.script().push_idle_frames(4);
        platform.script().push_frame(vec![PlatformEvent::Key {
            key: KeyCode::Escape,
            pressed: true,
        }]);
        let mut engine = engine_on(&mut platform);

        engine.start_running().unwrap();
        assert_eq!(engine.frame_count(), 5);
        assert!(platform.text_draws().len() >= 5);
    }

    #[test]
    fn test_bullets_expire() {
        let mut platform = HeadlessPlatform::new(800, 600);
        platform.script().push_frame(vec![PlatformEvent::Key {
            key: KeyCode::Space,
            pressed: true,
        }]);
        let mut engine = engine_on(&mut platform);

        engine.run_frame().unwrap();
        assert_eq!(engine.scenes().active_scene().unwrap().entities.len(), 8);

        // 1.5 s at 60 frames per second
        for _ in 0..100 {
            engine.run_frame().unwrap();
        }
        assert_eq!(engine.scenes().active_scene().unwrap().entities.len(), 7);
    }
}
