//! # Rendering System
//!
//! Collects visible renderables, sorts them by layer and submits them to the
//! renderer at their interpolated transforms. Runs once per frame.

use crate::assets::Resources;
use crate::ecs::components::{RenderableComponent, Visual};
use crate::ecs::{Entity, EntityWorld};
use crate::render::Renderer;

/// Draw every visible renderable that has a transform
///
/// Lower layers are drawn first. Renderables whose sprite or text is gone
/// from the cache are skipped.
pub fn system_renderer_update(
    world: &EntityWorld,
    renderer: &mut Renderer,
    resources: &Resources,
    fraction_to_next_tick: f32,
) {
    let components = &world.components;

    let mut queue: Vec<(Entity, &RenderableComponent)> = components
        .renderables
        .iter()
        .filter(|(entity, renderable)| {
            renderable.visible && components.transforms.contains_key(*entity)
        })
        .collect();
    queue.sort_by_key(|(_, renderable)| renderable.layer);

    for (entity, renderable) in queue {
        let position = world.get_interpolated_position(entity, fraction_to_next_tick);
        let rotation = world.get_interpolated_rotation(entity, fraction_to_next_tick);
        let scale = world.get_transform_scale(entity);

        match renderable.visual {
            Visual::Sprite(handle) => {
                if let Some(sprite) = resources.sprite(handle) {
                    renderer.sprite_draw_world_transformed(
                        sprite,
                        position,
                        sprite.rotation() + rotation,
                        sprite.scale().component_mul(&scale),
                    );
                }
            }
            Visual::Text(handle) => {
                if let Some(text) = resources.dynamic_text(handle) {
                    renderer.text_draw_world_transformed(
                        text,
                        position,
                        text.rotation() + rotation,
                        text.scale().component_mul(&scale),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::assets::Resources;
    use crate::config::{RendererConfig, WindowConfig};
    use crate::ecs::EntityWorld;
    use crate::foundation::math::vec2;
    use crate::platform::{HeadlessPlatform, Platform};
    use crate::render::{Camera, Renderer, Viewport};

    fn setup(platform: &mut HeadlessPlatform) -> (Renderer, Resources) {
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();
        let backend = platform.create_renderer(window.as_mut()).unwrap();
        (Renderer::new(backend, &RendererConfig::default()), Resources::new())
    }

    #[test]
    fn test_draws_in_layer_order_and_skips_hidden() {
        let mut platform = HeadlessPlatform::new(800, 600)
            .with_texture_size("front.png", 8.0, 8.0)
            .with_texture_size("back.png", 16.0, 16.0);
        let (mut renderer, mut resources) = setup(&mut platform);
        let front = resources.sprite_get_or_create(&mut renderer, "front", "front.png").unwrap();
        let back = resources.sprite_get_or_create(&mut renderer, "back", "back.png").unwrap();

        let mut world = EntityWorld::new();
        let on_top = world.sprite_create(front);
        world.set_renderable_layer(on_top, 5);
        world.sprite_create(back);
        let hidden = world.sprite_create(back);
        world.set_renderable_visible(hidden, false);

        renderer.draw_begin(None);
        world.system_renderer_update(&mut renderer, &resources, 0.0);
        renderer.draw_end();

        let sizes: Vec<_> = platform.texture_draws().iter().map(|draw| draw.size).collect();
        assert_eq!(sizes, vec![vec2(16.0, 16.0), vec2(8.0, 8.0)]);
        resources.clear(&mut renderer);
    }

    #[test]
    fn test_draws_interpolated_transform_through_camera() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let (mut renderer, mut resources) = setup(&mut platform);
        let sprite = resources.sprite_get_or_create(&mut renderer, "ship", "ship.png").unwrap();

        let mut world = EntityWorld::new();
        let ship = world.sprite_create_interpolated(sprite);
        world.set_velocity_linear(ship, vec2(100.0, 0.0));
        world.set_velocity_angular(ship, 40.0);
        world.system_physics_update(0.5);

        let camera = Camera::new("main");
        let mut viewport = Viewport::full("main");
        renderer.draw_begin(Some((&camera, &mut viewport)));
        world.system_renderer_update(&mut renderer, &resources, 0.5);

        let draw = platform.texture_draws()[0];
        assert_eq!(draw.position, vec2(425.0, 300.0));
        assert_eq!(draw.rotation, 10.0);
        resources.clear(&mut renderer);
    }

    #[test]
    fn test_placed_entity_drawn_in_place_before_first_tick() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let (mut renderer, mut resources) = setup(&mut platform);
        let sprite = resources.sprite_get_or_create(&mut renderer, "ship", "ship.png").unwrap();

        let mut world = EntityWorld::new();
        let ship = world.sprite_create_interpolated(sprite);
        world.set_transform_position(ship, vec2(100.0, 50.0));

        let camera = Camera::new("main");
        let mut viewport = Viewport::full("main");
        renderer.draw_begin(Some((&camera, &mut viewport)));
        world.system_renderer_update(&mut renderer, &resources, 0.0);

        assert_eq!(platform.texture_draws()[0].position, vec2(500.0, 350.0));
        resources.clear(&mut renderer);
    }

    #[test]
    fn test_offscreen_entities_are_culled() {
        let mut platform = HeadlessPlatform::new(800, 600);
        let (mut renderer, mut resources) = setup(&mut platform);
        let sprite = resources.sprite_get_or_create(&mut renderer, "rock", "rock.png").unwrap();

        let mut world = EntityWorld::new();
        let far = world.sprite_create(sprite);
        world.set_transform_position(far, vec2(5000.0, 0.0));
        world.sprite_create(sprite);

        let camera = Camera::new("main");
        let mut viewport = Viewport::full("main");
        renderer.draw_begin(Some((&camera, &mut viewport)));
        world.system_renderer_update(&mut renderer, &resources, 0.0);

        assert_eq!(platform.texture_draws().len(), 1);
        assert_eq!(renderer.stats().culled, 1);
        resources.clear(&mut renderer);
    }
}
