//! Entity world
//!
//! One [`EntityWorld`] per scene. Entities are generational slot map keys;
//! components are stored per type in secondary maps keyed by entity.
//!
//! The helper methods mirror what gameplay code needs most often: spawning
//! sprites and texts, moving things around and pushing them with impulses.
//! Helpers called on an entity missing the component they touch do nothing.

use super::component::{Component, ComponentStorage};
use super::components::{
    InterpolationComponent, Lifetime, RenderableComponent, TransformComponent, VelocityComponent,
};
use super::systems;
use super::Entity;
use crate::assets::{DynamicTextHandle, Resources, SpriteHandle};
use crate::foundation::math::{utils, Vec2};
use crate::render::Renderer;
use slotmap::SlotMap;

/// ECS world containing all entities and components of a scene
#[derive(Debug, Default)]
pub struct EntityWorld {
    entities: SlotMap<Entity, ()>,
    pub(crate) components: ComponentStorage,
}

impl EntityWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity without components
    pub fn create(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity and all its components
    ///
    /// Returns `false` if the entity was already gone.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }
        self.components.remove_entity(entity);
        true
    }

    /// Is the entity alive?
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Are there no entities?
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    // ---- Generic component access ----

    /// Attach a component, returning the one it replaced
    ///
    /// Inserting on a dead entity is ignored.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> Option<C> {
        if !self.is_valid(entity) {
            log::warn!("Tried to add a component to a destroyed entity {entity:?}");
            return None;
        }
        C::storage_mut(&mut self.components).insert(entity, component)
    }

    /// Component of an entity
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::storage(&self.components).and_then(|storage| storage.get(entity))
    }

    /// Mutable component of an entity
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        C::storage_mut(&mut self.components).get_mut(entity)
    }

    /// Detach a component
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        C::storage_mut(&mut self.components).remove(entity)
    }

    /// Does the entity have this component?
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.get::<C>(entity).is_some()
    }

    /// Iterate over every entity with a component
    pub fn iter<C: Component>(&self) -> impl Iterator<Item = (Entity, &C)> + '_ {
        C::storage(&self.components).into_iter().flat_map(|storage| storage.iter())
    }

    /// Iterate mutably over every entity with a component
    pub fn iter_mut<C: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut C)> + '_ {
        C::storage_mut(&mut self.components).iter_mut()
    }

    // ---- Systems ----

    /// Integrate velocities over one tick
    pub fn system_physics_update(&mut self, tick_interval: f32) {
        systems::system_physics_update(self, tick_interval);
    }

    /// Age entities with a [`Lifetime`] and destroy expired ones
    pub fn system_lifetime_update(&mut self, tick_interval: f32) {
        systems::system_lifetime_update(self, tick_interval);
    }

    /// Draw every visible renderable at its interpolated transform
    pub fn system_renderer_update(
        &self,
        renderer: &mut Renderer,
        resources: &Resources,
        fraction_to_next_tick: f32,
    ) {
        systems::system_renderer_update(self, renderer, resources, fraction_to_next_tick);
    }

    // ---- Spawning ----

    fn spawn_renderable(&mut self, renderable: RenderableComponent) -> Entity {
        let entity = self.create();
        self.insert(entity, TransformComponent::default());
        self.insert(entity, VelocityComponent::default());
        self.insert(entity, renderable);
        entity
    }

    /// Entity with a transform, a velocity and a sprite
    pub fn sprite_create(&mut self, sprite: SpriteHandle) -> Entity {
        self.spawn_renderable(RenderableComponent::sprite(sprite))
    }

    /// Like [`EntityWorld::sprite_create`], drawn interpolated between ticks
    pub fn sprite_create_interpolated(&mut self, sprite: SpriteHandle) -> Entity {
        let entity = self.sprite_create(sprite);
        self.insert(entity, InterpolationComponent::default());
        entity
    }

    /// Entity with a transform, a velocity and a dynamic text
    pub fn create_text_dynamic(&mut self, text: DynamicTextHandle) -> Entity {
        self.spawn_renderable(RenderableComponent::text(text))
    }

    /// Destroy the entity after `duration` simulated seconds
    pub fn set_lifetime(&mut self, entity: Entity, duration: f32) {
        self.insert(entity, Lifetime::new(duration));
    }

    // ---- Transform ----

    /// Move an entity. Interpolated entities blend from their old position.
    pub fn set_transform_position(&mut self, entity: Entity, position: Vec2) {
        if let Some(transform) = self.get_mut::<TransformComponent>(entity) {
            transform.position = position;
        }
    }

    /// Move an entity without blending from its old position
    pub fn teleport(&mut self, entity: Entity, position: Vec2) {
        self.set_transform_position(entity, position);
        if let Some(transform) = self.get::<TransformComponent>(entity).copied() {
            if let Some(interpolation) = self.get_mut::<InterpolationComponent>(entity) {
                interpolation.capture(&transform);
            }
        }
    }

    /// Position of an entity, zero if it has no transform
    pub fn get_transform_position(&self, entity: Entity) -> Vec2 {
        self.get::<TransformComponent>(entity)
            .map_or_else(Vec2::zeros, |transform| transform.position)
    }

    /// Set the rotation in degrees
    pub fn set_transform_rotation(&mut self, entity: Entity, degrees: f32) {
        if let Some(transform) = self.get_mut::<TransformComponent>(entity) {
            transform.rotation = degrees;
        }
    }

    /// Rotation in degrees, zero if the entity has no transform
    pub fn get_transform_rotation(&self, entity: Entity) -> f32 {
        self.get::<TransformComponent>(entity)
            .map_or(0.0, |transform| transform.rotation)
    }

    /// Set the scale factors
    pub fn set_transform_scale(&mut self, entity: Entity, scale: Vec2) {
        if let Some(transform) = self.get_mut::<TransformComponent>(entity) {
            transform.scale = scale;
        }
    }

    /// Scale factors, one if the entity has no transform
    pub fn get_transform_scale(&self, entity: Entity) -> Vec2 {
        self.get::<TransformComponent>(entity)
            .map_or_else(|| Vec2::new(1.0, 1.0), |transform| transform.scale)
    }

    /// Position blended between the previous and current tick
    ///
    /// Entities without interpolation report their current position.
    pub fn get_interpolated_position(&self, entity: Entity, fraction_to_next_tick: f32) -> Vec2 {
        let Some(transform) = self.get::<TransformComponent>(entity) else {
            return Vec2::zeros();
        };
        self.get::<InterpolationComponent>(entity)
            .map_or(transform.position, |interpolation| {
                interpolation.position(transform, fraction_to_next_tick)
            })
    }

    /// Rotation blended between the previous and current tick
    pub fn get_interpolated_rotation(&self, entity: Entity, fraction_to_next_tick: f32) -> f32 {
        let Some(transform) = self.get::<TransformComponent>(entity) else {
            return 0.0;
        };
        self.get::<InterpolationComponent>(entity)
            .map_or(transform.rotation, |interpolation| {
                interpolation.rotation(transform, fraction_to_next_tick)
            })
    }

    /// Unit vector the entity faces; `(0, 1)` at zero rotation
    pub fn get_vector_forward(&self, entity: Entity) -> Vec2 {
        utils::forward_from_degrees(self.get_transform_rotation(entity))
    }

    /// Unit vector to the entity's right; `(1, 0)` at zero rotation
    pub fn get_vector_right(&self, entity: Entity) -> Vec2 {
        utils::right_from_degrees(self.get_transform_rotation(entity))
    }

    // ---- Velocity ----

    fn with_velocity(&mut self, entity: Entity, apply: impl FnOnce(&mut VelocityComponent)) {
        if let Some(velocity) = self.get_mut::<VelocityComponent>(entity) {
            apply(velocity);
        }
    }

    /// Push along the facing direction
    pub fn add_impulse_forward(&mut self, entity: Entity, magnitude: f32) {
        let impulse = self.get_vector_forward(entity) * magnitude;
        self.add_impulse_velocity_linear(entity, impulse);
    }

    /// Push against the facing direction
    pub fn add_impulse_backward(&mut self, entity: Entity, magnitude: f32) {
        self.add_impulse_forward(entity, -magnitude);
    }

    /// Push toward the entity's right
    pub fn add_impulse_right(&mut self, entity: Entity, magnitude: f32) {
        let impulse = self.get_vector_right(entity) * magnitude;
        self.add_impulse_velocity_linear(entity, impulse);
    }

    /// Push toward the entity's left
    pub fn add_impulse_left(&mut self, entity: Entity, magnitude: f32) {
        self.add_impulse_right(entity, -magnitude);
    }

    /// Push along a world direction given in degrees
    pub fn add_impulse_direction(&mut self, entity: Entity, angle_degrees: f32, magnitude: f32) {
        let impulse = utils::forward_from_degrees(angle_degrees) * magnitude;
        self.add_impulse_velocity_linear(entity, impulse);
    }

    /// Push along a direction expressed in the entity's frame
    ///
    /// `x` is toward the right, `y` toward the front. The direction is
    /// normalized; a zero direction does nothing.
    pub fn add_impulse_relative(&mut self, entity: Entity, relative_direction: Vec2, magnitude: f32) {
        let direction = utils::normalize_or_zero(relative_direction);
        let impulse = (self.get_vector_right(entity) * direction.x
            + self.get_vector_forward(entity) * direction.y)
            * magnitude;
        self.add_impulse_velocity_linear(entity, impulse);
    }

    /// Replace the linear velocity
    pub fn set_velocity_linear(&mut self, entity: Entity, velocity: Vec2) {
        self.with_velocity(entity, |v| v.linear = velocity);
    }

    /// Add to the linear velocity
    pub fn add_impulse_velocity_linear(&mut self, entity: Entity, impulse: Vec2) {
        self.with_velocity(entity, |v| v.linear += impulse);
    }

    /// Fraction of linear velocity lost per second
    pub fn set_velocity_linear_drag(&mut self, entity: Entity, drag: f32) {
        self.with_velocity(entity, |v| v.linear_drag = drag.max(0.0));
    }

    /// Maximum linear speed (0 = no limit)
    pub fn set_velocity_linear_max(&mut self, entity: Entity, max_speed: f32) {
        self.with_velocity(entity, |v| v.linear_max = max_speed.max(0.0));
    }

    /// Replace the angular velocity, in degrees per second
    pub fn set_velocity_angular(&mut self, entity: Entity, velocity: f32) {
        self.with_velocity(entity, |v| v.angular = velocity);
    }

    /// Add to the angular velocity
    pub fn add_impulse_velocity_angular(&mut self, entity: Entity, impulse: f32) {
        self.with_velocity(entity, |v| v.angular += impulse);
    }

    /// Fraction of angular velocity lost per second
    pub fn set_velocity_angular_drag(&mut self, entity: Entity, drag: f32) {
        self.with_velocity(entity, |v| v.angular_drag = drag.max(0.0));
    }

    /// Maximum angular speed (0 = no limit)
    pub fn set_velocity_angular_max(&mut self, entity: Entity, max_speed: f32) {
        self.with_velocity(entity, |v| v.angular_max = max_speed.max(0.0));
    }

    // ---- Renderable ----

    /// Show or hide an entity
    pub fn set_renderable_visible(&mut self, entity: Entity, visible: bool) {
        if let Some(renderable) = self.get_mut::<RenderableComponent>(entity) {
            renderable.visible = visible;
        }
    }

    /// Move an entity to a draw layer
    pub fn set_renderable_layer(&mut self, entity: Entity, layer: i32) {
        if let Some(renderable) = self.get_mut::<RenderableComponent>(entity) {
            renderable.layer = layer;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;
    use approx::assert_relative_eq;

    #[derive(Debug, PartialEq)]
    struct Health(i32);

    impl Component for Health {}

    fn sprite_handle() -> SpriteHandle {
        let mut handles = SlotMap::<SpriteHandle, ()>::with_key();
        handles.insert(())
    }

    #[test]
    fn test_create_and_destroy() {
        let mut world = EntityWorld::new();
        let entity = world.create();
        world.insert(entity, TransformComponent::default());
        world.insert(entity, Health(3));
        assert_eq!(world.len(), 1);
        assert!(world.has::<Health>(entity));

        assert!(world.destroy(entity));
        assert!(!world.destroy(entity));
        assert!(!world.is_valid(entity));
        assert!(world.get::<Health>(entity).is_none());
        assert!(world.get::<TransformComponent>(entity).is_none());
    }

    #[test]
    fn test_stale_ids_do_not_alias() {
        let mut world = EntityWorld::new();
        let old = world.create();
        world.destroy(old);
        let new = world.create();
        world.insert(new, Health(10));

        assert_ne!(old, new);
        assert!(world.get::<Health>(old).is_none());
        assert!(world.insert(old, Health(1)).is_none());
        assert_eq!(world.get::<Health>(new), Some(&Health(10)));
    }

    #[test]
    fn test_custom_component_iteration() {
        let mut world = EntityWorld::new();
        assert_eq!(world.iter::<Health>().count(), 0);

        for hp in 0..3 {
            let entity = world.create();
            world.insert(entity, Health(hp));
        }
        for (_, health) in world.iter_mut::<Health>() {
            health.0 += 10;
        }
        let total: i32 = world.iter::<Health>().map(|(_, health)| health.0).sum();
        assert_eq!(total, 33);

        world.clear();
        assert!(world.is_empty());
        assert_eq!(world.iter::<Health>().count(), 0);
    }

    #[test]
    fn test_sprite_spawn_helpers() {
        let mut world = EntityWorld::new();
        let plain = world.sprite_create(sprite_handle());
        let smooth = world.sprite_create_interpolated(sprite_handle());

        assert!(world.has::<TransformComponent>(plain));
        assert!(world.has::<VelocityComponent>(plain));
        assert!(world.has::<RenderableComponent>(plain));
        assert!(!world.has::<InterpolationComponent>(plain));
        assert!(world.has::<InterpolationComponent>(smooth));
    }

    #[test]
    fn test_direction_vectors() {
        let mut world = EntityWorld::new();
        let entity = world.sprite_create(sprite_handle());
        assert_relative_eq!(world.get_vector_forward(entity), vec2(0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(world.get_vector_right(entity), vec2(1.0, 0.0), epsilon = 1e-6);

        world.set_transform_rotation(entity, 90.0);
        assert_relative_eq!(world.get_vector_forward(entity), vec2(-1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_impulses() {
        let mut world = EntityWorld::new();
        let entity = world.sprite_create(sprite_handle());

        world.add_impulse_forward(entity, 10.0);
        world.add_impulse_right(entity, 5.0);
        world.add_impulse_left(entity, 2.0);
        let velocity = world.get::<VelocityComponent>(entity).unwrap().linear;
        assert_relative_eq!(velocity, vec2(3.0, 10.0), epsilon = 1e-5);

        world.set_velocity_linear(entity, Vec2::zeros());
        world.add_impulse_relative(entity, vec2(3.0, 4.0), 10.0);
        let velocity = world.get::<VelocityComponent>(entity).unwrap().linear;
        assert_relative_eq!(velocity, vec2(6.0, 8.0), epsilon = 1e-5);

        world.set_velocity_linear(entity, Vec2::zeros());
        world.add_impulse_backward(entity, 1.0);
        world.add_impulse_direction(entity, 90.0, 2.0);
        let velocity = world.get::<VelocityComponent>(entity).unwrap().linear;
        assert_relative_eq!(velocity, vec2(-2.0, -1.0), epsilon = 1e-5);

        world.set_velocity_angular(entity, 45.0);
        world.add_impulse_velocity_angular(entity, 5.0);
        assert_eq!(world.get::<VelocityComponent>(entity).unwrap().angular, 50.0);
    }

    #[test]
    fn test_helpers_on_missing_components_do_nothing() {
        let mut world = EntityWorld::new();
        let bare = world.create();
        world.add_impulse_forward(bare, 10.0);
        world.set_transform_position(bare, vec2(1.0, 1.0));
        world.set_renderable_visible(bare, false);

        assert_eq!(world.get_transform_position(bare), Vec2::zeros());
        assert_eq!(world.get_transform_scale(bare), vec2(1.0, 1.0));
        assert!(!world.has::<VelocityComponent>(bare));
    }

    #[test]
    fn test_interpolated_position() {
        let mut world = EntityWorld::new();
        let entity = world.sprite_create_interpolated(sprite_handle());
        world.teleport(entity, vec2(0.0, 0.0));
        world.set_transform_position(entity, vec2(10.0, 20.0));

        assert_eq!(world.get_interpolated_position(entity, 0.0), Vec2::zeros());
        assert_eq!(world.get_interpolated_position(entity, 0.5), vec2(5.0, 10.0));
        assert_eq!(world.get_interpolated_position(entity, 1.0), vec2(10.0, 20.0));

        world.teleport(entity, vec2(-4.0, 0.0));
        assert_eq!(world.get_interpolated_position(entity, 0.25), vec2(-4.0, 0.0));
    }

    #[test]
    fn test_renderable_setters() {
        let mut world = EntityWorld::new();
        let entity = world.sprite_create(sprite_handle());
        world.set_renderable_visible(entity, false);
        world.set_renderable_layer(entity, 4);

        let renderable = world.get::<RenderableComponent>(entity).unwrap();
        assert!(!renderable.visible);
        assert_eq!(renderable.layer, 4);
    }
}
