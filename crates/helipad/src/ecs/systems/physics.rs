//! Physics integration
//!
//! Explicit Euler over one fixed tick. Interpolated entities first remember
//! their transform so frames drawn before the next tick can blend from it.

use crate::ecs::EntityWorld;

/// Integrate every entity with a transform and a velocity over `tick_interval`
pub fn system_physics_update(world: &mut EntityWorld, tick_interval: f32) {
    let components = &mut world.components;

    for (entity, interpolation) in &mut components.interpolations {
        if let Some(transform) = components.transforms.get(entity) {
            interpolation.capture(transform);
        }
    }

    for (entity, velocity) in &mut components.velocities {
        let Some(transform) = components.transforms.get_mut(entity) else {
            continue;
        };

        velocity.damp(tick_interval);
        transform.position += velocity.linear * tick_interval;
        transform.rotation += velocity.angular * tick_interval;
    }
}
