//! Lifetime expiry

use crate::ecs::{Entity, EntityWorld};

/// Age every entity with a lifetime and destroy the expired ones
pub fn system_lifetime_update(world: &mut EntityWorld, tick_interval: f32) {
    let mut expired: Vec<Entity> = Vec::new();

    for (entity, lifetime) in &mut world.components.lifetimes {
        lifetime.advance(tick_interval);
        if lifetime.is_expired() {
            expired.push(entity);
        }
    }

    for entity in expired {
        log::trace!("Entity {entity:?} expired");
        world.destroy(entity);
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::EntityWorld;

    #[test]
    fn test_expired_entities_are_destroyed() {
        let mut world = EntityWorld::new();
        let short = world.create();
        let long = world.create();
        let forever = world.create();
        world.set_lifetime(short, 0.25);
        world.set_lifetime(long, 1.0);
        world.set_lifetime(forever, 0.0);

        for _ in 0..8 {
            world.system_lifetime_update(1.0 / 32.0);
        }
        assert!(!world.is_valid(short));
        assert!(world.is_valid(long));

        for _ in 0..24 {
            world.system_lifetime_update(1.0 / 32.0);
        }
        assert!(!world.is_valid(long));
        assert!(world.is_valid(forever));
    }
}
