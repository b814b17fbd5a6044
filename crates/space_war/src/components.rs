//! Game-specific components

use helipad::prelude::*;

/// Marks the ship controlled by the player
#[derive(Debug, Clone, Default)]
pub struct Player {
    /// Distance flown since the start
    pub distance_flown: f32,
}

impl Component for Player {}

/// A drifting, spinning rock
#[derive(Debug, Clone)]
pub struct Asteroid {
    /// Collision radius in world units
    pub radius: f32,

    /// Times the player moved it with a click
    pub times_moved: u32,
}

impl Component for Asteroid {}

impl Asteroid {
    /// Asteroid with a collision radius
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            times_moved: 0,
        }
    }
}
