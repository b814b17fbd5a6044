//! Built-in systems
//!
//! Physics and lifetime run at the fixed tick rate; rendering runs once per
//! frame.

pub mod lifetime;
pub mod physics;
pub mod rendering;

pub use lifetime::system_lifetime_update;
pub use physics::system_physics_update;
pub use rendering::system_renderer_update;
