//! Built-in components

pub mod interpolation;
pub mod lifetime;
pub mod renderable;
pub mod transform;
pub mod velocity;

pub use interpolation::InterpolationComponent;
pub use lifetime::Lifetime;
pub use renderable::{RenderableComponent, Visual};
pub use transform::TransformComponent;
pub use velocity::VelocityComponent;
