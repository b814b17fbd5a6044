//! Entity-Component-System implementation
//!
//! A small generational ECS. Every scene owns one [`EntityWorld`].

pub mod component;
pub mod components;
pub mod entity;
pub mod systems;
pub mod world;

pub use component::{Component, ComponentStorage};
pub use components::{
    InterpolationComponent, Lifetime, RenderableComponent, TransformComponent, VelocityComponent,
    Visual,
};
pub use entity::Entity;
pub use world::EntityWorld;
