//! Component trait and storage
//!
//! Built-in components live in dedicated typed maps so the systems can
//! borrow several of them at once. Any other `'static` type becomes a
//! component by implementing [`Component`] with the default methods; its
//! storage is created on first insert.

use super::components::{
    InterpolationComponent, Lifetime, RenderableComponent, TransformComponent, VelocityComponent,
};
use super::Entity;
use slotmap::SecondaryMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Per-entity data attached to an [`EntityWorld`](super::EntityWorld)
pub trait Component: Sized + 'static {
    /// Storage of this component type, if any exists yet
    fn storage(components: &ComponentStorage) -> Option<&SecondaryMap<Entity, Self>> {
        components.extra::<Self>()
    }

    /// Storage of this component type, created on demand
    fn storage_mut(components: &mut ComponentStorage) -> &mut SecondaryMap<Entity, Self> {
        components.extra_mut::<Self>()
    }
}

trait ErasedStorage {
    fn remove_entity(&mut self, entity: Entity);
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedStorage for SecondaryMap<Entity, T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn clear(&mut self) {
        SecondaryMap::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Every component map of one world
#[derive(Default)]
pub struct ComponentStorage {
    pub(crate) transforms: SecondaryMap<Entity, TransformComponent>,
    pub(crate) velocities: SecondaryMap<Entity, VelocityComponent>,
    pub(crate) interpolations: SecondaryMap<Entity, InterpolationComponent>,
    pub(crate) renderables: SecondaryMap<Entity, RenderableComponent>,
    pub(crate) lifetimes: SecondaryMap<Entity, Lifetime>,
    extras: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl ComponentStorage {
    fn extra<T: 'static>(&self) -> Option<&SecondaryMap<Entity, T>> {
        self.extras
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    fn extra_mut<T: 'static>(&mut self) -> &mut SecondaryMap<Entity, T> {
        let storage = self
            .extras
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SecondaryMap::<Entity, T>::new()));

        match storage.as_any_mut().downcast_mut() {
            Some(map) => map,
            // Keys are the TypeId of the stored map's value type
            None => unreachable!("component storage registered under the wrong type"),
        }
    }

    /// Drop every component of an entity
    pub(crate) fn remove_entity(&mut self, entity: Entity) {
        self.transforms.remove(entity);
        self.velocities.remove(entity);
        self.interpolations.remove(entity);
        self.renderables.remove(entity);
        self.lifetimes.remove(entity);
        for storage in self.extras.values_mut() {
            storage.remove_entity(entity);
        }
    }

    /// Drop every component
    pub(crate) fn clear(&mut self) {
        self.transforms.clear();
        self.velocities.clear();
        self.interpolations.clear();
        self.renderables.clear();
        self.lifetimes.clear();
        for storage in self.extras.values_mut() {
            storage.clear();
        }
    }
}

impl std::fmt::Debug for ComponentStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStorage")
            .field("transforms", &self.transforms.len())
            .field("velocities", &self.velocities.len())
            .field("interpolations", &self.interpolations.len())
            .field("renderables", &self.renderables.len())
            .field("lifetimes", &self.lifetimes.len())
            .field("extra_types", &self.extras.len())
            .finish()
    }
}

macro_rules! builtin_component {
    ($component:ty, $field:ident) => {
        impl Component for $component {
            fn storage(components: &ComponentStorage) -> Option<&SecondaryMap<Entity, Self>> {
                Some(&components.$field)
            }

            fn storage_mut(components: &mut ComponentStorage) -> &mut SecondaryMap<Entity, Self> {
                &mut components.$field
            }
        }
    };
}

builtin_component!(TransformComponent, transforms);
builtin_component!(VelocityComponent, velocities);
builtin_component!(InterpolationComponent, interpolations);
builtin_component!(RenderableComponent, renderables);
builtin_component!(Lifetime, lifetimes);
