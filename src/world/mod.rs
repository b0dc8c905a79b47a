//! Defines the [`World`], the center of an ECS.

use atomic_refcell::{AtomicRef, AtomicRefMut};
use thiserror::Error;

use crate::bundle::Bundle;
use crate::collection::{ComponentNotFound, DuplicateComponent};
use crate::component::Component;
use crate::entity::{EntityId, EntityRef, IdOverflow};
use crate::registry::{CollectionRegistry, RegistryError, UnregisteredType};
use crate::view::{ComponentSet, View};


/// A [`CollectionRegistry`] plus an entity id counter.
///
/// Entity ids start at `1` and are issued monotonically; a world never
/// reuses an id within its lifetime. All component storage lives in the
/// world's registry, so everything else here is thin delegation.
#[derive(Debug, Default)]
pub struct World {
    registry: CollectionRegistry,
    last_entity: EntityId,
}

/// An error when operating on a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A component type had no registered collection.
    #[error(transparent)]
    Unregistered(#[from] UnregisteredType),
    /// An entity already held a component being added.
    #[error(transparent)]
    Duplicate(#[from] DuplicateComponent),
    /// An entity was missing a required component.
    #[error(transparent)]
    NotFound(#[from] ComponentNotFound),
    /// The entity id counter is exhausted.
    #[error(transparent)]
    IdOverflow(#[from] IdOverflow),
}

impl World {
    /// Creates a new empty world.
    pub fn new() -> Self {
        Self { registry: CollectionRegistry::new(), last_entity: EntityId::INVALID }
    }

    /// The world's collection registry.
    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// The world's collection registry.
    pub fn registry_mut(&mut self) -> &mut CollectionRegistry {
        &mut self.registry
    }

    /// Registers a collection for every component type in `S`.
    ///
    /// Returns an error if any type is already registered or the registry
    /// runs out of slots; types registered before the failing one stay
    /// registered.
    pub fn register<S: ComponentSet>(&mut self) -> Result<(), RegistryError> {
        S::register(&mut self.registry)
    }

    /// Spawns a new entity with the components of `bundle`.
    ///
    /// Spawn with `()` to create an entity without components. Returns an
    /// error if the id counter is exhausted or the bundle fails to insert.
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Result<EntityId, WorldError> {
        let entity = self.last_entity.next()?;

        self.last_entity = entity;
        bundle.insert(&self.registry, entity)?;

        Ok(entity)
    }

    /// Attaches a component to an entity.
    ///
    /// Returns an error if `C` is unregistered or the entity already has a
    /// `C`.
    pub fn add<C: Component>(
        &mut self,
        entity: EntityId,
        component: C,
    ) -> Result<(), WorldError> {
        self.registry.get_mut::<C>()?.insert(entity, component)?;

        Ok(())
    }

    /// Returns `true` if the entity has a `C` component.
    ///
    /// Returns `false` when `C` itself is unregistered.
    pub fn has<C: Component>(&self, entity: EntityId) -> bool {
        self.registry
            .find::<C>()
            .is_some_and(|collection| collection.contains(entity))
    }

    /// Borrows the `C` component of an entity, or `None` if the entity has
    /// none (or `C` is unregistered).
    pub fn find<C: Component>(
        &self,
        entity: EntityId,
    ) -> Option<AtomicRef<'_, C>> {
        let collection = self.registry.find::<C>()?;

        AtomicRef::filter_map(collection, |collection| collection.find(entity))
    }

    /// Mutably borrows the `C` component of an entity, or `None` if the
    /// entity has none (or `C` is unregistered).
    pub fn find_mut<C: Component>(
        &self,
        entity: EntityId,
    ) -> Option<AtomicRefMut<'_, C>> {
        let collection = self.registry.find_mut::<C>()?;

        AtomicRefMut::filter_map(collection, |collection| {
            collection.find_mut(entity)
        })
    }

    /// Borrows the `C` component of an entity.
    ///
    /// Returns an error if `C` is unregistered or the entity has no `C`; use
    /// [`World::find`] when existence is unknown.
    pub fn get<C: Component>(
        &self,
        entity: EntityId,
    ) -> Result<AtomicRef<'_, C>, WorldError> {
        let collection = self.registry.get::<C>()?;

        AtomicRef::filter_map(collection, |collection| collection.find(entity))
            .ok_or_else(|| ComponentNotFound::new::<C>(entity).into())
    }

    /// Mutably borrows the `C` component of an entity.
    ///
    /// Returns an error if `C` is unregistered or the entity has no `C`.
    pub fn get_mut<C: Component>(
        &self,
        entity: EntityId,
    ) -> Result<AtomicRefMut<'_, C>, WorldError> {
        let collection = self.registry.get_mut::<C>()?;

        AtomicRefMut::filter_map(collection, |collection| {
            collection.find_mut(entity)
        })
        .ok_or_else(|| ComponentNotFound::new::<C>(entity).into())
    }

    /// Creates a view over the entities holding every component in `S`.
    ///
    /// Returns an error if any type in `S` is unregistered.
    pub fn view<S: ComponentSet>(&self) -> Result<View<'_, S>, UnregisteredType> {
        View::new(&self.registry)
    }

    /// Borrows an entity of this world.
    ///
    /// The world does not track entity liveness, so this works for any id;
    /// an id this world never issued simply has no components.
    pub fn entity(&self, entity: EntityId) -> EntityRef<'_> {
        EntityRef::new(entity, self)
    }

    /// The most recently issued entity id.
    ///
    /// [`EntityId::INVALID`] if no entity was ever spawned.
    pub fn last_entity(&self) -> EntityId {
        self.last_entity
    }
}
