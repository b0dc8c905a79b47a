//! Defines [`Collection`], sorted-array storage for one component type.

use std::any;
use std::iter::Zip;
use std::slice;

use thiserror::Error;

use crate::component::Component;
use crate::entity::EntityId;

/// Storage for every value of one component type, keyed by entity id.
///
/// Internally two parallel arrays: entity ids in strictly ascending order and
/// the component values at the matching offsets. Keeping the ids sorted is
/// the deliberate cost paid for `O(log n)` lookup and linear-time ordered
/// iteration, which the [`intersect`](crate::intersect) algorithms and
/// [`View`](crate::view::View) depend on. Inserts are always ordered inserts,
/// never append-then-sort.
#[derive(Debug, Clone)]
pub struct Collection<C> {
    ids: Vec<EntityId>,
    components: Vec<C>,
}

/// An error for when an entity already has a component of the given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity {entity:?} already has a {component} component")]
pub struct DuplicateComponent {
    entity: EntityId,
    component: &'static str,
}

/// An error for when a requested component was not found for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity {entity:?} has no {component} component")]
pub struct ComponentNotFound {
    entity: EntityId,
    component: &'static str,
}

impl<C: Component> Collection<C> {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self { ids: Vec::new(), components: Vec::new() }
    }

    /// The number of stored components.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no components are stored.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The stored entity ids, in strictly ascending order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Inserts a component for an entity, keeping the ids sorted.
    ///
    /// Returns a reference to the stored value. Returns an error if the
    /// entity already has a component in this collection, leaving the
    /// collection unchanged.
    pub fn insert(
        &mut self,
        entity: EntityId,
        component: C,
    ) -> Result<&mut C, DuplicateComponent> {
        match self.ids.binary_search(&entity) {
            Ok(_) => Err(DuplicateComponent::new::<C>(entity)),
            Err(index) => {
                self.ids.insert(index, entity);
                self.components.insert(index, component);

                Ok(&mut self.components[index])
            }
        }
    }

    /// Returns `true` if the entity has a component in this collection.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.ids.binary_search(&entity).is_ok()
    }

    /// Returns the component of an entity, or `None` if it has none.
    pub fn find(&self, entity: EntityId) -> Option<&C> {
        self.ids
            .binary_search(&entity)
            .ok()
            .map(|index| &self.components[index])
    }

    /// Returns the component of an entity, or `None` if it has none.
    pub fn find_mut(&mut self, entity: EntityId) -> Option<&mut C> {
        self.ids
            .binary_search(&entity)
            .ok()
            .map(|index| &mut self.components[index])
    }

    /// Returns the component of an entity.
    ///
    /// Returns an error if the entity has none; use [`Collection::find`] when
    /// existence is unknown.
    pub fn get(&self, entity: EntityId) -> Result<&C, ComponentNotFound> {
        self.find(entity).ok_or_else(|| ComponentNotFound::new::<C>(entity))
    }

    /// Returns the component of an entity.
    ///
    /// Returns an error if the entity has none; use [`Collection::find_mut`]
    /// when existence is unknown.
    pub fn get_mut(
        &mut self,
        entity: EntityId,
    ) -> Result<&mut C, ComponentNotFound> {
        self.find_mut(entity).ok_or_else(|| ComponentNotFound::new::<C>(entity))
    }

    /// The component at a position in id order.
    ///
    /// Panics if the index is out of bounds.
    pub fn component_at(&self, index: usize) -> &C {
        &self.components[index]
    }

    /// The component at a position in id order.
    ///
    /// Panics if the index is out of bounds.
    pub fn component_at_mut(&mut self, index: usize) -> &mut C {
        &mut self.components[index]
    }

    /// Base pointer of the component storage, for view iteration. Valid for
    /// `self.len()` elements until the collection is next mutated.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut C {
        self.components.as_mut_ptr()
    }

    /// Iterates over `(id, component)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> {
        self.ids.iter().copied().zip(&self.components)
    }

    /// Iterates over `(id, component)` pairs in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> {
        self.ids.iter().copied().zip(&mut self.components)
    }

    /// Removes all components.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.components.clear();
    }
}

impl<C: Component> Default for Collection<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: Component> IntoIterator for &'a Collection<C> {
    type IntoIter = Zip<slice::Iter<'a, EntityId>, slice::Iter<'a, C>>;
    type Item = (&'a EntityId, &'a C);

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().zip(&self.components)
    }
}

impl DuplicateComponent {
    pub(crate) fn new<C>(entity: EntityId) -> Self {
        Self { entity, component: any::type_name::<C>() }
    }

    /// The entity that already had the component.
    pub const fn entity(&self) -> EntityId {
        self.entity
    }
}

impl ComponentNotFound {
    pub(crate) fn new<C>(entity: EntityId) -> Self {
        Self { entity, component: any::type_name::<C>() }
    }

    /// The entity that was missing the component.
    pub const fn entity(&self) -> EntityId {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(f32);

    #[test]
    fn insert_then_get_round_trips() {
        let mut collection = Collection::new();
        let entity = EntityId::new(7);

        collection.insert(entity, Health(50.0)).unwrap();

        assert!(collection.contains(entity));
        assert_eq!(collection.find(entity), Some(&Health(50.0)));
        assert_eq!(collection.get(entity), Ok(&Health(50.0)));
    }

    #[test]
    fn ids_stay_sorted_regardless_of_insert_order() {
        let mut collection = Collection::new();

        for raw in [9_u32, 2, 7, 1, 5, 3, 8] {
            collection.insert(EntityId::new(raw), Health(raw as f32)).unwrap();
        }

        let ids: Vec<_> = collection.ids().iter().map(|id| id.raw()).collect();

        assert_eq!(ids, [1, 2, 3, 5, 7, 8, 9]);

        // values stay paired with their ids through the shifts
        for (id, health) in collection.iter() {
            assert_eq!(health.0, id.raw() as f32);
        }
    }

    #[test]
    fn duplicate_insert_is_rejected_and_leaves_storage_unchanged() {
        let mut collection = Collection::new();
        let entity = EntityId::new(3);

        collection.insert(entity, Health(1.0)).unwrap();

        let error = collection.insert(entity, Health(2.0)).unwrap_err();

        assert_eq!(error.entity(), entity);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(entity), Ok(&Health(1.0)));
    }

    #[test]
    fn missing_entity_find_and_get() {
        let mut collection = Collection::new();

        collection.insert(EntityId::new(1), Health(1.0)).unwrap();

        let missing = EntityId::new(2);

        assert!(!collection.contains(missing));
        assert_eq!(collection.find(missing), None);
        assert_eq!(
            collection.get(missing).unwrap_err().entity(),
            missing,
        );
    }

    #[test]
    fn queries_are_idempotent() {
        let mut collection = Collection::new();
        let entity = EntityId::new(4);

        collection.insert(entity, Health(25.0)).unwrap();

        for _ in 0..3 {
            assert_eq!(collection.find(entity), Some(&Health(25.0)));
            assert!(collection.contains(entity));
            assert_eq!(collection.len(), 1);
        }
    }

    #[test]
    fn mutation_through_find_mut() {
        let mut collection = Collection::new();
        let entity = EntityId::new(1);

        collection.insert(entity, Health(10.0)).unwrap();
        collection.find_mut(entity).unwrap().0 += 5.0;

        assert_eq!(collection.get(entity), Ok(&Health(15.0)));
    }

    #[test]
    fn positional_access_follows_id_order() {
        let mut collection = Collection::new();

        for raw in [5_u32, 1, 3] {
            collection.insert(EntityId::new(raw), Health(raw as f32)).unwrap();
        }

        assert_eq!(collection.component_at(0), &Health(1.0));
        assert_eq!(collection.component_at(2), &Health(5.0));

        collection.component_at_mut(1).0 = 30.0;

        assert_eq!(collection.get(EntityId::new(3)), Ok(&Health(30.0)));
    }

    #[test]
    fn iteration_over_a_borrowed_collection() {
        let mut collection = Collection::new();

        for raw in [2_u32, 1, 3] {
            collection.insert(EntityId::new(raw), Health(raw as f32)).unwrap();
        }

        for (id, health) in &collection {
            assert_eq!(health.0, id.raw() as f32);
        }

        for (_, health) in collection.iter_mut() {
            health.0 *= 2.0;
        }

        assert_eq!(collection.get(EntityId::new(3)), Ok(&Health(6.0)));
    }

    #[test]
    fn clear_empties_the_collection() {
        let mut collection = Collection::new();

        collection.insert(EntityId::new(1), Health(1.0)).unwrap();
        collection.insert(EntityId::new(2), Health(2.0)).unwrap();
        collection.clear();

        assert!(collection.is_empty());
        assert_eq!(collection.find(EntityId::new(1)), None);

        // cleared storage accepts fresh inserts
        collection.insert(EntityId::new(1), Health(3.0)).unwrap();

        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn insert_returns_stored_value() {
        let mut collection = Collection::new();

        let stored = collection.insert(EntityId::new(1), Health(1.0)).unwrap();
        stored.0 = 2.0;

        assert_eq!(collection.get(EntityId::new(1)), Ok(&Health(2.0)));
    }
}
