//! Defines [`CollectionRegistry`], the per-world directory of collections.

use std::any::{self, Any};
use std::fmt;
use std::hash::BuildHasherDefault;

use atomic_refcell::{AtomicRef, AtomicRefCell, AtomicRefMut};
use indexmap::IndexMap;
use thiserror::Error;

use crate::collection::Collection;
use crate::component::{Component, ComponentId};
use crate::storage::{FreeIndexList, IndexExhausted, UsizeHasher};

type ComponentMap<V> = IndexMap<ComponentId, V, BuildHasherDefault<UsizeHasher>>;

/// A directory of [`Collection`]s, one per registered component type.
///
/// The registry owns its collections, holding each in a fixed slot claimed
/// from a [`FreeIndexList`]; at most [`CollectionRegistry::CAPACITY`]
/// distinct component types can be registered at a time. Collections are
/// handed out behind [`AtomicRefCell`] guards so they can be borrowed (and
/// mutated) through a shared registry reference.
///
/// Registries are fully independent: registering a type in one has no effect
/// on any other.
#[derive(Default)]
pub struct CollectionRegistry {
    slots: Vec<Option<Slot>>,
    indices: FreeIndexList,
    by_component: ComponentMap<usize>,
}

struct Slot {
    /// Holds an `AtomicRefCell<Collection<C>>`.
    cell: Box<dyn Any + Send + Sync>,
    component: &'static str,
}

/// An error when registering a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The component type is already registered in this registry.
    #[error("a collection of {0} is already registered")]
    DuplicateType(&'static str),
    /// The registry's slot table is full.
    #[error(transparent)]
    Exhausted(#[from] IndexExhausted),
}

/// An error for when a component type has no registered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no collection of {component} is registered")]
pub struct UnregisteredType {
    component: &'static str,
}

impl CollectionRegistry {
    /// Maximum number of simultaneously registered component types.
    pub const CAPACITY: usize = FreeIndexList::CAPACITY;

    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            indices: FreeIndexList::new(),
            by_component: ComponentMap::default(),
        }
    }

    /// The number of registered component types.
    pub fn len(&self) -> usize {
        self.by_component.len()
    }

    /// Returns `true` if no component types are registered.
    pub fn is_empty(&self) -> bool {
        self.by_component.is_empty()
    }

    /// Returns `true` if a collection of `C` is registered.
    pub fn contains<C: Component>(&self) -> bool {
        self.by_component.contains_key(&ComponentId::of::<C>())
    }

    /// Registers an empty [`Collection`] of `C`, claiming a slot for it.
    ///
    /// Returns an error if `C` is already registered or if the registry
    /// already holds [`CollectionRegistry::CAPACITY`] types.
    pub fn register<C: Component>(&mut self) -> Result<(), RegistryError> {
        if self.contains::<C>() {
            return Err(RegistryError::DuplicateType(any::type_name::<C>()));
        }

        let index = self.indices.alloc()?;

        if index == self.slots.len() {
            self.slots.push(None);
        }

        self.slots[index] = Some(Slot::new(Collection::<C>::new()));
        self.by_component.insert(ComponentId::of::<C>(), index);

        Ok(())
    }

    /// Removes the collection of `C`, releasing its slot, and returns it.
    ///
    /// Returns an error if `C` is not registered.
    pub fn unregister<C: Component>(
        &mut self,
    ) -> Result<Collection<C>, UnregisteredType> {
        let index = self
            .by_component
            .shift_remove(&ComponentId::of::<C>())
            .ok_or_else(UnregisteredType::new::<C>)?;
        // the map and slot table are updated together, so a mapped index
        // always addresses an occupied slot of the mapped type
        let Some(slot) = self.slots[index].take() else {
            unreachable!("registry slot {index} was mapped but empty");
        };

        self.indices.free(index);

        let Ok(cell) = slot.cell.downcast::<AtomicRefCell<Collection<C>>>()
        else {
            unreachable!(
                "registry slot for {} held a different collection type",
                any::type_name::<C>(),
            );
        };

        Ok(cell.into_inner())
    }

    /// Borrows the collection of `C`, or `None` if `C` is unregistered.
    ///
    /// Panics if the collection is currently borrowed mutably.
    pub fn find<C: Component>(&self) -> Option<AtomicRef<'_, Collection<C>>> {
        self.cell::<C>().map(AtomicRefCell::borrow)
    }

    /// Mutably borrows the collection of `C`, or `None` if `C` is
    /// unregistered.
    ///
    /// Panics if the collection is currently borrowed.
    pub fn find_mut<C: Component>(
        &self,
    ) -> Option<AtomicRefMut<'_, Collection<C>>> {
        self.cell::<C>().map(AtomicRefCell::borrow_mut)
    }

    /// Borrows the collection of `C`.
    ///
    /// Returns an error if `C` is unregistered; use [`CollectionRegistry::find`]
    /// when registration is unknown. Panics if the collection is currently
    /// borrowed mutably.
    pub fn get<C: Component>(
        &self,
    ) -> Result<AtomicRef<'_, Collection<C>>, UnregisteredType> {
        self.find().ok_or_else(UnregisteredType::new::<C>)
    }

    /// Mutably borrows the collection of `C`.
    ///
    /// Returns an error if `C` is unregistered. Panics if the collection is
    /// currently borrowed.
    pub fn get_mut<C: Component>(
        &self,
    ) -> Result<AtomicRefMut<'_, Collection<C>>, UnregisteredType> {
        self.find_mut().ok_or_else(UnregisteredType::new::<C>)
    }

    fn cell<C: Component>(&self) -> Option<&AtomicRefCell<Collection<C>>> {
        let index = *self.by_component.get(&ComponentId::of::<C>())?;
        let slot = self.slots[index].as_ref()?;

        slot.cell.downcast_ref()
    }
}

impl Slot {
    fn new<C: Component>(collection: Collection<C>) -> Self {
        Self {
            cell: Box::new(AtomicRefCell::new(collection)),
            component: any::type_name::<C>(),
        }
    }
}

impl fmt::Debug for CollectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();

        for (&component, &index) in &self.by_component {
            if let Some(slot) = self.slots[index].as_ref() {
                map.entry(&component, &slot.component);
            }
        }

        map.finish()
    }
}

impl UnregisteredType {
    pub(crate) fn new<C>() -> Self {
        Self { component: any::type_name::<C>() }
    }
}
