//! Defines [`EntityRef`], a reference to an entity and its world.

use std::ptr;

use atomic_refcell::AtomicRef;

use super::EntityId;
use crate::component::Component;
use crate::world::{World, WorldError};

/// An entity id paired with the world it lives in.
///
/// Entities own no data of their own; everything here delegates to the
/// world's collections.
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'w> {
    world: &'w World,
    entity: EntityId,
}

impl<'w> EntityRef<'w> {
    pub(crate) fn new(entity: EntityId, world: &'w World) -> Self {
        Self { world, entity }
    }

    /// The id of this entity.
    pub const fn id(self) -> EntityId {
        self.entity
    }

    /// Returns `true` if this refers to the [`EntityId::INVALID`] sentinel.
    pub const fn is_null(self) -> bool {
        self.entity.is_null()
    }

    /// Returns `true` if this entity has a `C` component.
    pub fn has<C: Component>(self) -> bool {
        self.world.has::<C>(self.entity)
    }

    /// Borrows the `C` component of this entity, or `None` if it has none.
    pub fn find<C: Component>(self) -> Option<AtomicRef<'w, C>> {
        self.world.find(self.entity)
    }

    /// Borrows the `C` component of this entity.
    ///
    /// Returns an error if `C` is unregistered or this entity has no `C`.
    pub fn get<C: Component>(self) -> Result<AtomicRef<'w, C>, WorldError> {
        self.world.get(self.entity)
    }
}

/// Two references are equal if their ids are equal and they share a world;
/// null references compare equal regardless of world.
impl PartialEq for EntityRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
            && (self.entity.is_null() || ptr::eq(self.world, other.world))
    }
}

impl Eq for EntityRef<'_> {}
