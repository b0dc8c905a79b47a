//! Defines entities, the individual objects in an ECS.

use thiserror::Error;

pub use self::reference::*;

mod reference;

/// An identifier for an entity in the ECS.
///
/// Ids are plain 32-bit values with a total order. A [`World`] issues them
/// monotonically starting at `1` and never reuses one within its lifetime.
/// The value `0` is reserved as [`EntityId::INVALID`], the "no entity"
/// sentinel.
///
/// [`World`]: crate::world::World
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(u32);

/// An error for when the entity id counter is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity id space exhausted")]
pub struct IdOverflow;

impl EntityId {
    /// The "no entity" sentinel.
    pub const INVALID: Self = Self(0);

    /// Creates an id from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this id.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is the [`EntityId::INVALID`] sentinel.
    pub const fn is_null(self) -> bool {
        self.0 == Self::INVALID.0
    }

    /// Returns the successor of this id.
    ///
    /// Returns an error if the id is already at the maximum representable
    /// value.
    pub fn next(self) -> Result<Self, IdOverflow> {
        self.0.checked_add(1).map(Self).ok_or(IdOverflow)
    }
}
