//! Defines [`Bundle`], sets of component values spawned together.

use crate::component::Component;
use crate::entity::EntityId;
use crate::registry::CollectionRegistry;
use crate::world::WorldError;

/// A set of component values that are attached to an entity together.
///
/// Implemented for tuples of up to 8 [`Component`] values and for `()` (an
/// entity with no components).
pub trait Bundle: 'static {
    /// Inserts each value into its collection, keyed by `entity`.
    ///
    /// Returns an error if any type has no registered collection or the
    /// entity already holds one of the components. Values inserted before a
    /// failing one stay inserted.
    fn insert(
        self,
        registry: &CollectionRegistry,
        entity: EntityId,
    ) -> Result<(), WorldError>;
}

impl Bundle for () {
    fn insert(
        self,
        _registry: &CollectionRegistry,
        _entity: EntityId,
    ) -> Result<(), WorldError> {
        Ok(())
    }
}

macro_rules! impl_bundle {
    ($(($C:ident, $idx:tt)),+) => {
        impl<$($C: Component),+> Bundle for ($($C,)+) {
            fn insert(
                self,
                registry: &CollectionRegistry,
                entity: EntityId,
            ) -> Result<(), WorldError> {
                $(registry.get_mut::<$C>()?.insert(entity, self.$idx)?;)+

                Ok(())
            }
        }
    };
}

impl_bundle!((C0, 0));
impl_bundle!((C0, 0), (C1, 1));
impl_bundle!((C0, 0), (C1, 1), (C2, 2));
impl_bundle!((C0, 0), (C1, 1), (C2, 2), (C3, 3));
impl_bundle!((C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4));
impl_bundle!((C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4), (C5, 5));
impl_bundle!((C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4), (C5, 5), (C6, 6));
impl_bundle!(
    (C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4), (C5, 5), (C6, 6), (C7, 7)
);
