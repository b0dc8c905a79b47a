//! Defines components, the per-entity values stored in collections.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use dashmap::DashMap;

/// A single value attached to entities in an ECS.
///
/// Implemented for every type that could possibly be a component.
pub trait Component: Send + Sync + 'static {}

impl<C: Send + Sync + 'static> Component for C {}

/// A unique, process-wide identifier for a [`Component`] type.
///
/// Ids are dense and cheap to hash, which makes them better registry keys
/// than raw [`TypeId`]s.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(usize);

impl ComponentId {
    /// Returns the id of the given component type, interning it on first use.
    pub fn of<C: 'static>() -> Self {
        static REGISTRY: OnceLock<DashMap<TypeId, ComponentId>> = OnceLock::new();
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        *REGISTRY
            .get_or_init(Default::default)
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Self(COUNTER.fetch_add(1, Ordering::Relaxed)))
    }
}
