//! An ECS core built on sorted component collections and multi-way set
//! intersection.
//!
//! Each component type lives in its own [`Collection`](collection::Collection):
//! a pair of parallel arrays (entity ids and component values) kept in
//! ascending id order. A [`View`](view::View) walks several collections at
//! once, using merge-style intersection to yield only the entities present in
//! all of them.

#![forbid(unsafe_op_in_unsafe_fn)]

pub mod bundle;
pub mod collection;
pub mod component;
pub mod entity;
pub mod intersect;
pub mod registry;
mod storage;
pub mod view;
pub mod world;

pub use self::storage::{FreeIndexList, IndexExhausted};

/// Re-export of all items in this crate.
pub mod prelude {
    pub use crate::bundle::*;
    pub use crate::collection::*;
    pub use crate::component::*;
    pub use crate::entity::*;
    pub use crate::registry::*;
    pub use crate::view::*;
    pub use crate::world::*;
    pub use crate::{FreeIndexList, IndexExhausted};
}
