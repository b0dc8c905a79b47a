use atomic_refcell::AtomicRefMut;

use crate::collection::Collection;
use crate::component::Component;
use crate::entity::EntityId;
use crate::intersect;
use crate::registry::{CollectionRegistry, RegistryError, UnregisteredType};

/// A fixed set of component types iterated together by a
/// [`View`](crate::view::View).
///
/// Implemented for tuples of up to 8 [`Component`] types and for `()` (the
/// degenerate empty set). A component type must not appear twice in one set;
/// borrowing such a set panics.
///
/// # Safety
///
/// Implementations must keep every cursor within `0..=len` of its column and
/// must only report a converged position (via [`ComponentSet::begin`] or
/// [`ComponentSet::advance`] returning `true`) when all cursors point at the
/// same entity id.
pub unsafe trait ComponentSet: 'static {
    /// Number of component types in this set.
    const LEN: usize;

    /// One exclusively borrowed [`Collection`] per component type.
    type Columns<'w>;

    /// One cursor position per column.
    type Cursors: Copy;

    /// One raw base pointer into each column's component storage.
    type Pointers: Copy;

    /// The references yielded per matching entity.
    type Item<'a>;

    /// Registers a collection for every type in this set.
    fn register(registry: &mut CollectionRegistry) -> Result<(), RegistryError>;

    /// Borrows every column from the registry.
    ///
    /// Returns an error if any type in this set is unregistered.
    fn borrow<'w>(
        registry: &'w CollectionRegistry,
    ) -> Result<Self::Columns<'w>, UnregisteredType>;

    /// Cursors positioned at the start of every column.
    fn origin() -> Self::Cursors;

    /// Captures the base pointer of every column.
    ///
    /// Must be called before any item is yielded: items are derived from
    /// these pointers rather than from fresh column borrows, so earlier
    /// items stay valid while iteration continues.
    fn pointers(columns: &mut Self::Columns<'_>) -> Self::Pointers;

    /// Positions the cursors at the first common entity id.
    ///
    /// Returns `false` if the columns share no entity.
    fn begin(columns: &Self::Columns<'_>, cursors: &mut Self::Cursors) -> bool;

    /// Moves the cursors to the next common entity id.
    ///
    /// Returns `false` once any column is exhausted.
    fn advance(columns: &Self::Columns<'_>, cursors: &mut Self::Cursors)
        -> bool;

    /// The entity id under the cursors.
    ///
    /// Only meaningful at a converged position.
    fn entity(columns: &Self::Columns<'_>, cursors: &Self::Cursors) -> EntityId;

    /// The component references under the cursors.
    ///
    /// # Safety
    ///
    /// `pointers` must come from [`ComponentSet::pointers`] on columns that
    /// stay exclusively borrowed (and unmodified) for all of `'a`, the
    /// cursors must be at a converged in-bounds position, and the caller
    /// must not request the same position twice.
    unsafe fn item<'a>(
        pointers: Self::Pointers,
        cursors: &Self::Cursors,
    ) -> Self::Item<'a>;
}

// the empty set: a view over it is always at its end
unsafe impl ComponentSet for () {
    const LEN: usize = 0;

    type Columns<'w> = ();
    type Cursors = [usize; 0];
    type Pointers = ();
    type Item<'a> = ();

    fn register(
        _registry: &mut CollectionRegistry,
    ) -> Result<(), RegistryError> {
        Ok(())
    }

    fn borrow<'w>(
        _registry: &'w CollectionRegistry,
    ) -> Result<Self::Columns<'w>, UnregisteredType> {
        Ok(())
    }

    fn origin() -> Self::Cursors {
        []
    }

    fn pointers(_columns: &mut Self::Columns<'_>) -> Self::Pointers {}

    fn begin(
        _columns: &Self::Columns<'_>,
        _cursors: &mut Self::Cursors,
    ) -> bool {
        false
    }

    fn advance(
        _columns: &Self::Columns<'_>,
        _cursors: &mut Self::Cursors,
    ) -> bool {
        false
    }

    fn entity(
        _columns: &Self::Columns<'_>,
        _cursors: &Self::Cursors,
    ) -> EntityId {
        EntityId::INVALID
    }

    unsafe fn item<'a>(
        _pointers: Self::Pointers,
        _cursors: &Self::Cursors,
    ) -> Self::Item<'a> {
    }
}

macro_rules! impl_component_set {
    ($len:expr; $(($C:ident, $idx:tt)),+) => {
        unsafe impl<$($C: Component),+> ComponentSet for ($($C,)+) {
            const LEN: usize = $len;

            type Columns<'w> = ($(AtomicRefMut<'w, Collection<$C>>,)+);
            type Cursors = [usize; $len];
            type Pointers = ($(*mut $C,)+);
            type Item<'a> = ($(&'a mut $C,)+);

            fn register(
                registry: &mut CollectionRegistry,
            ) -> Result<(), RegistryError> {
                $(registry.register::<$C>()?;)+

                Ok(())
            }

            fn borrow<'w>(
                registry: &'w CollectionRegistry,
            ) -> Result<Self::Columns<'w>, UnregisteredType> {
                Ok(($(registry.get_mut::<$C>()?,)+))
            }

            fn origin() -> Self::Cursors {
                [0; $len]
            }

            fn pointers(columns: &mut Self::Columns<'_>) -> Self::Pointers {
                ($(columns.$idx.as_mut_ptr(),)+)
            }

            fn begin(
                columns: &Self::Columns<'_>,
                cursors: &mut Self::Cursors,
            ) -> bool {
                let sets: [&[EntityId]; $len] = [$(columns.$idx.ids()),+];

                intersect::begin(&sets, cursors)
            }

            fn advance(
                columns: &Self::Columns<'_>,
                cursors: &mut Self::Cursors,
            ) -> bool {
                let sets: [&[EntityId]; $len] = [$(columns.$idx.ids()),+];

                intersect::advance(&sets, cursors)
            }

            fn entity(
                columns: &Self::Columns<'_>,
                cursors: &Self::Cursors,
            ) -> EntityId {
                columns.0.ids()[cursors[0]]
            }

            unsafe fn item<'a>(
                pointers: Self::Pointers,
                cursors: &Self::Cursors,
            ) -> Self::Item<'a> {
                ($(
                    // SAFETY: the caller guarantees the position is in
                    // bounds and yielded at most once, so distinct items
                    // never overlap, and the columns the pointers were
                    // captured from stay exclusively borrowed for `'a`
                    unsafe { &mut *pointers.$idx.add(cursors[$idx]) },
                )+)
            }
        }
    };
}

impl_component_set!(1; (C0, 0));
impl_component_set!(2; (C0, 0), (C1, 1));
impl_component_set!(3; (C0, 0), (C1, 1), (C2, 2));
impl_component_set!(4; (C0, 0), (C1, 1), (C2, 2), (C3, 3));
impl_component_set!(5; (C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4));
impl_component_set!(6; (C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4), (C5, 5));
impl_component_set!(
    7;
    (C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4), (C5, 5), (C6, 6)
);
impl_component_set!(
    8;
    (C0, 0), (C1, 1), (C2, 2), (C3, 3), (C4, 4), (C5, 5), (C6, 6), (C7, 7)
);
