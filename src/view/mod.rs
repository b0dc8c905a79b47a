//! Defines [`View`], iteration over entities holding several components.

pub use self::set::*;
use crate::entity::EntityId;
use crate::registry::{CollectionRegistry, UnregisteredType};

mod set;

/// Iteration over the entities present in every collection of a
/// [`ComponentSet`].
///
/// A view is a live multi-way set intersection: it owns no component data,
/// only exclusive borrows of the participating collections, and walks their
/// sorted id arrays in lockstep. Views are cheap to construct and are meant
/// to be built fresh for every pass, then dropped; the collections stay
/// borrowed (and so inaccessible through the registry) for the view's
/// lifetime.
///
/// ```
/// # use confluence::prelude::*;
/// #[derive(Debug, PartialEq)]
/// struct Position(f32);
/// struct Marker;
///
/// let mut world = World::new();
///
/// world.register::<(Position, Marker)>()?;
/// world.spawn((Position(1.0), Marker))?;
///
/// let mut view = world.view::<(Position, Marker)>()?;
///
/// for (entity, (position, _marker)) in &mut view {
///     position.0 += 1.0;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct View<'w, S: ComponentSet> {
    columns: S::Columns<'w>,
}

/// An iterator over the matching entities of a [`View`].
pub struct ViewIter<'v, 'w, S: ComponentSet> {
    columns: &'v mut S::Columns<'w>,
    pointers: S::Pointers,
    cursors: S::Cursors,
    done: bool,
}

impl<'w, S: ComponentSet> View<'w, S> {
    /// Creates a view over the registry's collections.
    ///
    /// Returns an error if any component type in `S` has no registered
    /// collection. Panics if any of the collections is currently borrowed,
    /// or if a component type appears twice in `S`.
    pub fn new(registry: &'w CollectionRegistry) -> Result<Self, UnregisteredType> {
        Ok(Self { columns: S::borrow(registry)? })
    }

    /// Iterates over the entities present in all of the view's collections,
    /// in ascending id order.
    pub fn iter(&mut self) -> ViewIter<'_, 'w, S> {
        let mut cursors = S::origin();
        let done = !S::begin(&self.columns, &mut cursors);
        // captured up front so every yielded item derives from the same
        // pointers instead of a fresh column borrow, keeping earlier items
        // valid while iteration continues
        let pointers = S::pointers(&mut self.columns);

        ViewIter { columns: &mut self.columns, pointers, cursors, done }
    }

    /// Returns `true` if no entity is present in all of the view's
    /// collections.
    pub fn is_empty(&self) -> bool {
        let mut cursors = S::origin();

        !S::begin(&self.columns, &mut cursors)
    }
}

impl<'v, 'w, S: ComponentSet> IntoIterator for &'v mut View<'w, S> {
    type IntoIter = ViewIter<'v, 'w, S>;
    type Item = (EntityId, S::Item<'v>);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, 'w, S: ComponentSet> Iterator for ViewIter<'v, 'w, S> {
    type Item = (EntityId, S::Item<'v>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let entity = S::entity(self.columns, &self.cursors);
        let current = self.cursors;

        self.done = !S::advance(self.columns, &mut self.cursors);

        // SAFETY: `current` is a converged in-bounds position that the
        // cursors have moved past (never yielded again), and the columns
        // the pointers were captured from stay exclusively borrowed and
        // unmodified for the whole `'v`
        let item = unsafe { S::item(self.pointers, &current) };

        Some((entity, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    struct Human;
    struct Hat;
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(f32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Shoes(f32);
    struct Glasses;

    fn add_markers<C: Fn() -> T + Copy, T: crate::component::Component>(
        world: &mut World,
        ids: &[u32],
        make: C,
    ) {
        for &id in ids {
            world.add(EntityId::new(id), make()).unwrap();
        }
    }

    #[test]
    fn unregistered_type_is_an_error() {
        let world = World::new();

        assert!(world.view::<(Human,)>().is_err());
    }

    #[test]
    fn empty_collections_yield_nothing() {
        let mut world = World::new();

        world.register::<(Health, Hat)>().unwrap();

        let mut view = world.view::<(Health, Hat)>().unwrap();

        assert!(view.is_empty());
        assert!(view.iter().next().is_none());
    }

    #[test]
    fn partial_entity_is_not_yielded() {
        let mut world = World::new();

        world.register::<(Health, Hat)>().unwrap();
        // a Health but no Hat
        world.spawn((Health(100.0),)).unwrap();

        assert!(world.view::<(Health, Hat)>().unwrap().is_empty());
    }

    #[test]
    fn single_component_view_walks_all_ids() {
        let mut world = World::new();

        world.register::<(Human,)>().unwrap();
        add_markers(&mut world, &[1, 2, 3, 4, 5, 8, 9], || Human);

        let mut view = world.view::<(Human,)>().unwrap();
        let found: Vec<_> =
            view.iter().map(|(entity, _)| entity.raw()).collect();

        assert_eq!(found, [1, 2, 3, 4, 5, 8, 9]);
    }

    #[test]
    fn two_component_view_intersects_ids() {
        let mut world = World::new();

        world.register::<(Human, Hat)>().unwrap();
        add_markers(&mut world, &[1, 2, 3, 4, 5, 8, 9], || Human);
        add_markers(&mut world, &[1, 5, 6, 7, 8, 9], || Hat);

        let mut view = world.view::<(Human, Hat)>().unwrap();
        let found: Vec<_> =
            view.iter().map(|(entity, _)| entity.raw()).collect();

        assert_eq!(found, [1, 5, 8, 9]);
    }

    #[test]
    fn view_yields_the_matching_component_values() {
        let mut world = World::new();

        world.register::<(Health, Shoes)>().unwrap();

        for id in [1, 2, 3, 4, 5, 8, 9] {
            world.add(EntityId::new(id), Health(id as f32 * 2.0)).unwrap();
        }

        for id in [1, 5, 6, 7, 8, 9] {
            world.add(EntityId::new(id), Shoes(id as f32 * 3.0)).unwrap();
        }

        let mut view = world.view::<(Health, Shoes)>().unwrap();
        let mut expected = [1, 5, 8, 9].into_iter();

        for (entity, (health, shoes)) in &mut view {
            let id = expected.next().unwrap();

            assert_eq!(entity, EntityId::new(id));
            assert_eq!(*health, Health(id as f32 * 2.0));
            assert_eq!(*shoes, Shoes(id as f32 * 3.0));
        }

        assert!(expected.next().is_none());
    }

    #[test]
    fn three_component_view_intersects_ids() {
        let mut world = World::new();

        world.register::<(Human, Hat, Health)>().unwrap();
        add_markers(&mut world, &[1, 2, 3, 4, 5, 8], || Human);
        add_markers(&mut world, &[3, 5, 6, 7, 8, 9, 10], || Hat);
        add_markers(&mut world, &[1, 3, 5, 8, 9], || Health(100.0));

        let mut view = world.view::<(Human, Hat, Health)>().unwrap();
        let found: Vec<_> =
            view.iter().map(|(entity, _)| entity.raw()).collect();

        assert_eq!(found, [3, 5, 8]);
    }

    #[test]
    fn four_component_view_intersects_ids() {
        let mut world = World::new();

        world.register::<(Human, Hat, Health, Glasses)>().unwrap();
        add_markers(&mut world, &[1, 2, 3, 4, 5, 7, 9], || Human);
        add_markers(&mut world, &[3, 5, 6, 7, 8, 9], || Hat);
        add_markers(&mut world, &[1, 3, 7, 9, 10], || Health(100.0));
        add_markers(&mut world, &[3, 4, 6, 7, 8, 9, 11], || Glasses);

        let mut view = world.view::<(Human, Hat, Health, Glasses)>().unwrap();
        let found: Vec<_> =
            view.iter().map(|(entity, _)| entity.raw()).collect();

        assert_eq!(found, [3, 7, 9]);
    }

    #[test]
    fn writes_through_a_view_stick() {
        let mut world = World::new();

        world.register::<(Health, Hat)>().unwrap();
        add_markers(&mut world, &[1, 2, 3], || Health(10.0));
        add_markers(&mut world, &[2, 3], || Hat);

        {
            let mut view = world.view::<(Health, Hat)>().unwrap();

            for (_, (health, _)) in &mut view {
                health.0 += 1.0;
            }
        }

        assert_eq!(*world.get::<Health>(EntityId::new(1)).unwrap(), Health(10.0));
        assert_eq!(*world.get::<Health>(EntityId::new(2)).unwrap(), Health(11.0));
        assert_eq!(*world.get::<Health>(EntityId::new(3)).unwrap(), Health(11.0));
    }

    #[test]
    fn items_collected_across_iteration_stay_usable() {
        let mut world = World::new();

        world.register::<(Health, Hat)>().unwrap();
        add_markers(&mut world, &[1, 2, 3, 4], || Health(1.0));
        add_markers(&mut world, &[1, 2, 3, 4], || Hat);

        let mut view = world.view::<(Health, Hat)>().unwrap();
        let collected: Vec<&mut Health> =
            view.iter().map(|(_, (health, _))| health).collect();

        assert_eq!(collected.len(), 4);

        // items outlive the `next` calls that produced them
        for health in collected {
            health.0 += 1.0;
        }

        drop(view);

        for id in [1, 2, 3, 4] {
            assert_eq!(
                *world.get::<Health>(EntityId::new(id)).unwrap(),
                Health(2.0),
            );
        }
    }

    #[test]
    fn iter_can_run_twice_over_one_view() {
        let mut world = World::new();

        world.register::<(Human, Hat)>().unwrap();
        add_markers(&mut world, &[1, 2], || Human);
        add_markers(&mut world, &[2, 3], || Hat);

        let mut view = world.view::<(Human, Hat)>().unwrap();

        assert_eq!(view.iter().count(), 1);
        assert_eq!(view.iter().count(), 1);
    }

    #[test]
    fn empty_set_view_is_always_at_end() {
        let world = World::new();
        let mut view = world.view::<()>().unwrap();

        assert!(view.is_empty());
        assert!(view.iter().next().is_none());
    }
}
