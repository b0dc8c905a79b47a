//! Set-intersection algorithms over sorted entity id sequences.
//!
//! These free functions drive the cursors of a [`View`](crate::view::View):
//! each input is an ascending slice of [`EntityId`]s paired with a cursor
//! (an index into that slice), and the algorithms move the cursors forward
//! until all of them point at a common id.
//!
//! Two inputs use the classic sorted-merge walk, `O(n + m)`. Three or more
//! use an adaptive "max-skip" galloping strategy: each round computes the
//! maximum id under any cursor, then advances every lagging cursor to it,
//! linearly for small gaps (cache friendly) and by binary search once a gap
//! exceeds [`LINEAR_SCAN_LIMIT`]. Component sets are often heavily skewed in
//! size (one huge set against several small marker sets), which is where the
//! galloping pays off: `O(n log k)` for smallest-set size `n` and typical
//! skip distance `k`.
//!
//! On failure the cursors are left wherever the search stopped; callers
//! normalize to their own end state.

use crate::entity::EntityId;

/// Number of elements a lagging cursor scans linearly before switching to
/// binary search.
pub const LINEAR_SCAN_LIMIT: usize = 32;

/// Positions the cursors at the first common id.
///
/// Short-circuits if the cursors already agree. Returns `false` if there are
/// no sets or any cursor is already at the end of its set.
pub fn begin(sets: &[&[EntityId]], cursors: &mut [usize]) -> bool {
    debug_assert_eq!(sets.len(), cursors.len());

    if sets.is_empty() {
        return false;
    }

    for (set, &cursor) in sets.iter().zip(&*cursors) {
        if cursor >= set.len() {
            return false;
        }
    }

    if aligned(sets, cursors) {
        return true;
    }

    intersect(sets, cursors)
}

/// Moves the cursors to the next common id.
///
/// Every cursor is advanced by one position first, guaranteeing forward
/// progress even when all cursors already agree. Returns `false` if any
/// cursor runs off the end of its set.
///
/// Calling this with a cursor already at its end is outside the contract.
pub fn advance(sets: &[&[EntityId]], cursors: &mut [usize]) -> bool {
    debug_assert_eq!(sets.len(), cursors.len());

    if sets.is_empty() {
        return false;
    }

    for (set, cursor) in sets.iter().zip(cursors.iter_mut()) {
        debug_assert!(*cursor < set.len(), "cursor advanced past its set");

        *cursor += 1;

        if *cursor == set.len() {
            return false;
        }
    }

    if aligned(sets, cursors) {
        return true;
    }

    intersect(sets, cursors)
}

/// Converges the cursors on a common id, or reports failure.
///
/// Expects every cursor to be in bounds; [`begin`] and [`advance`] check
/// this before dispatching here.
pub fn intersect(sets: &[&[EntityId]], cursors: &mut [usize]) -> bool {
    match sets.len() {
        0 => false,
        // a lone in-bounds cursor is trivially converged
        1 => true,
        2 => merge(sets[0], sets[1], cursors),
        _ => gallop(sets, cursors),
    }
}

/// Returns `true` if all cursors point at the same id.
fn aligned(sets: &[&[EntityId]], cursors: &[usize]) -> bool {
    let first = sets[0][cursors[0]];

    sets.iter()
        .zip(cursors)
        .skip(1)
        .all(|(set, &cursor)| set[cursor] == first)
}

/// Classic 2-way sorted-merge intersection.
fn merge(a: &[EntityId], b: &[EntityId], cursors: &mut [usize]) -> bool {
    loop {
        if a[cursors[0]] < b[cursors[1]] {
            cursors[0] += 1;

            if cursors[0] == a.len() {
                return false;
            }
        } else if b[cursors[1]] < a[cursors[0]] {
            cursors[1] += 1;

            if cursors[1] == b.len() {
                return false;
            }
        } else {
            return true;
        }
    }
}

/// N-way adaptive max-skip galloping intersection.
fn gallop(sets: &[&[EntityId]], cursors: &mut [usize]) -> bool {
    loop {
        let mut max = sets[0][cursors[0]];

        for (set, &cursor) in sets.iter().zip(&*cursors).skip(1) {
            max = max.max(set[cursor]);
        }

        let mut all_at_max = true;

        for (set, cursor) in sets.iter().zip(cursors.iter_mut()) {
            if set[*cursor] >= max {
                continue;
            }

            all_at_max = false;

            let mut steps = 0;

            while steps < LINEAR_SCAN_LIMIT
                && *cursor < set.len()
                && set[*cursor] < max
            {
                *cursor += 1;
                steps += 1;
            }

            if *cursor < set.len() && set[*cursor] < max {
                // the gap is large, gallop the rest of the way
                *cursor += set[*cursor..].partition_point(|&id| id < max);
            }

            if *cursor == set.len() {
                return false;
            }
        }

        if all_at_max {
            return true;
        }
    }
}
