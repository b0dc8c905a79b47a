use thiserror::Error;

/// A fixed-capacity allocator of small integer indices.
///
/// Tracks free slots as a single `u32` bitmask (bit set = allocated), so
/// finding the lowest free index is one bit-scan instead of a pointer-chasing
/// free list. The capacity is fixed at 32 to fit one machine word.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeIndexList {
    mask: u32,
}

/// An error for when a [`FreeIndexList`] has no free indices left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free indices remain (capacity {})", FreeIndexList::CAPACITY)]
pub struct IndexExhausted;

impl FreeIndexList {
    /// Number of available indices.
    pub const CAPACITY: usize = u32::BITS as usize;

    /// Creates a list with all indices free.
    pub const fn new() -> Self {
        Self { mask: 0 }
    }

    /// Allocates the lowest-numbered free index.
    ///
    /// Returns an error if all indices are allocated.
    pub fn alloc(&mut self) -> Result<usize, IndexExhausted> {
        if self.is_full() {
            return Err(IndexExhausted);
        }

        let index = self.mask.trailing_ones() as usize;

        self.mask |= 1 << index;

        Ok(index)
    }

    /// Frees an index, making it available to [`FreeIndexList::alloc`] again.
    ///
    /// Freeing an index that isn't currently allocated is outside the
    /// contract; callers track their own allocations.
    pub fn free(&mut self, index: usize) {
        debug_assert!(
            self.mask & (1 << index) != 0,
            "freed index {index} that was not allocated",
        );

        self.mask &= !(1 << index);
    }

    /// Returns `true` if no indices are allocated.
    pub const fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Returns `true` if every index is allocated.
    ///
    /// The next call to [`FreeIndexList::alloc`] will fail.
    pub const fn is_full(&self) -> bool {
        self.mask == u32::MAX
    }

    /// The number of currently allocated indices.
    pub const fn count(&self) -> usize {
        self.mask.count_ones() as usize
    }
}
