use std::hash::Hasher;

/// A no-op hasher for keys that are already well-distributed `usize`s.
///
/// Used through `BuildHasherDefault` for the registry's [`ComponentId`]
/// keys, which are dense interned integers.
///
/// [`ComponentId`]: crate::component::ComponentId
#[derive(Default, Clone, Copy)]
pub struct UsizeHasher {
    inner: usize,
}

impl Hasher for UsizeHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.inner as u64
    }

    fn write(&mut self, _bytes: &[u8]) {
        unimplemented!("`UsizeHasher` only hashes `usize`-shaped keys");
    }

    #[inline(always)]
    fn write_usize(&mut self, i: usize) {
        self.inner = i;
    }
}
