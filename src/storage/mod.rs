pub use self::free_list::*;
pub(crate) use self::usize_hasher::*;

mod free_list;
mod usize_hasher;
