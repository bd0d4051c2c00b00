mod arena;
mod handle;
mod iter;
mod node;
mod raw_tree;
mod sentinel;

pub(crate) use handle::{Generation, Handle};
pub(crate) use iter::{RawIter, RawIterMut};
pub(crate) use node::Link;
pub(crate) use raw_tree::{AttachPoint, RawTree, Search};
