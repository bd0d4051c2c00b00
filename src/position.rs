use core::num::NonZero;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::raw::{Generation, Link};

static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(1);

/// Identity of one tree instance, carried by every [`Position`] it hands out.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct TreeId(NonZero<usize>);

impl TreeId {
    pub(crate) fn next() -> Self {
        let id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZero::new(id).expect("`TreeId::next()` - tree id counter overflowed!"))
    }
}

/// A cursor into a tree: either an element or the `end()` position.
///
/// Positions are plain copyable values, like the iterators of node-based C++
/// containers. A position stays valid across insertions. It becomes stale when
/// its own element is erased, with one exception: erasing a node that has two
/// children moves the in-order successor into that node. The erased position
/// then names the successor, and the successor's old position is the one that
/// goes stale.
///
/// Using a stale position, or a position from a different collection, reports
/// [`Error::InvalidPosition`](crate::Error::InvalidPosition) instead of reading
/// another element.
///
/// Swapping two collections moves their positions along with their contents.
///
/// # Examples
///
/// ```
/// use bstree::TreeSet;
///
/// let set = TreeSet::from([5, 3, 8]);
/// let pos = set.find(&5);
/// assert_eq!(set.get_at(pos), Ok(&5));
///
/// let next = set.successor(pos).unwrap();
/// assert_eq!(set.get_at(next), Ok(&8));
/// assert!(set.successor(next).unwrap().is_end());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    tree: TreeId,
    link: Link,
    generation: Generation,
}

impl Position {
    pub(crate) fn new(tree: TreeId, link: Link, generation: Generation) -> Self {
        Self {
            tree,
            link,
            generation,
        }
    }

    /// Returns `true` if this is the `end()` position of its collection.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.link == Link::Sentinel
    }

    pub(crate) fn tree(&self) -> TreeId {
        self.tree
    }

    pub(crate) fn link(&self) -> Link {
        self.link
    }

    pub(crate) fn generation(&self) -> Generation {
        self.generation
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn tree_ids_are_distinct() {
        let a = TreeId::next();
        let b = TreeId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn end_positions_of_one_tree_compare_equal() {
        let tree = TreeId::next();
        let a = Position::new(tree, Link::Sentinel, Generation::default());
        let b = Position::new(tree, Link::Sentinel, Generation::default());
        assert_eq!(a, b);
        assert!(a.is_end());

        let other = Position::new(TreeId::next(), Link::Sentinel, Generation::default());
        assert_ne!(a, other);
    }
}
