use core::iter::FusedIterator;
use core::marker::PhantomData;

use alloc::vec;

use super::handle::Handle;
use super::node::Link;
use super::raw_tree::RawTree;

/// In-order walk over the half-open span `[front, back)` of a tree.
///
/// `back == Link::Sentinel` means "up to `end()`". Both ends stop at the
/// sentinel, so a walk never wraps around even though stepping is circular.
pub(crate) struct RawIter<'a, K, V, P> {
    tree: &'a RawTree<K, V, P>,
    front: Link,
    back: Link,
}

impl<K, V, P> Clone for RawIter<'_, K, V, P> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, K, V, P> RawIter<'a, K, V, P> {
    pub(crate) fn new(tree: &'a RawTree<K, V, P>, front: Link, back: Link) -> Self {
        Self {
            tree,
            front,
            back,
        }
    }

    /// The span `[front, back)`, cut off at `end()` when `back` comes before
    /// `front`, so both directions walk the same elements.
    pub(crate) fn between(tree: &'a RawTree<K, V, P>, front: Link, back: Link) -> Self {
        let back = if tree.in_order(front, back) { back } else { Link::Sentinel };
        Self::new(tree, front, back)
    }

    /// The whole tree, `begin()` to `end()`.
    pub(crate) fn full(tree: &'a RawTree<K, V, P>) -> Self {
        Self::new(tree, tree.begin(), Link::Sentinel)
    }

    #[cfg(test)]
    pub(crate) fn empty(tree: &'a RawTree<K, V, P>) -> Self {
        Self::new(tree, Link::Sentinel, Link::Sentinel)
    }
}

impl<'a, K, V, P> Iterator for RawIter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let Link::Node(handle) = self.front else {
            return None;
        };
        self.front = self.tree.successor(self.front);
        Some(self.tree.key_value(handle))
    }
}

impl<K, V, P> DoubleEndedIterator for RawIter<'_, K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        match self.tree.predecessor(self.back) {
            Link::Sentinel => {
                // Walked past the minimum: nothing is left on either side.
                self.front = self.back;
                None
            }
            Link::Node(handle) => {
                self.back = Link::Node(handle);
                Some(self.tree.key_value(handle))
            }
        }
    }
}

impl<K, V, P> FusedIterator for RawIter<'_, K, V, P> {}

/// Mutable in-order walk yielding each value exactly once.
///
/// The handles are collected up front so that no node is read again after a
/// `&mut` into it has been handed out.
pub(crate) struct RawIterMut<'a, K, V, P> {
    tree: *mut RawTree<K, V, P>,
    handles: vec::IntoIter<Handle>,
    _marker: PhantomData<&'a mut (K, V)>,
}

// SAFETY: RawIterMut behaves as &mut RawTree<K, V, P>, so it is Send when K and V are Send.
// It is NOT Sync because mutable iterators should not be shared across threads.
unsafe impl<K: Send, V: Send, P> Send for RawIterMut<'_, K, V, P> {}

impl<'a, K, V, P> RawIterMut<'a, K, V, P> {
    pub(crate) fn new(tree: &'a mut RawTree<K, V, P>) -> Self {
        let handles = tree.handles_in_order().into_iter();
        Self {
            tree: core::ptr::from_mut(tree),
            handles,
            _marker: PhantomData,
        }
    }
}

impl<'a, K, V, P> Iterator for RawIterMut<'a, K, V, P> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next()?;
        // SAFETY: The tree is exclusively borrowed for 'a and every handle is yielded once.
        let node = unsafe { RawTree::node_mut_ptr(self.tree, handle) };
        Some(node.key_value_mut())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<K, V, P> DoubleEndedIterator for RawIterMut<'_, K, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next_back()?;
        // SAFETY: See `next`.
        let node = unsafe { RawTree::node_mut_ptr(self.tree, handle) };
        Some(node.key_value_mut())
    }
}

impl<K, V, P> ExactSizeIterator for RawIterMut<'_, K, V, P> {}

impl<K, V, P> FusedIterator for RawIterMut<'_, K, V, P> {}
