use super::RawTree;
use crate::raw::handle::Handle;
use crate::raw::node::{Children, Link};

/// The payload taken out of the tree by [`RawTree::remove_node`].
pub(crate) struct Removed<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// The position that followed the removed element, valid in the tree after removal.
    pub(crate) next: Link,
}

impl<K, V, P> RawTree<K, V, P> {
    /// Removes the element stored at `handle`.
    ///
    /// A node with at most one child is spliced out directly and its slot
    /// released. A node with two children keeps its slot: its in-order successor
    /// (the leftmost node of its right subtree, which has no left child) is
    /// spliced out instead and that successor's payload moves up into `handle`.
    /// In that case the successor's old handle becomes stale and `handle` itself
    /// is the returned `next` link.
    pub(crate) fn remove_node(&mut self, handle: Handle) -> Removed<K, V> {
        let removed = match self.node(handle).children() {
            Children::Leaf | Children::One(_) => {
                let next = self.successor(Link::Node(handle));
                self.unlink(handle);
                let (key, value) = self.nodes.take(handle).into_payload();
                self.refresh_bounds(handle);
                tracing::trace!(?handle, "spliced out node");
                Removed {
                    key,
                    value,
                    next,
                }
            }
            Children::Two {
                right,
            } => {
                let successor = self.leftmost(right);
                self.unlink(successor);
                let (succ_key, succ_value) = self.nodes.take(successor).into_payload();
                let (key, value) = self.node_mut(handle).replace_payload(succ_key, succ_value);
                if self.sentinel.max() == Some(successor) {
                    self.sentinel.set_max(Some(handle));
                }
                tracing::trace!(?handle, ?successor, "moved successor payload into node");
                Removed {
                    key,
                    value,
                    next: Link::Node(handle),
                }
            }
        };

        self.len -= 1;
        removed
    }

    /// Detaches a node that has at most one child, lifting that child into its place.
    fn unlink(&mut self, handle: Handle) {
        let node = self.node(handle);
        debug_assert!(
            node.left().is_none() || node.right().is_none(),
            "`RawTree::unlink()` - node has two children!"
        );
        let child = node.left().or(node.right());
        let parent = node.parent();

        if let Some(child) = child {
            self.node_mut(child).set_parent(parent);
        }
        match parent {
            Link::Sentinel => self.root = child,
            Link::Node(p) => {
                let side = self.node(p).side_of(handle);
                self.node_mut(p).set_child(side, child);
            }
        }
    }

    /// Recomputes whichever cached bound pointed at the node just released.
    fn refresh_bounds(&mut self, released: Handle) {
        let Some(root) = self.root else {
            self.sentinel.reset();
            return;
        };
        if self.sentinel.min() == Some(released) {
            self.sentinel.set_min(Some(self.leftmost(root)));
        }
        if self.sentinel.max() == Some(released) {
            self.sentinel.set_max(Some(self.rightmost(root)));
        }
    }
}
