use super::handle::Handle;

/// Where a parent link (or a cursor) points: a data node or the tree's sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Link {
    /// The `end()` anchor. Only ever the parent of the root.
    Sentinel,
    Node(Handle),
}

impl Link {
    #[inline]
    pub(crate) fn node(self) -> Option<Handle> {
        match self {
            Link::Sentinel => None,
            Link::Node(handle) => Some(handle),
        }
    }
}

impl From<Option<Handle>> for Link {
    fn from(handle: Option<Handle>) -> Self {
        handle.map_or(Link::Sentinel, Link::Node)
    }
}

/// Which child slot of a parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Shape of a node's children, used to pick the deletion case.
pub(crate) enum Children {
    Leaf,
    One(Handle),
    Two { right: Handle },
}

pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    // Observation only; ownership flows from the arena through `left`/`right`.
    parent: Link,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, parent: Link) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) fn key_value_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Link) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs from this node.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.right, Some(child), "`Node::side_of()` - `child` is not a child of this node!");
            Side::Right
        }
    }

    pub(crate) fn children(&self) -> Children {
        match (self.left, self.right) {
            (None, None) => Children::Leaf,
            (Some(only), None) | (None, Some(only)) => Children::One(only),
            (Some(_), Some(right)) => Children::Two {
                right,
            },
        }
    }

    /// Swaps in a new key/value payload, keeping links (and so the node's identity).
    pub(crate) fn replace_payload(&mut self, key: K, value: V) -> (K, V) {
        let key = core::mem::replace(&mut self.key, key);
        let value = core::mem::replace(&mut self.value, value);
        (key, value)
    }

    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_payload(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn children_shape() {
        let a = Handle::from_index(1);
        let b = Handle::from_index(2);
        let mut node = Node::new(5, (), Link::Sentinel);
        assert!(matches!(node.children(), Children::Leaf));

        node.set_child(Side::Right, Some(b));
        assert!(matches!(node.children(), Children::One(h) if h == b));
        assert_eq!(node.side_of(b), Side::Right);

        node.set_child(Side::Left, Some(a));
        assert!(matches!(node.children(), Children::Two { right } if right == b));
        assert_eq!(node.side_of(a), Side::Left);
    }

    #[test]
    fn replace_payload_keeps_links() {
        let parent = Link::Node(Handle::from_index(0));
        let mut node = Node::new("old", 1, parent);
        node.set_child(Side::Left, Some(Handle::from_index(3)));

        assert_eq!(node.replace_payload("new", 2), ("old", 1));
        assert_eq!(*node.key(), "new");
        assert_eq!(*node.value(), 2);
        assert_eq!(node.parent(), parent);
        assert_eq!(node.left(), Some(Handle::from_index(3)));
    }

    #[test]
    fn link_from_option() {
        assert_eq!(Link::from(None), Link::Sentinel);
        let h = Handle::from_index(4);
        assert_eq!(Link::from(Some(h)), Link::Node(h));
        assert_eq!(Link::Node(h).node(), Some(h));
        assert_eq!(Link::Sentinel.node(), None);
    }
}
