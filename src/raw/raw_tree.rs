use core::borrow::Borrow;
use core::cmp::Ordering;
use core::marker::PhantomData;

use alloc::vec::Vec;

use super::arena::Arena;
use super::handle::{Generation, Handle};
use super::node::{Link, Node, Side};
use super::sentinel::Sentinel;
use crate::error::{Error, Result};
use crate::policy::DuplicatePolicy;
use crate::position::{Position, TreeId};

mod erase;

pub(crate) use erase::Removed;

/// The unbalanced binary search tree backing every collection in this crate.
///
/// Nodes live in an arena and link to each other by handle. `left`/`right`
/// are the owning edges of the tree; `parent` is an observer link whose
/// top-most value is the sentinel. No rebalancing is performed, so the height
/// is linear in the worst case (e.g. for sorted input) and every traversal
/// below is iterative.
pub(crate) struct RawTree<K, V, P> {
    /// Identity stamped into every position this tree hands out.
    id: TreeId,
    /// Arena owning all data nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// The `end()` anchor, caching the minimum and maximum nodes.
    sentinel: Sentinel,
    /// Number of data nodes reachable from `root`.
    len: usize,
    _policy: PhantomData<fn() -> P>,
}

/// Result of descending the tree for an insertion.
pub(crate) enum Search {
    /// An equal key blocks the insertion (unique-key mode only).
    Found(Handle),
    /// The key can be attached here.
    Vacant(AttachPoint),
}

/// An empty child slot found by a descent, plus whether a node attached there
/// becomes the new minimum or maximum.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AttachPoint {
    parent: Option<(Handle, Side)>,
    is_min: bool,
    is_max: bool,
}

impl<K, V, P> RawTree<K, V, P> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self {
            id: TreeId::next(),
            nodes: Arena::new(),
            root: None,
            sentinel: Sentinel::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            id: TreeId::next(),
            nodes: Arena::with_capacity(capacity),
            root: None,
            sentinel: Sentinel::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Upper bound on the number of elements, set by the handle width.
    pub(crate) const fn max_size() -> usize {
        Handle::MAX
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Returns a mutable reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTree<K, V, P>`.
    /// - The caller must have logical exclusive access to the node at `handle`.
    pub(crate) unsafe fn node_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut Node<K, V> {
        // SAFETY: We only access the `nodes` field, and the caller guarantees exclusivity
        // for this one slot.
        unsafe { Arena::get_mut_ptr(core::ptr::addr_of_mut!((*ptr).nodes), handle) }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// First position in order, or the sentinel when empty. O(1).
    pub(crate) fn begin(&self) -> Link {
        self.sentinel.min().into()
    }

    /// Last position in order, or the sentinel when empty. O(1).
    pub(crate) fn last(&self) -> Link {
        self.sentinel.max().into()
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.sentinel.min().map(|h| self.key_value(h))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.sentinel.max().map(|h| self.key_value(h))
    }

    #[inline]
    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), node.value())
    }

    // ─── Positions ───────────────────────────────────────────────────────────

    /// Stamps a link with this tree's identity and the slot's current generation.
    pub(crate) fn position(&self, link: Link) -> Position {
        let generation = link.node().map_or_else(Generation::default, |h| self.nodes.generation(h));
        Position::new(self.id, link, generation)
    }

    pub(crate) fn end_position(&self) -> Position {
        self.position(Link::Sentinel)
    }

    /// Checks that `pos` was handed out by this tree and still names a live slot.
    pub(crate) fn resolve(&self, pos: Position) -> Result<Link> {
        if pos.tree() != self.id {
            return Err(Error::InvalidPosition);
        }
        match pos.link() {
            Link::Sentinel => Ok(Link::Sentinel),
            Link::Node(handle) => match self.nodes.try_get(handle, pos.generation()) {
                Some(_) => Ok(Link::Node(handle)),
                None => Err(Error::InvalidPosition),
            },
        }
    }

    /// Like [`resolve`](Self::resolve), but `end()` is also rejected.
    pub(crate) fn resolve_node(&self, pos: Position) -> Result<Handle> {
        self.resolve(pos)?.node().ok_or(Error::InvalidPosition)
    }

    // ─── In-order stepping ───────────────────────────────────────────────────

    pub(crate) fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left() {
            handle = left;
        }
        handle
    }

    pub(crate) fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right() {
            handle = right;
        }
        handle
    }

    /// In-order successor. Circular through the sentinel: the successor of the
    /// maximum is the sentinel, and the successor of the sentinel is the minimum.
    pub(crate) fn successor(&self, link: Link) -> Link {
        let Link::Node(handle) = link else {
            return self.begin();
        };
        if let Some(right) = self.node(handle).right() {
            return Link::Node(self.leftmost(right));
        }
        self.ascend_from(handle, Side::Right)
    }

    /// In-order predecessor; the mirror image of [`successor`](Self::successor).
    pub(crate) fn predecessor(&self, link: Link) -> Link {
        let Link::Node(handle) = link else {
            return self.last();
        };
        if let Some(left) = self.node(handle).left() {
            return Link::Node(self.rightmost(left));
        }
        self.ascend_from(handle, Side::Left)
    }

    /// Climbs while `child` hangs from the `from` side of its parent, then
    /// returns that parent (the sentinel if the climb passes the root).
    fn ascend_from(&self, mut child: Handle, from: Side) -> Link {
        let mut parent = self.node(child).parent();
        while let Link::Node(p) = parent {
            if self.node(p).child(from) != Some(child) {
                break;
            }
            child = p;
            parent = self.node(p).parent();
        }
        parent
    }

    /// Handles of every node, in key order.
    pub(crate) fn handles_in_order(&self) -> Vec<Handle> {
        let mut handles = Vec::with_capacity(self.len);
        let mut link = self.begin();
        while let Link::Node(handle) = link {
            handles.push(handle);
            link = self.successor(link);
        }
        handles
    }

    /// Whether `front` comes no later than `back` in key order. The sentinel
    /// sorts after every node. O(h).
    pub(crate) fn in_order(&self, front: Link, back: Link) -> bool {
        match (front, back) {
            (_, Link::Sentinel) => true,
            (Link::Sentinel, Link::Node(_)) => false,
            (Link::Node(a), Link::Node(b)) => self.route(a) <= self.route(b),
        }
    }

    /// Turns taken from the root down to `handle`, closed by `Equal`.
    ///
    /// Routes compare lexicographically in the same order as their nodes.
    fn route(&self, mut handle: Handle) -> Vec<Ordering> {
        let mut route = Vec::new();
        while let Link::Node(parent) = self.node(handle).parent() {
            route.push(match self.node(parent).side_of(handle) {
                Side::Left => Ordering::Less,
                Side::Right => Ordering::Greater,
            });
            handle = parent;
        }
        route.reverse();
        route.push(Ordering::Equal);
        route
    }

    // ─── Insertion ───────────────────────────────────────────────────────────

    /// Links a new node at `point` and updates the size and cached bounds.
    pub(crate) fn attach(&mut self, point: AttachPoint, key: K, value: V) -> Handle {
        let parent = Link::from(point.parent.map(|(p, _)| p));
        let handle = self.nodes.alloc(Node::new(key, value, parent));

        match point.parent {
            None => {
                self.root = Some(handle);
                self.sentinel.set_only(handle);
            }
            Some((p, side)) => {
                self.node_mut(p).set_child(side, Some(handle));
                if point.is_min {
                    self.sentinel.set_min(Some(handle));
                }
                if point.is_max {
                    self.sentinel.set_max(Some(handle));
                }
            }
        }

        self.len += 1;
        handle
    }

    // ─── Teardown ────────────────────────────────────────────────────────────

    /// Releases every node, children before parents, without recursion.
    pub(crate) fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        tracing::trace!(len = self.len, "releasing tree");

        let mut stack = alloc::vec![root];
        while let Some(handle) = stack.pop() {
            let node = self.nodes.get_mut(handle);
            let (left, right) = (node.left(), node.right());
            if left.is_none() && right.is_none() {
                drop(self.nodes.take(handle));
                continue;
            }
            // Revisit this node once both subtrees are gone.
            node.set_child(Side::Left, None);
            node.set_child(Side::Right, None);
            stack.push(handle);
            stack.extend(left);
            stack.extend(right);
        }

        self.sentinel.reset();
        self.len = 0;
    }

    /// Moves every element out in key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let handles = self.handles_in_order();
        let drained = handles.into_iter().map(|h| self.nodes.take(h).into_payload()).collect();
        self.root = None;
        self.sentinel.reset();
        self.len = 0;
        drained
    }

    /// Exchanges the whole contents of two trees in O(1).
    ///
    /// The identity travels with the nodes, so positions keep naming the same
    /// elements under their new owner.
    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

impl<K: Ord, V, P: DuplicatePolicy> RawTree<K, V, P> {
    /// Descends from the root to where `key` belongs.
    ///
    /// Under the unique policy an equal key stops the descent. Under the multi
    /// policy equal keys go right, so a new duplicate lands after every equal
    /// element already present.
    pub(crate) fn search(&self, key: &K) -> Search {
        let Some(mut current) = self.root else {
            return Search::Vacant(AttachPoint {
                parent: None,
                is_min: true,
                is_max: true,
            });
        };

        let mut is_min = true;
        let mut is_max = true;
        loop {
            let node = self.node(current);
            let side = match key.cmp(node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal if P::ALLOW_DUPLICATES => Side::Right,
                Ordering::Equal => return Search::Found(current),
            };
            match side {
                Side::Left => is_max = false,
                Side::Right => is_min = false,
            }
            match node.child(side) {
                Some(child) => current = child,
                None => {
                    return Search::Vacant(AttachPoint {
                        parent: Some((current, side)),
                        is_min,
                        is_max,
                    });
                }
            }
        }
    }

    /// Inserts under the tree's duplicate policy.
    ///
    /// Returns the node holding `key` and whether it was newly created. When an
    /// equal key blocks insertion, the tree is untouched and the rejected
    /// key/value pair is dropped.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        match self.search(&key) {
            Search::Found(handle) => (handle, false),
            Search::Vacant(point) => (self.attach(point, key, value), true),
        }
    }

    /// Moves elements of `other` into `self`.
    ///
    /// Unique policy: elements whose key is already in `self` stay behind in
    /// `other`. Multi policy: everything moves and `other` ends up empty.
    pub(crate) fn merge(&mut self, other: &mut Self) {
        if P::ALLOW_DUPLICATES {
            let moved = other.len;
            for (key, value) in other.drain_to_vec() {
                self.insert(key, value);
            }
            tracing::trace!(moved, "merged all elements");
            return;
        }

        let movable: Vec<Handle> =
            other.handles_in_order().into_iter().filter(|&h| self.find(other.node(h).key()).is_none()).collect();
        let moved = movable.len();

        // Largest first: a two-child erase only pulls payload up from its
        // successor, which has then already been visited and is staying put.
        for handle in movable.into_iter().rev() {
            let removed = other.remove_node(handle);
            self.insert(removed.key, removed.value);
        }
        tracing::trace!(moved, kept = other.len, "merged non-colliding elements");
    }
}

impl<K: Ord, V, P> RawTree<K, V, P> {
    /// Standard descent; returns the first node found with an equal key.
    ///
    /// Equal keys only ever sit in the right subtree of an equal node, so in
    /// multi-key mode this is also the first equal element in order.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// First node whose key is not less than `key`, or the sentinel.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_by(|node_key| node_key.borrow() >= key)
    }

    /// First node whose key is strictly greater than `key`, or the sentinel.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_by(|node_key| node_key.borrow() > key)
    }

    /// Leftmost node satisfying `goes_left`, a predicate that is monotone in key order.
    fn bound_by<F>(&self, goes_left: F) -> Link
    where
        F: Fn(&K) -> bool,
    {
        let mut bound = Link::Sentinel;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            if goes_left(node.key()) {
                bound = Link::Node(handle);
                current = node.left();
            } else {
                current = node.right();
            }
        }
        bound
    }

    /// `(lower_bound, upper_bound)`; both are the same link when `key` is absent.
    pub(crate) fn equal_range<Q>(&self, key: &Q) -> (Link, Link)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Number of consecutive elements equal to `key`, counted from the lower bound.
    pub(crate) fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut count = 0;
        let mut link = self.lower_bound(key);
        while let Link::Node(handle) = link {
            if self.node(handle).key().borrow() != key {
                break;
            }
            count += 1;
            link = self.successor(link);
        }
        count
    }
}

impl<K, V, P> Drop for RawTree<K, V, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Clone + Ord, V: Clone, P: DuplicatePolicy> Clone for RawTree<K, V, P> {
    /// Deep copy by re-inserting every element in pre-order, which rebuilds the
    /// same shape. The copy gets a fresh identity.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        let mut stack: Vec<Handle> = self.root.into_iter().collect();
        while let Some(handle) = stack.pop() {
            let node = self.node(handle);
            copy.insert(node.key().clone(), node.value().clone());
            stack.extend(node.right());
            stack.extend(node.left());
        }
        copy
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use crate::policy::{Multi, Unique};
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use proptest::prelude::*;

    impl<K: Ord, V, P: DuplicatePolicy> RawTree<K, V, P> {
        /// Validates all structural invariants. Panics with a descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "Empty tree should have len 0");
                assert_eq!(self.sentinel, Sentinel::new(), "Empty tree should have no cached bounds");
                assert_eq!(self.nodes.len(), 0, "Empty tree should own no nodes");
                return;
            };

            if self.node(root).parent() != Link::Sentinel {
                errors.push("root's parent is not the sentinel".into());
            }

            // Pre-order walk checking parent back-links and the per-node ordering rule.
            let mut count = 0usize;
            let mut stack = alloc::vec![root];
            while let Some(handle) = stack.pop() {
                count += 1;
                let node = self.node(handle);
                for side in [Side::Left, Side::Right] {
                    let Some(child) = node.child(side) else { continue };
                    if self.node(child).parent() != Link::Node(handle) {
                        errors.push(alloc::format!("{:?} child {:?} of {:?} has a wrong parent link", side, child, handle));
                    }
                    let ordered = match (side, self.node(child).key().cmp(node.key())) {
                        (Side::Left, Ordering::Less) | (Side::Right, Ordering::Greater) => true,
                        (Side::Right, Ordering::Equal) => P::ALLOW_DUPLICATES,
                        _ => false,
                    };
                    if !ordered {
                        errors.push(alloc::format!("{:?} child {:?} of {:?} is out of order", side, child, handle));
                    }
                    stack.push(child);
                }
            }

            if count != self.len {
                errors.push(alloc::format!("len mismatch: self.len={}, reachable={}", self.len, count));
            }
            if self.nodes.len() != self.len {
                errors.push(alloc::format!("arena holds {} nodes, len is {}", self.nodes.len(), self.len));
            }

            // In-order walk must be non-decreasing (strictly increasing for unique keys).
            let handles = self.handles_in_order();
            if handles.len() != self.len {
                errors.push(alloc::format!("in-order walk visited {} of {} nodes", handles.len(), self.len));
            }
            for pair in handles.windows(2) {
                let ordering = self.node(pair[0]).key().cmp(self.node(pair[1]).key());
                if ordering == Ordering::Greater || (ordering == Ordering::Equal && !P::ALLOW_DUPLICATES) {
                    errors.push(alloc::format!("in-order walk out of order at {:?}", pair));
                }
            }

            if self.sentinel.min() != Some(self.leftmost(root)) {
                errors.push(alloc::format!("cached min {:?} is not the leftmost node", self.sentinel.min()));
            }
            if self.sentinel.max() != Some(self.rightmost(root)) {
                errors.push(alloc::format!("cached max {:?} is not the rightmost node", self.sentinel.max()));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        pub(crate) fn keys(&self) -> Vec<&K> {
            self.handles_in_order().into_iter().map(|h| self.node(h).key()).collect()
        }
    }

    fn unique_from(keys: &[i32]) -> RawTree<i32, i32, Unique> {
        let mut tree = RawTree::new();
        for &k in keys {
            tree.insert(k, k * 10);
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawTree<i32, (), Unique> = RawTree::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), Link::Sentinel);
        assert_eq!(tree.last(), Link::Sentinel);
        assert_eq!(tree.successor(Link::Sentinel), Link::Sentinel);
        assert_eq!(tree.predecessor(Link::Sentinel), Link::Sentinel);
        assert_eq!(tree.lower_bound(&1), Link::Sentinel);
        assert_eq!(tree.count(&1), 0);
    }

    #[test]
    fn insert_sorts_and_rejects_duplicates() {
        let mut tree = unique_from(&[5, 3, 8, 1, 4, 7, 9]);
        tree.validate_invariants();
        assert_eq!(tree.keys(), [&1, &3, &4, &5, &7, &8, &9]);

        let existing = tree.find(&4).unwrap();
        assert_eq!(tree.insert(4, 0), (existing, false));
        assert_eq!(tree.len(), 7);
        assert_eq!(*tree.node(existing).value(), 40, "blocked insert leaves the value alone");
    }

    #[test]
    fn stepping_is_circular_through_the_sentinel() {
        let tree = unique_from(&[2, 1, 3]);
        let min = tree.find(&1).unwrap();
        let max = tree.find(&3).unwrap();

        assert_eq!(tree.begin(), Link::Node(min));
        assert_eq!(tree.successor(Link::Node(max)), Link::Sentinel);
        assert_eq!(tree.successor(Link::Sentinel), Link::Node(min));
        assert_eq!(tree.predecessor(Link::Node(min)), Link::Sentinel);
        assert_eq!(tree.predecessor(Link::Sentinel), Link::Node(max));
    }

    #[test]
    fn bounds_on_unique_keys() {
        let tree = unique_from(&[10, 20, 30]);
        let at = |k| Link::Node(tree.find(&k).unwrap());

        assert_eq!(tree.lower_bound(&20), at(20));
        assert_eq!(tree.upper_bound(&20), at(30));
        assert_eq!(tree.lower_bound(&15), at(20));
        assert_eq!(tree.upper_bound(&15), at(20));
        assert_eq!(tree.lower_bound(&5), at(10));
        assert_eq!(tree.lower_bound(&31), Link::Sentinel);
        assert_eq!(tree.upper_bound(&30), Link::Sentinel);
        assert_eq!(tree.equal_range(&25), (at(30), at(30)));
    }

    #[test]
    fn duplicates_go_right_and_are_counted() {
        let mut tree: RawTree<i32, usize, Multi> = RawTree::new();
        for (order, key) in [2, 2, 2, 1, 3].into_iter().enumerate() {
            let (_, inserted) = tree.insert(key, order);
            assert!(inserted);
        }
        tree.validate_invariants();

        assert_eq!(tree.count(&2), 3);
        assert_eq!(tree.count(&4), 0);

        let (lower, upper) = tree.equal_range(&2);
        assert_eq!(lower, Link::Node(tree.find(&2).unwrap()), "find returns the first duplicate");
        let mut link = lower;
        let mut insertion_order = Vec::new();
        while link != upper {
            insertion_order.push(*tree.node(link.node().unwrap()).value());
            link = tree.successor(link);
        }
        assert_eq!(insertion_order, [0, 1, 2], "duplicates keep insertion order");
        assert_eq!(*tree.node(upper.node().unwrap()).key(), 3);
    }

    #[test]
    fn clear_releases_everything() {
        let mut tree = unique_from(&[4, 2, 6, 1, 3, 5, 7]);
        tree.clear();
        tree.validate_invariants();
        assert!(tree.is_empty());

        tree.insert(1, 1);
        tree.validate_invariants();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn deep_degenerate_tree_is_handled_iteratively() {
        // Sorted input degrades the tree into a single right spine.
        let mut tree: RawTree<u32, (), Unique> = RawTree::new();
        for k in 0..5_000 {
            tree.insert(k, ());
        }
        assert_eq!(tree.count(&4_999), 1);
        let copy = tree.clone();
        assert_eq!(copy.len(), 5_000);
        tree.clear();
        assert!(tree.is_empty());
    }

    #[test]
    fn clone_rebuilds_the_same_shape() {
        let tree = unique_from(&[5, 3, 8, 1, 4, 7, 9]);
        let copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(copy.keys(), tree.keys());

        let root = copy.root().unwrap();
        assert_eq!(*copy.node(root).key(), 5);
        assert_eq!(copy.node(root).left().map(|h| *copy.node(h).key()), Some(3));
        assert_eq!(copy.node(root).right().map(|h| *copy.node(h).key()), Some(8));
    }

    #[test]
    fn swap_exchanges_identity_with_contents() {
        let mut a = unique_from(&[1, 2]);
        let mut b = unique_from(&[9]);
        let pos = a.position(Link::Node(a.find(&2).unwrap()));

        a.swap(&mut b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
        assert!(a.resolve(pos).is_err());
        let handle = b.resolve_node(pos).unwrap();
        assert_eq!(*b.node(handle).key(), 2);
    }

    #[test]
    fn unique_merge_leaves_collisions_behind() {
        let mut a = unique_from(&[1, 2, 3]);
        let mut b = unique_from(&[3, 4, 5]);
        a.merge(&mut b);
        a.validate_invariants();
        b.validate_invariants();
        assert_eq!(a.keys(), [&1, &2, &3, &4, &5]);
        assert_eq!(b.keys(), [&3]);
    }

    #[test]
    fn multi_merge_moves_everything() {
        let mut a: RawTree<i32, (), Multi> = RawTree::new();
        let mut b: RawTree<i32, (), Multi> = RawTree::new();
        for k in [1, 2, 3] {
            a.insert(k, ());
        }
        for k in [3, 3, 0] {
            b.insert(k, ());
        }
        a.merge(&mut b);
        a.validate_invariants();
        b.validate_invariants();
        assert_eq!(a.keys(), [&0, &1, &2, &3, &3, &3]);
        assert!(b.is_empty());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..200).prop_map(Op::Insert),
            2 => (0i32..200).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn unique_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawTree<i32, i32, Unique> = RawTree::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let (_, inserted) = tree.insert(key, key * 2);
                        prop_assert_eq!(inserted, !model.contains_key(&key));
                        model.entry(key).or_insert(key * 2);
                    }
                    Op::Remove(key) => {
                        let removed = tree.find(&key).map(|h| tree.remove_node(h).value);
                        prop_assert_eq!(removed, model.remove(&key));
                    }
                }
                tree.validate_invariants();
            }

            let keys: Vec<i32> = tree.keys().into_iter().copied().collect();
            let expected: Vec<i32> = model.keys().copied().collect();
            prop_assert_eq!(keys, expected);
        }

        #[test]
        fn multi_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawTree<i32, (), Multi> = RawTree::new();
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key % 20, ());
                        let at = model.partition_point(|&k| k <= key % 20);
                        model.insert(at, key % 20);
                    }
                    Op::Remove(key) => {
                        if let Some(h) = tree.find(&(key % 20)) {
                            tree.remove_node(h);
                            let at = model.binary_search(&(key % 20)).unwrap();
                            model.remove(at);
                        } else {
                            prop_assert!(model.binary_search(&(key % 20)).is_err());
                        }
                    }
                }
                tree.validate_invariants();
                for probe in [0, 7, 19] {
                    prop_assert_eq!(tree.count(&probe), model.iter().filter(|&&k| k == probe).count());
                }
            }
        }
    }
}
