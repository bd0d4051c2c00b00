use core::fmt;

use crate::policy::Unique;
use crate::position::Position;
use crate::raw::{AttachPoint, Handle, Link, RawTree, Search};

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`crate::TreeMap`].
///
/// # Examples
///
/// ```
/// use bstree::TreeMap;
/// use bstree::tree_map::Entry;
///
/// let mut map = TreeMap::new();
///
/// match map.entry("oz") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["oz"], 1);
/// ```
///
/// [`entry`]: crate::TreeMap::entry
pub enum Entry<'a, K: 'a, V: 'a> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant entry in a `TreeMap`.
/// It is part of the [`Entry`] enum.
///
/// The empty child slot the key belongs in is found once, when the entry is
/// created; inserting through the entry does not search again.
pub struct VacantEntry<'a, K, V> {
    key: K,
    point: AttachPoint,
    tree: &'a mut RawTree<K, V, Unique>,
}

impl<K: fmt::Debug, V> fmt::Debug for VacantEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// A view into an occupied entry in a `TreeMap`.
/// It is part of the [`Entry`] enum.
///
/// # Examples
///
/// ```
/// use bstree::TreeMap;
/// use bstree::tree_map::Entry;
///
/// let mut map = TreeMap::new();
/// map.insert("oz", 1);
///
/// if let Entry::Occupied(mut o) = map.entry("oz") {
///     *o.get_mut() += 1;
/// }
/// assert_eq!(map["oz"], 2);
/// ```
pub struct OccupiedEntry<'a, K, V> {
    handle: Handle,
    tree: &'a mut RawTree<K, V, Unique>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OccupiedEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    pub(crate) fn new(tree: &'a mut RawTree<K, V, Unique>, key: K) -> Self {
        match tree.search(&key) {
            Search::Found(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree,
            }),
            Search::Vacant(point) => Entry::Vacant(VacantEntry {
                key,
                point,
                tree,
            }),
        }
    }

    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map: TreeMap<&str, usize> = TreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// assert_eq!(map["poneyland"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default function if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Like [`or_insert_with`](Self::or_insert_with), but the default function
    /// receives a reference to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map: TreeMap<&str, usize> = TreeMap::new();
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["poneyland"], 9);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(&v.key);
                v.insert(value)
            }
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map: TreeMap<&str, usize> = TreeMap::new();
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 42);
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 43);
    /// ```
    #[must_use]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(o) = &mut self {
            f(o.get_mut());
        }
        self
    }

    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    /// use bstree::tree_map::Entry;
    ///
    /// let mut map: TreeMap<&str, usize> = TreeMap::new();
    ///
    /// if let Entry::Vacant(v) = map.entry("poneyland") {
    ///     assert_eq!(v.into_key(), "poneyland");
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let tree = self.tree;
        let handle = tree.attach(self.point, self.key, value);
        tree.node_mut(handle).value_mut()
    }

    /// Sets the value of the entry and returns the position of the new element.
    pub(crate) fn insert_at(self, value: V) -> Position {
        let handle = self.tree.attach(self.point, self.key, value);
        self.tree.position(Link::Node(handle))
    }
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        self.tree.node(self.handle).key()
    }

    /// Returns the position of this entry's element.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    /// use bstree::tree_map::Entry;
    ///
    /// let mut map = TreeMap::from([(1, "a")]);
    /// let pos = match map.entry(1) {
    ///     Entry::Occupied(o) => o.position(),
    ///     Entry::Vacant(_) => unreachable!(),
    /// };
    /// assert_eq!(pos, map.find(&1));
    /// ```
    #[must_use]
    pub fn position(&self) -> Position {
        self.tree.position(Link::Node(self.handle))
    }

    /// Take ownership of the key and value from the map.
    pub fn remove_entry(self) -> (K, V) {
        let removed = self.tree.remove_node(self.handle);
        (removed.key, removed.value)
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.tree.node(self.handle).value()
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`](Self::into_mut).
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.node_mut(self.handle).value_mut()
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut V {
        let tree = self.tree;
        tree.node_mut(self.handle).value_mut()
    }

    /// Sets the value of the entry, and returns the entry's old value.
    ///
    /// The element keeps its key and its position.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    /// use bstree::tree_map::Entry;
    ///
    /// let mut map: TreeMap<&str, usize> = TreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("poneyland") {
    ///     assert_eq!(o.insert(15), 12);
    /// }
    /// assert_eq!(map["poneyland"], 15);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        self.tree.node_mut(self.handle).replace_value(value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
