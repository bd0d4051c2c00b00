use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::vec::{self, Vec};

use crate::error::{Error, Result};
use crate::policy::Unique;
use crate::position::Position;
use crate::raw::{Link, RawIter, RawIterMut, RawTree};

mod capacity;
mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// An ordered map based on an unbalanced binary search tree.
///
/// Keys are unique and kept in [`Ord`] order. Every element is addressable by a
/// [`Position`], a copyable cursor that can be stepped in both directions
/// (circularly through [`end`](TreeMap::end)). Positions survive insertions.
/// Erasing a node with two children moves its in-order successor into it, so
/// the erased position then names the successor and the successor's own
/// position goes stale; see [`erase`](TreeMap::erase).
///
/// The tree is never rebalanced, so lookups and insertions take time
/// proportional to its height: logarithmic for random keys, linear for keys
/// inserted in sorted order. All traversals are iterative, so a degenerate tree
/// costs time but never stack.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `TreeMap` that observed the logic error and not result in undefined behavior.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use bstree::TreeMap;
///
/// let mut movie_reviews = TreeMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert("The Godfather", "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains("Les Misérables") {
///     println!("We've got {} reviews, but Les Misérables ain't one.", movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's overwrite it.
/// movie_reviews.insert_or_assign("The Blues Brothers", "Eye liked it a lot.");
///
/// // delete a review.
/// movie_reviews.remove("The Blues Brothers");
///
/// // look up the values associated with some keys.
/// for movie in ["Pulp Fiction", "Up"] {
///     match movie_reviews.get(movie) {
///         Some(review) => println!("{movie}: {review}"),
///         None => println!("{movie} is unreviewed."),
///     }
/// }
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// A `TreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use bstree::TreeMap;
///
/// let solar_distance = TreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// ```
pub struct TreeMap<K, V> {
    raw: RawTree<K, V, Unique>,
}

/// An iterator over the entries of a `TreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`TreeMap`].
///
/// [`iter`]: TreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V, Unique>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `TreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`TreeMap`].
///
/// [`iter_mut`]: TreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    inner: RawIterMut<'a, K, V, Unique>,
}

/// An owning iterator over the entries of a `TreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`TreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `TreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`TreeMap`].
///
/// [`keys`]: TreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `TreeMap`.
///
/// This `struct` is created by the [`values`] method on [`TreeMap`].
///
/// [`values`]: TreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `TreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`TreeMap`].
///
/// [`values_mut`]: TreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An iterator over the half-open span between two positions of a `TreeMap`.
///
/// This `struct` is created by the [`iter_between`] method on [`TreeMap`].
///
/// [`iter_between`]: TreeMap::iter_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V> {
    inner: RawIter<'a, K, V, Unique>,
}

impl<K, V> TreeMap<K, V> {
    /// Makes a new, empty `TreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> TreeMap<K, V> {
        TreeMap {
            raw: RawTree::new(),
        }
    }

    /// Clears the map, removing all elements.
    ///
    /// Every outstanding position other than `end()` becomes stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut a = TreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of elements the map can ever hold.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map: TreeMap<u8, u8> = TreeMap::new();
    /// assert!(map.max_size() >= 1 << 16);
    /// ```
    #[must_use]
    pub const fn max_size(&self) -> usize {
        RawTree::<K, V, Unique>::max_size()
    }

    /// Returns the position of the first element, or [`end`](Self::end) if
    /// the map is empty.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.begin())
    }

    /// Returns the past-the-end position. It names no element.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = TreeMap::new();
    /// assert_eq!(map.begin(), map.end());
    /// assert!(map.end().is_end());
    /// ```
    #[must_use]
    pub fn end(&self) -> Position {
        self.raw.end_position()
    }

    /// Returns the entry at `pos`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `pos` is `end()`, stale, or from another collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::{Error, TreeMap};
    ///
    /// let map = TreeMap::from([(1, "a")]);
    /// assert_eq!(map.get_at(map.begin()), Ok((&1, &"a")));
    /// assert_eq!(map.get_at(map.end()), Err(Error::InvalidPosition));
    /// ```
    pub fn get_at(&self, pos: Position) -> Result<(&K, &V)> {
        let handle = self.raw.resolve_node(pos)?;
        Ok(self.raw.key_value(handle))
    }

    /// Returns the key and a mutable reference to the value at `pos`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `pos` is `end()`, stale, or from another collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::from([(1, "a")]);
    /// let pos = map.find(&1);
    /// if let Ok((_, v)) = map.get_at_mut(pos) {
    ///     *v = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_at_mut(&mut self, pos: Position) -> Result<(&K, &mut V)> {
        let handle = self.raw.resolve_node(pos)?;
        Ok(self.raw.node_mut(handle).key_value_mut())
    }

    /// Returns the position following `pos` in key order.
    ///
    /// Stepping is circular: the successor of the last element is `end()`,
    /// and the successor of `end()` is the first element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `pos` is stale or from another collection.
    pub fn successor(&self, pos: Position) -> Result<Position> {
        let link = self.raw.resolve(pos)?;
        Ok(self.raw.position(self.raw.successor(link)))
    }

    /// Returns the position preceding `pos` in key order.
    ///
    /// Stepping is circular: the predecessor of the first element is `end()`,
    /// and the predecessor of `end()` is the last element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `pos` is stale or from another collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map = TreeMap::from([(1, 'a'), (2, 'b')]);
    /// let last = map.predecessor(map.end()).unwrap();
    /// assert_eq!(map.get_at(last), Ok((&2, &'b')));
    /// ```
    pub fn predecessor(&self, pos: Position) -> Result<Position> {
        let link = self.raw.resolve(pos)?;
        Ok(self.raw.position(self.raw.predecessor(link)))
    }

    /// Removes the element at `pos` and returns the position of the element
    /// that followed it (`end()` if it was the last one).
    ///
    /// `pos` becomes stale, except when the erased node had two children: then
    /// its in-order successor is moved into its place, the returned position
    /// equals `pos`, and the successor's old position becomes stale instead.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if `pos` is `end()`, stale, or from another
    /// collection. The map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let next = map.erase(map.find(&2)).unwrap();
    /// assert_eq!(map.get_at(next), Ok((&3, &"c")));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<Position> {
        let handle = self.raw.resolve_node(pos)?;
        let removed = self.raw.remove_node(handle);
        Ok(self.raw.position(removed.next))
    }

    /// Moves all elements of `other` that are not already in `self` into
    /// `self`. Entries whose key collides stay behind in `other`.
    ///
    /// Positions into `other` must not be used afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut a = TreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut b = TreeMap::from([(3, "x"), (4, "d"), (5, "e")]);
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a.len(), 5);
    /// assert_eq!(a[&3], "c");
    /// assert_eq!(b.into_iter().collect::<Vec<_>>(), [(3, "x")]);
    /// ```
    pub fn merge(&mut self, other: &mut Self)
    where
        K: Ord,
    {
        self.raw.merge(&mut other.raw);
    }

    /// Exchanges the contents of two maps. Positions follow their elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: RawIter::full(&self.raw),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: RawIterMut::new(&mut self.raw),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let a = TreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.iter(),
        }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.iter(),
        }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut a = TreeMap::from([(1, String::from("hello")), (2, String::from("goodbye"))]);
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"), String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Gets an iterator over the half-open span `[first, last)` of positions.
    ///
    /// If `last` comes before `first`, iteration runs from `first` to the end
    /// of the map, from either direction.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if either position is stale or from another collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map = TreeMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    /// let span = map.iter_between(map.lower_bound(&2), map.upper_bound(&3)).unwrap();
    /// assert_eq!(span.map(|(k, _)| *k).collect::<Vec<_>>(), [2, 3]);
    /// ```
    pub fn iter_between(&self, first: Position, last: Position) -> Result<Range<'_, K, V>> {
        let front = self.raw.resolve(first)?;
        let back = self.raw.resolve(last)?;
        Ok(Range {
            inner: RawIter::between(&self.raw, front, back),
        })
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns the position of the element with that key and whether the
    /// insertion took place. An existing value is never overwritten; see
    /// [`insert_or_assign`](Self::insert_or_assign) for that.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// let (pos, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    ///
    /// let (again, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(pos, again);
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let (handle, inserted) = self.raw.insert(key, value);
        (self.raw.position(Link::Node(handle)), inserted)
    }

    /// Inserts each pair in turn, as [`insert`](Self::insert) does, and
    /// returns one `(position, inserted)` result per pair.
    ///
    /// A pair whose key is already present (including one inserted earlier in
    /// the same batch) is dropped and leaves the stored value alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::from([(2, 'b')]);
    /// let results = map.insert_many([(1, 'a'), (2, 'x'), (3, 'c'), (1, 'y')]);
    ///
    /// let inserted: Vec<bool> = results.iter().map(|&(_, inserted)| inserted).collect();
    /// assert_eq!(inserted, [true, false, true, false]);
    /// assert_eq!(results[0].0, results[3].0);
    /// assert_eq!(map.values().copied().collect::<String>(), "abc");
    /// ```
    pub fn insert_many<I>(&mut self, pairs: I) -> Vec<(Position, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter().map(|(key, value)| self.insert(key, value)).collect()
    }

    /// Inserts a key-value pair, or overwrites the value of an existing key in
    /// place. The element keeps its position either way.
    ///
    /// Returns the position of the element and `true` if it was newly inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// let (pos, inserted) = map.insert_or_assign(37, "a");
    /// assert!(inserted);
    ///
    /// let (again, inserted) = map.insert_or_assign(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(pos, again);
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        match self.entry(key) {
            Entry::Occupied(mut o) => {
                o.insert(value);
                (o.position(), false)
            }
            Entry::Vacant(v) => (v.insert_at(value), true),
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut letters: TreeMap<char, usize> = TreeMap::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.get_or_insert_default(ch) += 1;
    /// }
    /// assert_eq!(letters[&'s'], 2);
    /// assert_eq!(letters[&'t'], 3);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut count: TreeMap<&str, usize> = TreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        Entry::new(&mut self.raw, key)
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::{Error, TreeMap};
    ///
    /// let map = TreeMap::from([(1, "a")]);
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).map(|h| self.raw.node(h).value())
    }

    /// Returns the key-value pair corresponding to the supplied key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).map(|h| self.raw.key_value(h))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map = TreeMap::from([(1, "a")]);
    /// assert!(map.contains(&1));
    /// assert!(!map.contains(&2));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).is_some()
    }

    /// Returns the position of the element with the given key, or `end()` if
    /// there is none.
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.find(key).into())
    }

    /// Returns the number of elements with the given key: 0 or 1.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count(key)
    }

    /// Returns the position of the first element whose key is not less than
    /// `key`, or `end()` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map = TreeMap::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(map.get_at(map.lower_bound(&15)), Ok((&20, &'b')));
    /// assert_eq!(map.get_at(map.lower_bound(&20)), Ok((&20, &'b')));
    /// assert!(map.lower_bound(&31).is_end());
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.lower_bound(key))
    }

    /// Returns the position of the first element whose key is greater than
    /// `key`, or `end()` if there is none.
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.upper_bound(key))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    ///
    /// Both positions are equal when the key is absent.
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (lower, upper) = self.raw.equal_range(key);
        (self.raw.position(lower), self.raw.position(upper))
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(key)?;
        let removed = self.raw.remove_node(handle);
        Some((removed.key, removed.value))
    }
}

impl<K: Clone + Ord, V: Clone> Clone for TreeMap<K, V> {
    fn clone(&self) -> Self {
        TreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for TreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for TreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        TreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = TreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for TreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut TreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map = TreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        let entries = self.raw.drain_to_vec();
        IntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for TreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `TreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for TreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.inner.len()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `tree_map::IntoIter`.
    ///
    /// ```
    /// # use bstree::tree_map;
    /// let iter: tree_map::IntoIter<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: vec::IntoIter::default(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.len()).finish()
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn positions_survive_erasure_of_leaves_and_chain_links() {
        let mut map: TreeMap<i32, char> = (1..=7).zip('a'..).collect();
        let six = map.find(&6);
        map.erase(map.find(&2)).unwrap();
        map.erase(map.find(&7)).unwrap();
        assert_eq!(map.get_at(six), Ok((&6, &'f')));
    }

    #[test]
    fn insert_many_reports_each_pair() {
        let mut map = TreeMap::from([(5, "five")]);
        let results = map.insert_many([(3, "three"), (5, "FIVE"), (7, "seven"), (3, "THREE")]);

        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().map(|&(_, inserted)| inserted).collect::<Vec<_>>(), [true, false, true, false]);
        assert_eq!(results[1].0, map.find(&5));
        assert_eq!(results[3].0, results[0].0);
        assert_eq!(map.get_at(results[2].0), Ok((&7, &"seven")));
        assert_eq!(map.values().copied().collect::<Vec<_>>(), ["three", "five", "seven"]);

        assert!(map.insert_many(core::iter::empty()).is_empty());
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn positions_reject_other_maps_and_stale_slots() {
        let mut a = TreeMap::from([(1, 1)]);
        let b = TreeMap::from([(1, 1)]);
        assert_eq!(a.get_at(b.begin()), Err(Error::InvalidPosition));
        assert_eq!(a.successor(b.end()), Err(Error::InvalidPosition));

        let pos = a.begin();
        assert_eq!(a.erase(pos), Ok(a.end()));
        assert_eq!(a.erase(pos), Err(Error::InvalidPosition));

        // The slot is recycled by the next insertion; the old position stays stale.
        a.insert(2, 2);
        assert_eq!(a.get_at(pos), Err(Error::InvalidPosition));
    }

    #[test]
    fn erase_end_is_rejected_without_change() {
        let mut map = TreeMap::from([(1, "a")]);
        assert_eq!(map.erase(map.end()), Err(Error::InvalidPosition));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn insert_or_assign_overwrites_in_place() {
        let mut map: TreeMap<String, i32> = TreeMap::new();
        let (pos, inserted) = map.insert_or_assign(String::from("k"), 1);
        assert!(inserted);
        let (again, inserted) = map.insert_or_assign(String::from("k"), 2);
        assert!(!inserted);
        assert_eq!(pos, again);
        assert_eq!(map.at("k"), Ok(&2));
    }

    #[test]
    fn mutable_iteration_both_ends() {
        let mut map: TreeMap<i32, i32> = (0..10).map(|k| (k, 0)).collect();
        let mut iter = map.iter_mut();
        assert_eq!(iter.len(), 10);
        *iter.next_back().unwrap().1 = 9;
        for (k, v) in iter {
            *v = *k;
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn mem_take_leaves_an_empty_map() {
        let mut map = TreeMap::from([(1, 1), (2, 2)]);
        let moved = core::mem::take(&mut map);
        assert!(map.is_empty());
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn debug_formats_like_a_map() {
        let map = TreeMap::from([(2, 'b'), (1, 'a')]);
        assert_eq!(alloc::format!("{map:?}"), "{1: 'a', 2: 'b'}");
        assert_eq!(alloc::format!("{:?}", map.keys()), "[1, 2]");
    }
}
