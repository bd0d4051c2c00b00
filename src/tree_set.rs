use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use alloc::vec;

use crate::error::Result;
use crate::policy::Unique;
use crate::position::Position;
use crate::raw::{Link, RawIter, RawTree};

mod capacity;

/// An ordered set based on an unbalanced binary search tree.
///
/// See [`TreeMap`](crate::TreeMap)'s documentation for a discussion of positions,
/// their stability, and the cost of an unbalanced tree.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set.
///
/// # Examples
///
/// ```
/// use bstree::TreeSet;
///
/// let mut books = TreeSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove("The Odyssey");
///
/// // Iterate over everything.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A `TreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use bstree::TreeSet;
///
/// let set = TreeSet::from([1, 2, 3]);
/// ```
pub struct TreeSet<T> {
    raw: RawTree<T, (), Unique>,
}

/// An iterator over the items of a `TreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`TreeSet`].
///
/// [`iter`]: TreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: RawIter<'a, T, (), Unique>,
    remaining: usize,
}

/// An owning iterator over the items of a `TreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`TreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: TreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: vec::IntoIter<(T, ())>,
}

/// An iterator over the half-open span between two positions of a `TreeSet`.
///
/// This `struct` is created by the [`iter_between`] method on [`TreeSet`].
///
/// [`iter_between`]: TreeSet::iter_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T> {
    inner: RawIter<'a, T, (), Unique>,
}

impl<T> TreeSet<T> {
    /// Makes a new, empty `TreeSet`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut set: TreeSet<i32> = TreeSet::new();
    /// ```
    #[must_use]
    pub fn new() -> TreeSet<T> {
        TreeSet {
            raw: RawTree::new(),
        }
    }

    /// Clears the set, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut v = TreeSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of elements the set can ever hold.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        RawTree::<T, (), Unique>::max_size()
    }

    /// Returns the position of the smallest element, or `end()` if the set is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.begin())
    }

    /// Returns the past-the-end position.
    #[must_use]
    pub fn end(&self) -> Position {
        self.raw.end_position()
    }

    /// Returns the element at `pos`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if `pos` is
    /// `end()`, stale, or from another collection.
    pub fn get_at(&self, pos: Position) -> Result<&T> {
        let handle = self.raw.resolve_node(pos)?;
        Ok(self.raw.node(handle).key())
    }

    /// Returns the position after `pos`, wrapping from the largest element to
    /// `end()` and from `end()` to the smallest element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if `pos` is
    /// stale or from another collection.
    pub fn successor(&self, pos: Position) -> Result<Position> {
        let link = self.raw.resolve(pos)?;
        Ok(self.raw.position(self.raw.successor(link)))
    }

    /// Returns the position before `pos`, wrapping from the smallest element to
    /// `end()` and from `end()` to the largest element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if `pos` is
    /// stale or from another collection.
    pub fn predecessor(&self, pos: Position) -> Result<Position> {
        let link = self.raw.resolve(pos)?;
        Ok(self.raw.position(self.raw.predecessor(link)))
    }

    /// Removes the element at `pos` and returns the position of the element
    /// that followed it.
    ///
    /// See [`TreeMap::erase`](crate::TreeMap::erase) for which positions stay valid.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if `pos` is
    /// `end()`, stale, or from another collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut set = TreeSet::from([5, 3, 8, 1, 4, 7, 9]);
    /// let next = set.erase(set.find(&5)).unwrap();
    /// assert_eq!(set.get_at(next), Ok(&7));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<Position> {
        let handle = self.raw.resolve_node(pos)?;
        let removed = self.raw.remove_node(handle);
        Ok(self.raw.position(removed.next))
    }

    /// Exchanges the contents of two sets in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first_key_value().map(|(k, ())| k)
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last_key_value().map(|(k, ())| k)
    }

    /// Gets an iterator that visits the elements in the `TreeSet` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let set = TreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: RawIter::full(&self.raw),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the half-open span `[first, last)` of positions.
    ///
    /// If `last` comes before `first`, iteration runs from `first` to the end
    /// of the collection, from either direction.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if either
    /// position is stale or from another collection.
    pub fn iter_between(&self, first: Position, last: Position) -> Result<Range<'_, T>> {
        let front = self.raw.resolve(first)?;
        let back = self.raw.resolve(last)?;
        Ok(Range {
            inner: RawIter::between(&self.raw, front, back),
        })
    }
}

impl<T: Ord> TreeSet<T> {
    /// Adds a value to the set unless an equal value is already present.
    ///
    /// Returns the position of the element equal to `value` and whether the
    /// insertion took place. A rejected `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    ///
    /// assert!(set.insert(2).1);
    /// assert!(!set.insert(2).1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        let (handle, inserted) = self.raw.insert(value, ());
        (self.raw.position(Link::Node(handle)), inserted)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(value).map(|h| self.raw.node(h).key())
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let set = TreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(value).is_some()
    }

    /// Returns the position of the element equal to `value`, or `end()`.
    pub fn find<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.find(value).into())
    }

    /// Returns the number of elements equal to `value`: 0 or 1.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count(value)
    }

    /// Returns the position of the first element not less than `value`, or `end()`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.lower_bound(value))
    }

    /// Returns the position of the first element greater than `value`, or `end()`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.upper_bound(value))
    }

    /// Returns `(lower_bound(value), upper_bound(value))`.
    pub fn equal_range<Q>(&self, value: &Q) -> (Position, Position)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (lower, upper) = self.raw.equal_range(value);
        (self.raw.position(lower), self.raw.position(upper))
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut set = TreeSet::from([1, 2, 3]);
    /// assert_eq!(set.remove(&2), Some(2));
    /// assert_eq!(set.remove(&2), None);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(value)?;
        Some(self.raw.remove_node(handle).key)
    }

    /// Moves every element of `other` that is not already in `self` into
    /// `self`. Colliding elements stay behind in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let mut a = TreeSet::from([1, 2, 3]);
    /// let mut b = TreeSet::from([3, 4, 5]);
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a, TreeSet::from([1, 2, 3, 4, 5]));
    /// assert_eq!(b, TreeSet::from([3]));
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        self.raw.merge(&mut other.raw);
    }
}

impl<T: Clone + Ord> Clone for TreeSet<T> {
    fn clone(&self) -> Self {
        TreeSet {
            raw: self.raw.clone(),
        }
    }
}

impl<T: Hash> Hash for TreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for TreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for TreeSet<T> {}

impl<T: fmt::Debug> fmt::Debug for TreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for TreeSet<T> {
    fn default() -> Self {
        TreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for TreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = TreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for TreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for TreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for TreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> IntoIterator for TreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `TreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let set = TreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a TreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let (k, ()) = self.inner.next()?;
        self.remaining -= 1;
        Some(k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let (k, ()) = self.inner.next_back()?;
        self.remaining -= 1;
        Some(k)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice().iter().map(|(k, ())| k)).finish()
    }
}

impl<T> Default for IntoIter<T> {
    fn default() -> Self {
        IntoIter {
            inner: vec::IntoIter::default(),
        }
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(k, ())| k)
    }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<T> FusedIterator for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
