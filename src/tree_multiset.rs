use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use alloc::vec;

use crate::error::Result;
use crate::policy::Multi;
use crate::position::Position;
use crate::raw::{Link, RawIter, RawTree};

mod capacity;

/// An ordered multiset based on an unbalanced binary search tree.
///
/// Equal elements are all kept. A new element is placed after every element
/// that compares equal to it, so equal elements iterate in insertion order.
///
/// # Examples
///
/// ```
/// use bstree::TreeMultiset;
///
/// let mut bag = TreeMultiset::from([2, 2, 2, 1, 3]);
/// assert_eq!(bag.len(), 5);
/// assert_eq!(bag.count(&2), 3);
///
/// let (first, last) = bag.equal_range(&2);
/// assert_eq!(bag.get_at(first), Ok(&2));
/// assert_eq!(bag.get_at(last), Ok(&3));
///
/// bag.remove(&2);
/// assert_eq!(bag.iter().copied().collect::<Vec<_>>(), [1, 2, 2, 3]);
/// ```
pub struct TreeMultiset<T> {
    raw: RawTree<T, (), Multi>,
}

/// An iterator over the items of a `TreeMultiset`.
///
/// This `struct` is created by the [`iter`] method on [`TreeMultiset`].
///
/// [`iter`]: TreeMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: RawIter<'a, T, (), Multi>,
    remaining: usize,
}

/// An owning iterator over the items of a `TreeMultiset` in ascending order.
pub struct IntoIter<T> {
    inner: vec::IntoIter<(T, ())>,
}

/// An iterator over the half-open span between two positions of a `TreeMultiset`.
///
/// This `struct` is created by the [`iter_between`] method on [`TreeMultiset`].
///
/// [`iter_between`]: TreeMultiset::iter_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T> {
    inner: RawIter<'a, T, (), Multi>,
}

impl<T> TreeMultiset<T> {
    /// Makes a new, empty `TreeMultiset`.
    #[must_use]
    pub fn new() -> TreeMultiset<T> {
        TreeMultiset {
            raw: RawTree::new(),
        }
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements, counting every duplicate.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of elements the multiset can ever hold.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        RawTree::<T, (), Multi>::max_size()
    }

    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.begin())
    }

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

    /// Returns the position after `pos`, circularly through `end()`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if `pos` is
    /// stale or from another collection.
    pub fn successor(&self, pos: Position) -> Result<Position> {
        let link = self.raw.resolve(pos)?;
        Ok(self.raw.position(self.raw.successor(link)))
    }

    /// Returns the position before `pos`, circularly through `end()`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`](crate::Error::InvalidPosition) if `pos` is
    /// stale or from another collection.
    pub fn predecessor(&self, pos: Position) -> Result<Position> {
        let link = self.raw.resolve(pos)?;
        Ok(self.raw.position(self.raw.predecessor(link)))
    }

    /// Removes the single element at `pos` and returns the position of the
    /// element that followed it.
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
    /// use bstree::TreeMultiset;
    ///
    /// let mut bag = TreeMultiset::from([1, 1, 2]);
    /// let mut pos = bag.begin();
    /// while !pos.is_end() && bag.get_at(pos) == Ok(&1) {
    ///     pos = bag.erase(pos).unwrap();
    /// }
    /// assert_eq!(bag.iter().copied().collect::<Vec<_>>(), [2]);
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<Position> {
        let handle = self.raw.resolve_node(pos)?;
        let removed = self.raw.remove_node(handle);
        Ok(self.raw.position(removed.next))
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Returns the smallest element. Among equal elements this is the one
    /// inserted first.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first_key_value().map(|(k, ())| k)
    }

    /// Returns the largest element. Among equal elements this is the one
    /// inserted last.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last_key_value().map(|(k, ())| k)
    }

    /// Gets an iterator that visits every element in ascending order.
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
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMultiset;
    ///
    /// let bag = TreeMultiset::from([3, 1, 2, 2]);
    /// let (first, last) = bag.equal_range(&2);
    /// assert_eq!(bag.iter_between(first, last).unwrap().count(), 2);
    /// ```
    pub fn iter_between(&self, first: Position, last: Position) -> Result<Range<'_, T>> {
        let front = self.raw.resolve(first)?;
        let back = self.raw.resolve(last)?;
        Ok(Range {
            inner: RawIter::between(&self.raw, front, back),
        })
    }
}

impl<T: Ord> TreeMultiset<T> {
    /// Adds a value, after every element already present that is equal to it.
    ///
    /// Always succeeds; returns the position of the new element.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMultiset;
    ///
    /// let mut bag = TreeMultiset::new();
    /// let a = bag.insert(7);
    /// let b = bag.insert(7);
    /// assert_ne!(a, b);
    /// assert_eq!(bag.successor(a), Ok(b));
    /// ```
    pub fn insert(&mut self, value: T) -> Position {
        let (handle, _) = self.raw.insert(value, ());
        self.raw.position(Link::Node(handle))
    }

    /// Returns `true` if the multiset contains at least one element equal to the value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(value).is_some()
    }

    /// Returns the position of the first element equal to `value`, or `end()`.
    pub fn find<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.find(value).into())
    }

    /// Returns the number of elements equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(h + k), where k is the returned count.
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

    /// Returns the span of elements equal to `value` as `(lower_bound, upper_bound)`.
    pub fn equal_range<Q>(&self, value: &Q) -> (Position, Position)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (lower, upper) = self.raw.equal_range(value);
        (self.raw.position(lower), self.raw.position(upper))
    }

    /// Removes one element equal to `value` (the first in order) and returns it.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(value)?;
        Some(self.raw.remove_node(handle).key)
    }

    /// Moves every element of `other` into `self`, leaving `other` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMultiset;
    ///
    /// let mut a = TreeMultiset::from([1, 2, 3]);
    /// let mut b = TreeMultiset::from([3, 4]);
    /// a.merge(&mut b);
    /// assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 3, 4]);
    /// assert!(b.is_empty());
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        self.raw.merge(&mut other.raw);
    }
}

impl<T: Clone + Ord> Clone for TreeMultiset<T> {
    fn clone(&self) -> Self {
        TreeMultiset {
            raw: self.raw.clone(),
        }
    }
}

impl<T: Hash> Hash for TreeMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for TreeMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for TreeMultiset<T> {}

impl<T: fmt::Debug> fmt::Debug for TreeMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for TreeMultiset<T> {
    fn default() -> Self {
        TreeMultiset::new()
    }
}

impl<T: Ord> FromIterator<T> for TreeMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut bag = TreeMultiset::new();
        bag.extend(iter);
        bag
    }
}

impl<T: Ord> Extend<T> for TreeMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for TreeMultiset<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for TreeMultiset<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> IntoIterator for TreeMultiset<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a TreeMultiset<T> {
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

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Element with an ordering key and an identity the ordering ignores.
    #[derive(Clone, Copy, Debug)]
    struct Tagged(u8, usize);

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for Tagged {}
    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> core::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn equal_elements_keep_insertion_order() {
        let bag: TreeMultiset<Tagged> = [5, 1, 5, 3, 5, 1].into_iter().enumerate().map(|(i, k)| Tagged(k, i)).collect();
        let order: Vec<(u8, usize)> = bag.iter().map(|t| (t.0, t.1)).collect();
        assert_eq!(order, [(1, 1), (1, 5), (3, 3), (5, 0), (5, 2), (5, 4)]);

        let copy = bag.clone();
        let copied: Vec<usize> = copy.iter().map(|t| t.1).collect();
        assert_eq!(copied, [1, 5, 3, 0, 2, 4], "clone keeps the order of duplicates");
    }

    #[test]
    fn remove_takes_the_first_duplicate() {
        let mut bag: TreeMultiset<Tagged> = [(2, 0), (2, 1), (2, 2)].into_iter().map(|(k, i)| Tagged(k, i)).collect();
        assert_eq!(bag.remove(&Tagged(2, 99)).map(|t| t.1), Some(0));
        assert_eq!(bag.first().map(|t| t.1), Some(1));
        assert_eq!(bag.last().map(|t| t.1), Some(2));
    }

    #[test]
    fn merge_appends_after_existing_duplicates() {
        let mut a: TreeMultiset<Tagged> = TreeMultiset::from([Tagged(1, 0), Tagged(1, 1)]);
        let mut b: TreeMultiset<Tagged> = TreeMultiset::from([Tagged(1, 2), Tagged(0, 3)]);
        a.merge(&mut b);
        assert!(b.is_empty());
        let order: Vec<usize> = a.iter().map(|t| t.1).collect();
        assert_eq!(order, [3, 0, 1, 2]);
    }
}
