use super::TreeSet;
use crate::raw::RawTree;

impl<T> TreeSet<T> {
    /// Creates an empty set with room for at least `capacity` elements before
    /// the node storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let set: TreeSet<i32> = TreeSet::with_capacity(32);
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TreeSet {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the set can hold without reallocating
    /// its node storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeSet;
    ///
    /// let set: TreeSet<i32> = TreeSet::with_capacity(32);
    /// assert!(set.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
