use super::TreeMultiset;
use crate::raw::RawTree;

impl<T> TreeMultiset<T> {
    /// Creates an empty multiset with room for at least `capacity` elements before
    /// the node storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMultiset;
    ///
    /// let bag: TreeMultiset<i32> = TreeMultiset::with_capacity(32);
    /// assert!(bag.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TreeMultiset {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the multiset can hold without reallocating
    /// its node storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMultiset;
    ///
    /// let bag: TreeMultiset<i32> = TreeMultiset::with_capacity(32);
    /// assert!(bag.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
