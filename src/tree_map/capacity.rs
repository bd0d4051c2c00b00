use super::TreeMap;
use crate::raw::RawTree;

impl<K, V> TreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` elements before
    /// the node storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = TreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TreeMap {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the map can hold without reallocating
    /// its node storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = TreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
