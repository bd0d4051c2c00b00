use thiserror::Error;

/// Errors reported by the tree collections.
///
/// Every failing operation leaves the collection unchanged. Inserting a key
/// that is already present into a unique-key collection is not an error; it is
/// reported through the `bool` half of the returned pair.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// The position is `end()`, was handed out by a different collection, or
    /// names an element that has since been erased.
    #[error("invalid position: end(), stale, or from another collection")]
    InvalidPosition,

    /// A checked lookup such as [`TreeMap::at`](crate::TreeMap::at) found no
    /// element with the requested key.
    #[error("key not found")]
    KeyNotFound,
}

/// A `Result` alias defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(Error::InvalidPosition.to_string(), "invalid position: end(), stale, or from another collection");
    }
}
