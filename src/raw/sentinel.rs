use super::handle::Handle;

/// The per-tree `end()` anchor.
///
/// Holds no key. Caches the minimum and maximum live nodes so that `begin()`
/// and `last()` are O(1). It is never stored in a node's child slot; the only
/// thing that points at it is the root's parent link.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Sentinel {
    min: Option<Handle>,
    max: Option<Handle>,
}

impl Sentinel {
    pub(crate) const fn new() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    #[inline]
    pub(crate) fn min(&self) -> Option<Handle> {
        self.min
    }

    #[inline]
    pub(crate) fn max(&self) -> Option<Handle> {
        self.max
    }

    pub(crate) fn set_min(&mut self, min: Option<Handle>) {
        self.min = min;
    }

    pub(crate) fn set_max(&mut self, max: Option<Handle>) {
        self.max = max;
    }

    /// Points both bounds at the sole node of a one-element tree.
    pub(crate) fn set_only(&mut self, handle: Handle) {
        self.min = Some(handle);
        self.max = Some(handle);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
