use alloc::vec::Vec;

use super::handle::{Generation, Handle};

struct Slot<T> {
    generation: Generation,
    element: Option<T>,
}

/// Owning storage for tree nodes.
///
/// Every live element is owned by exactly one slot; handles are plain indices
/// and never own anything. Taking an element bumps the slot's generation and
/// recycles the handle through the free list.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()].element = Some(element);
            h
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot {
                generation: Generation::default(),
                element: Some(element),
            });
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].element.as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].element.as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns a mutable reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    /// - The caller must have logical exclusive access to the element at `handle`.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        // SAFETY: Caller guarantees ptr is valid and that no other reference to this
        // element is live. Indexing only touches the one slot.
        unsafe {
            (&mut (*ptr).slots)[handle.to_index()].element.as_mut().expect("`Arena::get_mut_ptr()` - `handle` is invalid!")
        }
    }

    /// Returns the element only if `handle` names a live slot of the given generation.
    pub(crate) fn try_get(&self, handle: Handle, generation: Generation) -> Option<&T> {
        let slot = self.slots.get(handle.to_index())?;
        if slot.generation == generation { slot.element.as_ref() } else { None }
    }

    #[inline]
    pub(crate) fn generation(&self, handle: Handle) -> Generation {
        self.slots[handle.to_index()].generation
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        let element = slot.element.take().expect("`Arena::take()` - `handle` is invalid!");
        slot.generation = slot.generation.next();
        self.free.push(handle);
        element
    }
}
