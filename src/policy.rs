/// Selects how a tree treats a key that compares equal to one already stored.
///
/// The policy is a type parameter of the engine, so the choice is made once
/// per collection type rather than passed to every insertion.
pub trait DuplicatePolicy {
    /// `false`: an equal key blocks insertion and the existing element is reported.
    /// `true`: the new element is placed after every equal element already stored.
    const ALLOW_DUPLICATES: bool;
}

/// Unique-key mode, used by [`TreeSet`](crate::TreeSet) and [`TreeMap`](crate::TreeMap).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Unique {}

/// Multi-key mode, used by [`TreeMultiset`](crate::TreeMultiset).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Multi {}

impl DuplicatePolicy for Unique {
    const ALLOW_DUPLICATES: bool = false;
}

impl DuplicatePolicy for Multi {
    const ALLOW_DUPLICATES: bool = true;
}
