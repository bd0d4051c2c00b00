//! Ordered collections on an unbalanced binary search tree, with C++-style positions.
//!
//! This crate provides [`TreeSet`], [`TreeMultiset`] and [`TreeMap`], all backed by
//! one binary search tree engine. Besides the usual Rust iterators, every
//! collection hands out [`Position`]s: copyable cursors that can be dereferenced,
//! stepped forwards and backwards, and passed back to erase an element.
//!
//! # Example
//!
//! ```
//! use bstree::{Error, TreeMap};
//!
//! let mut scores = TreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Inserting an existing key leaves the old value in place.
//! let (bob, inserted) = scores.insert("Bob", 0);
//! assert!(!inserted);
//! assert_eq!(scores.get_at(bob), Ok((&"Bob", &85)));
//!
//! // Positions step in key order, circularly through `end()`.
//! let carol = scores.successor(bob).unwrap();
//! assert_eq!(scores.get_at(carol), Ok((&"Carol", &92)));
//! assert!(scores.successor(carol).unwrap().is_end());
//!
//! // Checked access reports a missing key instead of panicking.
//! assert_eq!(scores.at(&"Dave"), Err(Error::KeyNotFound));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Checked positions** - Insertion never invalidates a position. Erasure
//!   invalidates the erased element's position, except when the erased node has
//!   two children: its in-order successor moves into that node, so the erased
//!   position names the successor and the successor's old position goes stale.
//!   A stale position is reported as [`Error::InvalidPosition`] rather than
//!   reading another element
//! - **Duplicate policy as a type** - [`Unique`] for sets and maps, [`Multi`] for the
//!   multiset, where equal elements keep their insertion order
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other by handle. Each tree has a
//! sentinel that acts as `end()` and caches the minimum and maximum, so `begin()`
//! and the last element are O(1). The tree is not self-balancing: operations cost
//! O(h), which is O(log n) for random keys and O(n) for sorted input. Every
//! traversal (including clear, clone and drop) is iterative, so a degenerate tree
//! never overflows the stack.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Mutable iteration hands out `&mut` into arena slots through a raw pointer.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod policy;
mod position;
mod raw;

pub mod tree_map;
pub mod tree_multiset;
pub mod tree_set;

pub use error::{Error, Result};
pub use policy::{DuplicatePolicy, Multi, Unique};
pub use position::Position;
pub use tree_map::TreeMap;
pub use tree_multiset::TreeMultiset;
pub use tree_set::TreeSet;
