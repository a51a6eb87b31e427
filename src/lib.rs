#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A HashMap implementation using Robin Hood hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// An array-backed binary min-heap.
///
/// This module is an independent utility with no interface to the hash
/// table.
pub mod min_heap;

pub use hash_map::HashMap;
pub use hash_table::CapacityError;
pub use hash_table::HashTable;
pub use min_heap::MinHeap;
