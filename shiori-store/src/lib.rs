//! # Shiori Backends
//!
//! In-memory implementations of the two backend contracts the index runs
//! against:
//!
//! - [`MemorySortedSet`], a Redis-style lexicographically ordered set
//!   store, one concurrent ordered set per key.
//! - [`MemorySkipList`], an arena-based skip list with stable node ids
//!   and level-0 neighbor references.
//!
//! Remote backends (a real Redis, a replicated skip list) plug in behind
//! the same `shiori_core::traits` contracts; nothing in the index crate
//! distinguishes them from these.

pub mod skiplist;
pub mod sorted_set;

pub use skiplist::MemorySkipList;
pub use sorted_set::MemorySortedSet;
