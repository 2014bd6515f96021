//! # Shiori Ordered-Name Index
//!
//! A lexicographically ordered set of byte-string names, batched into
//! nodes so the skip list indexes roughly ⌈N/B⌉ entries instead of N.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        NameIndex                            │
//! │     insert / delete / scan / drop_all coordination          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         NodeOps                             │
//! │     node reference → batch operations (<prefix><id>m)       │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │        SkipListStore         │       SortedSetStore         │
//! │   leading key → node id      │   node id → name batch       │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Every skip-list entry's key equals the smallest name in its batch, and
//! batches never exceed the configured batch size. Insertion prefers to
//! extend an existing neighbor batch and only creates nodes when both
//! neighbors reject the name; deletion merges small adjacent batches back
//! together.

pub mod name_index;
pub mod node_ops;

pub use name_index::NameIndex;
pub use node_ops::NodeOps;
