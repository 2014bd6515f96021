//! # Backend Contracts
//!
//! The two external collaborators of the index, as object-safe capability
//! traits. Implementations may be in-memory (tests, embedding) or remote;
//! the index holds `Arc<dyn …>` handles and never sees transport details.
//!
//! All operations are synchronous from the index's viewpoint and return
//! `Result`; the index issues them in a documented order per operation and
//! never retries.

use std::ops::Bound;

use bytes::Bytes;

use crate::error::Result;
use crate::types::{NodeId, NodeRef, SkipEntry};

/// Lexicographically ordered set store, keyed by opaque byte-string set key.
///
/// The contract is the subset of a Redis sorted set the index relies on
/// (equal scores, lex-range operators). Range boundaries use
/// `std::ops::Bound`; the `[x` / `(x` / `-` / `+` wire encoding, if any,
/// stays inside remote implementations. A missing set behaves as an empty
/// one, and a set whose last member is removed ceases to exist.
pub trait SortedSetStore: Send + Sync {
    /// True iff `member` is in the set.
    fn contains(&self, set: &[u8], member: &[u8]) -> Result<bool>;

    /// Number of members within the given bounds.
    fn count(&self, set: &[u8], min: Bound<&[u8]>, max: Bound<&[u8]>) -> Result<usize>;

    /// Add members; members already present are left untouched.
    fn add(&self, set: &[u8], members: &[Bytes]) -> Result<()>;

    /// Remove one member; missing members are a no-op.
    fn remove(&self, set: &[u8], member: &[u8]) -> Result<()>;

    /// Remove the entire set.
    fn remove_set(&self, set: &[u8]) -> Result<()>;

    /// Smallest member, without removing it. Must not mutate the set.
    fn first(&self, set: &[u8]) -> Result<Option<Bytes>>;

    /// Members within the given bounds, in ascending order.
    fn range(&self, set: &[u8], min: Bound<&[u8]>, max: Bound<&[u8]>) -> Result<Vec<Bytes>>;

    /// Remove members within the given bounds, returning how many were removed.
    fn remove_range(&self, set: &[u8], min: Bound<&[u8]>, max: Bound<&[u8]>) -> Result<usize>;
}

/// Outcome of [`SkipListStore::find_greater_or_equal`].
#[derive(Debug, Clone)]
pub struct SkipSearch {
    /// Level-0 predecessor of `next`, when the search path tracked it.
    /// May be `None` even though a predecessor exists (upper-level hit);
    /// callers recover it from `next.prev` or `largest()`.
    pub prev: Option<SkipEntry>,
    /// Smallest entry with key greater than or equal to the probe.
    pub next: Option<SkipEntry>,
    /// Whether any entry at or past the probe exists. Exact matches are
    /// detected only by comparing `next`'s key with the probe.
    pub found: bool,
}

/// Ordered map from byte-string key to node id, with stable ids and level-0
/// neighbor references.
///
/// The store owns all entries; callers receive [`SkipEntry`] snapshots.
pub trait SkipListStore: Send + Sync {
    /// Locate the smallest entry with key ≥ `key`, plus its predecessor.
    fn find_greater_or_equal(&self, key: &[u8]) -> Result<SkipSearch>;

    /// The entry with the greatest key, if any.
    fn largest(&self) -> Result<Option<SkipEntry>>;

    /// Load an entry by reference. Returns `None` if the node is gone.
    fn load(&self, node: &NodeRef) -> Result<Option<SkipEntry>>;

    /// Insert an entry. With an id hint the node keeps that id (re-keying);
    /// otherwise a fresh id is allocated and returned.
    fn insert_by_key(&self, key: &[u8], id_hint: Option<NodeId>) -> Result<NodeId>;

    /// Delete the entry with exactly this key, returning its id.
    fn delete_by_key(&self, key: &[u8]) -> Result<Option<NodeId>>;

    /// Delete a previously loaded entry.
    fn delete_entry(&self, entry: &SkipEntry) -> Result<()>;

    /// First entry reference at level 0, for forward traversal.
    fn head(&self) -> Result<Option<NodeRef>>;
}
