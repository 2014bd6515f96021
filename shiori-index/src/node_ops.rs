//! # Node Batch Operations
//!
//! Thin adaptor from a skip-list node reference to operations on its name
//! batch in the sorted-set store. The batch for node id `i` lives under the
//! key `<prefix><i>m`; the key bytes never leave this module.
//!
//! Range arguments follow the index protocol's conventions: `stop` /
//! `start` bounds are exclusive, and an empty bound means unbounded.

use std::ops::Bound;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use shiori_core::error::Result;
use shiori_core::traits::SortedSetStore;
use shiori_core::types::NodeRef;

/// Batch operations for a single node
pub struct NodeOps {
    store: Arc<dyn SortedSetStore>,
    prefix: Bytes,
}

impl NodeOps {
    pub fn new(store: Arc<dyn SortedSetStore>, prefix: impl Into<Bytes>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn batch_key(&self, node: &NodeRef) -> Bytes {
        let id = node.id.to_string();
        let mut key = BytesMut::with_capacity(self.prefix.len() + id.len() + 1);
        key.put_slice(&self.prefix);
        key.put_slice(id.as_bytes());
        key.put_u8(b'm');
        key.freeze()
    }

    /// True iff the batch holds `name`
    pub fn contains(&self, node: &NodeRef, name: &[u8]) -> Result<bool> {
        self.store.contains(&self.batch_key(node), name)
    }

    /// Current batch cardinality
    pub fn size(&self, node: &NodeRef) -> Result<usize> {
        self.store
            .count(&self.batch_key(node), Bound::Unbounded, Bound::Unbounded)
    }

    /// Add names to the batch; already-present names are no-ops
    pub fn add(&self, node: &NodeRef, names: &[Bytes]) -> Result<()> {
        self.store.add(&self.batch_key(node), names)
    }

    /// Remove one name; a missing name is a no-op
    pub fn remove(&self, node: &NodeRef, name: &[u8]) -> Result<()> {
        self.store.remove(&self.batch_key(node), name)
    }

    /// Remove the entire batch
    pub fn drop_batch(&self, node: &NodeRef) -> Result<()> {
        self.store.remove_set(&self.batch_key(node))
    }

    /// Smallest name in the batch, read without removing it
    pub fn min(&self, node: &NodeRef) -> Result<Option<Bytes>> {
        self.store.first(&self.batch_key(node))
    }

    /// Count of names strictly less than `name`
    pub fn inner_position(&self, node: &NodeRef, name: &[u8]) -> Result<usize> {
        self.store
            .count(&self.batch_key(node), Bound::Unbounded, Bound::Excluded(name))
    }

    /// Names strictly less than `stop`, ascending; empty `stop` means all
    pub fn range_before(&self, node: &NodeRef, stop: &[u8]) -> Result<Vec<Bytes>> {
        self.store
            .range(&self.batch_key(node), Bound::Unbounded, before(stop))
    }

    /// Names strictly greater than `start`, ascending; empty `start` means all
    pub fn range_after(&self, node: &NodeRef, start: &[u8]) -> Result<Vec<Bytes>> {
        self.store
            .range(&self.batch_key(node), after(start), Bound::Unbounded)
    }

    /// Remove names strictly less than `stop`; empty `stop` means all
    pub fn delete_before(&self, node: &NodeRef, stop: &[u8]) -> Result<usize> {
        self.store
            .remove_range(&self.batch_key(node), Bound::Unbounded, before(stop))
    }

    /// Remove names strictly greater than `start`; empty `start` means all
    pub fn delete_after(&self, node: &NodeRef, start: &[u8]) -> Result<usize> {
        self.store
            .remove_range(&self.batch_key(node), after(start), Bound::Unbounded)
    }

    /// Visit every name ≥ `start` in order (empty `start` means from the
    /// beginning). Returns false when the visitor stopped the scan.
    pub fn scan_from(
        &self,
        node: &NodeRef,
        start: &[u8],
        visit: &mut dyn FnMut(&[u8]) -> bool,
    ) -> Result<bool> {
        let from = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let names = self
            .store
            .range(&self.batch_key(node), from, Bound::Unbounded)?;
        for name in &names {
            if !visit(name) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn before(stop: &[u8]) -> Bound<&[u8]> {
    if stop.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(stop)
    }
}

fn after(start: &[u8]) -> Bound<&[u8]> {
    if start.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(start)
    }
}
