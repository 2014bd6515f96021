//! # Ordered-Name Index Core
//!
//! Coordinates the skip list of leading keys with per-node name batches.
//!
//! Insertion is reluctant to create nodes: the name is fitted into the
//! preceding node when it has capacity, splits it when it is full, absorbs
//! into the following node when the preceding one is absent, and only then
//! gets a node of its own. Deletion is the mirror image: removing a leading
//! name re-keys its node under the next minimum, and a shrunken node is
//! merged with its right neighbor when the two fit well under the batch
//! bound together.
//!
//! One instance is single-writer: the delete-entry/re-insert windows inside
//! insert and delete transiently break the leading-key invariant, so
//! concurrent callers must serialize through a mutex (or shard by prefix).

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use shiori_core::config::IndexConfig;
use shiori_core::error::{Error, Result};
use shiori_core::metrics::Metrics;
use shiori_core::traits::{SkipListStore, SkipSearch, SortedSetStore};
use shiori_core::types::{NodeId, NodeRef, SkipEntry};

use crate::node_ops::NodeOps;

/// Ordered index over byte-string names
pub struct NameIndex {
    skiplist: Arc<dyn SkipListStore>,
    ops: NodeOps,
    batch_size: usize,
    metrics: Arc<Metrics>,
}

impl NameIndex {
    /// Create an index over the given backends.
    ///
    /// Instances sharing a store must be configured with disjoint prefixes.
    pub fn new(
        skiplist: Arc<dyn SkipListStore>,
        store: Arc<dyn SortedSetStore>,
        config: IndexConfig,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        config.validate()?;
        let prefix = Bytes::from(config.prefix.into_bytes());
        Ok(Self {
            skiplist,
            ops: NodeOps::new(store, prefix),
            batch_size: config.batch_size,
            metrics,
        })
    }

    /// Batch operations bound to this index's store and prefix
    pub fn node_ops(&self) -> &NodeOps {
        &self.ops
    }

    /// Add `name` to the index. Inserting a present name is a no-op.
    pub fn insert(&self, name: &[u8]) -> Result<()> {
        validate_name(name)?;
        let SkipSearch {
            mut prev,
            next,
            found,
        } = self.skiplist.find_greater_or_equal(name)?;

        // The name already leads a batch.
        if let Some(next_entry) = &next {
            if found && next_entry.key.as_ref() == name {
                return Ok(());
            }
        }

        // Past every entry: the largest node is the logical predecessor.
        if !found {
            prev = self.skiplist.largest()?;
        }
        // The search may not have tracked the predecessor; recover it.
        if prev.is_none() {
            if let Some(next_entry) = &next {
                if let Some(prev_ref) = &next_entry.prev {
                    prev = self.skiplist.load(prev_ref)?;
                }
            }
        }

        if let Some(prev_entry) = prev {
            return self.insert_after(&prev_entry, name);
        }

        // No predecessor: try to absorb into the following node, which
        // keeps the node count flat when names arrive in reverse order.
        if let Some(next_entry) = next {
            let node = next_entry.node_ref();
            if self.ops.size(&node)? < self.batch_size {
                let id = self.skiplist.delete_by_key(&next_entry.key)?.ok_or_else(|| {
                    Error::invariant(format!("entry {} vanished during absorb", node))
                })?;
                self.add_entry(name, Some(id), &[Bytes::copy_from_slice(name)])?;
                self.metrics.record_insert();
                debug!(
                    "absorbed {} into node {}",
                    String::from_utf8_lossy(name),
                    id
                );
                return Ok(());
            }
        }

        // Both neighbors rejected the name: fresh single-name node.
        self.add_entry(name, None, &[Bytes::copy_from_slice(name)])?;
        self.metrics.record_insert();
        self.metrics.record_nodes_created(1);
        Ok(())
    }

    /// Insert `name` into or around the node preceding it.
    fn insert_after(&self, prev_entry: &SkipEntry, name: &[u8]) -> Result<()> {
        let node = prev_entry.node_ref();
        if self.ops.contains(&node, name)? {
            return Ok(());
        }

        let size = self.ops.size(&node)?;
        if size < self.batch_size {
            self.ops.add(&node, &[Bytes::copy_from_slice(name)])?;
            self.metrics.record_insert();
            return Ok(());
        }

        // The batch is full; decide which side of `name` moves.
        let lower_len = self.ops.inner_position(&node, name)?;
        let upper_len = size - lower_len;

        if lower_len == 0 || upper_len == 0 {
            // The name falls outside the batch's span; leave it intact.
            self.add_entry(name, None, &[Bytes::copy_from_slice(name)])?;
            self.metrics.record_insert();
            self.metrics.record_nodes_created(1);
            return Ok(());
        }

        if lower_len <= upper_len {
            // Move the lower half out with the new name; the surviving node
            // keeps its id and is re-keyed at its remaining minimum.
            let mut lower = self.ops.range_before(&node, name)?;
            let new_key = lower[0].clone();
            self.skiplist.delete_by_key(&prev_entry.key)?;
            lower.push(Bytes::copy_from_slice(name));
            self.add_entry(&new_key, None, &lower)?;
            self.ops.delete_before(&node, name)?;
            let min = self.ops.min(&node)?.ok_or_else(|| {
                Error::invariant(format!("node {} empty after split", node))
            })?;
            self.add_entry(&min, Some(prev_entry.id), &[])?;
        } else {
            // Move the upper half out under the new name; the surviving
            // node keeps its key and id.
            let mut upper = self.ops.range_after(&node, name)?;
            upper.push(Bytes::copy_from_slice(name));
            self.add_entry(name, None, &upper)?;
            self.ops.delete_after(&node, name)?;
        }

        debug!(
            "split node {} at {} ({} low / {} high)",
            prev_entry.id,
            String::from_utf8_lossy(name),
            lower_len,
            upper_len
        );
        self.metrics.record_insert();
        self.metrics.record_split();
        self.metrics.record_nodes_created(1);
        Ok(())
    }

    /// Remove `name` from the index. Deleting an absent name is a no-op.
    pub fn delete(&self, name: &[u8]) -> Result<()> {
        validate_name(name)?;
        let SkipSearch {
            mut prev,
            next,
            found,
        } = self.skiplist.find_greater_or_equal(name)?;

        // The name leads its batch: re-key the node under the next minimum.
        if let Some(next_entry) = &next {
            if found && next_entry.key.as_ref() == name {
                let node = next_entry.node_ref();
                self.skiplist.delete_by_key(&next_entry.key)?;
                self.ops.remove(&node, name)?;
                self.metrics.record_delete();
                return match self.ops.min(&node)? {
                    None => {
                        self.ops.drop_batch(&node)?;
                        self.metrics.record_nodes_dropped(1);
                        Ok(())
                    }
                    Some(min) => {
                        self.add_entry(&min, Some(next_entry.id), &[])?;
                        Ok(())
                    }
                };
            }
        }

        if !found {
            prev = self.skiplist.largest()?;
        }
        if prev.is_none() {
            if let Some(next_entry) = &next {
                if let Some(prev_ref) = &next_entry.prev {
                    prev = self.skiplist.load(prev_ref)?;
                }
            }
        }

        let Some(prev_entry) = prev else {
            return Ok(());
        };
        let node = prev_entry.node_ref();
        if !self.ops.contains(&node, name)? {
            return Ok(());
        }

        self.ops.remove(&node, name)?;
        self.metrics.record_delete();
        let prev_size = self.ops.size(&node)?;
        if prev_size == 0 {
            // The store drops an emptied batch; only the entry remains.
            self.skiplist.delete_by_key(&prev_entry.key)?;
            self.metrics.record_nodes_dropped(1);
            return Ok(());
        }

        if let Some(next_entry) = &next {
            let right = next_entry.node_ref();
            let next_size = self.ops.size(&right)?;
            if next_size > 0 && prev_size + next_size < self.batch_size {
                self.skiplist.delete_by_key(&next_entry.key)?;
                let names = self.ops.range_before(&right, &[])?;
                self.ops.add(&node, &names)?;
                self.ops.drop_batch(&right)?;
                self.metrics.record_merge();
                self.metrics.record_nodes_dropped(1);
                debug!(
                    "merged node {} into node {} ({} names)",
                    next_entry.id,
                    prev_entry.id,
                    names.len()
                );
            }
        }
        Ok(())
    }

    /// Visit every name ≥ `from` in ascending order; an empty `from` scans
    /// from the start. The visitor returning false halts the scan.
    pub fn scan(&self, from: &[u8], mut visit: impl FnMut(&[u8]) -> bool) -> Result<()> {
        self.metrics.record_scan();
        let SkipSearch {
            mut prev,
            next,
            found,
        } = self.skiplist.find_greater_or_equal(from)?;

        // An exact match begins at `from`; nothing earlier can qualify.
        if let Some(next_entry) = &next {
            if found && next_entry.key.as_ref() == from {
                prev = None;
            }
        }
        if !found {
            prev = self.skiplist.largest()?;
        }

        if let Some(prev_entry) = &prev {
            if !self.ops.scan_from(&prev_entry.node_ref(), from, &mut visit)? {
                return Ok(());
            }
        }

        let mut cursor = next;
        while let Some(entry) = cursor {
            if !self.ops.scan_from(&entry.node_ref(), from, &mut visit)? {
                return Ok(());
            }
            cursor = match &entry.next {
                Some(next_ref) => self.skiplist.load(next_ref)?,
                None => None,
            };
        }
        Ok(())
    }

    /// Remove every entry and every batch.
    pub fn drop_all(&self) -> Result<()> {
        let mut cursor = self.skiplist.head()?;
        let mut dropped = 0u64;
        while let Some(node_ref) = cursor {
            let Some(entry) = self.skiplist.load(&node_ref)? else {
                break;
            };
            self.skiplist.delete_entry(&entry)?;
            self.ops.drop_batch(&entry.node_ref())?;
            dropped += 1;
            cursor = entry.next;
        }
        self.metrics.record_nodes_dropped(dropped);
        info!("dropped all index nodes ({})", dropped);
        Ok(())
    }

    /// Insert a skip-list entry and, when given, seed its batch.
    fn add_entry(&self, key: &[u8], id_hint: Option<NodeId>, names: &[Bytes]) -> Result<NodeId> {
        let id = self.skiplist.insert_by_key(key, id_hint)?;
        if !names.is_empty() {
            let node = NodeRef::new(id, Bytes::copy_from_slice(key));
            self.ops.add(&node, names)?;
        }
        Ok(id)
    }
}

fn validate_name(name: &[u8]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            message: "names must be non-empty".to_string(),
        });
    }
    Ok(())
}
