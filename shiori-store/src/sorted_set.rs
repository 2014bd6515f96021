//! # In-Memory Sorted-Set Store
//!
//! One concurrent ordered set per key behind a locked key map. Semantics
//! follow the Redis sorted-set-with-equal-scores model the contract is
//! drawn from: a missing set reads as empty, adding is idempotent, and a
//! set whose last member is removed ceases to exist.

use std::collections::HashMap;
use std::ops::Bound;
use std::sync::Arc;

use bytes::Bytes;
use crossbeam_skiplist::SkipSet;
use parking_lot::RwLock;

use shiori_core::error::Result;
use shiori_core::traits::SortedSetStore;

/// In-memory sorted-set store
pub struct MemorySortedSet {
    sets: RwLock<HashMap<Bytes, Arc<SkipSet<Bytes>>>>,
}

impl MemorySortedSet {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live sets
    pub fn set_count(&self) -> usize {
        self.sets.read().len()
    }

    /// Keys of all live sets, in no particular order
    pub fn set_keys(&self) -> Vec<Bytes> {
        self.sets.read().keys().cloned().collect()
    }

    fn get(&self, set: &[u8]) -> Option<Arc<SkipSet<Bytes>>> {
        self.sets.read().get(set).cloned()
    }

    fn drop_if_empty(&self, set: &[u8]) {
        let mut sets = self.sets.write();
        if sets.get(set).map_or(false, |s| s.is_empty()) {
            sets.remove(set);
        }
    }
}

impl Default for MemorySortedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SortedSetStore for MemorySortedSet {
    fn contains(&self, set: &[u8], member: &[u8]) -> Result<bool> {
        Ok(self.get(set).map_or(false, |s| s.contains(member)))
    }

    fn count(&self, set: &[u8], min: Bound<&[u8]>, max: Bound<&[u8]>) -> Result<usize> {
        Ok(self
            .get(set)
            .map_or(0, |s| s.range::<[u8], _>((min, max)).count()))
    }

    fn add(&self, set: &[u8], members: &[Bytes]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        let target = {
            let mut sets = self.sets.write();
            sets.entry(Bytes::copy_from_slice(set))
                .or_insert_with(|| Arc::new(SkipSet::new()))
                .clone()
        };
        for member in members {
            target.insert(member.clone());
        }
        Ok(())
    }

    fn remove(&self, set: &[u8], member: &[u8]) -> Result<()> {
        if let Some(s) = self.get(set) {
            s.remove(member);
            if s.is_empty() {
                self.drop_if_empty(set);
            }
        }
        Ok(())
    }

    fn remove_set(&self, set: &[u8]) -> Result<()> {
        self.sets.write().remove(set);
        Ok(())
    }

    fn first(&self, set: &[u8]) -> Result<Option<Bytes>> {
        Ok(self
            .get(set)
            .and_then(|s| s.front().map(|entry| entry.value().clone())))
    }

    fn range(&self, set: &[u8], min: Bound<&[u8]>, max: Bound<&[u8]>) -> Result<Vec<Bytes>> {
        Ok(self.get(set).map_or_else(Vec::new, |s| {
            s.range::<[u8], _>((min, max))
                .map(|entry| entry.value().clone())
                .collect()
        }))
    }

    fn remove_range(&self, set: &[u8], min: Bound<&[u8]>, max: Bound<&[u8]>) -> Result<usize> {
        let Some(s) = self.get(set) else {
            return Ok(0);
        };
        let victims: Vec<Bytes> = s
            .range::<[u8], _>((min, max))
            .map(|entry| entry.value().clone())
            .collect();
        for victim in &victims {
            s.remove(victim);
        }
        if s.is_empty() {
            self.drop_if_empty(set);
        }
        Ok(victims.len())
    }
}
