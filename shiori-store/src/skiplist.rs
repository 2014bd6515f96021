//! # In-Memory Skip List
//!
//! Arena-based probabilistic skip list keyed by byte strings, with stable
//! node ids. Nodes live in an id-keyed arena and reference each other by
//! id, never by shared ownership; callers receive [`SkipEntry`] snapshots.
//!
//! Level towers are assigned geometrically (LevelDB-style constants by
//! default: max height 12, promotion probability 1/4). Level 0 is a fully
//! linked list with back-references, which is what the index walks during
//! scans and drop-all.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;
use rand::Rng;
use tracing::debug;

use shiori_core::config::SkipListConfig;
use shiori_core::error::{Error, Result};
use shiori_core::traits::{SkipListStore, SkipSearch};
use shiori_core::types::{NodeId, NodeRef, SkipEntry};

struct Node {
    id: NodeId,
    key: Bytes,
    /// Forward pointers, one per level of this node's tower.
    forward: Vec<Option<NodeId>>,
    /// Level-0 predecessor.
    prev: Option<NodeId>,
}

impl Node {
    fn height(&self) -> usize {
        self.forward.len()
    }
}

struct Inner {
    nodes: HashMap<NodeId, Node>,
    /// Head forward pointers, one per possible level.
    head: Vec<Option<NodeId>>,
    /// Levels currently in use.
    height: usize,
    next_id: NodeId,
}

/// In-memory skip list with stable node ids
pub struct MemorySkipList {
    config: SkipListConfig,
    inner: RwLock<Inner>,
}

impl MemorySkipList {
    /// Create an empty skip list with the given tuning
    pub fn new(config: SkipListConfig) -> Result<Self> {
        config.validate()?;
        let head = vec![None; config.max_height];
        Ok(Self {
            config,
            inner: RwLock::new(Inner {
                nodes: HashMap::new(),
                head,
                height: 1,
                next_id: 1,
            }),
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().nodes.is_empty()
    }

    fn random_height(&self) -> usize {
        let mut rng = rand::thread_rng();
        let mut height = 1;
        while height < self.config.max_height && rng.gen_bool(self.config.level_probability) {
            height += 1;
        }
        height
    }
}

impl Default for MemorySkipList {
    fn default() -> Self {
        // The default configuration always validates.
        Self::new(SkipListConfig::default()).expect("default skip list config")
    }
}

impl Inner {
    fn forward_of(&self, at: Option<NodeId>, level: usize) -> Option<NodeId> {
        match at {
            None => self.head[level],
            Some(id) => self.nodes[&id].forward[level],
        }
    }

    fn node_ref(&self, id: NodeId) -> NodeRef {
        NodeRef {
            id,
            key: self.nodes[&id].key.clone(),
        }
    }

    fn snapshot(&self, id: NodeId) -> SkipEntry {
        let node = &self.nodes[&id];
        SkipEntry {
            id,
            key: node.key.clone(),
            prev: node.prev.map(|p| self.node_ref(p)),
            next: node.forward[0].map(|n| self.node_ref(n)),
        }
    }

    /// Predecessors of `key` at every level in use, level-indexed.
    /// `None` stands for the head.
    fn predecessors(&self, key: &[u8]) -> Vec<Option<NodeId>> {
        let mut update: Vec<Option<NodeId>> = vec![None; self.head.len()];
        let mut cur: Option<NodeId> = None;
        for level in (0..self.height).rev() {
            while let Some(next_id) = self.forward_of(cur, level) {
                if self.nodes[&next_id].key.as_ref() < key {
                    cur = Some(next_id);
                } else {
                    break;
                }
            }
            update[level] = cur;
        }
        update
    }

    /// Unlink `id` from every level and the arena. The caller has already
    /// verified the node exists under `key`.
    fn unlink(&mut self, key: &[u8], id: NodeId) {
        let update = self.predecessors(key);
        let height = self.nodes[&id].height();
        for level in 0..height {
            let successor = self.nodes[&id].forward[level];
            match update[level] {
                None => {
                    if self.head[level] == Some(id) {
                        self.head[level] = successor;
                    }
                }
                Some(pred) => {
                    if self.nodes[&pred].forward[level] == Some(id) {
                        self.nodes.get_mut(&pred).unwrap().forward[level] = successor;
                    }
                }
            }
        }
        let node = self.nodes.remove(&id).unwrap();
        if let Some(successor) = node.forward[0] {
            self.nodes.get_mut(&successor).unwrap().prev = node.prev;
        }
        while self.height > 1 && self.head[self.height - 1].is_none() {
            self.height -= 1;
        }
    }

    fn delete_key(&mut self, key: &[u8]) -> Option<NodeId> {
        let update = self.predecessors(key);
        let candidate = self.forward_of(update[0], 0)?;
        if self.nodes[&candidate].key.as_ref() != key {
            return None;
        }
        self.unlink(key, candidate);
        Some(candidate)
    }
}

impl SkipListStore for MemorySkipList {
    fn find_greater_or_equal(&self, key: &[u8]) -> Result<SkipSearch> {
        let inner = self.inner.read();
        let mut cur: Option<NodeId> = None;
        for level in (0..inner.height).rev() {
            while let Some(next_id) = inner.forward_of(cur, level) {
                let next_key = inner.nodes[&next_id].key.as_ref();
                if next_key < key {
                    cur = Some(next_id);
                    continue;
                }
                if level > 0 && next_key == key {
                    // Exact hit on an upper level: the level-0 predecessor
                    // was never visited, so it is not reported.
                    return Ok(SkipSearch {
                        prev: None,
                        next: Some(inner.snapshot(next_id)),
                        found: true,
                    });
                }
                break;
            }
        }
        let next = inner.forward_of(cur, 0);
        let found = next.is_some();
        Ok(SkipSearch {
            prev: cur.map(|id| inner.snapshot(id)),
            next: next.map(|id| inner.snapshot(id)),
            found,
        })
    }

    fn largest(&self) -> Result<Option<SkipEntry>> {
        let inner = self.inner.read();
        let mut cur: Option<NodeId> = None;
        for level in (0..inner.height).rev() {
            while let Some(next_id) = inner.forward_of(cur, level) {
                cur = Some(next_id);
            }
        }
        Ok(cur.map(|id| inner.snapshot(id)))
    }

    fn load(&self, node: &NodeRef) -> Result<Option<SkipEntry>> {
        let inner = self.inner.read();
        Ok(inner
            .nodes
            .contains_key(&node.id)
            .then(|| inner.snapshot(node.id)))
    }

    fn insert_by_key(&self, key: &[u8], id_hint: Option<NodeId>) -> Result<NodeId> {
        let height = self.random_height();
        let mut inner = self.inner.write();
        let mut update = inner.predecessors(key);

        if let Some(existing) = inner.forward_of(update[0], 0) {
            if inner.nodes[&existing].key.as_ref() == key {
                return Ok(existing);
            }
        }

        let id = match id_hint {
            Some(id) => {
                if inner.nodes.contains_key(&id) {
                    return Err(Error::invariant(format!(
                        "id hint {} already names a live node",
                        id
                    )));
                }
                inner.next_id = inner.next_id.max(id + 1);
                id
            }
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                id
            }
        };

        if height > inner.height {
            for slot in update.iter_mut().take(height).skip(inner.height) {
                *slot = None;
            }
            inner.height = height;
        }

        let mut forward = vec![None; height];
        for (level, slot) in forward.iter_mut().enumerate() {
            *slot = inner.forward_of(update[level], level);
        }
        let node = Node {
            id,
            key: Bytes::copy_from_slice(key),
            forward,
            prev: update[0],
        };
        if let Some(successor) = node.forward[0] {
            inner.nodes.get_mut(&successor).unwrap().prev = Some(id);
        }
        inner.nodes.insert(id, node);
        for level in 0..height {
            match update[level] {
                None => inner.head[level] = Some(id),
                Some(pred) => inner.nodes.get_mut(&pred).unwrap().forward[level] = Some(id),
            }
        }
        debug!(
            "skip list insert {} as node {} (height {})",
            String::from_utf8_lossy(key),
            id,
            height
        );
        Ok(id)
    }

    fn delete_by_key(&self, key: &[u8]) -> Result<Option<NodeId>> {
        let mut inner = self.inner.write();
        let deleted = inner.delete_key(key);
        if let Some(id) = deleted {
            debug!(
                "skip list delete {} (node {})",
                String::from_utf8_lossy(key),
                id
            );
        }
        Ok(deleted)
    }

    fn delete_entry(&self, entry: &SkipEntry) -> Result<()> {
        let mut inner = self.inner.write();
        inner.delete_key(&entry.key);
        Ok(())
    }

    fn head(&self) -> Result<Option<NodeRef>> {
        let inner = self.inner.read();
        Ok(inner.head[0].map(|id| inner.node_ref(id)))
    }
}
