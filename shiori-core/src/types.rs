//! # Core Types
//!
//! Identifiers and entry snapshots shared between the skip list backend and
//! the index core.
//!
//! Names and keys are raw byte strings ordered by unsigned byte-lex
//! comparison. `Bytes` keeps clones cheap; entries are copied out of the
//! backend as snapshots rather than borrowed, because the backend owns all
//! of its nodes (arena storage, not shared ownership).

use std::fmt;

use bytes::Bytes;

/// Opaque node handle assigned by the skip list on insert.
///
/// Stable for the lifetime of the node: re-keying an entry with an id hint
/// preserves the id, so the batch stored under it stays addressable.
pub type NodeId = u64;

/// Reference to a skip-list entry: the node id plus its leading key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub key: Bytes,
}

impl NodeRef {
    pub fn new(id: NodeId, key: impl Into<Bytes>) -> Self {
        Self {
            id,
            key: key.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, String::from_utf8_lossy(&self.key))
    }
}

/// Snapshot of a skip-list entry at load time.
///
/// `prev` and `next` are the level-0 neighbors when the entry was read; they
/// are not live pointers and may be stale after a subsequent mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipEntry {
    pub id: NodeId,
    pub key: Bytes,
    pub prev: Option<NodeRef>,
    pub next: Option<NodeRef>,
}

impl SkipEntry {
    /// Reference to this entry's node
    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id,
            key: self.key.clone(),
        }
    }
}
