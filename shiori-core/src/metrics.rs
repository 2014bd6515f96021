//! # Metrics and Monitoring
//!
//! Operation counters for monitoring the index.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    // Name-level operations
    names_inserted: AtomicU64,
    names_deleted: AtomicU64,
    scans: AtomicU64,

    // Node lifecycle
    nodes_created: AtomicU64,
    nodes_dropped: AtomicU64,
    node_splits: AtomicU64,
    node_merges: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                names_inserted: AtomicU64::new(0),
                names_deleted: AtomicU64::new(0),
                scans: AtomicU64::new(0),
                nodes_created: AtomicU64::new(0),
                nodes_dropped: AtomicU64::new(0),
                node_splits: AtomicU64::new(0),
                node_merges: AtomicU64::new(0),
            }),
        }
    }

    /// Record a name insertion
    pub fn record_insert(&self) {
        self.inner.names_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a name deletion
    pub fn record_delete(&self) {
        self.inner.names_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a scan
    pub fn record_scan(&self) {
        self.inner.scans.fetch_add(1, Ordering::Relaxed);
    }

    /// Record node creations
    pub fn record_nodes_created(&self, count: u64) {
        self.inner.nodes_created.fetch_add(count, Ordering::Relaxed);
    }

    /// Record node drops
    pub fn record_nodes_dropped(&self, count: u64) {
        self.inner.nodes_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a batch split
    pub fn record_split(&self) {
        self.inner.node_splits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a batch merge
    pub fn record_merge(&self) {
        self.inner.node_merges.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            names_inserted: self.inner.names_inserted.load(Ordering::Relaxed),
            names_deleted: self.inner.names_deleted.load(Ordering::Relaxed),
            scans: self.inner.scans.load(Ordering::Relaxed),
            nodes_created: self.inner.nodes_created.load(Ordering::Relaxed),
            nodes_dropped: self.inner.nodes_dropped.load(Ordering::Relaxed),
            node_splits: self.inner.node_splits.load(Ordering::Relaxed),
            node_merges: self.inner.node_merges.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub names_inserted: u64,
    pub names_deleted: u64,
    pub scans: u64,
    pub nodes_created: u64,
    pub nodes_dropped: u64,
    pub node_splits: u64,
    pub node_merges: u64,
}
