//! # Shiori Core
//!
//! This crate provides the fundamental building blocks for Shiori:
//! - Core types (node ids, entry references)
//! - Backend contracts (sorted-set store, skip list)
//! - Error types
//! - Configuration
//! - Metrics
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   shiori-core                   │
//! ├─────────────────────────────────────────────────┤
//! │  • types      - Node ids and entry snapshots   │
//! │  • traits     - Backend contracts              │
//! │  • error      - Error handling                 │
//! │  • config     - Index and backend tuning       │
//! │  • metrics    - Operation counters             │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{IndexConfig, SkipListConfig};
pub use error::{Error, Result};
pub use metrics::{Metrics, MetricsSnapshot};
pub use traits::{SkipListStore, SkipSearch, SortedSetStore};
pub use types::{NodeId, NodeRef, SkipEntry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
