//! # Configuration Management
//!
//! Configuration for the index and the in-memory skip list backend.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered-name index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Key namespace prepended to every batch key in the sorted-set store.
    /// Instances sharing a store must use disjoint prefixes.
    pub prefix: String,
    /// Maximum number of names batched under one skip-list entry.
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            batch_size: 1000,
        }
    }
}

impl IndexConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Configuration {
                message: "batch_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory skip list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipListConfig {
    /// Maximum tower height.
    pub max_height: usize,
    /// Probability of promoting a node one level up.
    pub level_probability: f64,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_height: 12,
            level_probability: 0.25,
        }
    }
}

impl SkipListConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_height == 0 {
            return Err(Error::Configuration {
                message: "max_height must be at least 1".to_string(),
            });
        }
        if !(self.level_probability > 0.0 && self.level_probability < 1.0) {
            return Err(Error::Configuration {
                message: format!(
                    "level_probability must be in (0, 1), got {}",
                    self.level_probability
                ),
            });
        }
        Ok(())
    }
}
