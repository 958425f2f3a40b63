//! Resolved partitioning policy.

use serde::{Deserialize, Serialize};

/// Registry key of the sampling partitioner used when none is requested.
pub const DEFAULT_PARTITIONER: &str = "sample_data";

/// Partition count used when no partition spec is given.
pub const DEFAULT_PARTITION_COUNT: u32 = 20;

/// The partitioner a table is loaded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partitioner {
    /// Implementation identifier in the partitioner registry.
    pub class: String,
    /// Resolved partition column names (empty means "sample all").
    pub columns: Vec<String>,
    pub count: u32,
    pub nodes: Option<Vec<String>>,
}

impl Partitioner {
    /// The sampling partitioner with no partition columns.
    pub fn sampling(count: u32) -> Self {
        Self {
            class: DEFAULT_PARTITIONER.to_string(),
            columns: Vec::new(),
            count,
            nodes: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.class == DEFAULT_PARTITIONER
    }
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::sampling(DEFAULT_PARTITION_COUNT)
    }
}
