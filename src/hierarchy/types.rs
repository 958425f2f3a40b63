// src/hierarchy/types.rs
use serde::{Deserialize, Serialize};

use crate::schema::Partitioner;

/// Store type of levels that declare none.
pub const DEFAULT_STORE_TYPE: &str = "Columnar";

/// Aggregator of measures that declare none.
pub const DEFAULT_AGGREGATOR: &str = "SUM";

/// Cardinality placeholder; the real value is computed at load time.
pub const UNKNOWN_CARDINALITY: i32 = i32::MAX;

/// One field within a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub column: String,
    pub cardinality: i32,
    pub data_type: String,
    pub parent: Option<String>,
    pub store_type: String,
}

/// Ordered levels under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub name: String,
    /// Join column of the dimension table, for relation hierarchies.
    pub primary_key: Option<String>,
    pub levels: Vec<Level>,
    /// Dimension table the levels come from.
    pub relation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub hierarchies: Vec<Hierarchy>,
    /// Fact-side join column, for relation dimensions.
    pub foreign_key: Option<String>,
    pub high_cardinality: bool,
}

impl Dimension {
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.hierarchies.iter().flat_map(|h| h.levels.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,
    pub column: String,
    pub data_type: String,
    pub aggregator: String,
    pub visible: bool,
}

/// Legacy dimension/measure view of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub database_name: String,
    pub table_name: String,
    pub dimensions: Vec<Dimension>,
    pub measures: Vec<Measure>,
    pub partitioner: Partitioner,
}

impl Table {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn measure(&self, name: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Indented tree of dimensions, hierarchies and levels, then measures.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        for dimension in &self.dimensions {
            let mut header = format!("dimension {}", dimension.name);
            if let Some(fk) = &dimension.foreign_key {
                header.push_str(&format!(" fk={}", fk));
            }
            if dimension.high_cardinality {
                header.push_str(" high_cardinality");
            }
            lines.push(header);
            for hierarchy in &dimension.hierarchies {
                lines.push(format!("  hierarchy {}", hierarchy.name));
                for level in &hierarchy.levels {
                    lines.push(format!("    level {} ({})", level.name, level.data_type));
                }
            }
        }
        for measure in &self.measures {
            let mut line = format!("measure {} {}", measure.name, measure.aggregator);
            if !measure.visible {
                line.push_str(" invisible");
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}
