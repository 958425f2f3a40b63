//! The compiled physical table.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::column::ColumnSchema;
use super::partitioner::Partitioner;

/// One append-only entry in a table's schema-evolution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEvolutionEntry {
    /// Milliseconds since the epoch, supplied by the caller.
    pub time_stamp: i64,
    pub added: Vec<ColumnSchema>,
    pub removed: Vec<ColumnSchema>,
}

/// Ordered physical column layout of one table.
///
/// Column order is significant: dimensions first (high-cardinality and
/// plain dimensions in declaration order), then complex columns, then
/// measures. The layout is persisted and read back by other processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_id: String,
    pub table_name: String,
    pub table_properties: BTreeMap<String, String>,
    pub columns: Vec<ColumnSchema>,
    pub evolution: Vec<SchemaEvolutionEntry>,
}

/// The layout-relevant part of a column, without generated identities.
#[derive(Serialize)]
struct LayoutEntry<'a> {
    name: &'a str,
    data_type: &'a str,
    encodings: Vec<&'static str>,
    dimension: bool,
    columnar: bool,
    group: i32,
    children: usize,
    precision: u32,
    scale: u32,
    inverted_index: bool,
    invisible: bool,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name_matches(name))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.is_dimension)
    }

    pub fn measures(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.is_measure())
    }

    /// Record a schema change. Existing columns are never rewritten.
    pub fn add_evolution_entry(&mut self, entry: SchemaEvolutionEntry) {
        self.evolution.push(entry);
    }

    /// Hex SHA-256 of the JSON-serialized physical layout.
    ///
    /// Generated identities (table id, column unique ids) are left out, so
    /// two compiles of the same definition share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let layout: Vec<LayoutEntry<'_>> = self
            .columns
            .iter()
            .map(|c| LayoutEntry {
                name: &c.column_name,
                data_type: c.data_type.as_str(),
                encodings: c.encodings.iter().map(|e| e.as_str()).collect(),
                dimension: c.is_dimension,
                columnar: c.is_columnar,
                group: c.column_group_id,
                children: c.number_of_child,
                precision: c.precision,
                scale: c.scale,
                inverted_index: c.use_inverted_index,
                invisible: c.is_invisible,
            })
            .collect();
        let json = serde_json::to_string(&(&self.table_name, &self.table_properties, layout))?;
        Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
    }

    /// One line per column, in physical order.
    pub fn describe(&self) -> String {
        self.columns
            .iter()
            .map(|c| {
                let encodings: Vec<&str> = c.encodings.iter().map(|e| e.as_str()).collect();
                let mut line = format!(
                    "{} {} {} [{}]",
                    c.column_name,
                    c.data_type,
                    if c.is_dimension { "dimension" } else { "measure" },
                    encodings.join(",")
                );
                if c.use_inverted_index {
                    line.push_str(" inverted");
                }
                if c.is_grouped() {
                    line.push_str(&format!(" group={}", c.column_group_id));
                }
                if c.number_of_child > 0 {
                    line.push_str(&format!(" children={}", c.number_of_child));
                }
                if c.is_invisible {
                    line.push_str(" invisible");
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledTable {
    pub database_name: String,
    pub table_name: String,
    pub schema: TableSchema,
    pub partitioner: Partitioner,
}
