//! The complete logical table declaration handed to the compiler.
//!
//! A definition can be built in code or loaded from TOML/JSON:
//!
//! ```toml
//! database_name = "retail"
//! table_name = "sales"
//! high_cardinality = ["order_no"]
//! column_groups = ["city,country"]
//!
//! [[dimensions]]
//! column = "order_no"
//! type = "string"
//!
//! [[measures]]
//! column = "amount"
//! type = "double"
//!
//! [partitioner]
//! columns = ["city"]
//! count = 8
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::field::Field;
use crate::validation::contains_name;

/// Errors raised while reading a table definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Failed to read definition file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML definition: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse JSON definition: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported definition format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
}

/// User-declared table definition with all layout hints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Owning database; blank selects the compiler's default database.
    #[serde(default)]
    pub database_name: String,

    pub table_name: String,

    /// Fields declared as dimensions, in declaration order.
    #[serde(default)]
    pub dimensions: Vec<Field>,

    /// Fields declared as measures, in declaration order.
    #[serde(default)]
    pub measures: Vec<Field>,

    /// Dimensions stored without dictionary encoding.
    #[serde(default)]
    pub high_cardinality: Vec<String>,

    /// Columns that must not get an inverted index.
    #[serde(default)]
    pub no_inverted_index: Vec<String>,

    /// Column groups, each a comma-separated list of column names.
    #[serde(default)]
    pub column_groups: Vec<String>,

    /// Per-column property lists, keyed by column name.
    #[serde(default)]
    pub column_properties: HashMap<String, Vec<ColumnProperty>>,

    #[serde(default)]
    pub table_properties: BTreeMap<String, String>,

    #[serde(default)]
    pub partitioner: Option<PartitionSpec>,

    /// Star-schema joins to dimension tables (legacy model only).
    #[serde(default)]
    pub relations: Vec<DimensionRelation>,

    /// Aggregators declared for measures (legacy model only).
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

/// One key/value column property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProperty {
    pub key: String,
    pub value: String,
}

impl ColumnProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Caller-supplied partitioning request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartitionSpec {
    /// Partitioner implementation identifier; empty selects the default.
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub columns: Vec<String>,
    /// Requested partition count; absent selects the default count.
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub nodes: Option<Vec<String>>,
}

impl PartitionSpec {
    /// True when no usable partition column was named.
    pub fn has_blank_columns(&self) -> bool {
        self.columns.iter().all(|c| c.trim().is_empty())
    }
}

/// A join from the fact table to a star-schema dimension table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRelation {
    /// Foreign dimension table.
    pub table: String,
    /// Join column on the fact side.
    pub left_column: String,
    /// Join column on the dimension table side.
    pub right_column: String,
    /// All columns of the dimension table.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub filter: ColumnFilter,
}

/// Include/exclude list applied to a relation's columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// "include" keeps only `names`; any other value excludes them.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub names: Vec<String>,
}

impl ColumnFilter {
    pub fn include(names: &[&str]) -> Self {
        Self {
            kind: "include".to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn exclude(names: &[&str]) -> Self {
        Self {
            kind: "exclude".to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn is_include(&self) -> bool {
        self.kind.eq_ignore_ascii_case("include")
    }
}

impl DimensionRelation {
    /// Column names this relation pulls into its own dimension.
    pub fn selected_columns(&self) -> Vec<&str> {
        if self.filter.is_include() {
            self.filter.names.iter().map(String::as_str).collect()
        } else {
            self.columns
                .iter()
                .filter(|c| !contains_name(&self.filter.names, c))
                .map(String::as_str)
                .collect()
        }
    }
}

/// Aggregator requested for a named measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub measure: String,
    pub aggregator: String,
}

impl TableDefinition {
    pub fn new(database_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn dimension(mut self, field: Field) -> Self {
        self.dimensions.push(field);
        self
    }

    pub fn measure(mut self, field: Field) -> Self {
        self.measures.push(field);
        self
    }

    pub fn high_cardinality(mut self, column: impl Into<String>) -> Self {
        self.high_cardinality.push(column.into());
        self
    }

    pub fn no_inverted_index(mut self, column: impl Into<String>) -> Self {
        self.no_inverted_index.push(column.into());
        self
    }

    pub fn column_group(mut self, members: impl Into<String>) -> Self {
        self.column_groups.push(members.into());
        self
    }

    pub fn with_partitioner(mut self, spec: PartitionSpec) -> Self {
        self.partitioner = Some(spec);
        self
    }

    pub fn is_high_cardinality(&self, name: &str) -> bool {
        contains_name(&self.high_cardinality, name)
    }

    /// Parse a definition from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a definition from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a definition, choosing the format from the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match extension.as_str() {
            "toml" => Self::from_toml_str(&fs::read_to_string(path)?),
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(DefinitionError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
