//! Logical data types accepted in field declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type of a column, resolved from the declared type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Short,
    Int,
    Long,
    Double,
    Decimal,
    Boolean,
    Timestamp,
    Date,
    Array,
    Struct,
}

impl DataType {
    /// Parse a data type from a declared type name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" | "varchar" | "char" => Some(DataType::String),
            "short" | "smallint" => Some(DataType::Short),
            "int" | "integer" => Some(DataType::Int),
            "long" | "bigint" => Some(DataType::Long),
            "double" | "numeric" | "float" => Some(DataType::Double),
            "decimal" => Some(DataType::Decimal),
            "boolean" | "bool" => Some(DataType::Boolean),
            "timestamp" => Some(DataType::Timestamp),
            "date" => Some(DataType::Date),
            "array" => Some(DataType::Array),
            "struct" => Some(DataType::Struct),
            _ => None,
        }
    }

    /// Temporal types are stored with direct (positional) encoding.
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Timestamp | DataType::Date)
    }

    /// Nested types that own child columns.
    pub fn is_complex(&self) -> bool {
        matches!(self, DataType::Array | DataType::Struct)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::Decimal => "decimal",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Date => "date",
            DataType::Array => "array",
            DataType::Struct => "struct",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a declared field plays the dimension or the measure role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Dimension,
    Measure,
}

impl FieldRole {
    /// Type assumed when a field declares none.
    pub fn default_data_type(&self) -> DataType {
        match self {
            FieldRole::Dimension => DataType::String,
            FieldRole::Measure => DataType::Double,
        }
    }
}
