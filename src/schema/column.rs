//! Physical column descriptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::DataType;

/// Group id carried by columns that belong to no column group.
pub const UNGROUPED: i32 = -1;

/// Reserved name of the synthetic measure added to measure-less tables.
pub const DEFAULT_DUMMY_MEASURE: &str = "default_dummy_measure";

/// Encodings applied to a column's values in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Values replaced by surrogate keys from a value-to-key table.
    Dictionary,
    /// Values mapped to keys arithmetically, without a dictionary lookup.
    DirectDictionary,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Dictionary => "dictionary",
            Encoding::DirectDictionary => "direct_dictionary",
        }
    }
}

/// A physical column in the compiled table layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column_name: String,
    pub data_type: DataType,
    /// Stable identity assigned once by the id generator; storage files key on it.
    pub column_unique_id: String,
    pub column_reference_id: String,
    pub encodings: Vec<Encoding>,
    pub is_dimension: bool,
    pub is_columnar: bool,
    pub column_group_id: i32,
    /// Number of direct children of a complex column.
    pub number_of_child: usize,
    pub precision: u32,
    pub scale: u32,
    pub use_inverted_index: bool,
    pub is_invisible: bool,
    /// Position in creation order.
    pub schema_ordinal: usize,
    pub column_properties: BTreeMap<String, String>,
}

impl ColumnSchema {
    /// A fresh, ungrouped, columnar column with no encodings and no identity yet.
    pub fn new(column_name: impl Into<String>, data_type: DataType, is_dimension: bool) -> Self {
        Self {
            column_name: column_name.into(),
            data_type,
            column_unique_id: String::new(),
            column_reference_id: String::new(),
            encodings: Vec::new(),
            is_dimension,
            is_columnar: true,
            column_group_id: UNGROUPED,
            number_of_child: 0,
            precision: 0,
            scale: 0,
            use_inverted_index: false,
            is_invisible: false,
            schema_ordinal: 0,
            column_properties: BTreeMap::new(),
        }
    }

    pub fn has_encoding(&self, encoding: Encoding) -> bool {
        self.encodings.contains(&encoding)
    }

    pub fn is_complex(&self) -> bool {
        self.data_type.is_complex()
    }

    pub fn is_measure(&self) -> bool {
        !self.is_dimension
    }

    pub fn is_grouped(&self) -> bool {
        self.column_group_id != UNGROUPED
    }

    /// Case-insensitive name comparison used for every name lookup.
    pub fn name_matches(&self, name: &str) -> bool {
        self.column_name.eq_ignore_ascii_case(name.trim())
    }

    /// Add an encoding, keeping the list free of repeats.
    pub(crate) fn add_encoding(&mut self, encoding: Encoding) {
        if !self.has_encoding(encoding) {
            self.encodings.push(encoding);
        }
    }

    pub(crate) fn remove_encoding(&mut self, encoding: Encoding) {
        self.encodings.retain(|e| *e != encoding);
    }
}
