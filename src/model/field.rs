// src/model/field.rs
use serde::{Deserialize, Serialize};

use super::types::{DataType, FieldRole};

/// A logical column declaration as produced by the DDL front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    /// Source column name.
    pub column: String,
    /// Declared type name; resolved later against the field's role.
    #[serde(default, alias = "type")]
    pub data_type: Option<String>,
    /// Display name; falls back to `column`.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested fields of a complex or dotted hierarchical column.
    #[serde(default)]
    pub children: Option<Vec<Field>>,
    /// Enclosing hierarchy name.
    #[serde(default)]
    pub parent: Option<String>,
    /// Legacy storage hint ("Columnar" when absent).
    #[serde(default)]
    pub store_type: Option<String>,
    #[serde(default)]
    pub precision: u32,
    #[serde(default)]
    pub scale: u32,
}

impl Field {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Field>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// The effective name: the declared display name, else the source column.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.column)
    }

    /// Declared type name, if any and not blank.
    pub fn declared_type(&self) -> Option<&str> {
        self.data_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn child_fields(&self) -> &[Field] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Type assumed when none is declared: struct for nested fields,
    /// otherwise the role default.
    pub fn implied_data_type(&self, role: FieldRole) -> DataType {
        if self.has_children() {
            DataType::Struct
        } else {
            role.default_data_type()
        }
    }

    /// Display name qualified by the enclosing field's path.
    pub fn qualified_name(&self, parent_path: Option<&str>) -> String {
        qualify(parent_path, self.display_name())
    }

    /// Source column qualified by the enclosing field's column path.
    pub fn qualified_column(&self, parent_path: Option<&str>) -> String {
        qualify(parent_path, &self.column)
    }
}

/// `parent.child`, unless the child already spells out its parent path.
fn qualify(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) => {
            let prefix = format!("{}.", parent);
            let already_qualified = name.len() > prefix.len()
                && name
                    .get(..prefix.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(&prefix));
            if already_qualified {
                name.to_string()
            } else {
                format!("{}{}", prefix, name)
            }
        }
        None => name.to_string(),
    }
}
