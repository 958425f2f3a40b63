//! Engine-specific column acceptance rules.

use std::collections::HashMap;

use crate::schema::ColumnSchema;

/// Rejection raised by a [`ColumnValidator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ColumnValidationError {
    pub message: String,
}

impl ColumnValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Final check over the fully assembled column list.
pub trait ColumnValidator: Send + Sync {
    fn validate_columns(&self, columns: &[ColumnSchema]) -> Result<(), ColumnValidationError>;
}

/// Rejects layouts in which two columns share a unique id.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultColumnValidator;

impl ColumnValidator for DefaultColumnValidator {
    fn validate_columns(&self, columns: &[ColumnSchema]) -> Result<(), ColumnValidationError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for column in columns {
            if let Some(other) = seen.insert(&column.column_unique_id, &column.column_name) {
                return Err(ColumnValidationError::new(format!(
                    "Two columns can not have the same column id: '{}' and '{}'",
                    other, column.column_name
                )));
            }
        }
        Ok(())
    }
}
