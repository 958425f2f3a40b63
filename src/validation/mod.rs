//! Structural validation shared by both compiler passes.
//!
//! Every check returns a typed [`ValidationError`] naming the offending
//! identifiers; callers propagate it and abort the compilation.

use std::collections::HashMap;

/// A declaration the compiler refuses to lay out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Duplicate column found with name: '{0}'")]
    DuplicateColumn(String),

    #[error("Duplicate dimensions found with name: '{0}'")]
    DuplicateLevel(String),

    #[error("Duplicate dimensions found with column name: '{0}'")]
    DuplicateLevelColumn(String),

    #[error("Duplicate measures found with name: '{0}'")]
    DuplicateMeasure(String),

    #[error("Duplicate measures found with column name: '{0}'")]
    DuplicateMeasureColumn(String),

    #[error("Dimension and measure defined with same name: '{0}'")]
    DimensionMeasureCollision(String),

    #[error("Column group member '{0}' is not present in the field list")]
    UnknownGroupColumn(String),

    #[error("Partition columns are not part of the dimension columns: {}", .0.join(", "))]
    UnresolvedPartitionColumns(Vec<String>),

    #[error("Aggregator should not be defined for dimension field '{0}'")]
    AggregatorOnDimension(String),

    #[error("Unsupported data type '{data_type}' for column '{column}'")]
    UnsupportedDataType { column: String, data_type: String },
}

/// Case-insensitive membership test used for every name hint list.
pub fn contains_name(names: &[String], name: &str) -> bool {
    names.iter().any(|n| n.trim().eq_ignore_ascii_case(name.trim()))
}

/// Names occurring more than once, compared case-insensitively.
///
/// Each duplicate is reported once, spelled as its first occurrence, in
/// order of first occurrence.
pub fn find_duplicates<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<&'a str> = Vec::new();
    for name in names {
        let count = counts.entry(name.to_lowercase()).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter(|name| counts[&name.to_lowercase()] > 1)
        .map(str::to_string)
        .collect()
}

/// Fail with `error(name)` for the first duplicate found.
pub fn ensure_unique<'a, I, F>(names: I, error: F) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(String) -> ValidationError,
{
    match find_duplicates(names).into_iter().next() {
        Some(name) => Err(error(name)),
        None => Ok(()),
    }
}
