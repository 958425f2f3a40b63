//! Column-group validation and assignment.
//!
//! A column group is declared as one comma-separated string of column
//! names. Grouped columns are stored together, so they lose their
//! independent columnar flag and carry the group's zero-based id.

use crate::schema::ColumnSchema;
use crate::validation::{contains_name, ValidationError};

/// Member names of one declared group, trimmed, blanks dropped.
pub fn group_members(group: &str) -> impl Iterator<Item = &str> {
    group.split(',').map(str::trim).filter(|m| !m.is_empty())
}

/// Every member must name a built column or a high-cardinality hint.
pub fn validate_groups(
    groups: &[String],
    columns: &[ColumnSchema],
    high_cardinality: &[String],
) -> Result<(), ValidationError> {
    for group in groups {
        for member in group_members(group) {
            let known = columns.iter().any(|c| c.name_matches(member))
                || contains_name(high_cardinality, member);
            if !known {
                return Err(ValidationError::UnknownGroupColumn(member.to_string()));
            }
        }
    }
    Ok(())
}

/// Stamp group ids onto member columns and clear their columnar flag.
pub fn assign_groups(groups: &[String], columns: &mut [ColumnSchema]) {
    for (group_id, group) in groups.iter().enumerate() {
        for member in group_members(group) {
            for column in columns.iter_mut().filter(|c| c.name_matches(member)) {
                column.column_group_id = group_id as i32;
                column.is_columnar = false;
            }
        }
    }
}
