//! Field Model: the immutable logical input of a compilation run.

pub mod definition;
pub mod field;
pub mod types;

pub use definition::{
    Aggregation, ColumnFilter, ColumnProperty, DefinitionError, DimensionRelation, PartitionSpec,
    TableDefinition,
};
pub use field::Field;
pub use types::{DataType, FieldRole};
