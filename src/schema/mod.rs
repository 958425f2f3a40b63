//! Physical schema produced by the compiler.

pub mod column;
pub mod partitioner;
pub mod table;

pub use column::{ColumnSchema, Encoding, DEFAULT_DUMMY_MEASURE, UNGROUPED};
pub use partitioner::{Partitioner, DEFAULT_PARTITIONER, DEFAULT_PARTITION_COUNT};
pub use table::{CompiledTable, SchemaEvolutionEntry, TableSchema};
