//! Schema Assembler: global validation, ordering and flags.
//!
//! Consumes the builder's flat column list and produces the final
//! [`CompiledTable`]. The steps run strictly in sequence because each
//! relies on the invariants established by the previous one:
//!
//! ```text
//! duplicate names ─▶ column groups ─▶ ordering ─▶ inverted index
//!        ─▶ dummy measure ─▶ column validator ─▶ partitioner ─▶ TableSchema
//! ```

pub mod column_group;
pub mod partition;

use tracing::debug;

use crate::builder::{BuildState, ColumnSchemaBuilder};
use crate::compile::{CompileError, CompileResult};
use crate::model::TableDefinition;
use crate::plugin::{ColumnValidator, PartitionerRegistry};
use crate::schema::{ColumnSchema, CompiledTable, TableSchema};
use crate::validation::{contains_name, ensure_unique, ValidationError};

pub use partition::{resolve_partitioner, PartitionDefaults, PartitionError};

/// Columns split by layout bucket, each in original relative order.
#[derive(Debug, Default)]
pub struct OrderedColumns {
    /// High-cardinality and plain (non-complex) dimensions.
    pub dimensions: Vec<ColumnSchema>,
    pub complex: Vec<ColumnSchema>,
    pub measures: Vec<ColumnSchema>,
}

impl OrderedColumns {
    /// One pass over the original order, routing each column to one bucket.
    pub fn route(columns: Vec<ColumnSchema>, high_cardinality: &[String]) -> Self {
        let mut ordered = Self::default();
        for column in columns {
            if contains_name(high_cardinality, &column.column_name) {
                ordered.dimensions.push(column);
            } else if column.is_complex() {
                ordered.complex.push(column);
            } else if column.is_dimension {
                ordered.dimensions.push(column);
            } else {
                ordered.measures.push(column);
            }
        }
        ordered
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColumnSchema> {
        self.dimensions
            .iter_mut()
            .chain(self.complex.iter_mut())
            .chain(self.measures.iter_mut())
    }

    /// Final physical order: dimensions, complex, measures.
    pub fn into_layout(self) -> Vec<ColumnSchema> {
        let mut layout = self.dimensions;
        layout.extend(self.complex);
        layout.extend(self.measures);
        layout
    }
}

pub struct SchemaAssembler<'a> {
    definition: &'a TableDefinition,
    builder: &'a ColumnSchemaBuilder<'a>,
    validator: &'a dyn ColumnValidator,
    registry: &'a PartitionerRegistry,
    partition_defaults: &'a PartitionDefaults,
}

impl<'a> SchemaAssembler<'a> {
    pub fn new(
        definition: &'a TableDefinition,
        builder: &'a ColumnSchemaBuilder<'a>,
        validator: &'a dyn ColumnValidator,
        registry: &'a PartitionerRegistry,
        partition_defaults: &'a PartitionDefaults,
    ) -> Self {
        Self {
            definition,
            builder,
            validator,
            registry,
            partition_defaults,
        }
    }

    /// Turn the builder output into the final compiled table.
    pub fn assemble(
        &self,
        mut columns: Vec<ColumnSchema>,
        state: BuildState,
    ) -> CompileResult<CompiledTable> {
        let definition = self.definition;

        ensure_unique(
            columns.iter().map(|c| c.column_name.as_str()),
            ValidationError::DuplicateColumn,
        )?;

        column_group::validate_groups(
            &definition.column_groups,
            &columns,
            &definition.high_cardinality,
        )?;
        column_group::assign_groups(&definition.column_groups, &mut columns);

        let mut ordered = OrderedColumns::route(columns, &definition.high_cardinality);
        debug!(
            dimensions = ordered.dimensions.len(),
            complex = ordered.complex.len(),
            measures = ordered.measures.len(),
            "routed columns"
        );

        for column in ordered.iter_mut() {
            column.use_inverted_index = column.is_dimension
                && !contains_name(&definition.no_inverted_index, &column.column_name);
        }

        if ordered.measures.is_empty() {
            let (dummy, _) = self.builder.dummy_measure(state);
            debug!(column = %dummy.column_name, "no measures declared, adding dummy measure");
            ordered.measures.push(dummy);
        }

        let layout = ordered.into_layout();
        self.validator.validate_columns(&layout)?;

        let candidates: Vec<&str> = layout
            .iter()
            .filter(|c| c.is_dimension)
            .map(|c| c.column_name.as_str())
            .collect();
        let partitioner = resolve_partitioner(
            definition.partitioner.as_ref(),
            &candidates,
            self.registry,
            self.partition_defaults,
        )
        .map_err(CompileError::from)?;

        let schema = TableSchema {
            table_id: uuid::Uuid::new_v4().to_string(),
            table_name: definition.table_name.clone(),
            table_properties: definition.table_properties.clone(),
            columns: layout,
            evolution: Vec::new(),
        };

        Ok(CompiledTable {
            database_name: definition.database_name.clone(),
            table_name: definition.table_name.clone(),
            schema,
            partitioner,
        })
    }
}
