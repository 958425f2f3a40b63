//! Column Schema Builder: one logical field in, physical columns out.
//!
//! The builder decides each column's resolved type, encodings, role and
//! identity. Complex fields expand depth-first: the parent column is
//! followed immediately by its flattened children, each child named by
//! its full dotted path.
//!
//! The running ordinal is carried in an explicit [`BuildState`] that each
//! call consumes and returns, so recursive expansion never shares a
//! mutable counter.

use std::collections::HashMap;
use tracing::debug;

use crate::model::{ColumnProperty, DataType, Field, FieldRole};
use crate::plugin::UniqueIdGenerator;
use crate::schema::{ColumnSchema, Encoding, DEFAULT_DUMMY_MEASURE};
use crate::validation::{contains_name, ValidationError};

/// Accumulator threaded through a build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildState {
    /// Ordinal the next created column receives.
    pub next_ordinal: usize,
}

impl BuildState {
    fn advance(self) -> (usize, Self) {
        (
            self.next_ordinal,
            Self {
                next_ordinal: self.next_ordinal + 1,
            },
        )
    }
}

/// Everything the builder consults besides the field itself.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub database_name: &'a str,
    pub table_name: &'a str,
    pub high_cardinality: &'a [String],
    pub column_properties: &'a HashMap<String, Vec<ColumnProperty>>,
    pub id_generator: &'a dyn UniqueIdGenerator,
}

pub struct ColumnSchemaBuilder<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> ColumnSchemaBuilder<'a> {
    pub fn new(ctx: BuildContext<'a>) -> Self {
        Self { ctx }
    }

    /// Build every dimension field, then every measure field, in order.
    pub fn build_all(
        &self,
        dimensions: &[Field],
        measures: &[Field],
    ) -> Result<(Vec<ColumnSchema>, BuildState), ValidationError> {
        let mut roles = dimensions
            .iter()
            .map(|f| (f, FieldRole::Dimension))
            .chain(measures.iter().map(|f| (f, FieldRole::Measure)));

        roles.try_fold(
            (Vec::new(), BuildState::default()),
            |(mut columns, state), (field, role)| {
                let (built, state) = self.build_field(field, role, state)?;
                columns.extend(built);
                Ok((columns, state))
            },
        )
    }

    /// Build one field and, for complex fields, its children.
    pub fn build_field(
        &self,
        field: &Field,
        role: FieldRole,
        state: BuildState,
    ) -> Result<(Vec<ColumnSchema>, BuildState), ValidationError> {
        self.build_nested(field, role, None, state)
    }

    fn build_nested(
        &self,
        field: &Field,
        role: FieldRole,
        parent_path: Option<&str>,
        state: BuildState,
    ) -> Result<(Vec<ColumnSchema>, BuildState), ValidationError> {
        let name = field.qualified_name(parent_path);
        let data_type = resolve_data_type(field, role, &name)?;
        let (ordinal, state) = state.advance();

        let mut column = self.build_column(&name, data_type, role, ordinal);
        column.precision = field.precision;
        column.scale = field.scale;

        if !field.has_children() {
            return Ok((vec![column], state));
        }

        let children = field.child_fields();
        column.number_of_child = children.len();
        let mut columns = vec![column];
        let mut state = state;
        for child in children {
            let (built, next) = self.build_nested(child, role, Some(&name), state)?;
            columns.extend(built);
            state = next;
        }
        Ok((columns, state))
    }

    /// Apply the encoding, property and identity policy to one column.
    pub fn build_column(
        &self,
        name: &str,
        data_type: DataType,
        role: FieldRole,
        ordinal: usize,
    ) -> ColumnSchema {
        let is_dimension = role == FieldRole::Dimension;
        let mut column = ColumnSchema::new(name, data_type, is_dimension);
        column.schema_ordinal = ordinal;

        if is_dimension {
            column.add_encoding(Encoding::Dictionary);
        }
        if contains_name(self.ctx.high_cardinality, name) {
            column.remove_encoding(Encoding::Dictionary);
        }
        if data_type.is_temporal() {
            column.add_encoding(Encoding::DirectDictionary);
        }

        if let Some(properties) = self.properties_for(name) {
            for property in properties {
                column
                    .column_properties
                    .insert(property.key.clone(), property.value.clone());
            }
        }

        let unique_id = self
            .ctx
            .id_generator
            .generate_unique_id(self.ctx.database_name, self.ctx.table_name, &column);
        column.column_reference_id = unique_id.clone();
        column.column_unique_id = unique_id;

        debug!(
            column = %column.column_name,
            data_type = %column.data_type,
            dimension = is_dimension,
            encodings = ?column.encodings,
            "built column"
        );
        column
    }

    /// The invisible double measure added to tables without measures.
    pub fn dummy_measure(&self, state: BuildState) -> (ColumnSchema, BuildState) {
        let (ordinal, state) = state.advance();
        let mut column = ColumnSchema::new(DEFAULT_DUMMY_MEASURE, DataType::Double, false);
        column.schema_ordinal = ordinal;
        column.is_invisible = true;
        let unique_id = self
            .ctx
            .id_generator
            .generate_unique_id(self.ctx.database_name, self.ctx.table_name, &column);
        column.column_reference_id = unique_id.clone();
        column.column_unique_id = unique_id;
        (column, state)
    }

    fn properties_for(&self, name: &str) -> Option<&'a Vec<ColumnProperty>> {
        let properties: &'a HashMap<String, Vec<ColumnProperty>> = self.ctx.column_properties;
        properties.get(name).or_else(|| {
            properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, props)| props)
        })
    }
}

/// Declared type, else struct for nested fields, else the role default.
fn resolve_data_type(field: &Field, role: FieldRole, name: &str) -> Result<DataType, ValidationError> {
    match field.declared_type() {
        Some(declared) => {
            DataType::from_str(declared).ok_or_else(|| ValidationError::UnsupportedDataType {
                column: name.to_string(),
                data_type: declared.to_string(),
            })
        }
        None => Ok(field.implied_data_type(role)),
    }
}
