//! Legacy Hierarchical Model Compiler.
//!
//! Older consumers read a table as dimensions made of hierarchies of
//! levels, plus aggregated measures. This pass derives that view from the
//! same [`TableDefinition`] as the physical schema, independently of it:
//!
//! - dimension fields (children included) flatten into levels;
//! - levels selected by a star-schema relation move into one dimension per
//!   relation, keyed by the relation's fact-side join column;
//! - the remaining levels group into hierarchies by the first segment of
//!   their dotted name.

mod types;

pub use types::{
    Dimension, Hierarchy, Level, Measure, Table, DEFAULT_AGGREGATOR, DEFAULT_STORE_TYPE,
    UNKNOWN_CARDINALITY,
};

use tracing::debug;

use crate::assembler::{resolve_partitioner, PartitionDefaults};
use crate::compile::{CompileError, CompileResult};
use crate::model::{DimensionRelation, Field, FieldRole, TableDefinition};
use crate::plugin::PartitionerRegistry;
use crate::schema::DEFAULT_DUMMY_MEASURE;
use crate::validation::{contains_name, ensure_unique, ValidationError};

pub struct HierarchyCompiler<'a> {
    definition: &'a TableDefinition,
    registry: &'a PartitionerRegistry,
    partition_defaults: &'a PartitionDefaults,
}

impl<'a> HierarchyCompiler<'a> {
    pub fn new(
        definition: &'a TableDefinition,
        registry: &'a PartitionerRegistry,
        partition_defaults: &'a PartitionDefaults,
    ) -> Self {
        Self {
            definition,
            registry,
            partition_defaults,
        }
    }

    pub fn compile(&self) -> CompileResult<Table> {
        let definition = self.definition;

        let levels: Vec<Level> = definition
            .dimensions
            .iter()
            .flat_map(|field| flatten_levels(field, None))
            .collect();
        let mut measures: Vec<Measure> = definition.measures.iter().map(build_measure).collect();

        validate_names(&levels, &measures)?;
        for aggregation in &definition.aggregations {
            if levels.iter().any(|l| l.name.eq_ignore_ascii_case(&aggregation.measure)) {
                return Err(ValidationError::AggregatorOnDimension(aggregation.measure.clone()).into());
            }
        }

        let (relation_dimensions, levels) = extract_relations(&definition.relations, levels);
        let mut dimensions = group_by_prefix(levels);
        dimensions.extend(relation_dimensions);

        for dimension in &mut dimensions {
            if contains_name(&definition.high_cardinality, &dimension.name) {
                dimension.high_cardinality = true;
            }
        }

        if measures.is_empty() {
            measures.push(Measure {
                name: DEFAULT_DUMMY_MEASURE.to_string(),
                column: DEFAULT_DUMMY_MEASURE.to_string(),
                data_type: FieldRole::Measure.default_data_type().to_string(),
                aggregator: DEFAULT_AGGREGATOR.to_string(),
                visible: false,
            });
        }

        for measure in &mut measures {
            if let Some(aggregation) = definition
                .aggregations
                .iter()
                .find(|a| a.measure.eq_ignore_ascii_case(&measure.name))
            {
                measure.aggregator = aggregation.aggregator.clone();
            }
        }

        let candidates: Vec<&str> = dimensions
            .iter()
            .flat_map(|d| d.levels())
            .map(|l| l.name.as_str())
            .collect();
        let partitioner = resolve_partitioner(
            definition.partitioner.as_ref(),
            &candidates,
            self.registry,
            self.partition_defaults,
        )
        .map_err(CompileError::from)?;

        debug!(
            table = %definition.table_name,
            dimensions = dimensions.len(),
            measures = measures.len(),
            "compiled hierarchy model"
        );

        Ok(Table {
            database_name: definition.database_name.clone(),
            table_name: definition.table_name.clone(),
            dimensions,
            measures,
            partitioner,
        })
    }
}

/// Path of the enclosing level: its qualified name and source column.
#[derive(Clone, Copy)]
struct Enclosing<'a> {
    name: &'a str,
    column: &'a str,
}

/// The field's level followed by its children's, depth-first.
///
/// Children are qualified by the enclosing path so that equally named
/// children of different fields stay distinct levels.
fn flatten_levels(field: &Field, enclosing: Option<Enclosing<'_>>) -> Vec<Level> {
    let name = field.qualified_name(enclosing.map(|e| e.name));
    let column = field.qualified_column(enclosing.map(|e| e.column));
    let data_type = field
        .declared_type()
        .map(str::to_string)
        .unwrap_or_else(|| field.implied_data_type(FieldRole::Dimension).to_string());

    let mut levels = Vec::with_capacity(1 + field.child_fields().len());
    let here = Enclosing {
        name: &name,
        column: &column,
    };
    for child in field.child_fields() {
        levels.extend(flatten_levels(child, Some(here)));
    }
    levels.insert(
        0,
        Level {
            parent: field
                .parent
                .clone()
                .or_else(|| enclosing.map(|e| e.name.to_string())),
            store_type: field
                .store_type
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_TYPE.to_string()),
            cardinality: UNKNOWN_CARDINALITY,
            name,
            column,
            data_type,
        },
    );
    levels
}

fn build_measure(field: &Field) -> Measure {
    Measure {
        name: field.display_name().to_string(),
        column: field.column.clone(),
        data_type: field
            .declared_type()
            .map(str::to_string)
            .unwrap_or_else(|| FieldRole::Measure.default_data_type().to_string()),
        aggregator: DEFAULT_AGGREGATOR.to_string(),
        visible: true,
    }
}

/// The four independent duplicate checks, then the name collision check.
fn validate_names(levels: &[Level], measures: &[Measure]) -> Result<(), ValidationError> {
    ensure_unique(levels.iter().map(|l| l.name.as_str()), ValidationError::DuplicateLevel)?;
    ensure_unique(
        levels.iter().map(|l| l.column.as_str()),
        ValidationError::DuplicateLevelColumn,
    )?;
    ensure_unique(measures.iter().map(|m| m.name.as_str()), ValidationError::DuplicateMeasure)?;
    ensure_unique(
        measures.iter().map(|m| m.column.as_str()),
        ValidationError::DuplicateMeasureColumn,
    )?;
    ensure_unique(
        levels
            .iter()
            .map(|l| l.name.as_str())
            .chain(measures.iter().map(|m| m.name.as_str())),
        ValidationError::DimensionMeasureCollision,
    )
}

/// Pull relation-selected levels into per-relation dimensions.
///
/// Returns the relation dimensions and the levels left over.
fn extract_relations(
    relations: &[DimensionRelation],
    mut levels: Vec<Level>,
) -> (Vec<Dimension>, Vec<Level>) {
    let mut dimensions = Vec::new();
    for relation in relations {
        let selected = relation.selected_columns();
        let (picked, rest): (Vec<Level>, Vec<Level>) = levels
            .into_iter()
            .partition(|l| selected.iter().any(|s| s.eq_ignore_ascii_case(&l.name)));
        levels = rest;
        if picked.is_empty() {
            continue;
        }

        let primary_key = picked
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(&relation.right_column))
            .map(|l| l.column.clone())
            .unwrap_or_else(|| relation.right_column.clone());
        debug!(relation = %relation.table, levels = picked.len(), "extracted relation levels");

        dimensions.push(Dimension {
            name: relation.table.clone(),
            hierarchies: vec![Hierarchy {
                name: relation.table.clone(),
                primary_key: Some(primary_key),
                levels: picked,
                relation: Some(relation.table.clone()),
            }],
            foreign_key: Some(relation.left_column.clone()),
            high_cardinality: false,
        });
    }
    (dimensions, levels)
}

/// One single-hierarchy dimension per distinct first path segment.
fn group_by_prefix(levels: Vec<Level>) -> Vec<Dimension> {
    let mut hierarchies: Vec<Hierarchy> = Vec::new();
    for level in levels {
        let prefix = level.name.split('.').next().unwrap_or_default().to_string();
        match hierarchies.iter_mut().find(|h| h.name == prefix) {
            Some(hierarchy) => hierarchy.levels.push(level),
            None => hierarchies.push(Hierarchy {
                name: prefix,
                primary_key: None,
                levels: vec![level],
                relation: None,
            }),
        }
    }
    hierarchies
        .into_iter()
        .map(|h| Dimension {
            name: h.name.clone(),
            hierarchies: vec![h],
            foreign_key: None,
            high_cardinality: false,
        })
        .collect()
}
