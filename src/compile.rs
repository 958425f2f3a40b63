//! End-to-end compilation from a table definition to a physical schema.
//!
//! ```text
//! TableDefinition ─▶ ColumnSchemaBuilder ─▶ SchemaAssembler ─▶ CompiledTable
//!        │
//!        └────────▶ HierarchyCompiler ─▶ hierarchy::Table   (legacy consumers)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use colforge::compile::Compiler;
//! use colforge::model::{Field, TableDefinition};
//!
//! let definition = TableDefinition::new("retail", "sales")
//!     .dimension(Field::new("id").with_type("int"))
//!     .measure(Field::new("amt").with_type("int"));
//!
//! let compiled = Compiler::default().compile(&definition)?;
//! println!("{}", compiled.schema.describe());
//! ```

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::assembler::{PartitionDefaults, PartitionError, SchemaAssembler};
use crate::builder::{BuildContext, ColumnSchemaBuilder};
use crate::hierarchy::{self, HierarchyCompiler};
use crate::model::{DefinitionError, TableDefinition};
use crate::plugin::{
    ColumnValidationError, ColumnValidator, DefaultColumnValidator, PartitionerRegistry,
    PluginError, StableIdGenerator, UniqueIdGenerator,
};
use crate::schema::CompiledTable;
use crate::validation::ValidationError;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that abort a compilation. No partial schema is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Schema validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Column validation error: {0}")]
    ColumnValidation(#[from] ColumnValidationError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),
}

impl From<PartitionError> for CompileError {
    fn from(err: PartitionError) -> Self {
        match err {
            PartitionError::Plugin(e) => CompileError::Plugin(e),
            PartitionError::Validation(e) => CompileError::Validation(e),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Database used by definitions that name none.
    pub default_database: String,

    /// Partitioner substituted when a definition leaves it unspecified.
    pub partition_defaults: PartitionDefaults,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_database: "default".to_string(),
            partition_defaults: PartitionDefaults::default(),
        }
    }
}

impl CompileOptions {
    pub fn with_default_database(mut self, database: impl Into<String>) -> Self {
        self.default_database = database.into();
        self
    }

    pub fn with_default_partitioner(mut self, class: impl Into<String>) -> Self {
        self.partition_defaults.class = class.into();
        self
    }

    pub fn with_default_partition_count(mut self, count: u32) -> Self {
        self.partition_defaults.count = count;
        self
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// A compiler bound to its collaborators.
///
/// Compilation is synchronous and keeps no state between calls, so one
/// `Compiler` may be shared across threads compiling different tables.
#[derive(Clone)]
pub struct Compiler {
    id_generator: Arc<dyn UniqueIdGenerator>,
    validator: Arc<dyn ColumnValidator>,
    registry: Arc<PartitionerRegistry>,
    options: CompileOptions,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            id_generator: Arc::new(StableIdGenerator),
            validator: Arc::new(DefaultColumnValidator),
            registry: Arc::new(PartitionerRegistry::with_defaults()),
            options: CompileOptions::default(),
        }
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_generator(mut self, generator: Arc<dyn UniqueIdGenerator>) -> Self {
        self.id_generator = generator;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn ColumnValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_registry(mut self, registry: Arc<PartitionerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &PartitionerRegistry {
        &self.registry
    }

    /// The definition with its database filled in when left blank.
    fn with_database<'d>(&self, definition: &'d TableDefinition) -> Cow<'d, TableDefinition> {
        if definition.database_name.trim().is_empty() {
            let mut owned = definition.clone();
            owned.database_name = self.options.default_database.clone();
            Cow::Owned(owned)
        } else {
            Cow::Borrowed(definition)
        }
    }

    /// Compile a definition into its physical schema and partitioner.
    pub fn compile(&self, definition: &TableDefinition) -> CompileResult<CompiledTable> {
        let definition = self.with_database(definition);
        let result = self.compile_inner(&definition);
        match &result {
            Ok(compiled) => info!(
                database = %compiled.database_name,
                table = %compiled.table_name,
                columns = compiled.schema.columns.len(),
                fingerprint = %compiled.schema.fingerprint().unwrap_or_default(),
                "compiled table schema"
            ),
            Err(e) => warn!(table = %definition.table_name, error = %e, "schema compilation failed"),
        }
        result
    }

    fn compile_inner(&self, definition: &TableDefinition) -> CompileResult<CompiledTable> {
        let builder = ColumnSchemaBuilder::new(BuildContext {
            database_name: &definition.database_name,
            table_name: &definition.table_name,
            high_cardinality: &definition.high_cardinality,
            column_properties: &definition.column_properties,
            id_generator: &*self.id_generator,
        });
        let (columns, state) = builder.build_all(&definition.dimensions, &definition.measures)?;

        SchemaAssembler::new(
            definition,
            &builder,
            &*self.validator,
            &self.registry,
            &self.options.partition_defaults,
        )
        .assemble(columns, state)
    }

    /// Compile the legacy dimension/hierarchy view of a definition.
    pub fn compile_hierarchy(&self, definition: &TableDefinition) -> CompileResult<hierarchy::Table> {
        let definition = self.with_database(definition);
        let result = HierarchyCompiler::new(
            &definition,
            &self.registry,
            &self.options.partition_defaults,
        )
        .compile();
        if let Err(e) = &result {
            warn!(table = %definition.table_name, error = %e, "hierarchy compilation failed");
        }
        result
    }

    /// Load a `.toml` or `.json` definition and compile it.
    pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> CompileResult<CompiledTable> {
        let definition = TableDefinition::from_file(path)?;
        self.compile(&definition)
    }
}

/// Compile with the default collaborators.
pub fn compile_table(definition: &TableDefinition) -> CompileResult<CompiledTable> {
    Compiler::default().compile(definition)
}
