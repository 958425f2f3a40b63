//! Column unique-id generators.

use dashmap::DashMap;
use uuid::Uuid;

use crate::schema::ColumnSchema;

/// Assigns the stable identity storage files key a column on.
pub trait UniqueIdGenerator: Send + Sync {
    /// Generate an id for `column` of `table_name`, unique within `database_name`.
    fn generate_unique_id(&self, database_name: &str, table_name: &str, column: &ColumnSchema)
        -> String;
}

/// Namespace for [`StableIdGenerator`] ids.
const COLUMN_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c0f_0a3e_5d1b_4c8e_9a47_2f1e_83b5_d90c);

/// Name-based v5 UUIDs over `database/table/column`, compared case-insensitively.
///
/// Recompiling the same definition yields the same ids, so artifacts keyed
/// on them (dictionary files) are found again on later runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StableIdGenerator;

impl UniqueIdGenerator for StableIdGenerator {
    fn generate_unique_id(&self, database_name: &str, table_name: &str, column: &ColumnSchema) -> String {
        let key = format!("{}/{}/{}", database_name, table_name, column.column_name).to_lowercase();
        Uuid::new_v5(&COLUMN_ID_NAMESPACE, key.as_bytes()).to_string()
    }
}

/// Random v4 UUIDs. Ids change on every compilation.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl UniqueIdGenerator for UuidIdGenerator {
    fn generate_unique_id(&self, _database_name: &str, _table_name: &str, _column: &ColumnSchema) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Per-database counters, yielding `<database>_<n>`.
///
/// Ids are reproducible for a given call order, which keeps compiled
/// layouts comparable across runs in tests and tooling.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counters: DashMap<String, u64>,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UniqueIdGenerator for SequentialIdGenerator {
    fn generate_unique_id(&self, database_name: &str, _table_name: &str, _column: &ColumnSchema) -> String {
        let key = database_name.to_lowercase();
        let mut counter = self.counters.entry(key.clone()).or_insert(0);
        *counter += 1;
        format!("{}_{}", key, *counter)
    }
}
