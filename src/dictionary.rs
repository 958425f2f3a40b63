//! Dictionary presence lookup for the load pipeline.
//!
//! Dictionary files live in the table's metadata directory and are named
//! after the column's unique id. The directory is listed once; each
//! expected file name is then matched against that listing.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::schema::{ColumnSchema, Encoding};

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Column '{0}' is not dictionary encoded")]
    NotDictionaryEncoded(String),

    #[error("Failed to list metadata directory {path}: {source}")]
    ListError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Identity of the table whose dictionaries are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    pub database_name: String,
    pub table_name: String,
}

impl TableIdentifier {
    pub fn new(database_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            table_name: table_name.into(),
        }
    }
}

/// Expected dictionary file of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryFile {
    pub column_name: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// Where dictionary files are kept under a storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryLocator {
    /// Directory below `<root>/<database>/<table>`.
    pub metadata_dir: String,
    /// Dictionary file extension, without the dot.
    pub extension: String,
}

impl Default for DictionaryLocator {
    fn default() -> Self {
        Self {
            metadata_dir: "Metadata".to_string(),
            extension: "dict".to_string(),
        }
    }
}

impl DictionaryLocator {
    pub fn metadata_path(&self, storage_root: &Path, table: &TableIdentifier) -> PathBuf {
        storage_root
            .join(&table.database_name)
            .join(&table.table_name)
            .join(&self.metadata_dir)
    }

    pub fn file_name(&self, column: &ColumnSchema) -> String {
        format!("{}.{}", column.column_unique_id, self.extension)
    }

    /// Resolve each column's dictionary path and whether it already exists.
    ///
    /// A missing metadata directory means no dictionary has been written yet.
    pub fn locate<'c, I>(
        &self,
        columns: I,
        storage_root: &Path,
        table: &TableIdentifier,
    ) -> Result<Vec<DictionaryFile>, DictionaryError>
    where
        I: IntoIterator<Item = &'c ColumnSchema>,
    {
        let metadata_path = self.metadata_path(storage_root, table);
        let present = list_file_names(&metadata_path)?;
        debug!(path = %metadata_path.display(), files = present.len(), "listed metadata directory");

        columns
            .into_iter()
            .map(|column| {
                if !column.is_dimension || !column.has_encoding(Encoding::Dictionary) {
                    return Err(DictionaryError::NotDictionaryEncoded(
                        column.column_name.clone(),
                    ));
                }
                let file_name = self.file_name(column);
                Ok(DictionaryFile {
                    column_name: column.column_name.clone(),
                    exists: present.contains(&file_name),
                    path: metadata_path.join(file_name),
                })
            })
            .collect()
    }
}

fn list_file_names(dir: &Path) -> Result<HashSet<String>, DictionaryError> {
    let list_error = |source| DictionaryError::ListError {
        path: dir.to_path_buf(),
        source,
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(list_error(e)),
    };

    let mut names = HashSet::new();
    for entry in entries {
        let entry = entry.map_err(list_error)?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
