//! TOML-based configuration for colforge.
//!
//! Supports a config file (colforge.toml) with environment variable expansion.
//!
//! A typical file:
//! ```toml
//! [compiler]
//! database = "retail"
//! default_partitioner = "sample_data"
//! default_partition_count = 20
//! id_generator = "stable"
//!
//! [storage]
//! root = "${COLFORGE_STORE}"
//! metadata_dir = "Metadata"
//! dictionary_extension = "dict"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compile::{CompileOptions, Compiler};
use crate::dictionary::DictionaryLocator;
use crate::plugin::{SequentialIdGenerator, StableIdGenerator, UniqueIdGenerator, UuidIdGenerator};
use crate::schema::{DEFAULT_PARTITIONER, DEFAULT_PARTITION_COUNT};

/// Why a config file could not be turned into settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("colforge config not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Cannot read colforge config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Malformed colforge config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable {0} is referenced but not set")]
    MissingEnvVar(String),

    #[error("Unknown id generator: {0} (expected 'stable', 'uuid' or 'sequential')")]
    UnknownIdGenerator(String),

    #[error("Invalid colforge config: {0}")]
    InvalidConfig(String),
}

/// Contents of `colforge.toml`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Compiler defaults.
    pub compiler: CompilerSettings,

    /// Storage layout used by dictionary lookups.
    pub storage: StorageSettings,
}

/// Compiler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Database assumed by definitions that name none.
    pub database: String,

    /// Partitioner used when a definition leaves it unspecified.
    pub default_partitioner: String,

    /// Partition count used when a definition leaves it unspecified.
    pub default_partition_count: u32,

    /// Column id generator: "stable" (name-based, repeatable), "uuid"
    /// (random) or "sequential".
    pub id_generator: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            database: "default".to_string(),
            default_partitioner: DEFAULT_PARTITIONER.to_string(),
            default_partition_count: DEFAULT_PARTITION_COUNT,
            id_generator: "stable".to_string(),
        }
    }
}

impl CompilerSettings {
    pub fn to_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_default_database(self.database.clone())
            .with_default_partitioner(self.default_partitioner.clone())
            .with_default_partition_count(self.default_partition_count)
    }

    pub fn id_generator(&self) -> Result<Arc<dyn UniqueIdGenerator>, SettingsError> {
        match self.id_generator.to_lowercase().as_str() {
            "stable" => Ok(Arc::new(StableIdGenerator)),
            "uuid" => Ok(Arc::new(UuidIdGenerator)),
            "sequential" => Ok(Arc::new(SequentialIdGenerator::new())),
            other => Err(SettingsError::UnknownIdGenerator(other.to_string())),
        }
    }

    /// A compiler wired with these settings.
    pub fn compiler(&self) -> Result<Compiler, SettingsError> {
        if self.default_partition_count == 0 {
            return Err(SettingsError::InvalidConfig(
                "default_partition_count must be greater than zero".to_string(),
            ));
        }
        Ok(Compiler::new()
            .with_id_generator(self.id_generator()?)
            .with_options(self.to_options()))
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage root (supports ${ENV_VAR} expansion).
    pub root: Option<String>,

    /// Metadata directory below each table directory.
    pub metadata_dir: String,

    /// Dictionary file extension.
    pub dictionary_extension: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let locator = DictionaryLocator::default();
        Self {
            root: None,
            metadata_dir: locator.metadata_dir,
            dictionary_extension: locator.extension,
        }
    }
}

impl StorageSettings {
    /// Get the storage root with environment variables expanded.
    pub fn resolved_root(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.root
            .as_deref()
            .map(|root| expand_env_vars(root).map(PathBuf::from))
            .transpose()
    }

    pub fn locator(&self) -> DictionaryLocator {
        DictionaryLocator {
            metadata_dir: self.metadata_dir.clone(),
            extension: self.dictionary_extension.clone(),
        }
    }
}

impl Settings {
    /// Parse one config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Find and parse the active config file, or fall back to defaults.
    ///
    /// Searches in order:
    /// 1. Environment variable `COLFORGE_CONFIG`
    /// 2. `./colforge.toml`
    /// 3. `~/.config/colforge/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("COLFORGE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("colforge.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("colforge").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Substitute environment variables into a config value.
///
/// Both `${VAR}` and `$VAR` are recognized; a `$` not followed by a name
/// is kept as is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced && ch == '}' {
                chars.next();
                break;
            }
            if !braced && !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            var_name.push(ch);
            chars.next();
        }

        if var_name.is_empty() && !braced {
            // Just a lone $, keep it
            result.push('$');
            continue;
        }
        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
