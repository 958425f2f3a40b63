//! Partitioner implementations resolved by identifier.
//!
//! Partition specs name their implementation with a string. Instead of
//! loading code by name, identifiers are looked up in a registry of
//! factories; an unknown identifier or a failing factory is a typed error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::schema::DEFAULT_PARTITIONER;

/// Registry key of the hash partitioner.
pub const HASH_PARTITIONER: &str = "hash";

/// A partitioning implementation the load pipeline can instantiate.
pub trait PartitionerPlugin: Send + Sync {
    /// Canonical identifier recorded in the compiled partitioner.
    ///
    /// May differ from the key the plugin was resolved under, so legacy
    /// class names can be registered as aliases.
    fn name(&self) -> &str;
}

/// Factory producing a plugin instance, or a load failure message.
pub type PartitionerFactory =
    Arc<dyn Fn() -> Result<Box<dyn PartitionerPlugin>, String> + Send + Sync>;

/// Failure to resolve a partitioner implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginError {
    #[error("Partitioner implementation '{identifier}' can not be found (registered: {})", .available.join(", "))]
    NotFound {
        identifier: String,
        available: Vec<String>,
    },

    #[error("Partitioner implementation '{identifier}' can not be loaded: {message}")]
    LoadFailed { identifier: String, message: String },
}

/// Samples rows to derive partition boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct SamplingPartitioner;

impl PartitionerPlugin for SamplingPartitioner {
    fn name(&self) -> &str {
        DEFAULT_PARTITIONER
    }
}

/// Routes rows by hashing the partition columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashPartitioner;

impl PartitionerPlugin for HashPartitioner {
    fn name(&self) -> &str {
        HASH_PARTITIONER
    }
}

/// Identifier -> factory map.
#[derive(Clone, Default)]
pub struct PartitionerRegistry {
    factories: HashMap<String, PartitionerFactory>,
}

impl fmt::Debug for PartitionerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionerRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

impl PartitionerRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in sampling and hash partitioners.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_PARTITIONER, || Ok(Box::new(SamplingPartitioner)));
        registry.register(HASH_PARTITIONER, || Ok(Box::new(HashPartitioner)));
        registry
    }

    /// Register (or replace) a factory under `identifier`.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn PartitionerPlugin>, String> + Send + Sync + 'static,
    {
        self.factories.insert(identifier.into(), Arc::new(factory));
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Instantiate the implementation registered under `identifier`.
    pub fn resolve(&self, identifier: &str) -> Result<Box<dyn PartitionerPlugin>, PluginError> {
        let factory = self
            .factories
            .get(identifier)
            .ok_or_else(|| PluginError::NotFound {
                identifier: identifier.to_string(),
                available: self.identifiers(),
            })?;
        factory().map_err(|message| PluginError::LoadFailed {
            identifier: identifier.to_string(),
            message,
        })
    }
}
