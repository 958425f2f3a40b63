//! Pluggable collaborators consulted during compilation.
//!
//! The compiler never fabricates column identities, engine-specific
//! acceptance rules or partitioner implementations itself; it asks the
//! collaborators defined here. All of them must be safe to share between
//! threads compiling different tables.

pub mod id;
pub mod registry;
pub mod validator;

pub use id::{SequentialIdGenerator, StableIdGenerator, UniqueIdGenerator, UuidIdGenerator};
pub use registry::{
    HashPartitioner, PartitionerFactory, PartitionerPlugin, PartitionerRegistry, PluginError,
    SamplingPartitioner,
};
pub use validator::{ColumnValidationError, ColumnValidator, DefaultColumnValidator};
