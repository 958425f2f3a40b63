//! Configuration module for colforge.
//!
//! Handles compiler defaults, storage layout, and environment variables.

mod settings;

pub use settings::{expand_env_vars, CompilerSettings, Settings, SettingsError, StorageSettings};
