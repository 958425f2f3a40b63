//! # colforge
//!
//! A logical-to-physical table schema compiler for columnar storage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Field Model                            │
//! │  (dimensions, measures, nesting, layout hints)           │
//! └─────────────────────────────────────────────────────────┘
//!                │                              │
//!                ▼ [builder]                    │
//! ┌──────────────────────────────────┐          │
//! │   ColumnSchema (type, encodings, │          │
//! │   role, unique id, ordinal)      │          │
//! └──────────────────────────────────┘          │
//!                │                              │
//!                ▼ [assembler]                  ▼ [hierarchy]
//! ┌──────────────────────────────────┐  ┌─────────────────────────┐
//! │  TableSchema + Partitioner       │  │ Dimension / Hierarchy / │
//! │  (validated, ordered layout)     │  │ Level / Measure view    │
//! └──────────────────────────────────┘  └─────────────────────────┘
//! ```
//!
//! The physical layout is persisted and read back by other processes, so
//! compiling the same definition always yields the same column order,
//! encodings and flags.

pub mod assembler;
pub mod builder;
pub mod compile;
pub mod config;
pub mod dictionary;
pub mod hierarchy;
pub mod model;
pub mod plugin;
pub mod schema;
pub mod validation;

pub use compile::{compile_table, CompileError, CompileOptions, CompileResult, Compiler};
pub use model::{DataType, Field, TableDefinition};
pub use schema::{ColumnSchema, CompiledTable, Encoding, Partitioner, TableSchema};
