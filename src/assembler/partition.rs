//! Partitioner resolution, shared by both compiler passes.

use tracing::debug;

use crate::model::PartitionSpec;
use crate::plugin::PartitionerRegistry;
use crate::schema::{Partitioner, DEFAULT_PARTITIONER, DEFAULT_PARTITION_COUNT};
use crate::validation::ValidationError;

/// Fallbacks used when a spec leaves the partitioner unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDefaults {
    pub class: String,
    pub count: u32,
}

impl Default for PartitionDefaults {
    fn default() -> Self {
        Self {
            class: DEFAULT_PARTITIONER.to_string(),
            count: DEFAULT_PARTITION_COUNT,
        }
    }
}

/// Why a partition spec could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error(transparent)]
    Plugin(#[from] crate::plugin::PluginError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Resolve `spec` against the candidate partition columns.
///
/// `candidates` are the dimension column (or level) names, in layout
/// order; requested names match them case-insensitively and resolve to
/// the candidate's spelling.
pub fn resolve_partitioner(
    spec: Option<&PartitionSpec>,
    candidates: &[&str],
    registry: &PartitionerRegistry,
    defaults: &PartitionDefaults,
) -> Result<Partitioner, PartitionError> {
    let Some(spec) = spec else {
        debug!(class = %defaults.class, count = defaults.count, "no partition spec, using default");
        return Ok(Partitioner {
            class: defaults.class.clone(),
            columns: Vec::new(),
            count: defaults.count,
            nodes: None,
        });
    };

    let class = spec.class.trim();
    let count = spec.count.unwrap_or(defaults.count);

    if class.is_empty() && spec.has_blank_columns() {
        return Ok(Partitioner {
            class: defaults.class.clone(),
            columns: Vec::new(),
            count,
            nodes: None,
        });
    }

    let class = if class.is_empty() {
        defaults.class.clone()
    } else {
        registry.resolve(class)?.name().to_string()
    };

    let (resolved, unresolved) = match_columns(&spec.columns, candidates);
    if !unresolved.is_empty() {
        return Err(ValidationError::UnresolvedPartitionColumns(unresolved).into());
    }

    Ok(Partitioner {
        class,
        columns: resolved,
        count,
        nodes: spec.nodes.clone(),
    })
}

/// Split requested names into (resolved spellings, unresolved names).
///
/// Each match consumes the requested name from the unresolved list; what
/// remains after scanning every candidate is reported in request order.
fn match_columns(requested: &[String], candidates: &[&str]) -> (Vec<String>, Vec<String>) {
    let requested: Vec<&str> = requested
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    let mut unresolved: Vec<String> = requested.iter().map(|r| r.to_string()).collect();
    let mut resolved = Vec::new();

    for name in &requested {
        for candidate in candidates {
            if candidate.eq_ignore_ascii_case(name) {
                unresolved.retain(|u| !u.eq_ignore_ascii_case(name));
                resolved.push(candidate.to_string());
            }
        }
    }
    (resolved, unresolved)
}
