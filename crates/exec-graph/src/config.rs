//! Configuration for execution graphs.

use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tuning knobs for an [`ExecutionGraph`](crate::ExecutionGraph).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GraphConfig {
    /// Number of vertices to pre-allocate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_capacity: Option<usize>,

    /// Number of edges to pre-allocate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_capacity: Option<usize>,

    /// Number of workers to pre-allocate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_capacity: Option<usize>,

    /// Search strategy for `vertex_at`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_lookup: Option<VertexLookup>,
}

/// How `vertex_at` finds the first vertex at or after a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VertexLookup {
    /// Scan the chain front to back.
    #[default]
    Linear,
    /// Binary search; requires chronological chains.
    Bisect,
}

impl GraphConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the document is malformed or has unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Lookup strategy, falling back to [`VertexLookup::Linear`].
    #[must_use]
    pub fn lookup(&self) -> VertexLookup {
        self.vertex_lookup.unwrap_or_default()
    }
}
