//! Timed execution-dependency graphs for tracegraph.
//!
//! An [`ExecutionGraph`] records what a set of workers (threads, processes,
//! devices) were doing over time. Each worker owns a chronological chain of
//! [`Vertex`] values linked by horizontal edges; vertical edges record that
//! one worker woke up, signalled or otherwise unblocked another.
//!
//! # Key Types
//!
//! - [`ExecutionGraph`]: vertex/edge arena plus the worker registry
//! - [`GraphWorker`]: trait implemented by the caller's worker type
//! - [`GraphVisitor`]: callbacks driven by the scan-line traversal
//! - [`GraphStatistics`]: per-worker time accounting over a traversal
//!
//! # Example
//!
//! ```ignore
//! use tracegraph_exec_graph::{EdgeType, ExecutionGraph, GraphWorker};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct Thread(u32);
//!
//! impl GraphWorker for Thread {
//!     fn host_id(&self) -> &str {
//!         "localhost"
//!     }
//! }
//!
//! let mut graph = ExecutionGraph::new();
//! let a1 = graph.create_vertex(0);
//! let a2 = graph.create_vertex(10);
//! graph.append(Thread(1), a1, EdgeType::Default)?;
//! graph.append(Thread(1), a2, EdgeType::Running)?;
//!
//! let b1 = graph.create_vertex(5);
//! graph.add(Thread(2), b1)?;
//! graph.link(a1, b1, EdgeType::Network)?;
//! graph.close_graph();
//!
//! let stats = tracegraph_exec_graph::GraphStatistics::compute(&graph, &Thread(1))?;
//! assert_eq!(stats.sum(&Thread(1)), Some(10));
//! ```

mod completion;
mod config;
mod edge;
mod error;
#[cfg(test)]
mod fixtures;
mod graph;
mod statistics;
mod traversal;
mod validation;
mod vertex;

pub use completion::CompletionGate;
pub use config::{GraphConfig, VertexLookup};
pub use edge::{Edge, EdgeId, EdgeRef, EdgeType};
pub use error::{Error, Result};
pub use graph::ExecutionGraph;
pub use statistics::GraphStatistics;
pub use traversal::GraphVisitor;
pub use validation::ValidationResult;
pub use vertex::{EdgeDirection, EdgeSlots, Timestamp, Vertex, VertexId};

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// Trait for the worker type owning chains of an [`ExecutionGraph`].
///
/// Workers are used as map keys, so equality and hashing must be stable for
/// the lifetime of the graph.
pub trait GraphWorker: Clone + Eq + Hash + fmt::Debug {
    /// Identifier of the host the worker runs on.
    fn host_id(&self) -> &str;

    /// Descriptive key/value pairs about the worker at time `at`.
    fn worker_information(&self, _at: Timestamp) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
