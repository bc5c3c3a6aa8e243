//! Error types for execution graph operations.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use crate::{EdgeId, Timestamp, VertexId};
use miette::Diagnostic;
use thiserror::Error;

/// Result type for execution graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, navigating or traversing an execution graph.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edge would go back in time.
    #[error("Cannot link {from} (t={from_ts}) to {to} (t={to_ts}): target is earlier than source")]
    #[diagnostic(
        code(tracegraph::graph::invalid_ordering),
        help("Edges must go forward in time; use an epsilon edge for equal timestamps")
    )]
    InvalidOrdering {
        /// Source vertex.
        from: VertexId,
        /// Source timestamp.
        from_ts: Timestamp,
        /// Target vertex.
        to: VertexId,
        /// Target timestamp.
        to_ts: Timestamp,
    },

    /// A vertex was linked to itself.
    #[error("Cannot link vertex {vertex} to itself")]
    #[diagnostic(code(tracegraph::graph::self_link))]
    SelfLink {
        /// The offending vertex.
        vertex: VertexId,
    },

    /// The source of a `link` is not owned by any worker.
    #[error("Vertex {vertex} is not registered with any worker")]
    #[diagnostic(
        code(tracegraph::graph::not_in_graph),
        help("Register the source vertex with `add` or `append` before linking from it")
    )]
    NotInGraph {
        /// The unregistered vertex.
        vertex: VertexId,
    },

    /// Walking incoming horizontal edges came back to where it started.
    #[error("Cycle detected in horizontal chain while resolving the head of {vertex}")]
    #[diagnostic(code(tracegraph::graph::cycle))]
    CycleDetected {
        /// The vertex whose head was being resolved.
        vertex: VertexId,
    },

    /// An edge direction outside of the four known slots.
    #[error("Unknown edge direction '{direction}'")]
    #[diagnostic(
        code(tracegraph::graph::unknown_direction),
        help(
            "Valid directions are outgoing-horizontal, incoming-horizontal, outgoing-vertical and incoming-vertical"
        )
    )]
    UnknownDirection {
        /// The rejected direction name or code.
        direction: String,
    },

    /// An edge type name outside of the known vocabulary.
    #[error("Unknown edge type '{name}'")]
    #[diagnostic(code(tracegraph::graph::unknown_edge_type))]
    UnknownEdgeType {
        /// The rejected edge type name.
        name: String,
    },

    /// A vertex handle that does not belong to this graph.
    #[error("Vertex {vertex} does not exist in this graph")]
    #[diagnostic(code(tracegraph::graph::unknown_vertex))]
    UnknownVertex {
        /// The foreign handle.
        vertex: VertexId,
    },

    /// An edge handle that does not belong to this graph.
    #[error("Edge {edge} does not exist in this graph")]
    #[diagnostic(code(tracegraph::graph::unknown_edge))]
    UnknownEdge {
        /// The foreign handle.
        edge: EdgeId,
    },

    /// A worker's chain is not chronological.
    #[error("Chain of worker {worker} goes back in time at position {position}")]
    #[diagnostic(
        code(tracegraph::graph::unordered_chain),
        help("`add` does not check ordering; use `append` to keep chains chronological")
    )]
    UnorderedChain {
        /// Debug rendering of the worker.
        worker: String,
        /// Index of the first vertex earlier than its predecessor.
        position: usize,
    },

    /// An installed edge points at a vertex no worker owns anymore.
    #[error("Edge {edge} references unregistered vertex {vertex}")]
    #[diagnostic(
        code(tracegraph::graph::dangling_edge),
        help("`remove_tail` does not repair edges pointing into the removed vertex")
    )]
    DanglingEdge {
        /// The dangling edge.
        edge: EdgeId,
        /// The unregistered endpoint.
        vertex: VertexId,
    },

    /// Invalid graph configuration.
    #[error("Graph configuration error: {message}")]
    #[diagnostic(code(tracegraph::graph::config))]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an unknown direction error
    #[must_use]
    pub fn unknown_direction(direction: impl Into<String>) -> Self {
        Self::UnknownDirection {
            direction: direction.into(),
        }
    }
}
