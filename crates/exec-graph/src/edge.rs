//! Edges, their semantic types and borrowed edge views.

use crate::{EdgeDirection, Error, Result, Timestamp, Vertex};
use petgraph::graph::EdgeIndex;
use std::fmt;
use std::str::FromStr;

/// Handle to an edge stored in an [`ExecutionGraph`](crate::ExecutionGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) EdgeIndex);

impl EdgeId {
    /// Position of the edge in the graph's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0.index())
    }
}

/// What a worker was doing, or how it was reached, over an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeType {
    /// Zero-duration link letting two vertices share a timestamp.
    Epsilon,
    /// State could not be determined.
    Unknown,
    /// Untyped edge.
    #[default]
    Default,
    /// Running on a processor.
    Running,
    /// Blocked on a resource.
    Blocked,
    /// Handling an interrupt.
    Interrupted,
    /// Runnable but preempted.
    Preempted,
    /// Waiting for a timer.
    Timer,
    /// Waiting on another worker.
    Waiting,
    /// Network communication.
    Network,
    /// Waiting for user input.
    UserInput,
    /// Waiting for a block device.
    BlockDevice,
    /// Inter-processor interrupt.
    Ipi,
}

impl EdgeType {
    /// Every edge type.
    pub const ALL: [Self; 13] = [
        Self::Epsilon,
        Self::Unknown,
        Self::Default,
        Self::Running,
        Self::Blocked,
        Self::Interrupted,
        Self::Preempted,
        Self::Timer,
        Self::Waiting,
        Self::Network,
        Self::UserInput,
        Self::BlockDevice,
        Self::Ipi,
    ];

    /// Kebab-case name of the edge type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Epsilon => "epsilon",
            Self::Unknown => "unknown",
            Self::Default => "default",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Interrupted => "interrupted",
            Self::Preempted => "preempted",
            Self::Timer => "timer",
            Self::Waiting => "waiting",
            Self::Network => "network",
            Self::UserInput => "user-input",
            Self::BlockDevice => "block-device",
            Self::Ipi => "ipi",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownEdgeType {
                name: s.to_string(),
            })
    }
}

/// Mutable payload of an edge. Endpoints are fixed once the edge exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edge {
    kind: EdgeType,
    qualifier: Option<String>,
}

impl Edge {
    pub(crate) const fn new(kind: EdgeType, qualifier: Option<String>) -> Self {
        Self { kind, qualifier }
    }

    /// Semantic type of the edge.
    #[must_use]
    pub const fn kind(&self) -> EdgeType {
        self.kind
    }

    /// Free-text qualifier, e.g. the name of the interrupt handler.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub(crate) fn set_kind(&mut self, kind: EdgeType) {
        self.kind = kind;
    }

    pub(crate) fn set_kind_qualified(&mut self, kind: EdgeType, qualifier: Option<String>) {
        self.kind = kind;
        self.qualifier = qualifier;
    }
}

/// Borrowed view of an edge together with its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'g> {
    pub(crate) id: EdgeId,
    pub(crate) from: &'g Vertex,
    pub(crate) to: &'g Vertex,
    pub(crate) edge: &'g Edge,
}

impl<'g> EdgeRef<'g> {
    /// Handle of the edge.
    #[must_use]
    pub const fn id(&self) -> EdgeId {
        self.id
    }

    /// Source vertex.
    #[must_use]
    pub const fn from(&self) -> &'g Vertex {
        self.from
    }

    /// Target vertex.
    #[must_use]
    pub const fn to(&self) -> &'g Vertex {
        self.to
    }

    /// Semantic type.
    #[must_use]
    pub const fn kind(&self) -> EdgeType {
        self.edge.kind
    }

    /// Optional qualifier.
    #[must_use]
    pub fn qualifier(&self) -> Option<&'g str> {
        self.edge.qualifier.as_deref()
    }

    /// Time elapsed between both endpoints, saturating at `Timestamp::MAX`.
    #[must_use]
    pub const fn duration(&self) -> Timestamp {
        self.to.timestamp().saturating_sub(self.from.timestamp())
    }

    /// The endpoint reached by following this edge in `direction`:
    /// the target for outgoing slots, the source for incoming ones.
    #[must_use]
    pub const fn neighbor(&self, direction: EdgeDirection) -> &'g Vertex {
        if direction.is_outgoing() {
            self.to
        } else {
            self.from
        }
    }
}
