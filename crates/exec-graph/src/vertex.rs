//! Vertices and their four edge slots.

use crate::{EdgeId, Error, Result};
use petgraph::graph::NodeIndex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Point in time of a vertex, typically in nanoseconds.
pub type Timestamp = i64;

/// Handle to a vertex stored in an [`ExecutionGraph`](crate::ExecutionGraph).
///
/// Handles are allocated in creation order, so comparing two handles of the
/// same graph tells which vertex was created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) NodeIndex);

impl VertexId {
    /// Position of the vertex in the graph's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0.index())
    }
}

/// One of the four edge slots of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// Next vertex of the same worker.
    OutgoingHorizontal,
    /// Previous vertex of the same worker.
    IncomingHorizontal,
    /// Dependency towards another worker.
    OutgoingVertical,
    /// Dependency from another worker.
    IncomingVertical,
}

impl EdgeDirection {
    /// All directions, in slot order.
    pub const ALL: [Self; 4] = [
        Self::OutgoingHorizontal,
        Self::IncomingHorizontal,
        Self::OutgoingVertical,
        Self::IncomingVertical,
    ];

    /// Whether an edge in this slot leaves the vertex.
    #[must_use]
    pub const fn is_outgoing(self) -> bool {
        matches!(self, Self::OutgoingHorizontal | Self::OutgoingVertical)
    }

    /// Whether this slot holds an intra-worker edge.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::OutgoingHorizontal | Self::IncomingHorizontal)
    }

    /// The slot the same edge occupies on its other endpoint.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::OutgoingHorizontal => Self::IncomingHorizontal,
            Self::IncomingHorizontal => Self::OutgoingHorizontal,
            Self::OutgoingVertical => Self::IncomingVertical,
            Self::IncomingVertical => Self::OutgoingVertical,
        }
    }

    /// Kebab-case name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutgoingHorizontal => "outgoing-horizontal",
            Self::IncomingHorizontal => "incoming-horizontal",
            Self::OutgoingVertical => "outgoing-vertical",
            Self::IncomingVertical => "incoming-vertical",
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| Error::unknown_direction(s))
    }
}

impl TryFrom<u8> for EdgeDirection {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| Error::unknown_direction(code.to_string()))
    }
}

/// The four edge slots of a vertex. Each slot holds at most one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSlots {
    outgoing_horizontal: Option<EdgeId>,
    incoming_horizontal: Option<EdgeId>,
    outgoing_vertical: Option<EdgeId>,
    incoming_vertical: Option<EdgeId>,
}

impl EdgeSlots {
    /// Edge currently installed in `direction`.
    #[must_use]
    pub const fn get(&self, direction: EdgeDirection) -> Option<EdgeId> {
        match direction {
            EdgeDirection::OutgoingHorizontal => self.outgoing_horizontal,
            EdgeDirection::IncomingHorizontal => self.incoming_horizontal,
            EdgeDirection::OutgoingVertical => self.outgoing_vertical,
            EdgeDirection::IncomingVertical => self.incoming_vertical,
        }
    }

    fn slot_mut(&mut self, direction: EdgeDirection) -> &mut Option<EdgeId> {
        match direction {
            EdgeDirection::OutgoingHorizontal => &mut self.outgoing_horizontal,
            EdgeDirection::IncomingHorizontal => &mut self.incoming_horizontal,
            EdgeDirection::OutgoingVertical => &mut self.outgoing_vertical,
            EdgeDirection::IncomingVertical => &mut self.incoming_vertical,
        }
    }

    /// Install `edge`, returning whatever occupied the slot before.
    pub(crate) fn replace(&mut self, direction: EdgeDirection, edge: EdgeId) -> Option<EdgeId> {
        self.slot_mut(direction).replace(edge)
    }

    /// Clear the slot, returning its edge.
    pub(crate) fn take(&mut self, direction: EdgeDirection) -> Option<EdgeId> {
        self.slot_mut(direction).take()
    }

    /// Iterate over occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeDirection, EdgeId)> + '_ {
        EdgeDirection::ALL
            .into_iter()
            .filter_map(|direction| self.get(direction).map(|edge| (direction, edge)))
    }
}

/// A timestamped point of the graph.
///
/// Vertices are ordered by timestamp; equal timestamps fall back to creation
/// order. Equality is identity.
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    timestamp: Timestamp,
    edges: EdgeSlots,
}

impl Vertex {
    pub(crate) const fn new(id: VertexId, timestamp: Timestamp) -> Self {
        Self {
            id,
            timestamp,
            edges: EdgeSlots {
                outgoing_horizontal: None,
                incoming_horizontal: None,
                outgoing_vertical: None,
                incoming_vertical: None,
            },
        }
    }

    /// Handle of this vertex.
    #[must_use]
    pub const fn id(&self) -> VertexId {
        self.id
    }

    /// Timestamp of this vertex.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Edge installed in the given slot.
    #[must_use]
    pub const fn edge(&self, direction: EdgeDirection) -> Option<EdgeId> {
        self.edges.get(direction)
    }

    /// All four slots.
    #[must_use]
    pub const fn edges(&self) -> &EdgeSlots {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut EdgeSlots {
        &mut self.edges
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::EdgeIndex;

    fn vertex(index: usize, ts: Timestamp) -> Vertex {
        Vertex::new(VertexId(NodeIndex::new(index)), ts)
    }

    #[test]
    fn test_direction_round_trips_through_names() {
        for direction in EdgeDirection::ALL {
            assert_eq!(direction.as_str().parse::<EdgeDirection>(), Ok(direction));
        }
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert!(matches!(
            "sideways".parse::<EdgeDirection>(),
            Err(Error::UnknownDirection { .. })
        ));
        assert!(matches!(
            EdgeDirection::try_from(4),
            Err(Error::UnknownDirection { direction }) if direction == "4"
        ));
        assert_eq!(
            EdgeDirection::try_from(2),
            Ok(EdgeDirection::OutgoingVertical)
        );
    }

    #[test]
    fn test_opposite_flips_orientation_only() {
        for direction in EdgeDirection::ALL {
            let opposite = direction.opposite();
            assert_ne!(direction.is_outgoing(), opposite.is_outgoing());
            assert_eq!(direction.is_horizontal(), opposite.is_horizontal());
            assert_eq!(opposite.opposite(), direction);
        }
    }

    #[test]
    fn test_slot_replace_does_not_accumulate() {
        let mut slots = EdgeSlots::default();
        let first = EdgeId(EdgeIndex::new(0));
        let second = EdgeId(EdgeIndex::new(1));

        assert_eq!(slots.replace(EdgeDirection::OutgoingVertical, first), None);
        assert_eq!(
            slots.replace(EdgeDirection::OutgoingVertical, second),
            Some(first)
        );
        assert_eq!(slots.get(EdgeDirection::OutgoingVertical), Some(second));
        assert_eq!(slots.iter().count(), 1);

        assert_eq!(slots.take(EdgeDirection::OutgoingVertical), Some(second));
        assert_eq!(slots.iter().count(), 0);
    }

    #[test]
    fn test_vertex_ordering_uses_timestamp_then_creation() {
        let mut vertices = vec![vertex(0, 10), vertex(1, 5), vertex(2, 5)];
        vertices.sort();
        let order: Vec<usize> = vertices.iter().map(|v| v.id().index()).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_vertex_equality_is_identity() {
        assert_ne!(vertex(0, 3), vertex(1, 3));
        assert_eq!(vertex(4, 3), vertex(4, 3));
    }
}
