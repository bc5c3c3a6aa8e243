//! Execution graph storage, mutation and navigation.
//!
//! Vertices and edges live in a petgraph arena owned by the graph. Each
//! worker owns a chronological chain of vertices; a reverse index maps every
//! registered vertex back to its worker.

use crate::{
    CompletionGate, Edge, EdgeDirection, EdgeId, EdgeRef, EdgeSlots, EdgeType, Error,
    GraphConfig, GraphWorker, Result, Timestamp, Vertex, VertexId, VertexLookup,
};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    const fn slots(self) -> (EdgeDirection, EdgeDirection) {
        match self {
            Self::Horizontal => (
                EdgeDirection::OutgoingHorizontal,
                EdgeDirection::IncomingHorizontal,
            ),
            Self::Vertical => (
                EdgeDirection::OutgoingVertical,
                EdgeDirection::IncomingVertical,
            ),
        }
    }
}

/// Timed execution-dependency graph.
///
/// Built incrementally by a single writer (`&mut self` methods), then closed
/// with [`close_graph`](Self::close_graph) and shared read-only.
#[derive(Debug)]
pub struct ExecutionGraph<W: GraphWorker> {
    /// Arena of every vertex and edge ever created.
    pub(crate) graph: DiGraph<Vertex, Edge>,
    /// Worker to chronological vertex chain.
    pub(crate) chains: IndexMap<W, Vec<VertexId>>,
    /// Registered vertex to position of its worker in `chains`.
    pub(crate) owners: HashMap<VertexId, usize>,
    lookup: VertexLookup,
    completion: CompletionGate,
}

impl<W: GraphWorker> ExecutionGraph<W> {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&GraphConfig::default())
    }

    /// Create a new empty graph using the given configuration.
    #[must_use]
    pub fn with_config(config: &GraphConfig) -> Self {
        let vertices = config.vertex_capacity.unwrap_or_default();
        let edges = config.edge_capacity.unwrap_or_default();
        let workers = config.worker_capacity.unwrap_or_default();
        Self {
            graph: DiGraph::with_capacity(vertices, edges),
            chains: IndexMap::with_capacity(workers),
            owners: HashMap::with_capacity(vertices),
            lookup: config.lookup(),
            completion: CompletionGate::new(),
        }
    }

    // ------------------------------------------------------------------
    // Vertices and edges
    // ------------------------------------------------------------------

    /// Create a vertex at `timestamp`. The vertex belongs to no worker yet.
    pub fn create_vertex(&mut self, timestamp: Timestamp) -> VertexId {
        let id = VertexId(NodeIndex::new(self.graph.node_count()));
        let index = self.graph.add_node(Vertex::new(id, timestamp));
        debug_assert_eq!(index, id.0);
        id
    }

    /// Get a vertex by handle.
    #[must_use]
    pub fn vertex(&self, vertex: VertexId) -> Option<&Vertex> {
        self.graph.node_weight(vertex.0)
    }

    pub(crate) fn vertex_checked(&self, vertex: VertexId) -> Result<&Vertex> {
        self.vertex(vertex).ok_or(Error::UnknownVertex { vertex })
    }

    fn slots_mut(&mut self, vertex: VertexId) -> Result<&mut EdgeSlots> {
        self.graph
            .node_weight_mut(vertex.0)
            .map(Vertex::edges_mut)
            .ok_or(Error::UnknownVertex { vertex })
    }

    /// Get an edge and its endpoints by handle.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<EdgeRef<'_>> {
        let (from, to) = self.graph.edge_endpoints(edge.0)?;
        Some(EdgeRef {
            id: edge,
            from: self.graph.node_weight(from)?,
            to: self.graph.node_weight(to)?,
            edge: self.graph.edge_weight(edge.0)?,
        })
    }

    /// Edge installed in a slot of `vertex`.
    #[must_use]
    pub fn edge_at(&self, vertex: VertexId, direction: EdgeDirection) -> Option<EdgeRef<'_>> {
        self.vertex(vertex)?.edge(direction).and_then(|edge| self.edge(edge))
    }

    /// Vertex reached from `vertex` through its edge in `direction`.
    #[must_use]
    pub fn neighbor(&self, vertex: VertexId, direction: EdgeDirection) -> Option<VertexId> {
        self.edge_at(vertex, direction).map(|edge| edge.neighbor(direction).id())
    }

    /// Clear one slot of `vertex`. The other endpoint keeps its reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVertex`] if the handle is not from this graph.
    pub fn remove_edge(
        &mut self,
        vertex: VertexId,
        direction: EdgeDirection,
    ) -> Result<Option<EdgeId>> {
        Ok(self.slots_mut(vertex)?.take(direction))
    }

    /// Change the type of an edge, keeping its qualifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEdge`] if the handle is not from this graph.
    pub fn set_edge_type(&mut self, edge: EdgeId, kind: EdgeType) -> Result<()> {
        self.graph
            .edge_weight_mut(edge.0)
            .ok_or(Error::UnknownEdge { edge })?
            .set_kind(kind);
        Ok(())
    }

    /// Change the type and qualifier of an edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEdge`] if the handle is not from this graph.
    pub fn set_edge_type_qualified(
        &mut self,
        edge: EdgeId,
        kind: EdgeType,
        qualifier: impl Into<String>,
    ) -> Result<()> {
        self.graph
            .edge_weight_mut(edge.0)
            .ok_or(Error::UnknownEdge { edge })?
            .set_kind_qualified(kind, Some(qualifier.into()));
        Ok(())
    }

    /// Link two vertices of the same worker.
    ///
    /// Any edge already in `from`'s outgoing or `to`'s incoming horizontal
    /// slot is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfLink`] if `from == to` and
    /// [`Error::InvalidOrdering`] if `to` is earlier than `from`.
    pub fn link_horizontal(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: EdgeType,
    ) -> Result<EdgeId> {
        self.install(from, to, Axis::Horizontal, kind, None)
    }

    /// [`link_horizontal`](Self::link_horizontal) with a qualifier.
    ///
    /// # Errors
    ///
    /// Same as [`link_horizontal`](Self::link_horizontal).
    pub fn link_horizontal_qualified(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: EdgeType,
        qualifier: impl Into<String>,
    ) -> Result<EdgeId> {
        self.install(from, to, Axis::Horizontal, kind, Some(qualifier.into()))
    }

    /// Link two vertices of different workers.
    ///
    /// Any edge already in `from`'s outgoing or `to`'s incoming vertical
    /// slot is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfLink`] if `from == to` and
    /// [`Error::InvalidOrdering`] if `to` is earlier than `from`.
    pub fn link_vertical(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: EdgeType,
    ) -> Result<EdgeId> {
        self.install(from, to, Axis::Vertical, kind, None)
    }

    /// [`link_vertical`](Self::link_vertical) with a qualifier.
    ///
    /// # Errors
    ///
    /// Same as [`link_vertical`](Self::link_vertical).
    pub fn link_vertical_qualified(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: EdgeType,
        qualifier: impl Into<String>,
    ) -> Result<EdgeId> {
        self.install(from, to, Axis::Vertical, kind, Some(qualifier.into()))
    }

    fn check_link(&self, from: VertexId, to: VertexId) -> Result<()> {
        let source = self.vertex_checked(from)?;
        let target = self.vertex_checked(to)?;
        if from == to {
            return Err(Error::SelfLink { vertex: from });
        }
        if target.timestamp() < source.timestamp() {
            return Err(Error::InvalidOrdering {
                from,
                from_ts: source.timestamp(),
                to,
                to_ts: target.timestamp(),
            });
        }
        Ok(())
    }

    fn install(
        &mut self,
        from: VertexId,
        to: VertexId,
        axis: Axis,
        kind: EdgeType,
        qualifier: Option<String>,
    ) -> Result<EdgeId> {
        self.check_link(from, to)?;

        let edge = EdgeId(self.graph.add_edge(from.0, to.0, Edge::new(kind, qualifier)));
        let (outgoing, incoming) = axis.slots();

        if let Some(previous) = self.slots_mut(from)?.replace(outgoing, edge) {
            trace!(%from, %previous, %edge, slot = %outgoing, "Replaced edge");
        }
        if let Some(previous) = self.slots_mut(to)?.replace(incoming, edge) {
            trace!(%to, %previous, %edge, slot = %incoming, "Replaced edge");
        }

        Ok(edge)
    }

    // ------------------------------------------------------------------
    // Worker registry
    // ------------------------------------------------------------------

    fn register(&mut self, worker: W, vertex: VertexId) {
        let slot = match self.chains.get_index_of(&worker) {
            Some(slot) => slot,
            None => self.chains.insert_full(worker, Vec::new()).0,
        };
        self.register_at(slot, vertex);
    }

    fn register_at(&mut self, slot: usize, vertex: VertexId) {
        let Some((_, chain)) = self.chains.get_index_mut(slot) else {
            return;
        };
        chain.push(vertex);

        if let Some(previous) = self.owners.insert(vertex, slot)
            && previous != slot
        {
            warn!(
                %vertex,
                previous = ?self.chains.get_index(previous).map(|(worker, _)| worker),
                current = ?self.chains.get_index(slot).map(|(worker, _)| worker),
                "Vertex re-registered with another worker"
            );
        }
    }

    /// Append `vertex` to the worker's chain without creating an edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVertex`] if the handle is not from this graph.
    pub fn add(&mut self, worker: W, vertex: VertexId) -> Result<()> {
        self.vertex_checked(vertex)?;
        self.register(worker, vertex);
        Ok(())
    }

    /// Append `vertex` to the worker's chain, linking it from the current tail.
    ///
    /// Returns the new horizontal edge, or `None` for the worker's first vertex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrdering`] if `vertex` is earlier than the tail
    /// and [`Error::SelfLink`] if it already is the tail. Nothing is registered
    /// on error.
    pub fn append(
        &mut self,
        worker: W,
        vertex: VertexId,
        kind: EdgeType,
    ) -> Result<Option<EdgeId>> {
        self.append_inner(worker, vertex, kind, None)
    }

    /// [`append`](Self::append) with a qualifier on the created edge.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append).
    pub fn append_qualified(
        &mut self,
        worker: W,
        vertex: VertexId,
        kind: EdgeType,
        qualifier: impl Into<String>,
    ) -> Result<Option<EdgeId>> {
        self.append_inner(worker, vertex, kind, Some(qualifier.into()))
    }

    fn append_inner(
        &mut self,
        worker: W,
        vertex: VertexId,
        kind: EdgeType,
        qualifier: Option<String>,
    ) -> Result<Option<EdgeId>> {
        self.vertex_checked(vertex)?;
        let edge = match self.tail(&worker) {
            Some(tail) => Some(self.install(tail, vertex, Axis::Horizontal, kind, qualifier)?),
            None => None,
        };
        debug!(?worker, %vertex, %kind, "Appended vertex");
        self.register(worker, vertex);
        Ok(edge)
    }

    /// Link `from` to `to`, choosing the axis from their owners.
    ///
    /// If `to` is not registered it is appended to `from`'s worker and the
    /// edge is horizontal. Otherwise the edge is horizontal when both share
    /// a worker and vertical when they do not. Occupied slots are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInGraph`] if `from` is not registered, plus the
    /// errors of [`link_horizontal`](Self::link_horizontal).
    pub fn link(&mut self, from: VertexId, to: VertexId, kind: EdgeType) -> Result<EdgeId> {
        self.link_inner(from, to, kind, None)
    }

    /// [`link`](Self::link) with a qualifier on the created edge.
    ///
    /// # Errors
    ///
    /// Same as [`link`](Self::link).
    pub fn link_qualified(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: EdgeType,
        qualifier: impl Into<String>,
    ) -> Result<EdgeId> {
        self.link_inner(from, to, kind, Some(qualifier.into()))
    }

    fn link_inner(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: EdgeType,
        qualifier: Option<String>,
    ) -> Result<EdgeId> {
        self.vertex_checked(from)?;
        self.vertex_checked(to)?;
        let from_slot = *self
            .owners
            .get(&from)
            .ok_or(Error::NotInGraph { vertex: from })?;

        let axis = match self.owners.get(&to) {
            Some(&to_slot) if to_slot == from_slot => Axis::Horizontal,
            Some(_) => Axis::Vertical,
            None => {
                self.check_link(from, to)?;
                debug!(%from, %to, "Adopting unregistered link target");
                self.register_at(from_slot, to);
                Axis::Horizontal
            }
        };

        let edge = self.install(from, to, axis, kind, qualifier)?;
        debug!(%from, %to, %edge, ?axis, %kind, "Linked vertices");
        Ok(edge)
    }

    /// Last vertex of the worker's chain.
    #[must_use]
    pub fn tail(&self, worker: &W) -> Option<VertexId> {
        self.chains.get(worker)?.last().copied()
    }

    /// First vertex of the worker's chain.
    #[must_use]
    pub fn head_of(&self, worker: &W) -> Option<VertexId> {
        self.chains.get(worker)?.first().copied()
    }

    /// Remove and unregister the last vertex of the worker's chain.
    ///
    /// Edges pointing into the removed vertex are left in place.
    pub fn remove_tail(&mut self, worker: &W) -> Option<VertexId> {
        let (slot, _, chain) = self.chains.get_full_mut(worker)?;
        let vertex = chain.pop()?;
        if self.owners.get(&vertex) == Some(&slot) {
            self.owners.remove(&vertex);
        }
        debug!(?worker, %vertex, "Removed tail vertex");
        Some(vertex)
    }

    /// Head of the worker whose first vertex is the earliest of the graph.
    ///
    /// Ties are broken by creation order.
    #[must_use]
    pub fn head(&self) -> Option<VertexId> {
        self.chains
            .values()
            .filter_map(|chain| chain.first())
            .filter_map(|&vertex| self.vertex(vertex))
            .min()
            .map(Vertex::id)
    }

    /// Walk incoming horizontal edges back to the start of `vertex`'s line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the walk loops and
    /// [`Error::UnknownVertex`] if the handle is not from this graph.
    pub fn head_of_vertex(&self, vertex: VertexId) -> Result<VertexId> {
        let limit = self.graph.node_count();
        let mut current = self.vertex_checked(vertex)?;
        let mut steps = 0;

        while let Some(edge) = current.edge(EdgeDirection::IncomingHorizontal) {
            let Some((source, _)) = self.graph.edge_endpoints(edge.0) else {
                break;
            };
            if source == vertex.0 || steps >= limit {
                return Err(Error::CycleDetected { vertex });
            }
            steps += 1;
            current = self.vertex_checked(VertexId(source))?;
        }

        Ok(current.id())
    }

    /// First vertex of the worker's chain at or after `time`.
    #[must_use]
    pub fn vertex_at(&self, worker: &W, time: Timestamp) -> Option<VertexId> {
        let chain = self.chains.get(worker)?;
        let before = |vertex: &VertexId| {
            self.vertex(*vertex)
                .is_some_and(|vertex| vertex.timestamp() < time)
        };
        match self.lookup {
            VertexLookup::Linear => chain.iter().copied().find(|vertex| !before(vertex)),
            VertexLookup::Bisect => chain.get(chain.partition_point(before)).copied(),
        }
    }

    /// Number of registered vertices, summed over every chain.
    #[must_use]
    pub fn size(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    /// Number of vertices ever created, registered or not.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges ever created, including replaced ones.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Snapshot of the known workers, in first-registration order.
    #[must_use]
    pub fn workers(&self) -> Vec<W> {
        self.chains.keys().cloned().collect()
    }

    /// Chain of a worker. Empty for unknown workers.
    #[must_use]
    pub fn nodes_of(&self, worker: &W) -> &[VertexId] {
        self.chains.get(worker).map_or(&[], Vec::as_slice)
    }

    /// Worker owning a vertex.
    #[must_use]
    pub fn parent_of(&self, vertex: VertexId) -> Option<&W> {
        self.owners
            .get(&vertex)
            .and_then(|&slot| self.chains.get_index(slot))
            .map(|(worker, _)| worker)
    }

    // ------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------

    /// Whether the builder has finished with this graph.
    #[must_use]
    pub fn is_done_building(&self) -> bool {
        self.completion.is_done()
    }

    /// Signal that construction is complete. Later calls have no effect.
    pub fn close_graph(&self) {
        if self.completion.close() {
            debug!(
                vertices = self.size(),
                workers = self.chains.len(),
                edges = self.edge_count(),
                "Execution graph closed"
            );
        }
    }

    /// Handle on the completion signal, observable from other threads.
    #[must_use]
    pub fn completion(&self) -> CompletionGate {
        self.completion.clone()
    }
}

impl<W: GraphWorker> Default for ExecutionGraph<W> {
    fn default() -> Self {
        Self::new()
    }
}
