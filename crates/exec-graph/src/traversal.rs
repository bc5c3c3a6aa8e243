//! Scan-line traversal of execution graphs.
//!
//! The traversal explores one line at a time: it rewinds to the head of a
//! vertex's horizontal chain, walks the chain forward and queues the other end
//! of every vertical edge it meets. Every reachable vertex is visited once.

use crate::{EdgeDirection, EdgeRef, ExecutionGraph, GraphWorker, Result, Vertex, VertexId};
use petgraph::visit::{VisitMap, Visitable};
use tracing::trace;

/// Callbacks invoked by [`ExecutionGraph::scan_line_traverse`].
///
/// Every method defaults to doing nothing.
pub trait GraphVisitor {
    /// Called when a new line starts.
    fn visit_head(&mut self, _vertex: &Vertex) {}

    /// Called once for every reachable vertex.
    fn visit_vertex(&mut self, _vertex: &Vertex) {}

    /// Called for outgoing edges of visited vertices; `horizontal` tells
    /// intra-worker edges from cross-worker ones.
    fn visit_edge(&mut self, _edge: EdgeRef<'_>, _horizontal: bool) {}
}

impl<W: GraphWorker> ExecutionGraph<W> {
    /// Visit everything reachable from `start`, line by line.
    ///
    /// Outgoing vertical edges are reported and their targets queued.
    /// Incoming vertical edges only queue their source. Outgoing horizontal
    /// edges are reported and followed. Passing `None` visits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`](crate::Error::CycleDetected) if a
    /// line's head cannot be resolved because of a horizontal cycle, and
    /// [`Error::UnknownVertex`](crate::Error::UnknownVertex) for foreign handles.
    pub fn scan_line_traverse<V>(&self, start: Option<VertexId>, visitor: &mut V) -> Result<()>
    where
        V: GraphVisitor + ?Sized,
    {
        let Some(start) = start else {
            return Ok(());
        };
        self.vertex_checked(start)?;

        let mut visited = self.graph.visit_map();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if visited.is_visited(&current.0) {
                continue;
            }

            // A visited head means its line no longer reaches `current`
            let head = self.head_of_vertex(current)?;
            let line_start = if visited.is_visited(&head.0) {
                current
            } else {
                head
            };

            let mut node = self.vertex_checked(line_start)?;
            trace!(start = %line_start, from = %current, "Scanning line");
            visitor.visit_head(node);

            while visited.visit(node.id().0) {
                visitor.visit_vertex(node);

                if let Some(edge) = self.follow(node, EdgeDirection::OutgoingVertical) {
                    stack.push(edge.to().id());
                    visitor.visit_edge(edge, false);
                }
                if let Some(edge) = self.follow(node, EdgeDirection::IncomingVertical) {
                    stack.push(edge.from().id());
                }

                let Some(edge) = self.follow(node, EdgeDirection::OutgoingHorizontal) else {
                    break;
                };
                visitor.visit_edge(edge, true);
                node = edge.to();
            }

            if !visited.is_visited(&current.0) {
                stack.push(current);
            }
        }

        Ok(())
    }

    /// Visit everything reachable from the head of `worker`.
    ///
    /// Unknown workers visit nothing.
    ///
    /// # Errors
    ///
    /// Same as [`scan_line_traverse`](Self::scan_line_traverse).
    pub fn scan_line_traverse_worker<V>(&self, worker: &W, visitor: &mut V) -> Result<()>
    where
        V: GraphVisitor + ?Sized,
    {
        self.scan_line_traverse(self.head_of(worker), visitor)
    }

    fn follow(&self, vertex: &Vertex, direction: EdgeDirection) -> Option<EdgeRef<'_>> {
        vertex.edge(direction).and_then(|edge| self.edge(edge))
    }
}
