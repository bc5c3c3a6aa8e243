//! Validation utilities for execution graphs.
//!
//! Construction only rejects individual bad links. `add` does not check
//! ordering, `remove_tail` leaves edges behind and explicit re-links can
//! close horizontal loops, so a built graph can still be inconsistent.

use crate::{EdgeDirection, EdgeId, Error, ExecutionGraph, GraphWorker, VertexId};
use std::collections::HashSet;
use tracing::debug;

/// Result of graph validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the graph is consistent.
    pub is_valid: bool,
    /// List of validation errors, if any.
    pub errors: Vec<Error>,
}

impl ValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    /// Create an invalid result with errors.
    #[must_use]
    pub fn invalid(errors: Vec<Error>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

impl<W: GraphWorker> ExecutionGraph<W> {
    /// Validate the graph structure.
    ///
    /// Checks for:
    /// - Chains whose timestamps go backward
    /// - Edges of registered vertices pointing at unregistered ones
    /// - Horizontal cycles
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        self.check_chain_order(&mut errors);
        self.check_dangling_edges(&mut errors);
        self.check_horizontal_cycles(&mut errors);

        if errors.is_empty() {
            ValidationResult::valid()
        } else {
            debug!(errors = errors.len(), "Execution graph failed validation");
            ValidationResult::invalid(errors)
        }
    }

    fn check_chain_order(&self, errors: &mut Vec<Error>) {
        for (worker, chain) in &self.chains {
            let timestamps: Vec<_> = chain
                .iter()
                .filter_map(|&vertex| self.vertex(vertex))
                .map(|vertex| vertex.timestamp())
                .collect();
            if let Some(position) = timestamps.windows(2).position(|pair| pair[1] < pair[0]) {
                errors.push(Error::UnorderedChain {
                    worker: format!("{worker:?}"),
                    position: position + 1,
                });
            }
        }
    }

    fn check_dangling_edges(&self, errors: &mut Vec<Error>) {
        let mut reported: HashSet<EdgeId> = HashSet::new();

        for &vertex in self.chains.values().flatten() {
            let Some(node) = self.vertex(vertex) else {
                continue;
            };
            for (direction, edge) in node.edges().iter() {
                let Some(other) = self.neighbor(vertex, direction) else {
                    continue;
                };
                if !self.owners.contains_key(&other) && reported.insert(edge) {
                    errors.push(Error::DanglingEdge {
                        edge,
                        vertex: other,
                    });
                }
            }
        }
    }

    fn check_horizontal_cycles(&self, errors: &mut Vec<Error>) {
        let mut settled: HashSet<VertexId> = HashSet::new();

        for &vertex in self.chains.values().flatten() {
            let mut path = vec![vertex];
            let mut on_path: HashSet<VertexId> = HashSet::from([vertex]);
            let mut current = vertex;

            while !settled.contains(&current) {
                let Some(previous) = self.neighbor(current, EdgeDirection::IncomingHorizontal)
                else {
                    break;
                };
                if !on_path.insert(previous) {
                    errors.push(Error::CycleDetected { vertex: previous });
                    break;
                }
                path.push(previous);
                current = previous;
            }

            settled.extend(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeType;
    use crate::fixtures::{WORKER1, WORKER2, build_full_graph};

    #[test]
    fn test_validate_empty_graph() {
        let graph: ExecutionGraph<crate::fixtures::TestWorker> = ExecutionGraph::new();
        let result = graph.validate();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_full_graph() {
        let result = build_full_graph().validate();
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_validate_unordered_chain() {
        let mut graph = ExecutionGraph::new();
        let v0 = graph.create_vertex(5);
        let v1 = graph.create_vertex(7);
        let v2 = graph.create_vertex(6);
        graph.add(WORKER1, v0).unwrap();
        graph.add(WORKER1, v1).unwrap();
        graph.add(WORKER1, v2).unwrap();

        let result = graph.validate();
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![Error::UnorderedChain {
                worker: format!("{WORKER1:?}"),
                position: 2,
            }]
        );
    }

    #[test]
    fn test_validate_dangling_edge_after_remove_tail() {
        let mut graph = ExecutionGraph::new();
        let v0 = graph.create_vertex(0);
        let v1 = graph.create_vertex(1);
        graph.append(WORKER1, v0, EdgeType::Default).unwrap();
        let edge = graph.append(WORKER1, v1, EdgeType::Default).unwrap().unwrap();
        graph.remove_tail(&WORKER1);

        let result = graph.validate();
        assert_eq!(
            result.errors,
            vec![Error::DanglingEdge { edge, vertex: v1 }]
        );
    }

    #[test]
    fn test_validate_reports_cycle_once() {
        let mut graph = ExecutionGraph::new();
        let n0 = graph.create_vertex(0);
        let n1 = graph.create_vertex(0);
        graph.add(WORKER1, n0).unwrap();
        graph.add(WORKER1, n1).unwrap();
        graph.link_horizontal(n0, n1, EdgeType::Epsilon).unwrap();
        graph.link_horizontal(n1, n0, EdgeType::Epsilon).unwrap();

        let result = graph.validate();
        assert_eq!(result.errors, vec![Error::CycleDetected { vertex: n0 }]);
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut graph = ExecutionGraph::new();
        let a0 = graph.create_vertex(9);
        let a1 = graph.create_vertex(2);
        let b0 = graph.create_vertex(4);
        let stray = graph.create_vertex(6);
        graph.add(WORKER1, a0).unwrap();
        graph.add(WORKER1, a1).unwrap();
        graph.add(WORKER2, b0).unwrap();
        graph.link_vertical(b0, stray, EdgeType::Network).unwrap();

        let result = graph.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.errors[0], Error::UnorderedChain { position: 1, .. }));
        assert!(matches!(result.errors[1], Error::DanglingEdge { vertex, .. } if vertex == stray));
    }
}
