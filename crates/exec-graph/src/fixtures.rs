//! Shared graphs for unit tests.

use crate::{EdgeType, ExecutionGraph, GraphWorker, VertexId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestWorker(pub u32);

impl GraphWorker for TestWorker {
    fn host_id(&self) -> &str {
        "test-host"
    }
}

pub const WORKER1: TestWorker = TestWorker(1);
pub const WORKER2: TestWorker = TestWorker(2);
pub const WORKER3: TestWorker = TestWorker(3);

/// ```text
/// ____0___1___2___3___4___5___6___7___8___9___10___11___12___13___14___15
///
/// A   *-------*       *---*-------*---*---*    *---*----*----*---------*
///             |           |           |            |    |
/// B       *---*---*-------*   *-------*------------*    *----------*
/// ```
pub fn build_full_graph() -> ExecutionGraph<TestWorker> {
    let mut graph = ExecutionGraph::new();
    let a: Vec<VertexId> = [0, 2, 4, 5, 7, 8, 9, 10, 11, 12, 13, 15]
        .into_iter()
        .map(|ts| graph.create_vertex(ts))
        .collect();
    let b: Vec<VertexId> = [1, 2, 3, 5, 6, 8, 11, 12, 14]
        .into_iter()
        .map(|ts| graph.create_vertex(ts))
        .collect();

    // Vertices that start a new line are added without an edge
    for (i, &vertex) in a.iter().enumerate() {
        if i == 2 || i == 7 {
            graph.add(WORKER1, vertex).unwrap();
        } else {
            graph.append(WORKER1, vertex, EdgeType::Default).unwrap();
        }
    }
    for (i, &vertex) in b.iter().enumerate() {
        if i == 4 || i == 7 {
            graph.add(WORKER2, vertex).unwrap();
        } else {
            graph.append(WORKER2, vertex, EdgeType::Default).unwrap();
        }
    }

    graph.link_vertical(a[1], b[1], EdgeType::Default).unwrap();
    graph.link_vertical(b[3], a[3], EdgeType::Default).unwrap();
    graph.link_vertical(a[5], b[5], EdgeType::Default).unwrap();
    graph.link_vertical(b[6], a[8], EdgeType::Default).unwrap();
    graph.link_vertical(a[9], b[7], EdgeType::Default).unwrap();
    graph
}
