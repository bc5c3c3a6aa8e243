//! Per-worker time accounting over a scan-line traversal.

use crate::{EdgeRef, ExecutionGraph, GraphVisitor, GraphWorker, Result, Timestamp};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Time spent on horizontal edges, grouped by the worker owning each edge.
///
/// Only edges reached by the traversal are counted; vertical edges carry
/// no worker time and are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics<W: GraphWorker> {
    sums: IndexMap<W, Timestamp>,
    total: Timestamp,
}

struct Accumulator<'g, W: GraphWorker> {
    graph: &'g ExecutionGraph<W>,
    stats: GraphStatistics<W>,
}

impl<W: GraphWorker> GraphVisitor for Accumulator<'_, W> {
    fn visit_edge(&mut self, edge: EdgeRef<'_>, horizontal: bool) {
        if !horizontal {
            return;
        }
        let Some(worker) = self.graph.parent_of(edge.from().id()) else {
            trace!(edge = %edge.id(), "Skipping edge from unregistered vertex");
            return;
        };
        let duration = edge.duration();
        let sum = self.stats.sums.entry(worker.clone()).or_default();
        *sum = sum.saturating_add(duration);
        self.stats.total = self.stats.total.saturating_add(duration);
    }
}

impl<W: GraphWorker> GraphStatistics<W> {
    /// Traverse the graph from the head of `worker` and sum edge durations.
    ///
    /// # Errors
    ///
    /// Propagates traversal errors such as
    /// [`Error::CycleDetected`](crate::Error::CycleDetected).
    pub fn compute(graph: &ExecutionGraph<W>, worker: &W) -> Result<Self> {
        let mut accumulator = Accumulator {
            graph,
            stats: Self {
                sums: IndexMap::new(),
                total: 0,
            },
        };
        graph.scan_line_traverse_worker(worker, &mut accumulator)?;

        let stats = accumulator.stats;
        debug!(
            ?worker,
            workers = stats.sums.len(),
            total = stats.total,
            "Computed graph statistics"
        );
        Ok(stats)
    }

    /// Time accumulated by `worker`, if any of its edges were reached.
    #[must_use]
    pub fn sum(&self, worker: &W) -> Option<Timestamp> {
        self.sums.get(worker).copied()
    }

    /// Time accumulated over every worker.
    #[must_use]
    pub const fn total(&self) -> Timestamp {
        self.total
    }

    /// Fraction of the total accumulated by `worker`.
    ///
    /// Returns `Some(0.0)` when the total is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share(&self, worker: &W) -> Option<f64> {
        let sum = self.sum(worker)?;
        if self.total == 0 {
            return Some(0.0);
        }
        Some(sum as f64 / self.total as f64)
    }

    /// Workers with accumulated time, in the order they were first reached.
    pub fn workers(&self) -> impl Iterator<Item = &W> {
        self.sums.keys()
    }
}
