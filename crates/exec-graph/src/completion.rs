//! One-shot "construction complete" signal shared between the builder and readers.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Default)]
struct GateState {
    done: AtomicBool,
    lock: Mutex<()>,
    closed: Condvar,
}

/// Broadcast flag that goes from open to done exactly once and stays done.
///
/// Clones share the same state, so a reader thread can hold a gate without
/// holding the graph it belongs to.
#[derive(Debug, Clone, Default)]
pub struct CompletionGate {
    state: Arc<GateState>,
}

impl CompletionGate {
    /// Create an open gate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the gate as done and wake every waiter.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn close(&self) -> bool {
        let _guard = self.state.lock.lock();
        let first = !self.state.done.swap(true, Ordering::AcqRel);
        self.state.closed.notify_all();
        if first {
            debug!("Completion gate closed");
        }
        first
    }

    /// Whether the gate has been closed. Never blocks.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.done.load(Ordering::Acquire)
    }

    /// Block the calling thread until the gate is closed.
    pub fn wait(&self) {
        if self.is_done() {
            return;
        }
        let mut guard = self.state.lock.lock();
        while !self.is_done() {
            self.state.closed.wait(&mut guard);
        }
    }

    /// Block for at most `timeout`. Returns whether the gate is closed.
    ///
    /// A timeout too large to represent as a deadline waits without bound.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        if self.is_done() {
            return true;
        }
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut guard = self.state.lock.lock();
        while !self.is_done() {
            if self
                .state
                .closed
                .wait_until(&mut guard, deadline)
                .timed_out()
            {
                return self.is_done();
            }
        }
        true
    }
}
