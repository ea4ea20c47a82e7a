//! Cooperative cancellation for bounded searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Checked by combinatorial searches between candidate evaluations.
pub trait Cancellable {
    /// Whether the caller asked to stop.
    fn is_cancelled(&self) -> bool;

    /// Request cancellation.
    fn cancel(&self);
}

/// Shared cancellation flag with an optional wall-clock deadline.
///
/// Clones share the flag, so a caller can keep one handle and pass another
/// into a search running on a different thread. The deadline is reported
/// separately from explicit cancellation: a search that runs out of time
/// returns what it found so far, a cancelled one returns an error.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Same flag, with a deadline `budget` from now. A zero budget means none.
    pub fn with_budget(&self, budget: Duration) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: (!budget.is_zero()).then(|| Instant::now() + budget),
        }
    }

    /// Whether the deadline, if any, has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
