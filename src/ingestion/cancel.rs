//! Cooperative cancellation for long-running ingestion jobs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token wrapping an `AtomicBool`.
///
/// The ingestion processor checks the token before dispatching each file;
/// cancelling stops new embedding calls and marks the job failed rather
/// than letting it complete silently with partial data.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// New token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
