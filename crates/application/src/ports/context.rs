use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Per-query call context threaded through the resolver chain.
///
/// Carries the caller-supplied cancellation signal and the instant the query
/// entered the chain. Only the upstream stage observes cancellation actively;
/// the CPU-bound stages complete quickly and do not poll it.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    cancel: CancellationToken,
    started: Instant,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::with_cancellation(CancellationToken::new())
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            started: Instant::now(),
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the caller cancels the query.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Time spent in the chain so far.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}
