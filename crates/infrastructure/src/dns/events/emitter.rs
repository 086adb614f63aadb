use sift_dns_application::{QueryObserver, QueryOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Non-blocking emitter for per-query outcome events.
///
/// The producing stage calls `emit` on the hot path; events travel over an
/// unbounded channel to a drain task that feeds the external `QueryObserver`.
/// Delivery is fire-and-forget: a closed channel drops the event rather than
/// slowing resolution down.
#[derive(Clone)]
pub struct QueryEventEmitter {
    sender: Option<mpsc::UnboundedSender<QueryOutcome>>,
}

impl QueryEventEmitter {
    /// Disabled emitter; `emit` is a no-op.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Enabled emitter plus the raw receiver, for callers that drain events
    /// themselves.
    pub fn enabled() -> (Self, mpsc::UnboundedReceiver<QueryOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    /// Enabled emitter wired to `observer` through a spawned drain task.
    /// Must be called from within a Tokio runtime.
    pub fn with_observer(observer: Arc<dyn QueryObserver>) -> Self {
        let (emitter, mut rx) = Self::enabled();
        tokio::spawn(async move {
            while let Some(outcome) = rx.recv().await {
                observer.on_query(&outcome);
            }
        });
        emitter
    }

    pub fn emit(&self, outcome: QueryOutcome) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(outcome);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl Default for QueryEventEmitter {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for QueryEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEventEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
