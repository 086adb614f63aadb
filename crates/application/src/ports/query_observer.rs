use super::ResolverType;
use sift_dns_domain::ResponseType;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one query, reported to external metric/log sinks once the
/// producing stage terminates the chain.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub name: Arc<str>,
    pub client: IpAddr,
    /// The stage that produced the terminal response.
    pub resolver: ResolverType,
    pub response_type: ResponseType,
    pub duration: Duration,
}

/// Observability hook implemented outside the core (metrics, query logs).
pub trait QueryObserver: Send + Sync {
    fn on_query(&self, outcome: &QueryOutcome);
}

/// Observer that drops everything.
pub struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn on_query(&self, _outcome: &QueryOutcome) {}
}
