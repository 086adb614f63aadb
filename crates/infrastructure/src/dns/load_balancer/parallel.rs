use super::group::ResolvedServer;
use super::query::{query_server, ServerReply};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use sift_dns_application::ResolveContext;
use sift_dns_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Race every server in the group; the first successful, non-error reply
/// wins and the remaining attempts are aborted.
pub(super) async fn race(
    ctx: &ResolveContext,
    servers: &[ResolvedServer],
    query: &Arc<[u8]>,
    per_attempt: Duration,
) -> Result<ServerReply, DomainError> {
    if servers.is_empty() {
        return Err(DomainError::AllUpstreamsFailed);
    }
    debug!(servers = servers.len(), "Racing all upstreams");

    let mut abort_handles = Vec::with_capacity(servers.len());
    let mut attempts = FuturesUnordered::new();
    for server in servers {
        let handle = tokio::spawn(query_server(
            server.clone(),
            Arc::clone(query),
            per_attempt,
        ));
        abort_handles.push(handle.abort_handle());
        attempts.push(handle);
    }

    let winner = async {
        while let Some(joined) = attempts.next().await {
            match joined {
                Ok(Ok(reply)) => {
                    debug!(server = %reply.server, latency_ms = reply.latency.as_millis() as u64, "Fastest response");
                    return Ok(reply);
                }
                Ok(Err(e)) => {
                    debug!(error = %e, "Server failed");
                }
                Err(e) => {
                    warn!(error = %e, "Upstream task panicked");
                }
            }
        }
        Err(DomainError::AllUpstreamsFailed)
    };

    let result = tokio::select! {
        _ = ctx.cancelled() => Err(DomainError::Cancelled),
        raced = timeout(per_attempt, winner) => match raced {
            Ok(inner) => inner,
            Err(_) => Err(DomainError::QueryTimeout(per_attempt)),
        },
    };

    for handle in &abort_handles {
        handle.abort();
    }

    result
}
