use super::group::ResolvedServer;
use super::query::{query_server, ServerReply};
use sift_dns_application::ResolveContext;
use sift_dns_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Try servers in declaration order until one answers. Each attempt gets the
/// full per-attempt timeout.
pub(super) async fn failover(
    ctx: &ResolveContext,
    servers: &[ResolvedServer],
    query: &Arc<[u8]>,
    per_attempt: Duration,
) -> Result<ServerReply, DomainError> {
    let mut last_error = DomainError::AllUpstreamsFailed;

    for server in servers {
        let attempt = query_server(server.clone(), Arc::clone(query), per_attempt);
        let result = tokio::select! {
            _ = ctx.cancelled() => return Err(DomainError::Cancelled),
            result = attempt => result,
        };

        match result {
            Ok(reply) => return Ok(reply),
            Err(e) => {
                debug!(server = %server.display, error = %e, "Failover attempt failed");
                last_error = e;
            }
        }
    }

    Err(last_error)
}
