use crate::dns::events::QueryEventEmitter;
use crate::dns::load_balancer::{BootstrapResolver, GroupManager};
use async_trait::async_trait;
use sift_dns_application::{DnsResolver, QueryOutcome, ResolveContext, ResolverType};
use sift_dns_domain::{DnsRequest, DnsResponse, DomainError, UpstreamConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Terminal stage: forwards the question to the configured upstream groups.
///
/// Every failure (timeout, connection error, cancellation, all groups
/// exhausted) is converted into a `Failed` response here; callers never see
/// a raw transport error.
pub struct UpstreamResolver {
    groups: GroupManager,
    emitter: QueryEventEmitter,
    enabled: bool,
}

impl UpstreamResolver {
    /// Build the stage, resolving hostname endpoints through the bootstrap
    /// resolver. Fails fast on invalid group configuration.
    pub async fn new(
        config: &UpstreamConfig,
        emitter: QueryEventEmitter,
    ) -> Result<Self, DomainError> {
        let bootstrap = BootstrapResolver::new(config.bootstrap.clone(), config.query_timeout);
        let groups = GroupManager::new(config, &bootstrap).await?;
        Ok(Self {
            groups,
            emitter,
            enabled: config.enabled,
        })
    }

    fn emit(&self, ctx: &ResolveContext, request: &DnsRequest, response: &DnsResponse) {
        self.emitter.emit(QueryOutcome {
            name: Arc::clone(&request.name),
            client: request.client.address,
            resolver: ResolverType::Upstream,
            response_type: response.response_type,
            duration: ctx.elapsed(),
        });
    }
}

#[async_trait]
impl DnsResolver for UpstreamResolver {
    async fn resolve(
        &self,
        ctx: &ResolveContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        let response = match self
            .groups
            .query(ctx, &request.name, request.record_type, request.class)
            .await
        {
            Ok(reply) => {
                let answer = reply.answer;
                if answer.is_nxdomain() {
                    DnsResponse::nxdomain(
                        answer.negative_soa_ttl.unwrap_or(0),
                        format!("RESOLVED (NXDOMAIN via {})", reply.server),
                    )
                } else {
                    DnsResponse::resolved(
                        answer.records,
                        answer.min_ttl.unwrap_or(0),
                        format!("RESOLVED ({})", reply.server),
                    )
                }
            }
            Err(DomainError::Cancelled) => {
                DnsResponse::failed(format!("FAILED (cancelled: {})", request.name))
            }
            Err(e) => {
                warn!(name = %request.name, error = %e, "Upstream resolution failed");
                DnsResponse::failed(format!("FAILED ({e})"))
            }
        };

        self.emit(ctx, request, &response);
        Ok(response)
    }

    fn resolver_type(&self) -> ResolverType {
        ResolverType::Upstream
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_config(&self) {
        info!(
            groups = self.groups.group_count(),
            servers = self.groups.server_count(),
            timeout_ms = self.groups.query_timeout().as_millis() as u64,
            "Upstream resolver configured"
        );
    }
}
