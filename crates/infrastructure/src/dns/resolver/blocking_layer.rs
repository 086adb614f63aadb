use crate::dns::block_filter::{compile_block_index, BlockIndex, ClientGrouper};
use crate::dns::events::QueryEventEmitter;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use sift_dns_application::{DnsResolver, QueryOutcome, ResolveContext, ResolverType};
use sift_dns_domain::{
    BlockMode, BlockingConfig, DnsRecord, DnsRequest, DnsResponse, DomainError, RecordType,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one denylist refresh.
#[derive(Debug, Clone, Copy)]
pub struct RefreshOutcome {
    pub domains: usize,
    pub rejected: usize,
}

/// Blocking decorator.
///
/// Resolves the client to its groups, consults the compiled block index and
/// short-circuits matching queries with a synthesized response before they
/// reach the cache or the network. The index is replaced whole on refresh;
/// in-flight lookups keep reading the previous snapshot.
pub struct BlockingResolver {
    inner: Arc<dyn DnsResolver>,
    index: ArcSwap<BlockIndex>,
    grouper: ClientGrouper,
    /// Group → denylist membership, kept for recompiles.
    group_denylists: HashMap<String, Vec<String>>,
    mode: BlockMode,
    block_ttl: u32,
    emitter: QueryEventEmitter,
    enabled: bool,
}

impl BlockingResolver {
    pub fn new(
        inner: Arc<dyn DnsResolver>,
        config: &BlockingConfig,
        emitter: QueryEventEmitter,
    ) -> Result<Self, DomainError> {
        let index = compile_block_index(&config.denylists, &config.group_denylists)?;
        Ok(Self {
            inner,
            index: ArcSwap::from_pointee(index),
            grouper: ClientGrouper::new(&config.client_groups, &config.default_groups),
            group_denylists: config.group_denylists.clone(),
            mode: config.mode.clone(),
            block_ttl: config.block_ttl,
            emitter,
            enabled: config.enabled,
        })
    }

    /// Recompile from a fresh denylist snapshot and atomically swap the
    /// active index. Unknown-denylist references from the configured group
    /// membership still fail; malformed entries are counted, not fatal.
    pub fn refresh(
        &self,
        denylists: &HashMap<String, Vec<String>>,
    ) -> Result<RefreshOutcome, DomainError> {
        let index = compile_block_index(denylists, &self.group_denylists)?;
        let outcome = RefreshOutcome {
            domains: index.total_domains,
            rejected: index.rejected_entries,
        };
        self.index.store(Arc::new(index));
        info!(
            domains = outcome.domains,
            rejected = outcome.rejected,
            "Block index refreshed"
        );
        Ok(outcome)
    }

    pub fn blocked_domain_count(&self) -> usize {
        self.index.load().total_domains
    }

    fn block_response(&self, request: &DnsRequest, denylist: &str) -> DnsResponse {
        let reason = format!("BLOCKED ({denylist})");
        match &self.mode {
            BlockMode::NxDomain => DnsResponse::blocked_nxdomain(self.block_ttl, reason),
            BlockMode::ZeroIp => {
                let answers = match request.record_type {
                    RecordType::A => vec![DnsRecord::a(
                        Arc::clone(&request.name),
                        std::net::Ipv4Addr::UNSPECIFIED,
                        self.block_ttl,
                    )],
                    RecordType::Aaaa => vec![DnsRecord::aaaa(
                        Arc::clone(&request.name),
                        std::net::Ipv6Addr::UNSPECIFIED,
                        self.block_ttl,
                    )],
                    _ => Vec::new(),
                };
                DnsResponse::blocked(answers, self.block_ttl, reason)
            }
            BlockMode::CustomAddress(addrs) => {
                let answers = addrs
                    .iter()
                    .filter_map(|addr| match (request.record_type, addr) {
                        (RecordType::A, IpAddr::V4(v4)) => Some(DnsRecord::a(
                            Arc::clone(&request.name),
                            *v4,
                            self.block_ttl,
                        )),
                        (RecordType::Aaaa, IpAddr::V6(v6)) => Some(DnsRecord::aaaa(
                            Arc::clone(&request.name),
                            *v6,
                            self.block_ttl,
                        )),
                        _ => None,
                    })
                    .collect();
                DnsResponse::blocked(answers, self.block_ttl, reason)
            }
        }
    }
}

#[async_trait]
impl DnsResolver for BlockingResolver {
    async fn resolve(
        &self,
        ctx: &ResolveContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        let groups = self.grouper.groups_for(&request.client);
        if !groups.is_empty() {
            let index = self.index.load();
            if let Some(denylist) = index.matched_denylist(&request.name, &groups) {
                debug!(
                    name = %request.name,
                    client = %request.client.address,
                    denylist = %denylist,
                    "Query blocked"
                );
                let response = self.block_response(request, &denylist);
                self.emitter.emit(QueryOutcome {
                    name: Arc::clone(&request.name),
                    client: request.client.address,
                    resolver: ResolverType::Blocking,
                    response_type: response.response_type,
                    duration: ctx.elapsed(),
                });
                return Ok(response);
            }
        }

        self.inner.resolve(ctx, request).await
    }

    fn resolver_type(&self) -> ResolverType {
        ResolverType::Blocking
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_config(&self) {
        let index = self.index.load();
        info!(
            denylists = index.denylist_count(),
            domains = index.total_domains,
            rejected = index.rejected_entries,
            mode = ?self.mode,
            "Blocking resolver configured"
        );
    }
}
