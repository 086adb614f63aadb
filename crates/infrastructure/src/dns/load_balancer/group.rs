use super::bootstrap::BootstrapResolver;
use super::query::ServerReply;
use super::{parallel, sequential};
use crate::dns::forwarding::MessageBuilder;
use sift_dns_application::ResolveContext;
use sift_dns_domain::{
    DomainError, RecordClass, RecordType, UpstreamConfig, UpstreamProtocol, UpstreamStrategy,
};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One upstream endpoint with its hostname already resolved.
#[derive(Debug, Clone)]
pub struct ResolvedServer {
    pub protocol: UpstreamProtocol,
    pub addr: SocketAddr,
    /// Original endpoint string, for logs.
    pub display: Arc<str>,
}

struct ResolvedGroup {
    name: Arc<str>,
    strategy: UpstreamStrategy,
    servers: Vec<ResolvedServer>,
}

/// Holds the configured upstream groups with hostnames resolved and
/// dispatches queries to them.
///
/// Groups are tried in declaration order: a transport-level failure moves on
/// to the next group, a DNS-level error is final.
pub struct GroupManager {
    groups: Vec<ResolvedGroup>,
    query_timeout: Duration,
}

impl GroupManager {
    /// Validate the configuration and resolve every hostname endpoint through
    /// `bootstrap`. Any validation or bootstrap failure refuses construction;
    /// the service must not start with a partially usable upstream set.
    pub async fn new(
        config: &UpstreamConfig,
        bootstrap: &BootstrapResolver,
    ) -> Result<Self, DomainError> {
        if config.groups.is_empty() {
            return Err(DomainError::NoUpstreamGroups);
        }

        let mut seen = HashSet::new();
        for group in &config.groups {
            if !seen.insert(group.name.as_str()) {
                return Err(DomainError::DuplicateGroup(group.name.clone()));
            }
            if group.servers.is_empty() {
                return Err(DomainError::NoUpstreamServers(group.name.clone()));
            }
        }

        let mut groups = Vec::with_capacity(config.groups.len());
        for group in &config.groups {
            let mut servers = Vec::with_capacity(group.servers.len());
            for server in &group.servers {
                let display_str: Arc<str> = Arc::from(server.to_string());
                if let Some(addr) = server.socket_addr() {
                    servers.push(ResolvedServer {
                        protocol: server.protocol,
                        addr,
                        display: display_str,
                    });
                    continue;
                }

                let addrs = bootstrap.resolve(&server.host).await?;
                for addr in limit_resolved_addrs(addrs) {
                    info!(endpoint = %display_str, resolved = %addr, "Upstream hostname resolved");
                    servers.push(ResolvedServer {
                        protocol: server.protocol,
                        addr: SocketAddr::new(addr, server.port),
                        display: Arc::clone(&display_str),
                    });
                }
            }

            if servers.is_empty() {
                return Err(DomainError::NoUpstreamServers(group.name.clone()));
            }
            groups.push(ResolvedGroup {
                name: Arc::from(group.name.as_str()),
                strategy: group.strategy,
                servers,
            });
        }

        Ok(Self {
            groups,
            query_timeout: config.query_timeout,
        })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn server_count(&self) -> usize {
        self.groups.iter().map(|g| g.servers.len()).sum()
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Resolve one question against the upstream groups.
    pub async fn query(
        &self,
        ctx: &ResolveContext,
        name: &str,
        record_type: RecordType,
        class: RecordClass,
    ) -> Result<ServerReply, DomainError> {
        let query_bytes: Arc<[u8]> =
            Arc::from(MessageBuilder::build_query(name, record_type, class)?);

        let mut last_error = DomainError::AllUpstreamsFailed;
        for group in &self.groups {
            let result = match group.strategy {
                UpstreamStrategy::Parallel => {
                    parallel::race(ctx, &group.servers, &query_bytes, self.query_timeout).await
                }
                UpstreamStrategy::Sequential => {
                    sequential::failover(ctx, &group.servers, &query_bytes, self.query_timeout)
                        .await
                }
            };

            match result {
                Ok(reply) => {
                    debug!(group = %group.name, server = %reply.server, "Group query successful");
                    return Ok(reply);
                }
                Err(e) if e.is_transport() => {
                    warn!(group = %group.name, error = %e, "Transport error, trying next group");
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

/// Keep at most one IPv4 and one IPv6 address per hostname so a single
/// endpoint cannot flood a group with racing attempts.
fn limit_resolved_addrs(addrs: Vec<IpAddr>) -> Vec<IpAddr> {
    let mut ipv4 = None;
    let mut ipv6 = None;
    for addr in addrs {
        match addr {
            IpAddr::V4(_) if ipv4.is_none() => ipv4 = Some(addr),
            IpAddr::V6(_) if ipv6.is_none() => ipv6 = Some(addr),
            _ => {}
        }
        if ipv4.is_some() && ipv6.is_some() {
            break;
        }
    }
    ipv4.into_iter().chain(ipv6).collect()
}
