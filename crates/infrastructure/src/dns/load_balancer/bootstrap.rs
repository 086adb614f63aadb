use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, UdpTransport};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use sift_dns_domain::{DomainError, RecordClass, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves upstream server hostnames without depending on the upstreams
/// themselves.
///
/// Lookups go to the configured bootstrap servers over UDP; with no
/// bootstrap servers configured, the system resolver is used. Results are
/// cached for the process lifetime; `invalidate` clears the cache.
pub struct BootstrapResolver {
    servers: Vec<SocketAddr>,
    cache: DashMap<String, Vec<IpAddr>, FxBuildHasher>,
    timeout: Duration,
}

impl BootstrapResolver {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            servers,
            cache: DashMap::with_hasher(FxBuildHasher),
            timeout,
        }
    }

    pub async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        if let Some(cached) = self.cache.get(host) {
            return Ok(cached.clone());
        }

        let addrs = self.lookup(host).await?;
        debug!(host = %host, addrs = addrs.len(), "Bootstrap resolution");
        self.cache.insert(host.to_string(), addrs.clone());
        Ok(addrs)
    }

    /// Drop every cached resolution; the next use resolves afresh.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        if self.servers.is_empty() {
            return self.system_lookup(host).await;
        }

        for server in &self.servers {
            match self.query_bootstrap(host, *server).await {
                Ok(addrs) if !addrs.is_empty() => return Ok(addrs),
                Ok(_) => {
                    debug!(host = %host, server = %server, "Bootstrap server had no answer");
                }
                Err(e) => {
                    warn!(host = %host, server = %server, error = %e, "Bootstrap query failed");
                }
            }
        }

        Err(DomainError::BootstrapFailed {
            host: host.to_string(),
            reason: "no bootstrap server produced an answer".to_string(),
        })
    }

    async fn query_bootstrap(
        &self,
        host: &str,
        server: SocketAddr,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let transport = UdpTransport::new(server);
        let mut addrs = Vec::new();

        for record_type in [RecordType::A, RecordType::Aaaa] {
            let query = MessageBuilder::build_query(host, record_type, RecordClass::In)?;
            match transport.exchange(&query, self.timeout).await {
                Ok(bytes) => {
                    let answer = ResponseParser::parse(&bytes)?;
                    addrs.extend(answer.records.iter().filter_map(|r| r.ip_addr()));
                }
                Err(e) if addrs.is_empty() => return Err(e),
                Err(_) => {}
            }
        }

        Ok(addrs)
    }

    async fn system_lookup(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        let addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0u16))
            .await
            .map_err(|e| DomainError::BootstrapFailed {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .map(|sa| sa.ip())
            .collect();

        if addrs.is_empty() {
            return Err(DomainError::BootstrapFailed {
                host: host.to_string(),
                reason: "system resolver returned no addresses".to_string(),
            });
        }
        Ok(addrs)
    }
}
