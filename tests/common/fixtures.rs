//! Shared fixtures for the flow tests: a scriptable, call-counting terminal
//! stage and configuration builders.

use async_trait::async_trait;
use sift_dns_application::{DnsResolver, ResolveContext, ResolverType};
use sift_dns_domain::{
    BlockingConfig, CachingConfig, ClientInfo, DnsRecord, DnsRequest, DnsResponse, DomainError,
    RecordClass, RecordType,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Install a test logger honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What the scripted upstream answers with.
#[derive(Debug, Clone, Copy)]
pub enum UpstreamScript {
    /// A record with this address and upstream TTL.
    Answer(Ipv4Addr, u32),
    /// NXDOMAIN carrying this SOA-derived TTL (0 = none supplied).
    NxDomain(u32),
    /// Transient failure (SERVFAIL-equivalent response).
    Fail,
}

/// Terminal stage double: counts how often it is reached and answers from a
/// fixed script, optionally after a delay.
pub struct CountingUpstream {
    script: UpstreamScript,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingUpstream {
    pub fn new(script: UpstreamScript) -> Self {
        Self {
            script,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for CountingUpstream {
    async fn resolve(
        &self,
        _ctx: &ResolveContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = match self.script {
            UpstreamScript::Answer(address, ttl) => DnsResponse::resolved(
                vec![DnsRecord::a(Arc::clone(&request.name), address, ttl)],
                ttl,
                "RESOLVED (scripted upstream)",
            ),
            UpstreamScript::NxDomain(ttl) => {
                DnsResponse::nxdomain(ttl, "RESOLVED (NXDOMAIN scripted)")
            }
            UpstreamScript::Fail => DnsResponse::failed("FAILED (scripted upstream)"),
        };
        Ok(response)
    }

    fn resolver_type(&self) -> ResolverType {
        ResolverType::Upstream
    }
}

pub fn request(name: &str) -> DnsRequest {
    client_request(name, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)))
}

pub fn client_request(name: &str, client: IpAddr) -> DnsRequest {
    DnsRequest::new(name, RecordType::A, RecordClass::In, ClientInfo::new(client))
        .expect("valid request")
}

pub fn aaaa_request(name: &str) -> DnsRequest {
    DnsRequest::new(
        name,
        RecordType::Aaaa,
        RecordClass::In,
        ClientInfo::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10))),
    )
    .expect("valid request")
}

pub fn caching_config(min: Duration, max: Duration) -> CachingConfig {
    CachingConfig {
        min_caching_time: min,
        max_caching_time: max,
        ..CachingConfig::default()
    }
}

/// One denylist named `ads` wired to the default group.
pub fn blocking_config(domains: &[&str]) -> BlockingConfig {
    let mut denylists = HashMap::new();
    denylists.insert(
        "ads".to_string(),
        domains.iter().map(|d| d.to_string()).collect(),
    );
    let mut group_denylists = HashMap::new();
    group_denylists.insert("default".to_string(), vec!["ads".to_string()]);

    BlockingConfig {
        denylists,
        group_denylists,
        ..BlockingConfig::default()
    }
}
