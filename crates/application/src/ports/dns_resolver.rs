use super::ResolveContext;
use async_trait::async_trait;
use sift_dns_domain::{DnsRequest, DnsResponse, DomainError};
use std::fmt;

/// Identifies a chain stage in logs, events and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverType {
    Blocking,
    Caching,
    Upstream,
}

impl ResolverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverType::Blocking => "blocking",
            ResolverType::Caching => "caching",
            ResolverType::Upstream => "upstream",
        }
    }
}

impl fmt::Display for ResolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single capability every chain stage implements.
///
/// A stage either produces a terminal response itself or delegates to the
/// next stage it wraps, optionally post-processing the result on the way
/// back up. Delegation is always explicit; no stage is skipped at call time.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(
        &self,
        ctx: &ResolveContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError>;

    fn resolver_type(&self) -> ResolverType;

    /// Stages disabled by configuration are dropped at chain-build time.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Called once when the chain is built, to log the stage's effective
    /// configuration.
    fn log_config(&self) {}
}
