mod tcp;
mod udp;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

use async_trait::async_trait;
use sift_dns_domain::DomainError;
use std::time::Duration;

/// One request/response exchange against a single upstream server.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn exchange(&self, query: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError>;
}
