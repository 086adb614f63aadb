use super::DnsTransport;
use async_trait::async_trait;
use sift_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP with the RFC 1035 two-byte length prefix. Used directly for
/// `tcp:` upstreams and as the retry path for truncated UDP answers.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn exchange(&self, query: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let exchange = async {
            let mut stream = TcpStream::connect(self.server_addr)
                .await
                .map_err(|e| DomainError::IoError(format!("tcp connect {}: {e}", self.server_addr)))?;

            let len = u16::try_from(query.len())
                .map_err(|_| DomainError::InvalidDnsResponse("query exceeds 64 KiB".into()))?;
            let mut framed = Vec::with_capacity(2 + query.len());
            framed.extend_from_slice(&len.to_be_bytes());
            framed.extend_from_slice(query);
            stream
                .write_all(&framed)
                .await
                .map_err(|e| DomainError::IoError(format!("tcp send {}: {e}", self.server_addr)))?;

            let response_len = stream
                .read_u16()
                .await
                .map_err(|e| DomainError::IoError(format!("tcp recv {}: {e}", self.server_addr)))?;
            let mut buf = vec![0u8; usize::from(response_len)];
            stream
                .read_exact(&mut buf)
                .await
                .map_err(|e| DomainError::IoError(format!("tcp recv {}: {e}", self.server_addr)))?;

            debug!(server = %self.server_addr, bytes = buf.len(), "TCP response received");
            Ok(buf)
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| DomainError::QueryTimeout(timeout))?
    }
}
