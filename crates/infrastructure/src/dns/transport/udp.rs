use super::DnsTransport;
use async_trait::async_trait;
use sift_dns_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP. One socket per exchange; responses from an unexpected
/// source address are logged and dropped by the connected socket.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        match self.server_addr {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(&self, query: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("udp bind: {e}")))?;
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("udp connect {}: {e}", self.server_addr)))?;

        tokio::time::timeout(timeout, socket.send(query))
            .await
            .map_err(|_| DomainError::QueryTimeout(timeout))?
            .map_err(|e| DomainError::IoError(format!("udp send {}: {e}", self.server_addr)))?;

        debug!(server = %self.server_addr, bytes = query.len(), "UDP query sent");

        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let received = tokio::time::timeout(timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| DomainError::QueryTimeout(timeout))?
            .map_err(|e| DomainError::IoError(format!("udp recv {}: {e}", self.server_addr)))?;

        if received == 0 {
            warn!(server = %self.server_addr, "Empty UDP response");
            return Err(DomainError::IoError(format!(
                "empty response from {}",
                self.server_addr
            )));
        }

        buf.truncate(received);
        debug!(server = %self.server_addr, bytes = received, "UDP response received");
        Ok(buf)
    }
}
