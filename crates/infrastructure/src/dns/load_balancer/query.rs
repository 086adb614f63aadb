use super::group::ResolvedServer;
use crate::dns::forwarding::{ResponseParser, UpstreamAnswer};
use crate::dns::transport::{DnsTransport, TcpTransport, UdpTransport};
use sift_dns_domain::{DomainError, UpstreamProtocol};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A parsed reply plus where it came from and how long it took.
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub answer: UpstreamAnswer,
    pub server: SocketAddr,
    pub latency: Duration,
}

/// Issue one query to one upstream server and parse the reply.
///
/// UDP answers that come back truncated are retried once over TCP against
/// the same server. Upstream SERVFAIL/REFUSED is an error here so racing
/// strategies keep waiting for a usable reply; NXDOMAIN is a valid answer.
pub(super) async fn query_server(
    server: ResolvedServer,
    query: Arc<[u8]>,
    timeout: Duration,
) -> Result<ServerReply, DomainError> {
    let started = Instant::now();

    let answer = match server.protocol {
        UpstreamProtocol::Udp => {
            let bytes = UdpTransport::new(server.addr).exchange(&query, timeout).await?;
            let parsed = ResponseParser::parse(&bytes)?;
            if parsed.truncated {
                debug!(server = %server.display, "Truncated UDP answer, retrying over TCP");
                let bytes = TcpTransport::new(server.addr).exchange(&query, timeout).await?;
                ResponseParser::parse(&bytes)?
            } else {
                parsed
            }
        }
        UpstreamProtocol::Tcp => {
            let bytes = TcpTransport::new(server.addr).exchange(&query, timeout).await?;
            ResponseParser::parse(&bytes)?
        }
    };

    if answer.is_server_error() {
        return Err(DomainError::InvalidDnsResponse(format!(
            "{} answered {}",
            server.display, answer.rcode
        )));
    }

    let latency = started.elapsed();
    debug!(
        server = %server.display,
        latency_ms = latency.as_millis() as u64,
        rcode = %answer.rcode,
        "Upstream reply"
    );

    Ok(ServerReply {
        answer,
        server: server.addr,
        latency,
    })
}
