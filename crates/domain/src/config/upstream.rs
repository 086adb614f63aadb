use super::default_true;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamProtocol {
    #[default]
    Udp,
    Tcp,
}

impl UpstreamProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamProtocol::Udp => "udp",
            UpstreamProtocol::Tcp => "tcp",
        }
    }
}

/// One upstream server endpoint. `host` is either an IP address literal or a
/// hostname; hostnames are resolved once through the bootstrap resolver
/// before first use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpstreamServer {
    #[serde(default)]
    pub protocol: UpstreamProtocol,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl UpstreamServer {
    pub fn new(protocol: UpstreamProtocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    /// True when `host` is a name that must go through bootstrap resolution.
    pub fn needs_resolution(&self) -> bool {
        self.host.parse::<IpAddr>().is_err()
    }

    /// Socket address when `host` is already an IP literal.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }
}

impl fmt::Display for UpstreamServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.protocol.as_str(), self.host, self.port)
    }
}

impl FromStr for UpstreamServer {
    type Err = DomainError;

    /// Parses endpoint strings such as `udp:1.1.1.1:53`, `tcp:dns.example.com`,
    /// `[2606:4700::1111]:53` or a bare `9.9.9.9` (defaults: udp, port 53).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidUpstream(s.into()));
        }

        let (protocol, rest) = match s.split_once(':') {
            Some(("udp", rest)) => (UpstreamProtocol::Udp, rest),
            Some(("tcp", rest)) => (UpstreamProtocol::Tcp, rest),
            _ => (UpstreamProtocol::Udp, s),
        };

        let (host, port) = parse_host_port(rest).ok_or_else(|| DomainError::InvalidUpstream(s.into()))?;
        Ok(UpstreamServer::new(protocol, host, port))
    }
}

fn parse_host_port(s: &str) -> Option<(String, u16)> {
    if s.is_empty() {
        return None;
    }

    // Bracketed IPv6: [::1] or [::1]:53
    if let Some(rest) = s.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        host.parse::<IpAddr>().ok()?;
        let port = match tail.strip_prefix(':') {
            Some(p) => p.parse().ok()?,
            None if tail.is_empty() => DEFAULT_DNS_PORT,
            None => return None,
        };
        return Some((host.to_string(), port));
    }

    // Bare IPv6 literals contain multiple colons and carry no port.
    if s.matches(':').count() > 1 {
        s.parse::<IpAddr>().ok()?;
        return Some((s.to_string(), DEFAULT_DNS_PORT));
    }

    match s.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => Some((host.to_string(), port.parse().ok()?)),
        Some(_) => None,
        None => Some((s.to_string(), DEFAULT_DNS_PORT)),
    }
}

/// Per-group resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStrategy {
    /// Race every server; the first successful, non-error reply wins.
    #[default]
    Parallel,
    /// Try servers in order until one succeeds.
    Sequential,
}

/// A named, ordered set of upstream servers sharing one strategy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamGroup {
    pub name: String,
    pub servers: Vec<UpstreamServer>,
    #[serde(default)]
    pub strategy: UpstreamStrategy,
}

/// Upstream resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Groups are tried in declaration order.
    #[serde(default)]
    pub groups: Vec<UpstreamGroup>,

    /// Servers used to resolve upstream hostnames. Empty means the system
    /// resolver is used for bootstrap.
    #[serde(default)]
    pub bootstrap: Vec<SocketAddr>,

    /// Per-attempt timeout for one upstream exchange.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            groups: Vec::new(),
            bootstrap: Vec::new(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_DNS_PORT
}

fn default_query_timeout() -> Duration {
    Duration::from_secs(2)
}
