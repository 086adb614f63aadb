use super::dns_record::DnsRecord;
use std::fmt;

/// Which stage outcome a response represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    Resolved,
    Blocked,
    Cached,
    Refused,
    Failed,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Resolved => "RESOLVED",
            ResponseType::Blocked => "BLOCKED",
            ResponseType::Cached => "CACHED",
            ResponseType::Refused => "REFUSED",
            ResponseType::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol-level result code, reduced to what the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    NxDomain,
    ServFail,
    Refused,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one resolution, moved by value up the chain.
///
/// `ttl` is the effective lifetime of the whole answer set: the minimum
/// upstream answer TTL for resolved responses, the remaining lifetime for
/// cache hits, the configured block TTL for blocked responses.
/// `reason` is free-form text for query logs ("BLOCKED (ads)", "CACHED").
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub response_type: ResponseType,
    pub rcode: ResponseCode,
    pub answers: Vec<DnsRecord>,
    pub ttl: u32,
    pub reason: String,
}

impl DnsResponse {
    pub fn resolved(answers: Vec<DnsRecord>, ttl: u32, reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Resolved,
            rcode: ResponseCode::NoError,
            answers,
            ttl,
            reason: reason.into(),
        }
    }

    /// Authoritative name-not-found from upstream. `ttl` is the SOA-derived
    /// negative lifetime when the upstream supplied one, otherwise 0.
    pub fn nxdomain(ttl: u32, reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Resolved,
            rcode: ResponseCode::NxDomain,
            answers: Vec::new(),
            ttl,
            reason: reason.into(),
        }
    }

    pub fn blocked(answers: Vec<DnsRecord>, ttl: u32, reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Blocked,
            rcode: ResponseCode::NoError,
            answers,
            ttl,
            reason: reason.into(),
        }
    }

    pub fn blocked_nxdomain(ttl: u32, reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Blocked,
            rcode: ResponseCode::NxDomain,
            answers: Vec::new(),
            ttl,
            reason: reason.into(),
        }
    }

    pub fn cached(
        rcode: ResponseCode,
        answers: Vec<DnsRecord>,
        ttl: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Cached,
            rcode,
            answers,
            ttl,
            reason: reason.into(),
        }
    }

    pub fn refused(reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Refused,
            rcode: ResponseCode::Refused,
            answers: Vec::new(),
            ttl: 0,
            reason: reason.into(),
        }
    }

    /// Resolution failure surfaced as a response, never as a raw error.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Failed,
            rcode: ResponseCode::ServFail,
            answers: Vec::new(),
            ttl: 0,
            reason: reason.into(),
        }
    }

    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NxDomain
    }

    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }
}
