use super::RecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Typed answer payload. Uses `Arc<str>` for names so records clone cheaply
/// between the upstream, cache and response layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(Arc<str>),
    Ptr(Arc<str>),
    Txt(Arc<str>),
}

/// One answer record of a DNS response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub ttl: u32,
    pub data: RecordData,
}

impl DnsRecord {
    pub fn new(
        name: impl Into<Arc<str>>,
        record_type: RecordType,
        ttl: u32,
        data: RecordData,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            data,
        }
    }

    pub fn a(name: impl Into<Arc<str>>, address: Ipv4Addr, ttl: u32) -> Self {
        Self::new(name, RecordType::A, ttl, RecordData::A(address))
    }

    pub fn aaaa(name: impl Into<Arc<str>>, address: Ipv6Addr, ttl: u32) -> Self {
        Self::new(name, RecordType::Aaaa, ttl, RecordData::Aaaa(address))
    }

    pub fn cname(name: impl Into<Arc<str>>, target: impl Into<Arc<str>>, ttl: u32) -> Self {
        Self::new(name, RecordType::Cname, ttl, RecordData::Cname(target.into()))
    }

    /// The record's address when it carries one.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self.data {
            RecordData::A(v4) => Some(IpAddr::V4(v4)),
            RecordData::Aaaa(v6) => Some(IpAddr::V6(v6)),
            _ => None,
        }
    }

    /// Copy of the record with its TTL rewritten, used when serving from cache.
    pub fn with_ttl(&self, ttl: u32) -> Self {
        Self {
            ttl,
            ..self.clone()
        }
    }
}
