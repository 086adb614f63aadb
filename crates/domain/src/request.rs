use super::dns_record::{RecordClass, RecordType};
use super::errors::DomainError;
use super::validators::normalize_domain;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;

/// Identity of the querying client: source address plus any resolved names.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub address: IpAddr,
    pub names: Vec<Arc<str>>,
}

impl ClientInfo {
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            names: Vec::new(),
        }
    }

    pub fn with_names(address: IpAddr, names: Vec<Arc<str>>) -> Self {
        Self { address, names }
    }
}

/// One inbound DNS question, already decoded by the transport layer.
///
/// Immutable once built; the chain entry point constructs it and every stage
/// reads it. The question name is normalized (lowercase, no trailing dot) at
/// construction so trie and cache lookups never re-normalize.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: RecordClass,
    pub client: ClientInfo,
    pub received_at: DateTime<Utc>,
}

impl DnsRequest {
    pub fn new(
        name: &str,
        record_type: RecordType,
        class: RecordClass,
        client: ClientInfo,
    ) -> Result<Self, DomainError> {
        let normalized =
            normalize_domain(name).ok_or_else(|| DomainError::InvalidDomainName(name.into()))?;
        Ok(Self {
            name: Arc::from(normalized.as_str()),
            record_type,
            class,
            client,
            received_at: Utc::now(),
        })
    }
}
