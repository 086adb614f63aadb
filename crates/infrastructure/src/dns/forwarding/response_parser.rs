use hickory_proto::op::{Message, ResponseCode as WireResponseCode};
use hickory_proto::rr::RData;
use sift_dns_domain::{DnsRecord, DomainError, RecordData, RecordType, ResponseCode};
use std::sync::Arc;
use tracing::debug;

/// Decoded view of one upstream reply, shorn of wire details.
#[derive(Debug, Clone)]
pub struct UpstreamAnswer {
    pub records: Vec<DnsRecord>,
    pub rcode: ResponseCode,
    /// Minimum TTL across the answer section; the effective lifetime of the
    /// answer set as a whole.
    pub min_ttl: Option<u32>,
    /// SOA minimum from the authority section, bounding negative caching.
    pub negative_soa_ttl: Option<u32>,
    pub truncated: bool,
}

impl UpstreamAnswer {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NxDomain
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.rcode, ResponseCode::ServFail | ResponseCode::Refused)
    }
}

/// Parses upstream wire responses via `hickory-proto`.
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<UpstreamAnswer, DomainError> {
        let message = Message::from_vec(response_bytes)
            .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;

        let rcode = match message.response_code() {
            WireResponseCode::NoError => ResponseCode::NoError,
            WireResponseCode::NXDomain => ResponseCode::NxDomain,
            WireResponseCode::Refused => ResponseCode::Refused,
            _ => ResponseCode::ServFail,
        };
        let truncated = message.truncated();

        let mut records = Vec::with_capacity(message.answers().len().min(8));
        let mut min_ttl: Option<u32> = None;

        for record in message.answers() {
            let ttl = record.ttl();
            let name: Arc<str> = Arc::from(normalize_wire_name(&record.name().to_utf8()));

            let data = match record.data() {
                RData::A(a) => RecordData::A(a.0),
                RData::AAAA(aaaa) => RecordData::Aaaa(aaaa.0),
                RData::CNAME(cname) => {
                    RecordData::Cname(Arc::from(normalize_wire_name(&cname.to_utf8())))
                }
                RData::PTR(ptr) => {
                    RecordData::Ptr(Arc::from(normalize_wire_name(&ptr.to_utf8())))
                }
                RData::TXT(txt) => RecordData::Txt(Arc::from(txt.to_string().as_str())),
                _ => continue,
            };
            let record_type = match &data {
                RecordData::A(_) => RecordType::A,
                RecordData::Aaaa(_) => RecordType::Aaaa,
                RecordData::Cname(_) => RecordType::Cname,
                RecordData::Ptr(_) => RecordType::Ptr,
                RecordData::Txt(_) => RecordType::Txt,
            };

            min_ttl = Some(min_ttl.map_or(ttl, |current| current.min(ttl)));
            records.push(DnsRecord::new(name, record_type, ttl, data));
        }

        let negative_soa_ttl = message.name_servers().iter().find_map(|r| {
            if let RData::SOA(soa) = r.data() {
                Some(soa.minimum().min(r.ttl()))
            } else {
                None
            }
        });

        debug!(
            rcode = %rcode,
            answers = records.len(),
            truncated = truncated,
            "Upstream response parsed"
        );

        Ok(UpstreamAnswer {
            records,
            rcode,
            min_ttl,
            negative_soa_ttl,
            truncated,
        })
    }
}

fn normalize_wire_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
