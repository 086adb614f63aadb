use hickory_proto::rr::{DNSClass, RecordType as WireRecordType};
use sift_dns_domain::{RecordClass, RecordType};

/// Maps the domain record model onto `hickory-proto` wire types.
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_wire(record_type: RecordType) -> WireRecordType {
        match record_type {
            RecordType::A => WireRecordType::A,
            RecordType::Aaaa => WireRecordType::AAAA,
            RecordType::Cname => WireRecordType::CNAME,
            RecordType::Mx => WireRecordType::MX,
            RecordType::Ns => WireRecordType::NS,
            RecordType::Ptr => WireRecordType::PTR,
            RecordType::Soa => WireRecordType::SOA,
            RecordType::Srv => WireRecordType::SRV,
            RecordType::Txt => WireRecordType::TXT,
        }
    }

    pub fn class_to_wire(class: RecordClass) -> DNSClass {
        match class {
            RecordClass::In => DNSClass::IN,
            RecordClass::Ch => DNSClass::CH,
            RecordClass::Hs => DNSClass::HS,
        }
    }
}
