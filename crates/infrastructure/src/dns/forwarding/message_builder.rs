use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use sift_dns_domain::{DomainError, RecordClass, RecordType};
use std::str::FromStr;

/// Builds outbound DNS query messages in wire format using `hickory-proto`.
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a standard recursive query (random ID, RD set, one question)
    /// and serialize it to wire bytes.
    pub fn build_query(
        name: &str,
        record_type: RecordType,
        class: RecordClass,
    ) -> Result<Vec<u8>, DomainError> {
        let qname = Name::from_str(name)
            .map_err(|e| DomainError::InvalidDomainName(format!("{name}: {e}")))?;

        let mut query = Query::new();
        query.set_name(qname);
        query.set_query_type(RecordTypeMapper::to_wire(record_type));
        query.set_query_class(RecordTypeMapper::class_to_wire(class));

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message
            .emit(&mut encoder)
            .map_err(|e| DomainError::InvalidDnsResponse(format!("query serialization: {e}")))?;

        Ok(buf)
    }
}
