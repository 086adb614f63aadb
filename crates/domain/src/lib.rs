//! Sift DNS Domain Layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod request;
pub mod response;
pub mod validators;

pub use config::{
    BlockMode, BlockingConfig, CachingConfig, ClientGroupMapping, ClientMatcher, Config,
    UpstreamConfig, UpstreamGroup, UpstreamProtocol, UpstreamServer, UpstreamStrategy,
};
pub use dns_record::{DnsRecord, RecordClass, RecordData, RecordType};
pub use errors::DomainError;
pub use request::{ClientInfo, DnsRequest};
pub use response::{DnsResponse, ResponseCode, ResponseType};
