use sift_dns_domain::{DnsRequest, RecordClass, RecordType};
use std::sync::Arc;

/// Cache key: normalized question name plus type and class.
///
/// The name is an `Arc<str>` shared with the request, so building a key for
/// a lookup allocates nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: RecordClass,
}

impl CacheKey {
    pub fn new(name: Arc<str>, record_type: RecordType, class: RecordClass) -> Self {
        Self {
            name,
            record_type,
            class,
        }
    }

    pub fn for_request(request: &DnsRequest) -> Self {
        Self::new(
            Arc::clone(&request.name),
            request.record_type,
            request.class,
        )
    }
}
