//! Sift DNS Application Layer
pub mod ports;

pub use ports::{
    DnsResolver, NoopObserver, QueryObserver, QueryOutcome, ResolveContext, ResolverType,
};
