mod context;
mod dns_resolver;
mod query_observer;

pub use context::ResolveContext;
pub use dns_resolver::{DnsResolver, ResolverType};
pub use query_observer::{NoopObserver, QueryObserver, QueryOutcome};
