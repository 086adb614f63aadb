//! The resolver chain, assembled with the decorator pattern.
//!
//! Each layer wraps the next one behind the shared `DnsResolver` capability
//! and either terminates the query or delegates inward:
//!
//! - **Blocking** (outermost): denylist lookup; blocked queries never reach
//!   the cache or the network.
//! - **Caching**: memoizes responses under TTL policy bounds.
//! - **Upstream** (innermost, terminal): forwards to the configured upstream
//!   groups.
//!
//! Disabled layers are skipped at build time by `ResolverBuilder`, not per
//! call.

pub mod blocking_layer;
pub mod builder;
pub mod caching_layer;
pub mod upstream;

pub use blocking_layer::{BlockingResolver, RefreshOutcome};
pub use builder::{ResolverBuilder, ResolverChain};
pub use caching_layer::CachingResolver;
pub use upstream::UpstreamResolver;
