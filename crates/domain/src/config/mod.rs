//! Validated, in-memory configuration consumed by the resolution pipeline.
//!
//! The core never reads files or environment variables; whatever loads and
//! validates configuration hands these structures over fully formed.

mod blocking;
mod caching;
mod upstream;

pub use blocking::{BlockMode, BlockingConfig, ClientGroupMapping, ClientMatcher};
pub use caching::CachingConfig;
pub use upstream::{
    UpstreamConfig, UpstreamGroup, UpstreamProtocol, UpstreamServer, UpstreamStrategy,
};

use serde::{Deserialize, Serialize};

/// Root configuration for the resolver chain.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub blocking: BlockingConfig,

    #[serde(default)]
    pub caching: CachingConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

pub(crate) fn default_true() -> bool {
    true
}
