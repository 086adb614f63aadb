use super::default_true;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Response cache configuration.
///
/// `min_caching_time`/`max_caching_time` bound the stored TTL of every
/// positive entry: the upstream-assigned TTL is clamped into this range at
/// insertion, whatever the upstream said.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CachingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub min_caching_time: Duration,

    #[serde(default = "default_max_caching_time")]
    pub max_caching_time: Duration,

    /// Lifetime for negative (NXDOMAIN/NODATA) entries when the upstream
    /// response carried no SOA-derived TTL.
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: Duration,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_caching_time: Duration::ZERO,
            max_caching_time: default_max_caching_time(),
            negative_ttl: default_negative_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_max_caching_time() -> Duration {
    Duration::from_secs(86_400)
}

fn default_negative_ttl() -> Duration {
    Duration::from_secs(1_800)
}

fn default_max_entries() -> usize {
    200_000
}
