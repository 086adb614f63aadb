use super::default_true;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// What a blocked query is answered with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockMode {
    /// Answer with the unspecified address (0.0.0.0 / ::).
    #[default]
    ZeroIp,
    /// Answer NXDOMAIN.
    NxDomain,
    /// Answer with fixed substitute addresses, filtered by query type.
    CustomAddress(Vec<IpAddr>),
}

/// How a client is matched to its groups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMatcher {
    Ip(IpAddr),
    Subnet(IpNetwork),
    Name(String),
}

/// One client → groups assignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientGroupMapping {
    pub matcher: ClientMatcher,
    pub groups: Vec<String>,
}

/// Domain blocking configuration.
///
/// Denylists are named domain sets; groups reference denylists by name;
/// clients map to groups. A query is blocked only when a denylist active for
/// the client's groups contains the name or an ancestor of it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub mode: BlockMode,

    /// Denylist name → blocked domains.
    #[serde(default)]
    pub denylists: HashMap<String, Vec<String>>,

    /// Client group → denylist names active for that group.
    #[serde(default)]
    pub group_denylists: HashMap<String, Vec<String>>,

    /// Explicit client → group assignments, checked before `default_groups`.
    #[serde(default)]
    pub client_groups: Vec<ClientGroupMapping>,

    /// Groups applied to clients with no explicit assignment.
    #[serde(default = "default_groups")]
    pub default_groups: Vec<String>,

    /// TTL for synthesized block responses, in seconds.
    #[serde(default = "default_block_ttl")]
    pub block_ttl: u32,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: BlockMode::default(),
            denylists: HashMap::new(),
            group_denylists: HashMap::new(),
            client_groups: Vec::new(),
            default_groups: default_groups(),
            block_ttl: default_block_ttl(),
        }
    }
}

fn default_groups() -> Vec<String> {
    vec!["default".to_string()]
}

fn default_block_ttl() -> u32 {
    21_600
}
