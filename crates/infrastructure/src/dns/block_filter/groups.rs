use ipnetwork::IpNetwork;
use rustc_hash::FxBuildHasher;
use sift_dns_domain::{ClientGroupMapping, ClientInfo, ClientMatcher};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// Resolves a client's identity to the denylist groups that apply to it.
///
/// Resolution order: explicit IP, resolved client name, longest-prefix CIDR
/// subnet, then the configured default groups. Built once from validated
/// configuration; read-only afterwards.
pub struct ClientGrouper {
    by_ip: HashMap<IpAddr, Vec<Arc<str>>, FxBuildHasher>,
    by_name: HashMap<String, Vec<Arc<str>>, FxBuildHasher>,
    /// Sorted by prefix length, most specific first.
    subnets: Vec<(IpNetwork, Vec<Arc<str>>)>,
    default_groups: Vec<Arc<str>>,
}

impl ClientGrouper {
    pub fn new(mappings: &[ClientGroupMapping], default_groups: &[String]) -> Self {
        let mut by_ip = HashMap::with_hasher(FxBuildHasher);
        let mut by_name = HashMap::with_hasher(FxBuildHasher);
        let mut subnets = Vec::new();

        for mapping in mappings {
            let groups: Vec<Arc<str>> = mapping
                .groups
                .iter()
                .map(|g| Arc::from(g.as_str()))
                .collect();
            match &mapping.matcher {
                ClientMatcher::Ip(ip) => {
                    by_ip.insert(*ip, groups);
                }
                ClientMatcher::Name(name) => {
                    by_name.insert(name.to_ascii_lowercase(), groups);
                }
                ClientMatcher::Subnet(net) => {
                    subnets.push((*net, groups));
                }
            }
        }
        subnets.sort_by(|a, b| b.0.prefix().cmp(&a.0.prefix()));

        Self {
            by_ip,
            by_name,
            subnets,
            default_groups: default_groups.iter().map(|g| Arc::from(g.as_str())).collect(),
        }
    }

    pub fn groups_for(&self, client: &ClientInfo) -> Vec<Arc<str>> {
        if let Some(groups) = self.by_ip.get(&client.address) {
            return groups.clone();
        }

        for name in &client.names {
            if let Some(groups) = self.by_name.get(&name.to_ascii_lowercase()) {
                return groups.clone();
            }
        }

        for (net, groups) in &self.subnets {
            if net.contains(client.address) {
                return groups.clone();
            }
        }

        self.default_groups.clone()
    }
}
