use super::{BlockIndex, SuffixTrie};
use rustc_hash::FxBuildHasher;
use sift_dns_domain::DomainError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Compile denylist configuration into an immutable `BlockIndex`.
///
/// A group referencing an unknown denylist fails the build; the service must
/// not start with a partially wired filter. Malformed domain entries are
/// skipped and counted, never fatal.
pub fn compile_block_index(
    denylists: &HashMap<String, Vec<String>>,
    group_denylists: &HashMap<String, Vec<String>>,
) -> Result<BlockIndex, DomainError> {
    for (group, lists) in group_denylists {
        for list in lists {
            if !denylists.contains_key(list) {
                return Err(DomainError::UnknownDenylist {
                    group: group.clone(),
                    denylist: list.clone(),
                });
            }
        }
    }

    let mut tries: HashMap<Arc<str>, SuffixTrie, FxBuildHasher> =
        HashMap::with_capacity_and_hasher(denylists.len(), FxBuildHasher);
    let mut total_domains = 0;
    let mut rejected_entries = 0;

    for (name, domains) in denylists {
        let mut trie = SuffixTrie::new();
        let mut rejected = 0;
        for raw in domains {
            if !trie.insert(raw) {
                rejected += 1;
            }
        }
        if rejected > 0 {
            warn!(
                denylist = %name,
                rejected = rejected,
                "Skipped malformed denylist entries"
            );
        }
        total_domains += trie.len();
        rejected_entries += rejected;
        tries.insert(Arc::from(name.as_str()), trie);
    }

    let group_lists = group_denylists
        .iter()
        .map(|(group, lists)| {
            (
                Arc::from(group.as_str()),
                lists.iter().map(|l| Arc::from(l.as_str())).collect(),
            )
        })
        .collect();

    info!(
        denylists = tries.len(),
        domains = total_domains,
        rejected = rejected_entries,
        "Block index compiled"
    );

    Ok(BlockIndex::new(
        tries,
        group_lists,
        total_domains,
        rejected_entries,
    ))
}
