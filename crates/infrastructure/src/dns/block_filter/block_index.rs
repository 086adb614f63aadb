use super::SuffixTrie;
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::sync::Arc;

/// Compiled denylist state: one suffix trie per denylist plus the
/// group → denylist membership.
///
/// Built by `compile_block_index` and swapped whole via `ArcSwap` on reload;
/// lookups never observe a half-built index.
pub struct BlockIndex {
    /// Denylist name → trie of its domains.
    tries: HashMap<Arc<str>, SuffixTrie, FxBuildHasher>,

    /// Group name → denylist names, in declared order.
    group_lists: HashMap<Arc<str>, Vec<Arc<str>>, FxBuildHasher>,

    pub total_domains: usize,
    pub rejected_entries: usize,
}

impl BlockIndex {
    pub(super) fn new(
        tries: HashMap<Arc<str>, SuffixTrie, FxBuildHasher>,
        group_lists: HashMap<Arc<str>, Vec<Arc<str>>, FxBuildHasher>,
        total_domains: usize,
        rejected_entries: usize,
    ) -> Self {
        Self {
            tries,
            group_lists,
            total_domains,
            rejected_entries,
        }
    }

    /// An empty index blocking nothing.
    pub fn empty() -> Self {
        Self {
            tries: HashMap::with_hasher(FxBuildHasher),
            group_lists: HashMap::with_hasher(FxBuildHasher),
            total_domains: 0,
            rejected_entries: 0,
        }
    }

    pub fn denylist_count(&self) -> usize {
        self.tries.len()
    }

    /// The first denylist active for `groups` that contains `name` or an
    /// ancestor of it, following each group's declared denylist order.
    pub fn matched_denylist(&self, name: &str, groups: &[Arc<str>]) -> Option<Arc<str>> {
        for group in groups {
            let Some(lists) = self.group_lists.get(group.as_ref()) else {
                continue;
            };
            for list in lists {
                if let Some(trie) = self.tries.get(list.as_ref()) {
                    if trie.has_parent_of(name) {
                        return Some(Arc::clone(list));
                    }
                }
            }
        }
        None
    }

    pub fn is_blocked(&self, name: &str, groups: &[Arc<str>]) -> bool {
        self.matched_denylist(name, groups).is_some()
    }
}
