use compact_str::CompactString;
use rustc_hash::FxBuildHasher;
use sift_dns_domain::validators::normalize_domain;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;

/// A node in the reversed-label suffix trie.
#[derive(Default)]
struct TrieNode {
    children: HashMap<CompactString, TrieNode, FxBuildHasher>,
    /// Marks that an explicitly inserted domain ends at this node.
    terminal: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: HashMap::with_hasher(FxBuildHasher),
            terminal: false,
        }
    }
}

/// Suffix trie over blocked domains, keyed by reversed label path.
///
/// `ads.example.com` → traverse ["com", "example", "ads"], mark the "ads"
/// node terminal. Shared suffixes share nodes; no domain string is stored
/// twice.
///
/// Lookup walks from the TLD inward and stops at the **first** terminal node,
/// so inserting a domain blocks its entire subtree and the lookup cost is
/// proportional to the query's label count, not the set size.
///
/// Built once (or on reload) and replaced whole via `ArcSwap`; never mutated
/// while lookups run.
#[derive(Default)]
pub struct SuffixTrie {
    root: TrieNode,
    len: usize,
}

impl SuffixTrie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
        }
    }

    /// Number of distinct domains inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert one domain. Returns false when the entry does not normalize to
    /// a valid name; the caller counts rejections instead of failing.
    pub fn insert(&mut self, raw: &str) -> bool {
        let Some(domain) = normalize_domain(raw) else {
            return false;
        };

        let mut node = &mut self.root;
        for label in domain.split('.').rev() {
            node = node.children.entry(CompactString::new(label)).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
        true
    }

    /// True when `domain` itself or any ancestor of it was inserted.
    ///
    /// Walks labels from the most general (TLD) toward the most specific and
    /// returns at the first terminal node encountered, which yields "blocked
    /// by the shallowest matching ancestor".
    #[inline]
    pub fn has_parent_of(&self, domain: &str) -> bool {
        let name = domain.strip_suffix('.').unwrap_or(domain);
        if name.is_empty() {
            return false;
        }
        let name: Cow<'_, str> = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        };

        let labels: SmallVec<[&str; 8]> = name.split('.').rev().collect();
        let mut node = &self.root;
        for label in labels {
            match node.children.get(label) {
                Some(child) => {
                    if child.terminal {
                        return true;
                    }
                    node = child;
                }
                None => return false,
            }
        }
        false
    }
}
