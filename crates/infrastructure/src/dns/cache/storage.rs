use super::{CacheKey, CacheMetrics, CachedEntry, CachedPayload};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::debug;

/// Share of `max_entries` removed by one eviction pass.
const BATCH_EVICTION_SHARE: usize = 10;

/// Concurrent response cache.
///
/// Reads never block other reads and writes to distinct keys proceed in
/// parallel (sharded map). Expired entries are dropped lazily on the read
/// path; capacity pressure triggers a batch eviction of the entries with the
/// oldest `last_access` before the insert proceeds.
pub struct ResponseCache {
    entries: DashMap<CacheKey, CachedEntry, FxBuildHasher>,
    max_entries: usize,
    /// Reference instant for the coarse `last_access` clock.
    epoch: Instant,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::with_capacity_and_hasher(
                max_entries.min(4096),
                FxBuildHasher::default(),
            ),
            max_entries,
            epoch: Instant::now(),
            metrics: CacheMetrics::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a live entry, returning its payload and remaining TTL.
    /// An expired entry is removed here and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<(CachedPayload, u32)> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired(now) {
                drop(entry);
                self.entries.remove(key);
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }

            entry.touch(self.epoch.elapsed().as_secs());
            self.metrics.hits.fetch_add(1, Ordering::Relaxed);
            Some((entry.payload.clone(), entry.remaining_ttl(now)))
        } else {
            self.metrics.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert or overwrite an entry. `stored_ttl` must already be clamped by
    /// the caching layer; `upstream_ttl` is recorded as assigned. Zero-TTL
    /// payloads are not stored.
    pub fn insert(&self, key: CacheKey, payload: CachedPayload, stored_ttl: u32, upstream_ttl: u32) {
        if stored_ttl == 0 {
            return;
        }

        if self.entries.len() >= self.max_entries {
            self.evict_batch();
        }

        debug!(
            name = %key.name,
            record_type = %key.record_type,
            ttl = stored_ttl,
            negative = payload.is_negative(),
            "Inserted into cache"
        );

        self.entries.insert(
            key,
            CachedEntry::new(payload, stored_ttl, upstream_ttl, self.epoch.elapsed().as_secs()),
        );
        self.metrics.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop the least-recently-used tenth of the cache.
    ///
    /// Runs inline on the inserting task; candidates are snapshotted first so
    /// concurrent readers are never blocked by the sweep.
    fn evict_batch(&self) {
        let target = (self.max_entries / BATCH_EVICTION_SHARE).max(1);

        let mut candidates: Vec<(CacheKey, u64)> = self
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.key().clone(),
                    entry.value().last_access.load(Ordering::Relaxed),
                )
            })
            .collect();
        candidates.sort_by_key(|&(_, last_access)| last_access);

        let mut evicted = 0u64;
        for (key, _) in candidates.into_iter().take(target) {
            if self.entries.remove(&key).is_some() {
                evicted += 1;
            }
        }

        if evicted > 0 {
            self.metrics.evictions.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted = evicted, "Cache batch eviction");
        }
    }

    /// Remove every expired entry. Called by an external maintenance task;
    /// correctness does not depend on it since reads expire lazily.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
