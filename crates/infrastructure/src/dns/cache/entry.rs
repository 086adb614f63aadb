use sift_dns_domain::{DnsRecord, ResponseCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// What a cache slot stores: an answer set, or a negative marker for
/// NXDOMAIN/NODATA results. Transient failures are never stored.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Answers(Arc<Vec<DnsRecord>>),
    Negative(ResponseCode),
}

impl CachedPayload {
    pub fn is_negative(&self) -> bool {
        matches!(self, CachedPayload::Negative(_))
    }
}

/// One cache entry. `stored_ttl` is already clamped into the configured
/// bounds; `upstream_ttl` keeps the lifetime the upstream originally
/// assigned, for stats and debugging. `last_access` is coarse seconds since
/// the cache epoch, used only to order entries for LRU eviction.
pub struct CachedEntry {
    pub payload: CachedPayload,
    pub stored_ttl: u32,
    pub upstream_ttl: u32,
    pub inserted_at: Instant,
    pub last_access: AtomicU64,
}

impl CachedEntry {
    pub fn new(payload: CachedPayload, stored_ttl: u32, upstream_ttl: u32, epoch_secs: u64) -> Self {
        Self {
            payload,
            stored_ttl,
            upstream_ttl,
            inserted_at: Instant::now(),
            last_access: AtomicU64::new(epoch_secs),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at).as_secs() >= u64::from(self.stored_ttl)
    }

    /// TTL left on the entry: `stored_ttl − elapsed`, floored at one second
    /// so a live entry never serves a zero or negative lifetime.
    pub fn remaining_ttl(&self, now: Instant) -> u32 {
        let elapsed = now.duration_since(self.inserted_at).as_secs();
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.stored_ttl.saturating_sub(elapsed).max(1)
    }

    pub fn touch(&self, epoch_secs: u64) {
        self.last_access.store(epoch_secs, Ordering::Relaxed);
    }
}
