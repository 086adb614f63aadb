use crate::dns::cache::{CacheKey, CachedPayload, ResponseCache};
use crate::dns::events::QueryEventEmitter;
use async_trait::async_trait;
use sift_dns_application::{DnsResolver, QueryOutcome, ResolveContext, ResolverType};
use sift_dns_domain::{
    CachingConfig, DnsRequest, DnsResponse, DomainError, ResponseCode, ResponseType,
};
use std::sync::Arc;
use tracing::debug;

/// Caching decorator.
///
/// Serves non-expired entries without touching the inner stage; stores
/// successful results on the way back up with the TTL clamped into
/// `[min_caching_time, max_caching_time]`. Concurrent misses for the same
/// key each fall through to the inner stage independently; there is no
/// single-flight suppression (see DESIGN.md before changing that).
pub struct CachingResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Arc<ResponseCache>,
    min_ttl_secs: u32,
    max_ttl_secs: u32,
    negative_ttl_secs: u32,
    emitter: QueryEventEmitter,
    enabled: bool,
}

impl CachingResolver {
    pub fn new(
        inner: Arc<dyn DnsResolver>,
        cache: Arc<ResponseCache>,
        config: &CachingConfig,
        emitter: QueryEventEmitter,
    ) -> Self {
        let min_ttl_secs = u32::try_from(config.min_caching_time.as_secs()).unwrap_or(u32::MAX);
        let max_ttl_secs = u32::try_from(config.max_caching_time.as_secs())
            .unwrap_or(u32::MAX)
            .max(min_ttl_secs);
        Self {
            inner,
            cache,
            min_ttl_secs,
            max_ttl_secs,
            negative_ttl_secs: u32::try_from(config.negative_ttl.as_secs()).unwrap_or(u32::MAX),
            emitter,
            enabled: config.enabled,
        }
    }

    fn clamp_ttl(&self, upstream_ttl: u32) -> u32 {
        upstream_ttl.clamp(self.min_ttl_secs, self.max_ttl_secs)
    }

    fn hit_response(&self, payload: CachedPayload, remaining: u32) -> DnsResponse {
        match payload {
            CachedPayload::Answers(records) => {
                let answers = records.iter().map(|r| r.with_ttl(remaining)).collect();
                DnsResponse::cached(ResponseCode::NoError, answers, remaining, "CACHED")
            }
            CachedPayload::Negative(rcode) => {
                DnsResponse::cached(rcode, Vec::new(), remaining, "CACHED (negative)")
            }
        }
    }

    /// Store `response` when it is cacheable: positive answers and
    /// explicitly-negative results only. Failures are never cached.
    fn store(&self, key: CacheKey, response: &DnsResponse) {
        if response.response_type != ResponseType::Resolved {
            return;
        }

        match response.rcode {
            ResponseCode::NoError if response.has_answers() => {
                self.cache.insert(
                    key,
                    CachedPayload::Answers(Arc::new(response.answers.clone())),
                    self.clamp_ttl(response.ttl),
                    response.ttl,
                );
            }
            ResponseCode::NoError | ResponseCode::NxDomain => {
                // NODATA and NXDOMAIN: negative entry. Prefer the SOA-derived
                // TTL the upstream stage put on the response.
                let ttl = if response.ttl > 0 {
                    response.ttl
                } else {
                    self.negative_ttl_secs
                };
                self.cache.insert(
                    key,
                    CachedPayload::Negative(response.rcode),
                    self.clamp_ttl(ttl),
                    ttl,
                );
            }
            _ => {}
        }
    }

    fn emit(&self, ctx: &ResolveContext, request: &DnsRequest, response: &DnsResponse) {
        self.emitter.emit(QueryOutcome {
            name: Arc::clone(&request.name),
            client: request.client.address,
            resolver: ResolverType::Caching,
            response_type: response.response_type,
            duration: ctx.elapsed(),
        });
    }
}

#[async_trait]
impl DnsResolver for CachingResolver {
    async fn resolve(
        &self,
        ctx: &ResolveContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        let key = CacheKey::for_request(request);

        if let Some((payload, remaining)) = self.cache.get(&key) {
            debug!(name = %request.name, record_type = %request.record_type, "Cache HIT");
            let response = self.hit_response(payload, remaining);
            self.emit(ctx, request, &response);
            return Ok(response);
        }

        debug!(name = %request.name, record_type = %request.record_type, "Cache MISS");
        let response = self.inner.resolve(ctx, request).await?;
        self.store(key, &response);
        Ok(response)
    }

    fn resolver_type(&self) -> ResolverType {
        ResolverType::Caching
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_config(&self) {
        tracing::info!(
            min_ttl_secs = self.min_ttl_secs,
            max_ttl_secs = self.max_ttl_secs,
            negative_ttl_secs = self.negative_ttl_secs,
            "Caching resolver configured"
        );
    }
}
