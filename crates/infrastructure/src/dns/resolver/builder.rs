use super::blocking_layer::BlockingResolver;
use super::caching_layer::CachingResolver;
use super::upstream::UpstreamResolver;
use crate::dns::cache::ResponseCache;
use crate::dns::events::QueryEventEmitter;
use sift_dns_application::{DnsResolver, QueryObserver, ResolveContext};
use sift_dns_domain::{Config, DnsRequest, DnsResponse, DomainError};
use std::sync::Arc;
use tracing::info;

/// The assembled chain plus handles to its long-lived state.
///
/// `blocking` is the reload handle an external list loader drives;
/// `cache` exposes metrics and maintenance to the surrounding service.
pub struct ResolverChain {
    entry: Arc<dyn DnsResolver>,
    blocking: Option<Arc<BlockingResolver>>,
    cache: Option<Arc<ResponseCache>>,
}

impl ResolverChain {
    pub async fn resolve(
        &self,
        ctx: &ResolveContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        self.entry.resolve(ctx, request).await
    }

    pub fn entry(&self) -> &Arc<dyn DnsResolver> {
        &self.entry
    }

    pub fn blocking(&self) -> Option<&Arc<BlockingResolver>> {
        self.blocking.as_ref()
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }
}

/// Assembles the resolver chain from validated configuration.
///
/// Stage order, outermost first: blocking → caching → upstream. Disabled
/// stages are dropped here, once; the chain never re-checks enablement per
/// query. Construction fails fast on invalid configuration rather than
/// serving with a partially built pipeline.
pub struct ResolverBuilder {
    config: Config,
    emitter: QueryEventEmitter,
    cache: Option<Arc<ResponseCache>>,
}

impl ResolverBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            emitter: QueryEventEmitter::disabled(),
            cache: None,
        }
    }

    /// Wire query outcome events to an external observer.
    pub fn with_observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.emitter = QueryEventEmitter::with_observer(observer);
        self
    }

    pub fn with_emitter(mut self, emitter: QueryEventEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Use an externally constructed cache instead of building one.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn build(self) -> Result<ResolverChain, DomainError> {
        // The upstream stage is the chain's only terminal; without it there
        // is no enabled stage that can answer.
        if !self.config.upstream.enabled {
            return Err(DomainError::NoEnabledResolvers);
        }

        let upstream = UpstreamResolver::new(&self.config.upstream, self.emitter.clone()).await?;
        upstream.log_config();
        let mut chain: Arc<dyn DnsResolver> = Arc::new(upstream);

        let mut cache_handle = None;
        if self.config.caching.enabled {
            let cache = self
                .cache
                .unwrap_or_else(|| Arc::new(ResponseCache::new(self.config.caching.max_entries)));
            let caching = CachingResolver::new(
                chain,
                Arc::clone(&cache),
                &self.config.caching,
                self.emitter.clone(),
            );
            caching.log_config();
            cache_handle = Some(cache);
            chain = Arc::new(caching);
        }

        let mut blocking_handle = None;
        if self.config.blocking.enabled {
            let blocking = Arc::new(BlockingResolver::new(
                chain,
                &self.config.blocking,
                self.emitter.clone(),
            )?);
            blocking.log_config();
            blocking_handle = Some(Arc::clone(&blocking));
            chain = blocking;
        }

        info!("Resolver chain built");
        Ok(ResolverChain {
            entry: chain,
            blocking: blocking_handle,
            cache: cache_handle,
        })
    }
}
