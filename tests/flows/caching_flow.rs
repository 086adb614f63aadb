//! Caching flow: TTL policy bounds, hit arithmetic and the deliberate
//! absence of single-flight suppression.

use sift_dns_application::{DnsResolver, ResolveContext};
use sift_dns_domain::{ResponseCode, ResponseType};
use sift_dns_infrastructure::dns::cache::ResponseCache;
use sift_dns_infrastructure::dns::events::QueryEventEmitter;
use sift_dns_infrastructure::dns::resolver::CachingResolver;
use sift_dns_tests::{caching_config, request, CountingUpstream, UpstreamScript};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

fn cached_chain(
    script: UpstreamScript,
    min: Duration,
    max: Duration,
) -> (CachingResolver, Arc<ResponseCache>, Arc<CountingUpstream>) {
    let upstream = Arc::new(CountingUpstream::new(script));
    let cache = Arc::new(ResponseCache::new(1024));
    let caching = CachingResolver::new(
        upstream.clone(),
        Arc::clone(&cache),
        &caching_config(min, max),
        QueryEventEmitter::disabled(),
    );
    (caching, cache, upstream)
}

#[tokio::test]
async fn test_min_caching_time_raises_short_upstream_ttl() {
    sift_dns_tests::init_tracing();
    // Upstream says 5 s; policy floor is 30 s. The stored entry must live 30 s.
    let (caching, _, upstream) = cached_chain(
        UpstreamScript::Answer(Ipv4Addr::new(192, 0, 2, 1), 5),
        Duration::from_secs(30),
        Duration::from_secs(3600),
    );

    let first = caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();
    assert_eq!(first.response_type, ResponseType::Resolved);
    assert_eq!(first.ttl, 5, "the response itself keeps the upstream TTL");

    let second = caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();
    assert_eq!(second.response_type, ResponseType::Cached);
    assert!(
        second.ttl > 5 && second.ttl <= 30,
        "stored TTL was clamped up to the floor, got {}",
        second.ttl
    );
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_max_caching_time_caps_long_upstream_ttl() {
    let (caching, _, _) = cached_chain(
        UpstreamScript::Answer(Ipv4Addr::new(192, 0, 2, 1), 86_400),
        Duration::ZERO,
        Duration::from_secs(60),
    );

    caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();
    let hit = caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();

    assert_eq!(hit.response_type, ResponseType::Cached);
    assert!(hit.ttl <= 60, "stored TTL capped at the bound, got {}", hit.ttl);
}

#[tokio::test]
async fn test_cached_answers_carry_remaining_ttl() {
    let (caching, _, _) = cached_chain(
        UpstreamScript::Answer(Ipv4Addr::new(192, 0, 2, 1), 300),
        Duration::ZERO,
        Duration::from_secs(3600),
    );

    caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();
    let hit = caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();

    assert!(hit.ttl > 0 && hit.ttl <= 300);
    assert_eq!(hit.answers[0].ttl, hit.ttl, "record TTLs are rewritten on hit");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_both_reach_upstream() {
    // No single-flight suppression: two racing queries for one uncached key
    // must both fall through.
    let upstream = Arc::new(
        CountingUpstream::new(UpstreamScript::Answer(Ipv4Addr::new(192, 0, 2, 1), 120))
            .with_delay(Duration::from_millis(100)),
    );
    let cache = Arc::new(ResponseCache::new(1024));
    let caching = Arc::new(CachingResolver::new(
        upstream.clone(),
        cache,
        &caching_config(Duration::ZERO, Duration::from_secs(3600)),
        QueryEventEmitter::disabled(),
    ));

    let left = {
        let caching = Arc::clone(&caching);
        tokio::spawn(async move {
            caching
                .resolve(&ResolveContext::new(), &request("example.com"))
                .await
        })
    };
    let right = {
        let caching = Arc::clone(&caching);
        tokio::spawn(async move {
            caching
                .resolve(&ResolveContext::new(), &request("example.com"))
                .await
        })
    };

    let left = left.await.unwrap().unwrap();
    let right = right.await.unwrap().unwrap();

    assert_eq!(left.response_type, ResponseType::Resolved);
    assert_eq!(right.response_type, ResponseType::Resolved);
    assert_eq!(upstream.calls(), 2, "both misses must reach upstream");
}

#[tokio::test]
async fn test_nxdomain_is_negatively_cached() {
    let (caching, _, upstream) = cached_chain(
        UpstreamScript::NxDomain(300),
        Duration::ZERO,
        Duration::from_secs(3600),
    );

    let first = caching
        .resolve(&ResolveContext::new(), &request("nosuch.example.com"))
        .await
        .unwrap();
    assert_eq!(first.rcode, ResponseCode::NxDomain);

    let second = caching
        .resolve(&ResolveContext::new(), &request("nosuch.example.com"))
        .await
        .unwrap();
    assert_eq!(second.response_type, ResponseType::Cached);
    assert_eq!(second.rcode, ResponseCode::NxDomain);
    assert_eq!(upstream.calls(), 1, "negative result served from cache");
}

#[tokio::test]
async fn test_transient_failures_are_never_cached() {
    let (caching, cache, upstream) = cached_chain(
        UpstreamScript::Fail,
        Duration::ZERO,
        Duration::from_secs(3600),
    );

    for _ in 0..2 {
        let response = caching
            .resolve(&ResolveContext::new(), &request("example.com"))
            .await
            .unwrap();
        assert_eq!(response.response_type, ResponseType::Failed);
    }

    assert!(cache.is_empty(), "failures must not create cache entries");
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_distinct_record_types_are_distinct_keys() {
    let (caching, cache, _) = cached_chain(
        UpstreamScript::Answer(Ipv4Addr::new(192, 0, 2, 1), 120),
        Duration::ZERO,
        Duration::from_secs(3600),
    );

    caching
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();
    caching
        .resolve(
            &ResolveContext::new(),
            &sift_dns_tests::aaaa_request("example.com"),
        )
        .await
        .unwrap();

    assert_eq!(cache.len(), 2);
}
