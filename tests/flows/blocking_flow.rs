//! Blocking flow: denylisted queries short-circuit before cache and upstream.

use sift_dns_application::{DnsResolver, ResolveContext, ResolverType};
use sift_dns_domain::{
    BlockMode, ClientGroupMapping, ClientMatcher, ResponseCode, ResponseType,
};
use sift_dns_infrastructure::dns::cache::ResponseCache;
use sift_dns_infrastructure::dns::events::QueryEventEmitter;
use sift_dns_infrastructure::dns::resolver::{BlockingResolver, CachingResolver};
use sift_dns_tests::{
    aaaa_request, blocking_config, caching_config, client_request, request, CountingUpstream,
    UpstreamScript,
};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

struct Chain {
    entry: BlockingResolver,
    cache: Arc<ResponseCache>,
    upstream: Arc<CountingUpstream>,
}

/// blocking → caching → counting upstream, with one `ads` denylist.
fn chain(domains: &[&str], mode: BlockMode) -> Chain {
    let upstream = Arc::new(CountingUpstream::new(UpstreamScript::Answer(
        Ipv4Addr::new(192, 0, 2, 1),
        120,
    )));
    let cache = Arc::new(ResponseCache::new(1024));
    let caching = CachingResolver::new(
        upstream.clone(),
        Arc::clone(&cache),
        &caching_config(Duration::ZERO, Duration::from_secs(3600)),
        QueryEventEmitter::disabled(),
    );

    let mut config = blocking_config(domains);
    config.mode = mode;
    let entry = BlockingResolver::new(Arc::new(caching), &config, QueryEventEmitter::disabled())
        .expect("blocking resolver builds");

    Chain {
        entry,
        cache,
        upstream,
    }
}

#[tokio::test]
async fn test_blocked_subdomain_short_circuits() {
    sift_dns_tests::init_tracing();
    let chain = chain(&["ads.example.com"], BlockMode::ZeroIp);

    let response = chain
        .entry
        .resolve(&ResolveContext::new(), &request("x.ads.example.com"))
        .await
        .unwrap();

    assert_eq!(response.response_type, ResponseType::Blocked);
    assert_eq!(chain.upstream.calls(), 0);
    assert!(chain.cache.is_empty(), "blocked query must not be cached");
}

#[tokio::test]
async fn test_parent_of_blocked_domain_is_delegated() {
    let chain = chain(&["ads.example.com"], BlockMode::ZeroIp);

    let response = chain
        .entry
        .resolve(&ResolveContext::new(), &request("example.com"))
        .await
        .unwrap();

    assert_eq!(response.response_type, ResponseType::Resolved);
    assert_eq!(chain.upstream.calls(), 1);
}

#[tokio::test]
async fn test_zero_ip_mode_answers_unspecified_address() {
    let chain = chain(&["ads.example.com"], BlockMode::ZeroIp);

    let a = chain
        .entry
        .resolve(&ResolveContext::new(), &request("ads.example.com"))
        .await
        .unwrap();
    assert_eq!(
        a.answers[0].ip_addr(),
        Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    );

    let aaaa = chain
        .entry
        .resolve(&ResolveContext::new(), &aaaa_request("ads.example.com"))
        .await
        .unwrap();
    assert_eq!(
        aaaa.answers[0].ip_addr(),
        Some(IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED))
    );
}

#[tokio::test]
async fn test_nxdomain_mode_answers_nxdomain() {
    let chain = chain(&["ads.example.com"], BlockMode::NxDomain);

    let response = chain
        .entry
        .resolve(&ResolveContext::new(), &request("ads.example.com"))
        .await
        .unwrap();

    assert_eq!(response.response_type, ResponseType::Blocked);
    assert_eq!(response.rcode, ResponseCode::NxDomain);
    assert!(!response.has_answers());
}

#[tokio::test]
async fn test_custom_address_mode_filters_by_query_type() {
    let sinkhole = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 53));
    let chain = chain(
        &["ads.example.com"],
        BlockMode::CustomAddress(vec![sinkhole]),
    );

    let a = chain
        .entry
        .resolve(&ResolveContext::new(), &request("ads.example.com"))
        .await
        .unwrap();
    assert_eq!(a.answers[0].ip_addr(), Some(sinkhole));

    // No v6 substitute configured: AAAA gets an empty blocked answer.
    let aaaa = chain
        .entry
        .resolve(&ResolveContext::new(), &aaaa_request("ads.example.com"))
        .await
        .unwrap();
    assert_eq!(aaaa.response_type, ResponseType::Blocked);
    assert!(!aaaa.has_answers());
}

#[tokio::test]
async fn test_block_reason_names_denylist() {
    let chain = chain(&["ads.example.com"], BlockMode::ZeroIp);

    let response = chain
        .entry
        .resolve(&ResolveContext::new(), &request("ads.example.com"))
        .await
        .unwrap();

    assert_eq!(response.reason, "BLOCKED (ads)");
}

#[tokio::test]
async fn test_denylist_scoped_to_client_group() {
    let upstream = Arc::new(CountingUpstream::new(UpstreamScript::Answer(
        Ipv4Addr::new(192, 0, 2, 1),
        120,
    )));

    // The `ads` list applies to the `kids` group only; the default group has
    // no denylists at all.
    let mut config = blocking_config(&["ads.example.com"]);
    config.group_denylists.clear();
    config
        .group_denylists
        .insert("kids".to_string(), vec!["ads".to_string()]);
    let kid_ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50));
    config.client_groups = vec![ClientGroupMapping {
        matcher: ClientMatcher::Ip(kid_ip),
        groups: vec!["kids".to_string()],
    }];

    let entry = BlockingResolver::new(upstream.clone(), &config, QueryEventEmitter::disabled())
        .expect("blocking resolver builds");

    let kid = entry
        .resolve(
            &ResolveContext::new(),
            &client_request("ads.example.com", kid_ip),
        )
        .await
        .unwrap();
    assert_eq!(kid.response_type, ResponseType::Blocked);

    let other = entry
        .resolve(
            &ResolveContext::new(),
            &client_request("ads.example.com", IpAddr::V4(Ipv4Addr::new(192, 168, 1, 51))),
        )
        .await
        .unwrap();
    assert_eq!(other.response_type, ResponseType::Resolved);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_blocked_outcome_is_observed() {
    let (emitter, mut events) = QueryEventEmitter::enabled();
    let upstream = Arc::new(CountingUpstream::new(UpstreamScript::Answer(
        Ipv4Addr::new(192, 0, 2, 1),
        120,
    )));
    let entry = BlockingResolver::new(
        upstream,
        &blocking_config(&["ads.example.com"]),
        emitter,
    )
    .expect("blocking resolver builds");

    entry
        .resolve(&ResolveContext::new(), &request("ads.example.com"))
        .await
        .unwrap();

    let outcome = events.recv().await.expect("one outcome event");
    assert_eq!(outcome.resolver, ResolverType::Blocking);
    assert_eq!(outcome.response_type, ResponseType::Blocked);
    assert_eq!(outcome.name.as_ref(), "ads.example.com");
}
