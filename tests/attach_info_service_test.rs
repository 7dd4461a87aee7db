//! Integration tests for attach info request handling over both caches.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use attach_agent::adapters::fabric::StaticAliasResolver;
use attach_agent::domain::models::RetryConfig;
use attach_agent::domain::ports::NullAliasResolver;
use attach_agent::{
    AttachInfoCache, AttachInfoService, DomainError, FabricDeviceSelector, LocalFabricCache,
    NetDevClass, ResponseCache,
};
use common::{attach_info, two_node_scan, RecordingScanner, ScriptedSource};

const VERBS: &str = "ofi+verbs;ofi_rxm";

fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
        max_elapsed_ms: 2_000,
    }
}

struct Harness {
    source: Arc<ScriptedSource>,
    scanner: Arc<RecordingScanner>,
    attach_info_cache: Arc<AttachInfoCache>,
    fabric_cache: Arc<LocalFabricCache>,
    service: AttachInfoService,
}

fn harness(enabled: bool, source: ScriptedSource, scanner: RecordingScanner) -> Harness {
    let source = Arc::new(source);
    let scanner = Arc::new(scanner);
    let attach_info_cache = Arc::new(AttachInfoCache::new(enabled));
    let fabric_cache = Arc::new(LocalFabricCache::new(Arc::new(NullAliasResolver::new())));

    let service = AttachInfoService::new("daos_server", source.clone(), scanner.clone())
        .with_attach_info_cache(attach_info_cache.clone())
        .with_fabric_cache(fabric_cache.clone())
        .with_retry(fast_retry());

    Harness {
        source,
        scanner,
        attach_info_cache,
        fabric_cache,
        service,
    }
}

fn verbs_harness(enabled: bool) -> Harness {
    harness(
        enabled,
        ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)),
        RecordingScanner::new(two_node_scan()),
    )
}

#[tokio::test]
async fn test_cached_requests_rotate_without_refetching() {
    common::setup_test_logging();
    let h = verbs_harness(true);

    let mut interfaces = Vec::new();
    for _ in 0..3 {
        let resp = h.service.get_attach_info(0).await.unwrap();
        assert_eq!(resp.provider, VERBS);
        interfaces.push(resp.interface);
    }

    assert_eq!(interfaces, vec!["ib0", "ib1", "ib0"]);
    assert_eq!(h.source.calls(), 1);
    assert_eq!(h.scanner.calls(), 1);
    assert_eq!(h.scanner.providers(), vec![VERBS.to_string()]);
    assert!(h.attach_info_cache.is_cached().await);
    assert!(FabricDeviceSelector::is_cached(&h.fabric_cache).await);
}

#[tokio::test]
async fn test_disabled_cache_refetches_but_keeps_rotating() {
    let h = verbs_harness(false);

    let mut interfaces = Vec::new();
    for _ in 0..4 {
        interfaces.push(h.service.get_attach_info(0).await.unwrap().interface);
    }

    assert_eq!(interfaces, vec!["ib0", "ib1", "ib0", "ib1"]);
    assert_eq!(h.source.calls(), 4);
    assert_eq!(h.scanner.calls(), 1);
    assert!(!h.attach_info_cache.is_cached().await);
    assert!(FabricDeviceSelector::is_cached(&h.fabric_cache).await);
}

#[tokio::test]
async fn test_disabled_cache_rescans_only_on_refresh() {
    let h = verbs_harness(false);

    assert_eq!(h.service.get_attach_info(0).await.unwrap().interface, "ib0");
    h.service.refresh().await.unwrap();

    assert_eq!(h.service.get_attach_info(0).await.unwrap().interface, "ib0");
    assert_eq!(h.scanner.calls(), 2);
}

#[tokio::test]
async fn test_class_is_taken_from_attach_info() {
    let h = harness(
        true,
        ScriptedSource::new(attach_info("ofi+tcp;ofi_rxm", NetDevClass::Ether)),
        RecordingScanner::new(two_node_scan()),
    );

    let resp = h.service.get_attach_info(1).await.unwrap();
    assert_eq!(resp.interface, "eth0");
    assert_eq!(resp.domain, "eth0");
}

#[tokio::test]
async fn test_client_on_node_without_devices_falls_back() {
    let h = verbs_harness(true);

    let first = h.service.get_attach_info(3).await.unwrap();
    let second = h.service.get_attach_info(3).await.unwrap();

    // The default node starts at NUMA 1 (last scan entry); fallback moves
    // to NUMA 0, then back to NUMA 1.
    assert_eq!(first.interface, "ib0");
    assert_eq!(second.interface, "ib2");
    assert_eq!(h.fabric_cache.snapshot().await.unwrap().default_numa_node, 1);
}

#[tokio::test]
async fn test_selection_failure_serves_degraded_response() {
    let h = harness(
        true,
        ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)),
        RecordingScanner::new(vec![common_eth_only()]),
    );

    let resp = h.service.get_attach_info(0).await.unwrap();
    assert!(resp.interface.is_empty());
    assert_eq!(resp.rank_uris.len(), 2);
}

fn common_eth_only() -> attach_agent::FabricScanEntry {
    attach_agent::FabricScanEntry::new("eth0", 0, NetDevClass::Ether)
}

#[tokio::test]
async fn test_scan_failure_serves_degraded_response() {
    let h = harness(
        true,
        ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)),
        RecordingScanner::failing(),
    );

    let resp = h.service.get_attach_info(0).await.unwrap();
    assert!(resp.interface.is_empty());
    assert!(!FabricDeviceSelector::is_cached(&h.fabric_cache).await);
}

#[tokio::test]
async fn test_service_without_caches_still_answers() {
    let source = Arc::new(ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)));
    let scanner = Arc::new(RecordingScanner::new(two_node_scan()));
    let service = AttachInfoService::new("daos_server", source.clone(), scanner.clone());

    assert!(!service.caching_enabled());
    let resp = service.get_attach_info(0).await.unwrap();
    assert!(resp.interface.is_empty());
    assert_eq!(resp.provider, VERBS);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_transient_fetch_errors_are_retried() {
    let h = harness(
        true,
        ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)).failing_first(vec![
            DomainError::RemoteFetch("connection refused".to_string()),
            DomainError::RemoteFetch("connection refused".to_string()),
        ]),
        RecordingScanner::new(two_node_scan()),
    );

    let resp = h.service.get_attach_info(0).await.unwrap();
    assert_eq!(resp.interface, "ib0");
    assert_eq!(h.source.calls(), 3);
}

#[tokio::test]
async fn test_permanent_fetch_errors_are_not_retried() {
    let h = harness(
        true,
        ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)).failing_first(vec![
            DomainError::SerializationError("bad response".to_string()),
        ]),
        RecordingScanner::new(two_node_scan()),
    );

    let result = h.service.get_attach_info(0).await;
    assert!(matches!(result, Err(DomainError::SerializationError(_))));
    assert_eq!(h.source.calls(), 1);
    assert!(!h.attach_info_cache.is_cached().await);
}

#[tokio::test]
async fn test_empty_response_is_served_but_not_cached() {
    let h = harness(
        true,
        ScriptedSource::new(attach_agent::AttachInfoResponse::default()),
        RecordingScanner::new(two_node_scan()),
    );

    h.service.get_attach_info(0).await.unwrap();
    h.service.get_attach_info(0).await.unwrap();
    assert_eq!(h.source.calls(), 2);
    assert!(!h.attach_info_cache.is_cached().await);
}

#[tokio::test]
async fn test_refresh_replaces_both_caches() {
    let h = verbs_harness(true);

    assert_eq!(h.service.get_attach_info(0).await.unwrap().interface, "ib0");

    h.source.set_response(attach_info("ofi+verbs", NetDevClass::Infiniband));
    h.service.refresh().await.unwrap();

    let resp = h.service.get_attach_info(0).await.unwrap();
    assert_eq!(resp.provider, "ofi+verbs");
    assert_eq!(resp.interface, "ib0");
    assert_eq!(h.source.calls(), 2);
    assert_eq!(h.scanner.providers(), vec![VERBS.to_string(), "ofi+verbs".to_string()]);
}

#[tokio::test]
async fn test_provider_override_is_scanned() {
    let source = Arc::new(ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)));
    let scanner = Arc::new(RecordingScanner::new(two_node_scan()));
    let service = AttachInfoService::new("daos_server", source, scanner.clone())
        .with_attach_info_cache(Arc::new(AttachInfoCache::new(true)))
        .with_fabric_cache(Arc::new(LocalFabricCache::new(Arc::new(NullAliasResolver::new()))))
        .with_provider_override(Some("ofi+tcp".to_string()));

    service.get_attach_info(0).await.unwrap();
    assert_eq!(scanner.providers(), vec!["ofi+tcp".to_string()]);
}

#[tokio::test]
async fn test_domain_uses_resolved_alias() {
    let source = Arc::new(ScriptedSource::new(attach_info(VERBS, NetDevClass::Infiniband)));
    let scanner = Arc::new(RecordingScanner::new(two_node_scan()));
    let aliases = HashMap::from([("ib0".to_string(), "mlx5_0".to_string())]);
    let service = AttachInfoService::new("daos_server", source, scanner)
        .with_attach_info_cache(Arc::new(AttachInfoCache::new(true)))
        .with_fabric_cache(Arc::new(LocalFabricCache::new(Arc::new(StaticAliasResolver::new(
            aliases,
        )))));

    let first = service.get_attach_info(0).await.unwrap();
    let second = service.get_attach_info(0).await.unwrap();

    assert_eq!((first.interface.as_str(), first.domain.as_str()), ("ib0", "mlx5_0"));
    assert_eq!((second.interface.as_str(), second.domain.as_str()), ("ib1", "ib1"));
}
