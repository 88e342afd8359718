use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lanmap_common::config::ScanConfig;
use lanmap_common::diagnostic::DiagnosticLog;
use lanmap_common::error::ProbeError;
use lanmap_common::network::device::{Device, UNKNOWN_MAC, UNKNOWN_NAME};
use lanmap_common::network::range;
use lanmap_core::neighbor::ArpTableReader;
use lanmap_core::scanner::ScanCoordinator;

use crate::mocks::{CannedNeighbors, FakeDiscovery, FixedVendors, ScriptedProber};

struct Harness {
    coordinator: ScanCoordinator,
    probe_calls: Arc<std::sync::atomic::AtomicUsize>,
    arp_reads: Arc<std::sync::atomic::AtomicUsize>,
    probes_seen_by_arp: Arc<std::sync::atomic::AtomicUsize>,
    discovery_targets: Arc<std::sync::Mutex<Vec<Option<String>>>>,
}

fn harness(prober: ScriptedProber, rows: &[(&str, &str)], discovery: FakeDiscovery) -> Harness {
    let probe_calls = prober.calls.clone();
    let neighbors = CannedNeighbors::proc_table(rows, probe_calls.clone());
    let arp_reads = neighbors.reads.clone();
    let probes_seen_by_arp = neighbors.seen_probes.clone();
    let discovery_targets = discovery.targets.clone();

    let cfg = ScanConfig {
        probe_timeout: Duration::from_millis(500),
        ..ScanConfig::default()
    };
    let coordinator = ScanCoordinator::new(
        Arc::new(prober),
        ArpTableReader::new(Arc::new(neighbors)),
        Box::new(discovery),
        cfg,
    );

    Harness {
        coordinator,
        probe_calls,
        arp_reads,
        probes_seen_by_arp,
        discovery_targets,
    }
}

fn lan_device(ip: &str, mac: &str) -> Device {
    Device {
        address: ip.into(),
        display_name: UNKNOWN_NAME.into(),
        hardware_address: mac.into(),
    }
}

#[tokio::test]
async fn ranged_scan_joins_live_hosts_with_neighbor_table() {
    let h = harness(
        ScriptedProber::alive(&["192.168.1.10", "192.168.1.12"]),
        &[("192.168.1.10", "aa:bb:cc:00:00:10")],
        FakeDiscovery::returning(vec![]),
    );

    let result = h.coordinator.scan(Some("192.168.1.10-12")).await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        result.devices,
        vec![
            lan_device("192.168.1.10", "aa:bb:cc:00:00:10"),
            lan_device("192.168.1.12", UNKNOWN_MAC),
        ]
    );
    assert!(result.devices.iter().all(|d| d.address != "192.168.1.11"));
    assert_eq!(h.probe_calls.load(Ordering::SeqCst), 3);
    assert_eq!(h.arp_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn neighbor_table_is_read_after_every_probe_settled() {
    let h = harness(
        ScriptedProber::alive(&["10.0.0.3"]).with_delay(Duration::from_millis(30)),
        &[],
        FakeDiscovery::returning(vec![]),
    );

    let result = h.coordinator.scan(Some("10.0.0.1-8")).await;

    assert!(result.success);
    assert_eq!(h.probes_seen_by_arp.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn probes_run_concurrently() {
    let h = harness(
        ScriptedProber::alive(&[]).with_delay(Duration::from_millis(200)),
        &[],
        FakeDiscovery::returning(vec![]),
    );

    let started = Instant::now();
    let result = h.coordinator.scan(Some("10.0.0.1-40")).await;
    let elapsed = started.elapsed();

    assert!(result.success);
    assert!(result.devices.is_empty());
    assert!(elapsed < Duration::from_secs(2), "probes ran sequentially: {elapsed:?}");
}

#[tokio::test]
async fn missing_range_delegates_to_auto_discovery() {
    let found = vec![lan_device("192.168.1.1", "aa:aa:aa:aa:aa:01")];
    let h = harness(
        ScriptedProber::alive(&["192.168.1.1"]),
        &[],
        FakeDiscovery::returning(found.clone()),
    );

    for spec in [None, Some(""), Some("   ")] {
        let result = h.coordinator.scan(spec).await;
        assert!(result.success);
        assert_eq!(result.devices, found);
        assert!(result.log.contains("fake discovery ran"));
    }

    assert_eq!(h.probe_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.arp_reads.load(Ordering::SeqCst), 0);
    assert_eq!(*h.discovery_targets.lock().unwrap(), vec![None, None, None]);
}

#[tokio::test]
async fn single_address_is_handed_to_discovery() {
    let h = harness(ScriptedProber::alive(&[]), &[], FakeDiscovery::returning(vec![]));

    let result = h.coordinator.scan(Some("10.0.0.5")).await;

    assert!(result.success);
    assert!(result.devices.is_empty());
    assert_eq!(h.probe_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *h.discovery_targets.lock().unwrap(),
        vec![Some("10.0.0.5".to_string())]
    );
}

#[tokio::test]
async fn live_single_address_without_neighbor_entry_is_reported() {
    let h = harness(
        ScriptedProber::alive(&["10.0.0.5"]),
        &[],
        FakeDiscovery::returning(vec![]),
    );

    let result = h.coordinator.scan(Some("10.0.0.5")).await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.devices, vec![lan_device("10.0.0.5", UNKNOWN_MAC)]);
    assert_eq!(h.probe_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn single_address_found_by_discovery_is_not_duplicated() {
    let found = vec![lan_device("10.0.0.5", "aa:bb:cc:00:00:05")];
    let h = harness(
        ScriptedProber::alive(&["10.0.0.5"]),
        &[],
        FakeDiscovery::returning(found.clone()),
    );

    let result = h.coordinator.scan(Some("10.0.0.5")).await;

    assert_eq!(result.devices, found);
}

#[tokio::test]
async fn single_address_scan_survives_missing_probe_mechanism() {
    let h = harness(ScriptedProber::broken(), &[], FakeDiscovery::returning(vec![]));

    let result = h.coordinator.scan(Some("10.0.0.5")).await;

    assert!(result.success);
    assert!(result.devices.is_empty());
    assert!(result.log.contains("Could not probe 10.0.0.5"));
}

#[tokio::test]
async fn malformed_range_returns_empty_result_with_log() {
    let h = harness(ScriptedProber::alive(&[]), &[], FakeDiscovery::returning(vec![]));

    for spec in ["abc-def", "10.0.0.5-10.0.1.20", "1.2.3.4-5-6", "192.168.1.50-10"] {
        let result = h.coordinator.scan(Some(spec)).await;
        assert!(result.devices.is_empty(), "{spec}");
        assert!(result.log.len() >= 2, "{spec}: {:?}", result.log.lines());
    }
    assert_eq!(h.probe_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_device_comes_from_the_expanded_range() {
    let alive = ["172.16.0.2", "172.16.0.9", "172.16.0.30", "172.16.0.31"];
    let h = harness(
        ScriptedProber::alive(&alive),
        &[("172.16.0.9", "00:11:22:33:44:55"), ("172.16.0.200", "00:11:22:33:44:66")],
        FakeDiscovery::returning(vec![]),
    );

    let spec = "172.16.0.1-30";
    let result = h.coordinator.scan(Some(spec)).await;
    let expanded: HashSet<String> = range::expand(spec, &mut DiagnosticLog::new()).into_iter().collect();

    assert!(result.success);
    assert_eq!(result.devices.len(), 3);
    assert!(result.devices.iter().all(|d| expanded.contains(&d.address)));
}

#[tokio::test]
async fn unavailable_prober_fails_the_scan_with_its_log() {
    let h = harness(ScriptedProber::broken(), &[], FakeDiscovery::returning(vec![]));

    let result = h.coordinator.scan(Some("10.0.0.1-4")).await;

    assert!(!result.success);
    assert!(result.devices.is_empty());
    assert!(result.error.as_deref().unwrap_or_default().contains("unavailable"));
    assert!(result.log.contains("Scan failed"));
    assert!(result.log.contains("Probing 4 addresses"));
    assert_eq!(h.probe_calls.load(Ordering::SeqCst), 4, "the batch must settle before failing");
    assert_eq!(h.arp_reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn discovery_failure_is_reported_not_raised() {
    let h = harness(ScriptedProber::alive(&[]), &[], FakeDiscovery::failing());

    let result = h.coordinator.scan(None).await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap_or_default().contains("no interfaces available"));
    assert!(result.log.contains("Scan failed"));
}

#[tokio::test]
async fn vendor_names_fill_matched_devices_only() {
    let prober = ScriptedProber::alive(&["10.1.1.1", "10.1.1.2"]);
    let probe_calls = prober.calls.clone();
    let neighbors = CannedNeighbors::proc_table(&[("10.1.1.1", "3c:22:fb:00:00:01")], probe_calls);
    let vendors = FixedVendors(HashMap::from([(
        "3c:22:fb:00:00:01".to_string(),
        "Apple, Inc.".to_string(),
    )]));

    let coordinator = ScanCoordinator::new(
        Arc::new(prober),
        ArpTableReader::new(Arc::new(neighbors)),
        Box::new(FakeDiscovery::returning(vec![])),
        ScanConfig::default(),
    )
    .with_vendors(Box::new(vendors));

    let result = coordinator.scan(Some("10.1.1.1-2")).await;

    assert_eq!(result.devices[0].display_name, "Apple, Inc.");
    assert_eq!(result.devices[1].display_name, UNKNOWN_NAME);
}

#[tokio::test]
async fn concurrent_scans_keep_separate_logs() {
    let h = harness(
        ScriptedProber::alive(&["10.0.0.1", "10.0.1.1"]).with_delay(Duration::from_millis(20)),
        &[],
        FakeDiscovery::returning(vec![]),
    );

    let (a, b) = tokio::join!(
        h.coordinator.scan(Some("10.0.0.1-3")),
        h.coordinator.scan(Some("10.0.1.1-3")),
    );

    assert!(a.log.contains("'10.0.0.1-3'") && !a.log.contains("'10.0.1.1-3'"));
    assert!(b.log.contains("'10.0.1.1-3'") && !b.log.contains("'10.0.0.1-3'"));
    assert_eq!(a.devices[0].address, "10.0.0.1");
    assert_eq!(b.devices[0].address, "10.0.1.1");
}

#[tokio::test]
async fn ping_one_reports_liveness_and_latency() {
    let h = harness(ScriptedProber::alive(&["10.0.0.9"]), &[], FakeDiscovery::returning(vec![]));

    let alive = h.coordinator.ping_one("10.0.0.9").await.unwrap();
    assert!(alive.reachable);
    assert!(alive.latency_ms.is_some());

    let dead = h.coordinator.ping_one(" 10.0.0.8 ").await.unwrap();
    assert!(!dead.reachable);
    assert_eq!(dead.latency_ms, None);

    assert!(matches!(
        h.coordinator.ping_one("nope").await,
        Err(ProbeError::InvalidAddress(_))
    ));
}
