//! # Scan Coordinator
//!
//! Orchestrates one scan from request to [`ScanResult`]:
//!
//! ```text
//! START -> EXPAND -> PROBE (fan-out, join all) -> ARP-READ -> JOIN -> DONE
//!       \-> AUTO (no range) --------------------------------------/
//! ```
//!
//! The coordinator holds no per-request state. Every call to
//! [`ScanCoordinator::scan`] creates its own [`DiagnosticLog`], so concurrent
//! scans never observe each other. The neighbor table is read only after every
//! probe has settled, because probing is what populates it.

use std::collections::HashMap;
use std::sync::Arc;

use lanmap_common::config::ScanConfig;
use lanmap_common::diagnostic::DiagnosticLog;
use lanmap_common::error::{ProbeError, ScanError};
use lanmap_common::network::device::{ArpEntry, Device, Probe, ScanResult, UNKNOWN_NAME};
use lanmap_common::network::mac::{NoVendors, VendorRepository};
use lanmap_common::network::range;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::discovery::SubnetDiscovery;
use crate::neighbor::ArpTableReader;
use crate::prober::ReachabilityProber;

pub struct ScanCoordinator {
    prober: Arc<dyn ReachabilityProber>,
    arp: ArpTableReader,
    discovery: Box<dyn SubnetDiscovery>,
    vendors: Box<dyn VendorRepository>,
    cfg: ScanConfig,
}

impl ScanCoordinator {
    pub fn new(
        prober: Arc<dyn ReachabilityProber>,
        arp: ArpTableReader,
        discovery: Box<dyn SubnetDiscovery>,
        cfg: ScanConfig,
    ) -> Self {
        Self {
            prober,
            arp,
            discovery,
            vendors: Box::new(NoVendors),
            cfg,
        }
    }

    pub fn with_vendors(mut self, vendors: Box<dyn VendorRepository>) -> Self {
        self.vendors = vendors;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.cfg
    }

    /// Runs a full scan. Never fails; problems are reported in the result.
    ///
    /// `range_spec` of `None`, an empty string, or a single address selects
    /// auto-discovery. Anything containing a separator is a ranged scan.
    pub async fn scan(&self, range_spec: Option<&str>) -> ScanResult {
        let mut log = DiagnosticLog::new();
        let spec = range_spec.map(str::trim).filter(|s| !s.is_empty());

        let outcome = match spec {
            Some(spec) if range::is_range(spec) => {
                log.info(format!("Starting ranged scan of '{spec}'"));
                self.ranged_scan(spec, &mut log).await
            }
            _ => {
                log.info(match spec {
                    Some(addr) => format!("Starting auto-discovery for {addr}"),
                    None => "Starting auto-discovery of the local subnet".to_string(),
                });
                self.auto_scan(spec, &mut log).await
            }
        };

        match outcome {
            Ok(mut devices) => {
                self.enrich_vendors(&mut devices);
                log.info(format!("Scan complete: {} devices", devices.len()));
                ScanResult::completed(devices, log)
            }
            Err(e) => {
                log.error(format!("Scan failed: {e}"));
                ScanResult::failed(e.to_string(), log)
            }
        }
    }

    /// Checks a single address with the configured timeout.
    pub async fn ping_one(&self, address: &str) -> Result<Probe, ProbeError> {
        self.prober.probe(address.trim(), self.cfg.probe_timeout).await
    }

    async fn auto_scan(
        &self,
        target: Option<&str>,
        log: &mut DiagnosticLog,
    ) -> Result<Vec<Device>, ScanError> {
        // A single target is probed first so its neighbor entry exists by
        // the time discovery reads the table.
        let warmed: Option<Probe> = match target {
            Some(addr) => self.probe_target(addr, log).await,
            None => None,
        };

        let mut devices = self
            .discovery
            .discover(target, log)
            .await
            .map_err(|e| ScanError::Discovery(format!("{e:#}")))?;

        if let Some(probe) = warmed.filter(|p| p.reachable) {
            if devices.iter().any(|d| d.address == probe.address) {
                return Ok(devices);
            }
            log.info(format!("{} answered but has no neighbor entry", probe.address));
            devices.push(Device::unresolved(probe.address));
        }
        Ok(devices)
    }

    async fn probe_target(&self, addr: &str, log: &mut DiagnosticLog) -> Option<Probe> {
        match self.prober.probe(addr, self.cfg.probe_timeout).await {
            Ok(probe) => {
                log.debug(format!(
                    "{addr} is {}",
                    if probe.reachable { "alive" } else { "not answering" }
                ));
                Some(probe)
            }
            Err(e) => {
                log.warn(format!("Could not probe {addr} before discovery: {e}"));
                None
            }
        }
    }

    async fn ranged_scan(&self, spec: &str, log: &mut DiagnosticLog) -> Result<Vec<Device>, ScanError> {
        let addrs: Vec<String> = range::expand(spec, log);
        if addrs.is_empty() {
            log.warn("No addresses to probe");
            return Ok(Vec::new());
        }

        let probes: Vec<Probe> = self.probe_all(&addrs, log).await?;
        let live: Vec<&Probe> = probes.iter().filter(|p| p.reachable).collect();
        log.info(format!("{} of {} addresses answered", live.len(), probes.len()));

        let table: Vec<ArpEntry> = self.arp.read(log).await;
        Ok(join_neighbors(&live, &table, log))
    }

    /// Probes every address concurrently and waits for all of them.
    ///
    /// Results keep the order of `addrs`. A failure of the probing mechanism
    /// fails the batch, but only after every probe has settled.
    async fn probe_all(&self, addrs: &[String], log: &mut DiagnosticLog) -> Result<Vec<Probe>, ScanError> {
        let timeout = self.cfg.probe_timeout;
        log.info(format!(
            "Probing {} addresses ({} ms timeout each)",
            addrs.len(),
            timeout.as_millis()
        ));

        let permits = Arc::new(Semaphore::new(self.cfg.max_concurrent_probes.max(1)));
        let handles: Vec<JoinHandle<Result<Probe, ProbeError>>> = addrs
            .iter()
            .cloned()
            .map(|addr| {
                let prober = Arc::clone(&self.prober);
                let permits = Arc::clone(&permits);
                tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| ProbeError::Unavailable(e.to_string()))?;
                    prober.probe(&addr, timeout).await
                })
            })
            .collect();

        let mut probes: Vec<Probe> = Vec::with_capacity(addrs.len());
        let mut failure: Option<ScanError> = None;

        for (addr, handle) in addrs.iter().zip(handles) {
            match handle.await {
                Ok(Ok(probe)) => {
                    if let Some(ms) = probe.latency_ms {
                        log.debug(format!("{addr} is alive ({ms:.1} ms)"));
                    }
                    probes.push(probe);
                }
                Ok(Err(ProbeError::InvalidAddress(bad))) => {
                    log.warn(format!("Skipping malformed address '{bad}'"));
                    probes.push(Probe::unreachable(addr.as_str()));
                }
                Ok(Err(e)) => {
                    failure.get_or_insert(ScanError::Probe(e));
                }
                Err(join_err) => {
                    log.warn(format!("Probe task for {addr} failed: {join_err}"));
                    failure.get_or_insert(ScanError::Task(join_err.to_string()));
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(probes),
        }
    }

    fn enrich_vendors(&self, devices: &mut [Device]) {
        for device in devices.iter_mut().filter(|d| d.has_hardware_address()) {
            if let Some(vendor) = self.vendors.get_vendor(&device.hardware_address) {
                device.display_name = vendor;
            }
        }
    }
}

/// Pairs each live address with its neighbor entry by exact address match.
fn join_neighbors(live: &[&Probe], table: &[ArpEntry], log: &mut DiagnosticLog) -> Vec<Device> {
    let by_addr: HashMap<&str, &ArpEntry> =
        table.iter().map(|e| (e.address.as_str(), e)).collect();

    let mut matched = 0usize;
    let devices: Vec<Device> = live
        .iter()
        .map(|probe| match by_addr.get(probe.address.as_str()) {
            Some(entry) => {
                matched += 1;
                Device {
                    address: probe.address.clone(),
                    display_name: UNKNOWN_NAME.to_string(),
                    hardware_address: entry.hardware_address.clone(),
                }
            }
            None => {
                log.debug(format!("No neighbor entry for {}", probe.address));
                Device::unresolved(probe.address.as_str())
            }
        })
        .collect();

    log.info(format!(
        "Matched {matched} of {} live hosts to hardware addresses",
        devices.len()
    ));
    devices
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use lanmap_common::network::device::UNKNOWN_MAC;

    #[test]
    fn join_uses_placeholders_for_missing_entries() {
        let a = Probe::alive("10.0.0.1", 1.0);
        let b = Probe::alive("10.0.0.2", 1.0);
        let table = vec![ArpEntry {
            address: "10.0.0.1".into(),
            hardware_address: "aa:bb:cc:dd:ee:ff".into(),
        }];

        let mut log = DiagnosticLog::new();
        let devices = join_neighbors(&[&a, &b], &table, &mut log);

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].hardware_address, "aa:bb:cc:dd:ee:ff");
        assert_eq!(devices[1].hardware_address, UNKNOWN_MAC);
        assert_eq!(devices[1].display_name, UNKNOWN_NAME);
        assert!(log.contains("Matched 1 of 2"));
    }

    #[test]
    fn join_requires_exact_address_match() {
        let probe = Probe::alive("10.0.0.1", 1.0);
        let table = vec![ArpEntry {
            address: "10.0.0.10".into(),
            hardware_address: "aa:bb:cc:dd:ee:ff".into(),
        }];
        let devices = join_neighbors(&[&probe], &table, &mut DiagnosticLog::new());
        assert_eq!(devices[0].hardware_address, UNKNOWN_MAC);
    }
}
