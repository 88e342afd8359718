//! Test doubles for the scan pipeline's collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::diagnostic::DiagnosticLog;
use lanmap_common::error::ProbeError;
use lanmap_common::network::device::{Device, Probe};
use lanmap_common::network::mac::VendorRepository;
use lanmap_core::discovery::SubnetDiscovery;
use lanmap_core::neighbor::{ColumnLayout, NeighborSource};
use lanmap_core::prober::{ReachabilityProber, parse_target};

/// Answers for a fixed set of live addresses after an optional delay.
pub struct ScriptedProber {
    alive: HashMap<String, f64>,
    delay: Duration,
    broken: bool,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedProber {
    pub fn alive(addrs: &[&str]) -> Self {
        Self {
            alive: addrs.iter().map(|a| ((*a).to_string(), 0.5)).collect(),
            delay: Duration::ZERO,
            broken: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every probe fails as if no probing mechanism existed.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::alive(&[])
        }
    }
}

#[async_trait]
impl ReachabilityProber for ScriptedProber {
    async fn probe(&self, address: &str, timeout: Duration) -> Result<Probe, ProbeError> {
        parse_target(address)?;
        if self.broken {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(ProbeError::Unavailable("mock has no sockets".into()));
        }

        tokio::time::sleep(self.delay.min(timeout)).await;
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok(match self.alive.get(address) {
            Some(ms) => Probe::alive(address, *ms),
            None => Probe::unreachable(address),
        })
    }
}

/// Serves a canned `/proc/net/arp` dump and records how many probes had
/// finished when it was read.
pub struct CannedNeighbors {
    table: String,
    probes_done: Arc<AtomicUsize>,
    pub seen_probes: Arc<AtomicUsize>,
    pub reads: Arc<AtomicUsize>,
}

impl CannedNeighbors {
    pub fn proc_table(rows: &[(&str, &str)], probes_done: Arc<AtomicUsize>) -> Self {
        let mut table = String::from(
            "IP address       HW type     Flags       HW address            Mask     Device\n",
        );
        for (ip, mac) in rows {
            table.push_str(&format!("{ip:<16} 0x1         0x2         {mac}     *        eth0\n"));
        }
        Self {
            table,
            probes_done,
            seen_probes: Arc::new(AtomicUsize::new(0)),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl NeighborSource for CannedNeighbors {
    fn describe(&self) -> String {
        "canned table".into()
    }

    fn layout(&self) -> Option<ColumnLayout> {
        Some(ColumnLayout::PROC_NET_ARP)
    }

    async fn dump(&self) -> anyhow::Result<String> {
        self.seen_probes
            .store(self.probes_done.load(Ordering::SeqCst), Ordering::SeqCst);
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.clone())
    }
}

/// Returns a fixed device list, or fails, and records the targets it was given.
pub struct FakeDiscovery {
    devices: Vec<Device>,
    fail: bool,
    pub targets: Arc<std::sync::Mutex<Vec<Option<String>>>>,
}

impl FakeDiscovery {
    pub fn returning(devices: Vec<Device>) -> Self {
        Self {
            devices,
            fail: false,
            targets: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }
}

#[async_trait]
impl SubnetDiscovery for FakeDiscovery {
    async fn discover(
        &self,
        target: Option<&str>,
        log: &mut DiagnosticLog,
    ) -> anyhow::Result<Vec<Device>> {
        self.targets.lock().unwrap().push(target.map(str::to_string));
        if self.fail {
            anyhow::bail!("no interfaces available");
        }
        log.info("fake discovery ran");
        Ok(self.devices.clone())
    }
}

pub struct FixedVendors(pub HashMap<String, String>);

impl VendorRepository for FixedVendors {
    fn get_vendor(&self, mac: &str) -> Option<String> {
        self.0.get(mac).cloned()
    }
}
