//! # Local Subnet Discovery
//!
//! The degraded-but-always-available path used when a scan names no range.
//!
//! [`LanDiscovery`] does not probe anything. It identifies the primary LAN
//! interface and reports what the neighbor table already knows about that
//! interface's network.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use lanmap_common::diagnostic::DiagnosticLog;
use lanmap_common::network::device::{ArpEntry, Device};
use lanmap_common::network::interface::{self, LanNetwork};

use crate::neighbor::ArpTableReader;

#[async_trait]
pub trait SubnetDiscovery: Send + Sync {
    /// `target` is a single address to narrow the result to, if any.
    async fn discover(
        &self,
        target: Option<&str>,
        log: &mut DiagnosticLog,
    ) -> anyhow::Result<Vec<Device>>;
}

pub struct LanDiscovery {
    reader: ArpTableReader,
}

impl LanDiscovery {
    pub fn new(reader: ArpTableReader) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl SubnetDiscovery for LanDiscovery {
    async fn discover(
        &self,
        target: Option<&str>,
        log: &mut DiagnosticLog,
    ) -> anyhow::Result<Vec<Device>> {
        let lan = interface::primary_lan_network()?;
        match &lan {
            Some(lan) => log.info(format!(
                "Auto-discovery on {} ({})",
                lan.interface, lan.network
            )),
            None => log.warn("No private LAN interface found, reporting every neighbor entry"),
        }

        let entries = self.reader.read(log).await;
        let devices = select_devices(&entries, lan.as_ref(), target);
        log.info(format!("Auto-discovery found {} devices", devices.len()));
        Ok(devices)
    }
}

fn select_devices(
    entries: &[ArpEntry],
    lan: Option<&LanNetwork>,
    target: Option<&str>,
) -> Vec<Device> {
    entries
        .iter()
        .filter(|entry| match target {
            Some(addr) => entry.address == addr,
            None => lan.is_none_or(|lan| {
                entry
                    .address
                    .parse::<Ipv4Addr>()
                    .is_ok_and(|ip| lan.contains(ip))
            }),
        })
        .map(Device::from_entry)
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
