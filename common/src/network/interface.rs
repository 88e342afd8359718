//! Local interface selection for subnet auto-discovery.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(target_os = "macos")]
use macos_impl::{is_physical, is_wireless};
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use fallback_impl::{is_physical, is_wireless};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Unsuitable {
    IsDown,
    IsLoopback,
    NotPhysical,
    NoMacAddress,
    /// ARP needs a broadcast capable link.
    NotBroadcast,
    /// Point-to-point links (VPNs, tunnels) have no neighbors to discover.
    IsPointToPoint,
    NoPrivateIpv4,
}

/// The interface and IPv4 network auto-discovery should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanNetwork {
    pub interface: String,
    pub network: Ipv4Network,
}

impl LanNetwork {
    pub fn contains(&self, ip: std::net::Ipv4Addr) -> bool {
        self.network.contains(ip)
    }
}

/// Finds the primary LAN interface and its private IPv4 network.
///
/// Wired interfaces win over wireless ones. Returns `Ok(None)` when no
/// interface qualifies.
pub fn primary_lan_network() -> anyhow::Result<Option<LanNetwork>> {
    let candidates: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|intf| check_interface(intf, is_physical).is_ok())
        .collect();

    let Some(intf) = pick_interface(candidates, is_wired) else {
        return Ok(None);
    };

    Ok(private_ipv4(&intf).map(|network| LanNetwork {
        interface: intf.name.clone(),
        network,
    }))
}

fn private_ipv4(intf: &NetworkInterface) -> Option<Ipv4Network> {
    intf.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if v4.ip().is_private() => Some(*v4),
        _ => None,
    })
}

fn check_interface(
    intf: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), Unsuitable> {
    if !intf.is_up() {
        return Err(Unsuitable::IsDown);
    }
    if intf.is_loopback() {
        return Err(Unsuitable::IsLoopback);
    }
    if !is_physical(intf) {
        return Err(Unsuitable::NotPhysical);
    }
    if intf.mac.is_none() {
        return Err(Unsuitable::NoMacAddress);
    }
    if !intf.is_broadcast() {
        return Err(Unsuitable::NotBroadcast);
    }
    if intf.is_point_to_point() {
        return Err(Unsuitable::IsPointToPoint);
    }
    if private_ipv4(intf).is_none() {
        return Err(Unsuitable::NoPrivateIpv4);
    }
    Ok(())
}

fn pick_interface(
    candidates: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    let wired = candidates.iter().position(|intf| is_wired(intf));
    let idx = wired.unwrap_or(0);
    candidates.into_iter().nth(idx)
}

fn is_wired(intf: &NetworkInterface) -> bool {
    is_physical(intf) && !is_wireless(intf)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(intf: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", intf.name)).exists()
    }

    pub fn is_wireless(intf: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", intf.name)).exists()
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::HashSet;
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwarePorts {
        physical: HashSet<String>,
        wireless: HashSet<String>,
    }

    /// `networksetup` is only consulted once per process.
    fn hardware_ports() -> &'static HardwarePorts {
        static PORTS: OnceLock<HardwarePorts> = OnceLock::new();

        PORTS.get_or_init(|| {
            let mut physical = HashSet::new();
            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                physical.extend(
                    stdout
                        .lines()
                        .filter_map(|line| line.strip_prefix("Device: "))
                        .map(|dev| dev.trim().to_string()),
                );
            }

            let wireless = physical
                .iter()
                .filter(|dev| {
                    Command::new("networksetup")
                        .arg("-getairportnetwork")
                        .arg(dev.as_str())
                        .output()
                        .map(|out| out.status.success())
                        .unwrap_or(false)
                })
                .cloned()
                .collect();

            HardwarePorts { physical, wireless }
        })
    }

    pub fn is_physical(intf: &NetworkInterface) -> bool {
        hardware_ports().physical.contains(&intf.name)
    }

    pub fn is_wireless(intf: &NetworkInterface) -> bool {
        hardware_ports().wireless.contains(&intf.name)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(_intf: &NetworkInterface) -> bool {
        true
    }

    pub fn is_wireless(_intf: &NetworkInterface) -> bool {
        false
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
