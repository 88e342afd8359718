//! # Reachability Probing
//!
//! A [`ReachabilityProber`] performs exactly one liveness check against one
//! address and never retries. Timeouts and unreachable hosts are ordinary
//! results (`reachable == false`); an error is returned only for malformed
//! input or when the probing mechanism itself cannot be used.
//!
//! Implementations:
//! * [`icmp::IcmpProber`]: ICMP echo through `surge-ping` sockets.
//! * [`command::SystemPingProber`]: the operating system's `ping` binary.
//! * [`UnavailableProber`]: placeholder when neither of the above works.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::error::ProbeError;
use lanmap_common::network::device::Probe;
use tracing::{info, warn};

pub mod command;
pub mod icmp;

#[async_trait]
pub trait ReachabilityProber: Send + Sync {
    async fn probe(&self, address: &str, timeout: Duration) -> Result<Probe, ProbeError>;
}

/// Parses a probe target; only IPv4 is supported.
pub fn parse_target(address: &str) -> Result<Ipv4Addr, ProbeError> {
    address
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| ProbeError::InvalidAddress(address.to_string()))
}

pub(crate) fn as_millis(rtt: Duration) -> f64 {
    rtt.as_secs_f64() * 1_000.0
}

/// Fails every probe with the reason no mechanism could be set up.
pub struct UnavailableProber {
    reason: String,
}

impl UnavailableProber {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ReachabilityProber for UnavailableProber {
    async fn probe(&self, address: &str, _timeout: Duration) -> Result<Probe, ProbeError> {
        parse_target(address)?;
        Err(ProbeError::Unavailable(self.reason.clone()))
    }
}

/// Picks the best probing mechanism available on this host.
///
/// Must be called from within a tokio runtime.
pub fn select_prober() -> Arc<dyn ReachabilityProber> {
    select_prober_with(
        || icmp::IcmpProber::new().map(|p| Arc::new(p) as Arc<dyn ReachabilityProber>),
        || command::SystemPingProber::detect().map(|p| Arc::new(p) as Arc<dyn ReachabilityProber>),
    )
}

/// Preference: ICMP sockets, then the system `ping` command, then
/// [`UnavailableProber`].
pub fn select_prober_with<I, P>(open_icmp: I, find_ping: P) -> Arc<dyn ReachabilityProber>
where
    I: FnOnce() -> std::io::Result<Arc<dyn ReachabilityProber>>,
    P: FnOnce() -> Option<Arc<dyn ReachabilityProber>>,
{
    let icmp_err = match open_icmp() {
        Ok(prober) => {
            info!("Using ICMP echo sockets for reachability probes");
            return prober;
        }
        Err(e) => e,
    };

    warn!("ICMP sockets unavailable ({icmp_err})");
    if !crate::system::is_privileged() {
        warn!("Not running as root; raw ICMP needs root or a matching net.ipv4.ping_group_range");
    }

    if let Some(prober) = find_ping() {
        info!("Falling back to the system ping command");
        return prober;
    }

    let reason = format!("no ICMP socket ({icmp_err}) and no ping command on PATH");
    warn!("Reachability probing disabled: {reason}");
    Arc::new(UnavailableProber::new(reason))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
