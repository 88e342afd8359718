use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lanmap_common::error::ProbeError;
use lanmap_common::network::device::Probe;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use super::{ReachabilityProber, as_millis, parse_target};
use crate::system;

/// Extra time granted to the `ping` process on top of its own deadline.
const PROCESS_GRACE: Duration = Duration::from_millis(500);

static RTT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time[=<]\s*([0-9]+(?:\.[0-9]+)?)\s*ms").expect("valid rtt pattern"));

pub struct SystemPingProber {
    program: PathBuf,
}

impl SystemPingProber {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn detect() -> Option<Self> {
        system::find_program("ping").map(Self::new)
    }
}

#[cfg(target_os = "linux")]
fn ping_args(ip: &str, timeout: Duration) -> Vec<String> {
    let secs = timeout.as_secs_f64().ceil().max(1.0) as u64;
    vec!["-n".into(), "-c".into(), "1".into(), "-W".into(), secs.to_string(), ip.into()]
}

#[cfg(target_os = "macos")]
fn ping_args(ip: &str, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis().max(1);
    vec!["-n".into(), "-c".into(), "1".into(), "-W".into(), millis.to_string(), ip.into()]
}

#[cfg(windows)]
fn ping_args(ip: &str, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis().max(1);
    vec!["-n".into(), "1".into(), "-w".into(), millis.to_string(), ip.into()]
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn ping_args(ip: &str, timeout: Duration) -> Vec<String> {
    let secs = timeout.as_secs_f64().ceil().max(1.0) as u64;
    vec!["-n".into(), "-c".into(), "1".into(), "-t".into(), secs.to_string(), ip.into()]
}

/// Round-trip time as printed by `ping`, e.g. `time=0.42 ms` or `time<1ms`.
fn parse_rtt(stdout: &str) -> Option<f64> {
    RTT_PATTERN
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[async_trait]
impl ReachabilityProber for SystemPingProber {
    async fn probe(&self, address: &str, timeout: Duration) -> Result<Probe, ProbeError> {
        let ip = parse_target(address)?.to_string();

        let started = Instant::now();
        let child = Command::new(&self.program)
            .args(ping_args(&ip, timeout))
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(timeout + PROCESS_GRACE, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProbeError::Unavailable(format!(
                    "could not run {}: {e}",
                    self.program.display()
                )));
            }
            Err(_elapsed) => {
                debug!("{address}: ping process exceeded its deadline");
                return Ok(Probe::unreachable(address));
            }
        };

        if !output.status.success() {
            return Ok(Probe::unreachable(address));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let latency = parse_rtt(&stdout).unwrap_or_else(|| as_millis(started.elapsed()));
        Ok(Probe::alive(address, latency))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtt_from_iputils_output() {
        let out = "PING 192.168.1.1 (192.168.1.1) 56(84) bytes of data.\n\
                   64 bytes from 192.168.1.1: icmp_seq=1 ttl=64 time=0.412 ms\n";
        assert_eq!(parse_rtt(out), Some(0.412));
    }

    #[test]
    fn rtt_from_windows_output() {
        assert_eq!(parse_rtt("Reply from 10.0.0.1: bytes=32 time<1ms TTL=128"), Some(1.0));
        assert_eq!(parse_rtt("Reply from 10.0.0.1: bytes=32 time=14ms TTL=128"), Some(14.0));
    }

    #[test]
    fn rtt_missing() {
        assert_eq!(parse_rtt("Request timeout for icmp_seq 0"), None);
    }

    #[test]
    fn args_end_with_target() {
        let args = ping_args("10.0.0.9", Duration::from_millis(800));
        assert_eq!(args.last().map(String::as_str), Some("10.0.0.9"));
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let prober = SystemPingProber::new("/nonexistent/lanmap-ping");
        let err = prober
            .probe("127.0.0.1", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Unavailable(_)));
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_before_spawning() {
        let prober = SystemPingProber::new("/nonexistent/lanmap-ping");
        let err = prober.probe("10.0.0", Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, ProbeError::InvalidAddress(_)));
    }
}
