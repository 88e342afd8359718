//! # Scan Data Model
//!
//! Values produced while scanning. All of them live for exactly one scan and
//! are discarded once the result has been serialized.

use serde::Serialize;

use crate::diagnostic::DiagnosticLog;

/// Display name used when nothing better is known about a host.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Hardware address used when the neighbor table has no entry for a host.
pub const UNKNOWN_MAC: &str = "??:??:??:??:??:??";

/// Outcome of a single reachability check.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub address: String,
    pub reachable: bool,
    pub latency_ms: Option<f64>,
}

impl Probe {
    pub fn alive(address: impl Into<String>, latency_ms: f64) -> Self {
        Self {
            address: address.into(),
            reachable: true,
            latency_ms: Some(latency_ms),
        }
    }

    pub fn unreachable(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            reachable: false,
            latency_ms: None,
        }
    }
}

/// One line of the OS neighbor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpEntry {
    pub address: String,
    pub hardware_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    #[serde(rename = "ip")]
    pub address: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "mac")]
    pub hardware_address: String,
}

impl Device {
    /// A device with placeholder name and hardware address.
    pub fn unresolved(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: UNKNOWN_NAME.to_string(),
            hardware_address: UNKNOWN_MAC.to_string(),
        }
    }

    pub fn from_entry(entry: &ArpEntry) -> Self {
        Self {
            address: entry.address.clone(),
            display_name: UNKNOWN_NAME.to_string(),
            hardware_address: entry.hardware_address.clone(),
        }
    }

    pub fn has_hardware_address(&self) -> bool {
        self.hardware_address != UNKNOWN_MAC
    }
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub devices: Vec<Device>,
    pub log: DiagnosticLog,
    pub success: bool,
    pub error: Option<String>,
}

impl ScanResult {
    pub fn completed(devices: Vec<Device>, log: DiagnosticLog) -> Self {
        Self {
            devices,
            log,
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, log: DiagnosticLog) -> Self {
        Self {
            devices: Vec::new(),
            log,
            success: false,
            error: Some(message.into()),
        }
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
