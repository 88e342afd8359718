pub mod ping;
pub mod scan;
pub mod serve;

use std::net::IpAddr;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use lanmap_common::config::{DEFAULT_MAX_CONCURRENT_PROBES, ScanConfig};
use lanmap_common::network::mac::MacOuiRepo;
use lanmap_core::discovery::LanDiscovery;
use lanmap_core::neighbor::{ArpTableReader, detect_source};
use lanmap_core::prober::select_prober;
use lanmap_core::scanner::ScanCoordinator;

#[derive(Parser)]
#[command(name = "lanmap", version)]
#[command(about = "Finds live hosts on the local network and pairs them with their MAC addresses.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Timeout for a single reachability probe, in milliseconds
    #[arg(long, global = true, default_value_t = 1000, env = "LANMAP_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Log every accepted and rejected neighbor table line
    #[arg(long, global = true)]
    pub verbose_arp: bool,

    /// Raise log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the scan API over HTTP
    #[command(alias = "s")]
    Serve {
        #[arg(long, default_value = "0.0.0.0", env = "LANMAP_HOST")]
        host: IpAddr,
        #[arg(short, long, default_value_t = 3000, env = "LANMAP_PORT")]
        port: u16,
    },
    /// Scan a range such as 192.168.1.1-254, or the local subnet when omitted
    #[command(alias = "sc")]
    Scan { range: Option<String> },
    /// Probe a single IPv4 address
    #[command(alias = "p")]
    Ping { ip: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            probe_timeout: Duration::from_millis(self.timeout_ms),
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            verbose_arp: self.verbose_arp,
        }
    }
}

pub fn build_coordinator(cfg: ScanConfig) -> ScanCoordinator {
    let reader = ArpTableReader::new(detect_source()).verbose(cfg.verbose_arp);
    let discovery = LanDiscovery::new(reader.clone());

    ScanCoordinator::new(select_prober(), reader, Box::new(discovery), cfg)
        .with_vendors(Box::new(MacOuiRepo))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
