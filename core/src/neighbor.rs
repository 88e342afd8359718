//! # Neighbor Table
//!
//! Reads the operating system's IPv4 neighbor (ARP) table.
//!
//! Acquisition is hidden behind [`NeighborSource`] so that the kernel table
//! (`/proc/net/arp`) and table-dumping commands (`ip neigh`, `arp -an`) are
//! interchangeable. [`ArpTableReader`] never fails its caller: acquisition or
//! parse problems degrade to an empty table plus a diagnostic entry.

use std::sync::Arc;

use async_trait::async_trait;
use lanmap_common::diagnostic::DiagnosticLog;
use lanmap_common::network::device::ArpEntry;

pub mod parse;
pub mod source;

pub use parse::{ColumnLayout, ParseStrategy};
pub use source::{CommandTable, KernelTable, detect_source};

#[async_trait]
pub trait NeighborSource: Send + Sync {
    /// Human readable origin, used in diagnostics.
    fn describe(&self) -> String;

    /// Fixed column positions, when the source has a stable layout.
    fn layout(&self) -> Option<ColumnLayout>;

    async fn dump(&self) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct ArpTableReader {
    source: Arc<dyn NeighborSource>,
    verbose: bool,
}

impl ArpTableReader {
    pub fn new(source: Arc<dyn NeighborSource>) -> Self {
        Self {
            source,
            verbose: false,
        }
    }

    /// Log every accepted and rejected line.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub async fn read(&self, log: &mut DiagnosticLog) -> Vec<ArpEntry> {
        let origin = self.source.describe();
        log.info(format!("Reading neighbor table from {origin}"));

        let text = match self.source.dump().await {
            Ok(text) => text,
            Err(e) => {
                log.warn(format!("Could not read neighbor table from {origin}: {e:#}"));
                return Vec::new();
            }
        };

        let entries = parse::parse_table(&text, self.source.layout(), self.verbose, log);
        log.info(format!("Neighbor table holds {} usable entries", entries.len()));
        entries
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
