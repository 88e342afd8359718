use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use super::{ColumnLayout, NeighborSource};
use crate::system;

pub const PROC_NET_ARP: &str = "/proc/net/arp";

/// A kernel-exposed table file such as `/proc/net/arp`.
pub struct KernelTable {
    path: PathBuf,
}

impl KernelTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NeighborSource for KernelTable {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn layout(&self) -> Option<ColumnLayout> {
        Some(ColumnLayout::PROC_NET_ARP)
    }

    async fn dump(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))
    }
}

/// An external command that prints the neighbor table to stdout.
pub struct CommandTable {
    program: PathBuf,
    args: Vec<String>,
    layout: Option<ColumnLayout>,
}

impl CommandTable {
    pub fn new(program: impl Into<PathBuf>, args: &[&str], layout: Option<ColumnLayout>) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            layout,
        }
    }

    /// `ip -4 neigh show`
    pub fn ip_neigh(program: impl Into<PathBuf>) -> Self {
        Self::new(program, &["-4", "neigh", "show"], Some(ColumnLayout::IP_NEIGH))
    }

    /// `arp -an`; free-text output, pattern parsing only.
    pub fn arp(program: impl Into<PathBuf>) -> Self {
        Self::new(program, &["-an"], None)
    }
}

#[async_trait]
impl NeighborSource for CommandTable {
    fn describe(&self) -> String {
        format!("`{} {}`", self.program.display(), self.args.join(" "))
    }

    fn layout(&self) -> Option<ColumnLayout> {
        self.layout
    }

    async fn dump(&self) -> anyhow::Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("running {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} exited with {}: {}", self.program.display(), output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn is_readable(path: &Path) -> bool {
    std::fs::File::open(path).is_ok()
}

/// Chooses the neighbor table source for this host.
///
/// Preference: the kernel table, then `ip neigh`, then `arp -an`. When none is
/// usable the kernel table is returned anyway; reading it will degrade to an
/// empty table with a diagnostic.
pub fn detect_source() -> Arc<dyn NeighborSource> {
    detect_source_with(is_readable, system::find_program)
}

pub fn detect_source_with<R, F>(is_readable: R, find_program: F) -> Arc<dyn NeighborSource>
where
    R: Fn(&Path) -> bool,
    F: Fn(&str) -> Option<PathBuf>,
{
    if is_readable(Path::new(PROC_NET_ARP)) {
        info!("Neighbor table source: {PROC_NET_ARP}");
        return Arc::new(KernelTable::new(PROC_NET_ARP));
    }

    if let Some(ip) = find_program("ip") {
        info!("Neighbor table source: {} neigh", ip.display());
        return Arc::new(CommandTable::ip_neigh(ip));
    }

    if let Some(arp) = find_program("arp") {
        info!("Neighbor table source: {} -an", arp.display());
        return Arc::new(CommandTable::arp(arp));
    }

    warn!("No neighbor table source found; MAC addresses will be unavailable");
    Arc::new(KernelTable::new(PROC_NET_ARP))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
