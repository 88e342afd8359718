//! Line parsing for neighbor table dumps.
//!
//! Each line is tried against a strict column layout first (when the source
//! has one) and then against pattern extraction, which looks for an IPv4
//! token and a whitespace separated token that is exactly a six-group
//! hardware address. A line that matches neither is skipped; it never stops
//! the rest of the table.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

use lanmap_common::diagnostic::DiagnosticLog;
use lanmap_common::network::device::ArpEntry;
use lanmap_common::network::mac;
use regex::Regex;

static IPV4_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}(?:\.\d{1,3}){3}\b").expect("valid ipv4 pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub address: usize,
    pub hardware_address: usize,
    /// Leading lines that are column titles.
    pub header_lines: usize,
}

impl ColumnLayout {
    /// `IP address  HW type  Flags  HW address  Mask  Device`
    pub const PROC_NET_ARP: Self = Self {
        address: 0,
        hardware_address: 3,
        header_lines: 1,
    };

    /// `192.168.1.1 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE`
    pub const IP_NEIGH: Self = Self {
        address: 0,
        hardware_address: 4,
        header_lines: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Columns(ColumnLayout),
    Pattern,
}

impl ParseStrategy {
    /// Extracts `(address, normalized hardware address)` from one line.
    pub fn apply(&self, line: &str) -> Option<(Ipv4Addr, String)> {
        match self {
            ParseStrategy::Columns(layout) => parse_columns(line, layout),
            ParseStrategy::Pattern => parse_pattern(line),
        }
    }
}

fn parse_columns(line: &str, layout: &ColumnLayout) -> Option<(Ipv4Addr, String)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let ip = fields.get(layout.address)?.parse::<Ipv4Addr>().ok()?;
    let hw = mac::normalize(fields.get(layout.hardware_address)?)?;
    Some((ip, hw))
}

fn parse_pattern(line: &str) -> Option<(Ipv4Addr, String)> {
    let ip = IPV4_TOKEN
        .find_iter(line)
        .find_map(|m| m.as_str().parse::<Ipv4Addr>().ok())?;
    let hw = line
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_hexdigit() && c != ':'))
        .filter(|token| token.contains(':'))
        .find_map(mac::normalize)?;
    Some((ip, hw))
}

/// Parses a whole table dump into unique, complete entries.
///
/// The first entry wins when an address shows up on several interfaces.
pub fn parse_table(
    text: &str,
    layout: Option<ColumnLayout>,
    verbose: bool,
    log: &mut DiagnosticLog,
) -> Vec<ArpEntry> {
    let mut strategies: Vec<ParseStrategy> = Vec::with_capacity(2);
    if let Some(layout) = layout {
        strategies.push(ParseStrategy::Columns(layout));
    }
    strategies.push(ParseStrategy::Pattern);

    let skip = layout.map_or(0, |l| l.header_lines);
    let mut seen: HashSet<Ipv4Addr> = HashSet::new();
    let mut entries: Vec<ArpEntry> = Vec::new();

    for line in text.lines().skip(skip).map(str::trim).filter(|l| !l.is_empty()) {
        let Some((ip, hw)) = strategies.iter().find_map(|s| s.apply(line)) else {
            if verbose {
                log.debug(format!("Skipped unrecognized neighbor line: {line}"));
            }
            continue;
        };

        if mac::is_zero(&hw) {
            if verbose {
                log.debug(format!("Rejected incomplete entry for {ip}"));
            }
            continue;
        }

        if !seen.insert(ip) {
            if verbose {
                log.debug(format!("Ignored duplicate entry for {ip} ({hw})"));
            }
            continue;
        }

        if verbose {
            log.debug(format!("Accepted {ip} at {hw}"));
        }
        entries.push(ArpEntry {
            address: ip.to_string(),
            hardware_address: hw,
        });
    }

    entries
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
