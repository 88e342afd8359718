//! # Range Expansion
//!
//! Turns a user supplied range expression into the concrete addresses to probe.
//!
//! Supported formats:
//! * `"A.B.C.D"`: a single address, passed through verbatim.
//! * `"A.B.C.S-E"`: last octet from `S` through `E`, inclusive.
//! * `"A.B.C.S-A.B.C.E"`: same range with a fully qualified end address.
//!
//! Only the last octet varies. A fully qualified end address whose first three
//! octets differ from the start is rejected rather than silently re-homed onto
//! the start's /24.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::diagnostic::DiagnosticLog;
use crate::error::RangeError;

pub const RANGE_SEPARATOR: char = '-';

/// Whether `spec` asks for a range rather than a single address.
pub fn is_range(spec: &str) -> bool {
    spec.contains(RANGE_SEPARATOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LastOctetRange {
    pub prefix: [u8; 3],
    pub start: u8,
    pub end: u8,
}

impl LastOctetRange {
    pub fn new(prefix: [u8; 3], start: u8, end: u8) -> Self {
        Self { prefix, start, end }
    }

    /// Ascending addresses from `start` to `end`; empty when `start > end`.
    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let [a, b, c] = self.prefix;
        (self.start..=self.end).map(move |d| Ipv4Addr::new(a, b, c, d))
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            usize::from(self.end - self.start) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromStr for LastOctetRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(RANGE_SEPARATOR).map(str::trim).collect();

        let (start_str, end_str) = match tokens.as_slice() {
            [start, end] => (*start, *end),
            [_] => return Err(RangeError::MissingToken(s.to_string())),
            _ => return Err(RangeError::TooManySeparators(s.to_string())),
        };

        if start_str.is_empty() || end_str.is_empty() {
            return Err(RangeError::MissingToken(s.to_string()));
        }

        let start_addr = start_str
            .parse::<Ipv4Addr>()
            .map_err(|_| RangeError::InvalidStart(start_str.to_string()))?;
        let [a, b, c, start] = start_addr.octets();

        let end = parse_range_end(end_str, &start_addr)?;

        Ok(Self::new([a, b, c], start, end))
    }
}

/// Parses the end token of a range down to its last octet.
///
/// Handles the abbreviated form (`"50"`) and the full form (`"192.168.1.50"`).
fn parse_range_end(end_str: &str, start_addr: &Ipv4Addr) -> Result<u8, RangeError> {
    if !end_str.contains('.') {
        return end_str
            .parse::<u8>()
            .map_err(|_| RangeError::InvalidEnd(end_str.to_string()));
    }

    let end_addr = end_str
        .parse::<Ipv4Addr>()
        .map_err(|_| RangeError::InvalidEnd(end_str.to_string()))?;

    let start_octets = start_addr.octets();
    let end_octets = end_addr.octets();
    if start_octets[..3] != end_octets[..3] {
        return Err(RangeError::PrefixMismatch {
            start: start_addr.to_string(),
            end: end_addr.to_string(),
        });
    }

    Ok(end_octets[3])
}

/// Expands `spec` into the ordered list of addresses to probe.
///
/// A spec without a separator comes back unchanged as a one-element list. A
/// spec that cannot be parsed yields an empty list and a diagnostic entry; it
/// never aborts the caller.
pub fn expand(spec: &str, log: &mut DiagnosticLog) -> Vec<String> {
    if !is_range(spec) {
        return vec![spec.to_string()];
    }

    match spec.parse::<LastOctetRange>() {
        Ok(range) => {
            let addrs: Vec<String> = range.to_iter().map(|ip| ip.to_string()).collect();
            if addrs.is_empty() {
                log.warn(format!(
                    "Range '{spec}' is empty: start octet {} is above end octet {}",
                    range.start, range.end
                ));
            } else {
                log.info(format!("Expanded '{spec}' into {} addresses", addrs.len()));
            }
            addrs
        }
        Err(e) => {
            log.warn(format!("Could not expand range '{spec}': {e}"));
            Vec::new()
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
