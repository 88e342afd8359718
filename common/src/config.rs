use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 256;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Upper bound for a single reachability probe.
    pub probe_timeout: Duration,
    /// Maximum number of probes in flight at once.
    pub max_concurrent_probes: usize,
    /// Emits one diagnostic line per accepted or rejected neighbor table line.
    pub verbose_arp: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            verbose_arp: false,
        }
    }
}
