use std::time::Instant;

use colored::*;
use lanmap_common::network::device::ScanResult;
use lanmap_core::scanner::ScanCoordinator;

use crate::terminal::{print, spinner};

pub async fn scan(
    coordinator: &ScanCoordinator,
    range: Option<&str>,
    show_log: bool,
) -> anyhow::Result<()> {
    let label = range.unwrap_or("the local subnet");
    print::section("starting scan");

    let pb = spinner::start(format!("Scanning {label}"));
    let started = Instant::now();
    let result: ScanResult = coordinator.scan(range).await;
    let elapsed = started.elapsed();
    spinner::finish(&pb);

    // Failed scans always print their trail.
    if show_log || !result.success {
        print::section("diagnostics");
        result.log.lines().iter().for_each(|line| print::diagnostic(line));
    }

    if !result.success {
        let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
        anyhow::bail!("scan of {label} failed: {reason}");
    }

    print::section("discovered devices");
    if result.devices.is_empty() {
        print::no_results(label);
        return Ok(());
    }

    for (idx, device) in result.devices.iter().enumerate() {
        print::device(idx, device);
    }

    print::fat_separator();
    print::centerln(&format!(
        "{} devices in {:.2}s",
        result.devices.len().to_string().green().bold(),
        elapsed.as_secs_f64()
    ));
    Ok(())
}
