use anyhow::Context;
use colored::*;
use lanmap_core::scanner::ScanCoordinator;

use crate::terminal::{format, print, spinner};

pub async fn ping(coordinator: &ScanCoordinator, ip: &str) -> anyhow::Result<()> {
    let pb = spinner::start(format!("Pinging {ip}"));
    let outcome = coordinator.ping_one(ip).await;
    spinner::finish(&pb);

    let probe = outcome.with_context(|| format!("could not ping {ip}"))?;

    let state = if probe.reachable {
        "alive".green().bold()
    } else {
        "unreachable".red().bold()
    };

    print::print_status(format!(
        "{} is {} (latency {})",
        probe.address,
        state,
        format::latency(probe.latency_ms)
    ));
    Ok(())
}
