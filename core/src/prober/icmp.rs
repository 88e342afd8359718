use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use lanmap_common::error::ProbeError;
use lanmap_common::network::device::Probe;
use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tracing::debug;

use super::{ReachabilityProber, as_millis, parse_target};

const PAYLOAD: [u8; 56] = [0; 56];

pub struct IcmpProber {
    client: Client,
}

impl IcmpProber {
    /// Opens the ICMP socket. Fails without root unless unprivileged ICMP is allowed.
    pub fn new() -> std::io::Result<Self> {
        let client = Client::new(&Config::default())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReachabilityProber for IcmpProber {
    async fn probe(&self, address: &str, timeout: Duration) -> Result<Probe, ProbeError> {
        let ip = parse_target(address)?;

        let mut pinger = self
            .client
            .pinger(IpAddr::V4(ip), PingIdentifier(rand::random::<u16>()))
            .await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_packet, rtt)) => Ok(Probe::alive(address, as_millis(rtt))),
            Err(e) => {
                debug!("{address} did not answer: {e}");
                Ok(Probe::unreachable(address))
            }
        }
    }
}
