// # ICMP Socket Prober
//
// This crate provides a prober that sends one ICMP echo request directly
// from an ICMP socket instead of spawning a process.
//
// ## Privileges
//
// Opening an ICMP socket needs either root / CAP_NET_RAW or, on Linux,
// a `net.ipv4.ping_group_range` that includes the current group. When the
// socket cannot be opened the probe is reported `Unreachable` and a warning
// is logged; the system ping prober is the default for this reason.

use hostwatch_core::config::ProberConfig;
use hostwatch_core::{Error, Host, ProbeOutcome, Prober, ProberCatalog, ProberFactory, Result};

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence};
use tracing::{debug, warn};

/// Name this prober registers under
pub const PROBER_NAME: &str = "icmp";

/// Default echo payload size (matches the classic `ping` default)
pub const DEFAULT_PAYLOAD_SIZE: usize = 56;

/// Prober that sends ICMP echo requests itself
#[derive(Debug, Clone)]
pub struct IcmpProber {
    payload: Vec<u8>,
}

impl IcmpProber {
    /// Create a prober with the default payload size
    pub fn new() -> Self {
        Self::with_payload_size(DEFAULT_PAYLOAD_SIZE)
    }

    /// Create a prober sending `size` payload bytes
    pub fn with_payload_size(size: usize) -> Self {
        Self {
            payload: vec![0; size],
        }
    }

    /// Payload size in bytes
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    fn client_for(addr: IpAddr) -> std::io::Result<Client> {
        match addr {
            IpAddr::V4(_) => Client::new(&Config::default()),
            IpAddr::V6(_) => Client::new(&Config::builder().kind(ICMP::V6).build()),
        }
    }
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, host: &Host, timeout: Duration) -> ProbeOutcome {
        let addr = host.addr();

        let client = match Self::client_for(addr) {
            Ok(client) => client,
            Err(e) => {
                warn!(%host, error = %e, "Failed to open ICMP socket");
                return ProbeOutcome::Unreachable;
            }
        };

        let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match tokio::time::timeout(timeout, pinger.ping(PingSequence(0), &self.payload)).await {
            Ok(Ok((_, rtt))) => {
                debug!(%host, rtt_ms = rtt.as_secs_f64() * 1000.0, "Echo reply received");
                ProbeOutcome::Reachable
            }
            Ok(Err(e)) => {
                debug!(%host, error = %e, "Echo request failed");
                ProbeOutcome::Unreachable
            }
            Err(_) => {
                debug!(%host, timeout_ms = timeout.as_millis() as u64, "Echo request timed out");
                ProbeOutcome::Unreachable
            }
        }
    }

    fn prober_name(&self) -> &'static str {
        PROBER_NAME
    }
}

/// Factory for creating ICMP socket probers
pub struct IcmpFactory;

impl ProberFactory for IcmpFactory {
    fn create(&self, config: &ProberConfig) -> Result<Arc<dyn Prober>> {
        match config {
            ProberConfig::Icmp { payload_size } => {
                Ok(Arc::new(IcmpProber::with_payload_size(*payload_size)))
            }
            _ => Err(Error::config("Invalid config for ICMP prober")),
        }
    }
}

/// Register the ICMP prober with a catalog
pub fn register(catalog: &ProberCatalog) {
    catalog.register_prober(PROBER_NAME, Box::new(IcmpFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creation() {
        let factory = IcmpFactory;

        let prober = factory
            .create(&ProberConfig::Icmp { payload_size: 32 })
            .unwrap();
        assert_eq!(prober.prober_name(), PROBER_NAME);

        assert!(factory.create(&ProberConfig::default()).is_err());
    }

    #[test]
    fn test_payload_size() {
        assert_eq!(IcmpProber::new().payload_size(), DEFAULT_PAYLOAD_SIZE);
        assert_eq!(IcmpProber::with_payload_size(0).payload_size(), 0);
    }

    #[test]
    fn test_register() {
        let catalog = ProberCatalog::new();
        register(&catalog);
        assert_eq!(catalog.list_probers(), vec![PROBER_NAME.to_string()]);
    }

    #[tokio::test]
    #[ignore = "requires ICMP socket permission"]
    async fn test_loopback_reachable() {
        let prober = IcmpProber::new();
        let host = Host::parse("127.0.0.1").unwrap();
        assert_eq!(
            prober.probe(&host, Duration::from_secs(1)).await,
            ProbeOutcome::Reachable
        );
    }
}
