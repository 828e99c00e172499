// # Prober Trait
//
// Defines the interface for checking whether one host is reachable.
//
// ## Implementations
//
// - System `ping` utility: `hostwatch-ping` crate
// - ICMP echo socket: `hostwatch-icmp` crate
//
// ## Usage
//
// ```rust,ignore
// use hostwatch_core::{Host, Prober, ProbeOutcome};
// use std::time::Duration;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let prober = /* Prober implementation */;
//     let host = Host::parse("192.0.2.7")?;
//
//     match prober.probe(&host, Duration::from_secs(2)).await {
//         ProbeOutcome::Reachable => println!("{host} is up"),
//         ProbeOutcome::Unreachable => println!("{host} is down"),
//     }
//
//     Ok(())
// }
// ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::host::{Host, HostStatus};

/// Result of a single liveness probe
///
/// Destination-unreachable replies, total packet loss, tool or socket
/// errors and timeouts all collapse into [`ProbeOutcome::Unreachable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeOutcome {
    /// The host answered the echo request
    Reachable,
    /// No usable answer
    Unreachable,
}

impl ProbeOutcome {
    /// Whether the probe succeeded
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

impl From<bool> for ProbeOutcome {
    fn from(reachable: bool) -> Self {
        if reachable {
            ProbeOutcome::Reachable
        } else {
            ProbeOutcome::Unreachable
        }
    }
}

impl From<ProbeOutcome> for HostStatus {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Reachable => HostStatus::Online,
            ProbeOutcome::Unreachable => HostStatus::Offline,
        }
    }
}

/// Trait for prober implementations
///
/// A prober issues exactly one echo request per call and never retries.
/// Retry policy, if any, belongs to the caller.
///
/// Implementations must be thread-safe: the registry calls `probe`
/// concurrently for different hosts from separate tasks.
///
/// # Timeouts
///
/// Implementations should honour `timeout` themselves (pass it to the
/// underlying tool or socket). The registry additionally bounds every call
/// at `timeout` plus a small grace period and treats expiry as
/// `Unreachable`, so a misbehaving prober cannot stall a refresh.
///
/// # Errors
///
/// `probe` is infallible by signature. Any failure, including being unable
/// to run the probe at all, must be reported as `Unreachable`.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Send one liveness probe to `host` and wait at most `timeout`
    async fn probe(&self, host: &Host, timeout: Duration) -> ProbeOutcome;

    /// Get the prober name (for logging)
    fn prober_name(&self) -> &'static str;
}

/// Helper trait for constructing probers from configuration
pub trait ProberFactory: Send + Sync {
    /// Create a Prober instance from configuration
    ///
    /// # Returns
    ///
    /// A shared Prober trait object, or `Error::Config` if the
    /// configuration does not describe this prober
    fn create(
        &self,
        config: &crate::config::ProberConfig,
    ) -> Result<Arc<dyn Prober>, crate::Error>;
}
