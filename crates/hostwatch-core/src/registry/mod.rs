//! Host registry
//!
//! The HostRegistry is responsible for:
//! - Validating and tracking hosts in insertion order
//! - Probing every tracked host concurrently on refresh
//! - Committing each probe outcome into the status table
//! - Handing out consistent point-in-time snapshots
//!
//! ## Architecture
//!
//! ```text
//!                    refresh_all()
//!                          │
//!              ┌───────────┼───────────┐
//!              ▼           ▼           ▼
//!         ┌────────┐  ┌────────┐  ┌────────┐
//!         │ task A │  │ task B │  │ task C │   (bounded by a semaphore)
//!         └────────┘  └────────┘  └────────┘
//!              │           │           │
//!              ▼           ▼           ▼
//!          Prober::probe (each wrapped in its own timeout)
//!              │           │           │
//!              └───────────┼───────────┘
//!                          ▼
//!                 ┌─────────────────┐
//!                 │  status table   │◄──── snapshot()
//!                 └─────────────────┘
//! ```
//!
//! ## Refresh Flow
//!
//! 1. Take the refresh lock (cycles never overlap)
//! 2. Copy the list of tracked hosts
//! 3. Spawn one probe task per host
//! 4. Each task commits its own result under the table write lock
//! 5. Wait for every task before returning

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, Semaphore};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::host::{Host, HostEntry, HostStatus};
use crate::traits::{ProbeOutcome, Prober};

/// Extra time granted to a prober past its own timeout before the
/// registry gives up on it
pub const PROBE_GRACE: Duration = Duration::from_millis(500);

/// Counts from one refresh cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Hosts probed in this cycle
    pub probed: usize,
    /// Hosts that answered
    pub online: usize,
    /// Hosts that did not answer
    pub offline: usize,
}

impl RefreshSummary {
    fn record(&mut self, outcome: ProbeOutcome) {
        self.probed += 1;
        if outcome.is_reachable() {
            self.online += 1;
        } else {
            self.offline += 1;
        }
    }
}

/// Insertion-ordered status table
#[derive(Debug, Default)]
struct StatusTable {
    entries: Vec<HostEntry>,
    index: HashMap<Host, usize>,
}

impl StatusTable {
    /// Returns `true` if the host was newly inserted
    fn insert(&mut self, host: Host) -> bool {
        if self.index.contains_key(&host) {
            return false;
        }
        self.index.insert(host, self.entries.len());
        self.entries.push(HostEntry::new(host));
        true
    }

    fn commit(&mut self, host: &Host, status: HostStatus) {
        // Hosts are never removed, so a probed host always has a slot.
        if let Some(&slot) = self.index.get(host) {
            let entry = &mut self.entries[slot];
            entry.status = status;
            entry.checked_at = Some(chrono::Utc::now());
        }
    }

    fn hosts(&self) -> Vec<Host> {
        self.entries.iter().map(|entry| entry.host).collect()
    }
}

/// Tracks a set of hosts and their last known reachability
///
/// ## Lifecycle
///
/// 1. Create with [`HostRegistry::new()`]
/// 2. Track hosts with [`HostRegistry::add_host()`]
/// 3. Probe everything with [`HostRegistry::refresh_all()`]
/// 4. Read results with [`HostRegistry::snapshot()`]
///
/// ## Threading
///
/// All methods take `&self`; share the registry behind an `Arc` to call it
/// from several tasks. Refresh cycles are serialized against each other,
/// snapshots may be taken at any time and never see a half-written row.
///
/// # Example
///
/// ```rust,no_run
/// use hostwatch_core::{HostRegistry, RegistryConfig};
/// # use hostwatch_core::{Host, Prober, ProbeOutcome};
/// # use std::sync::Arc;
/// # use std::time::Duration;
/// # struct AlwaysUp;
/// # #[async_trait::async_trait]
/// # impl Prober for AlwaysUp {
/// #     async fn probe(&self, _host: &Host, _timeout: Duration) -> ProbeOutcome { ProbeOutcome::Reachable }
/// #     fn prober_name(&self) -> &'static str { "always-up" }
/// # }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = HostRegistry::new(Arc::new(AlwaysUp), RegistryConfig::default())?;
///
///     registry.add_host("127.0.0.1").await?;
///     registry.refresh_all().await;
///
///     for entry in registry.snapshot().await {
///         println!("Host '{}' is {}", entry.host, entry.status);
///     }
///     Ok(())
/// }
/// ```
pub struct HostRegistry {
    /// Prober shared by all probe tasks
    prober: Arc<dyn Prober>,

    /// The only shared mutable state
    table: Arc<RwLock<StatusTable>>,

    /// Held for the whole of a refresh cycle, including its probe tasks
    refresh_lock: Arc<Mutex<()>>,

    /// Per-host probe timeout
    probe_timeout: Duration,

    /// Cap on in-flight probes per cycle
    max_concurrent_probes: usize,
}

impl HostRegistry {
    /// Create a new, empty registry
    ///
    /// # Returns
    ///
    /// - `Ok(HostRegistry)`: Ready to use
    /// - `Err(Error::Config)`: If `config` has a zero timeout or concurrency cap
    pub fn new(prober: Arc<dyn Prober>, config: RegistryConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            prober,
            table: Arc::new(RwLock::new(StatusTable::default())),
            refresh_lock: Arc::new(Mutex::new(())),
            probe_timeout: config.probe_timeout(),
            max_concurrent_probes: config.max_concurrent_probes,
        })
    }

    /// Start tracking an address
    ///
    /// The address is parsed and canonicalized first. Adding a host that is
    /// already tracked, under any spelling, leaves its status untouched.
    ///
    /// # Returns
    ///
    /// - `Ok(Host)`: The canonical host, whether newly added or already present
    /// - `Err(Error::InvalidAddress)`: Not an IP literal; the table is unchanged
    pub async fn add_host(&self, addr: &str) -> Result<Host> {
        let host = Host::parse(addr)?;

        if self.table.write().await.insert(host) {
            info!(%host, "Tracking host");
        } else {
            debug!(%host, "Host already tracked");
        }

        Ok(host)
    }

    /// Probe every tracked host once and record the results
    ///
    /// Returns only after every probe has been committed. A host whose
    /// probe hangs, errors or panics is recorded as offline without
    /// affecting any other host.
    pub async fn refresh_all(&self) -> RefreshSummary {
        // Each probe task holds a clone of this guard, so the next cycle
        // cannot start until every commit from this one has landed, even if
        // the caller drops this future early.
        let cycle = Arc::new(Arc::clone(&self.refresh_lock).lock_owned().await);

        let hosts = self.table.read().await.hosts();
        let mut summary = RefreshSummary::default();

        if hosts.is_empty() {
            debug!("No hosts tracked, nothing to refresh");
            return summary;
        }

        debug!(
            hosts = hosts.len(),
            prober = self.prober.prober_name(),
            "Refreshing hosts"
        );

        let slots = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut tasks = Vec::with_capacity(hosts.len());

        for host in hosts {
            let prober = Arc::clone(&self.prober);
            let table = Arc::clone(&self.table);
            let slots = Arc::clone(&slots);
            let cycle = Arc::clone(&cycle);
            let timeout = self.probe_timeout;

            let task = tokio::spawn(async move {
                let _cycle = cycle;
                let _slot = slots.acquire_owned().await.ok();

                // The probe runs in its own task so a panic surfaces here as a
                // JoinError and this host's commit still happens below.
                let probe = tokio::spawn(async move {
                    probe_with_deadline(prober.as_ref(), &host, timeout).await
                });
                let outcome = match probe.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(%host, error = %e, "Probe task failed, marking host offline");
                        ProbeOutcome::Unreachable
                    }
                };

                table.write().await.commit(&host, outcome.into());
                outcome
            });

            tasks.push((host, task));
        }

        for (host, task) in tasks {
            match task.await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    warn!(%host, error = %e, "Refresh task aborted, marking host offline");
                    self.table.write().await.commit(&host, HostStatus::Offline);
                    summary.record(ProbeOutcome::Unreachable);
                }
            }
        }

        info!(
            probed = summary.probed,
            online = summary.online,
            offline = summary.offline,
            "Refresh complete"
        );

        summary
    }

    /// Point-in-time copy of the table, in insertion order
    pub async fn snapshot(&self) -> Vec<HostEntry> {
        self.table.read().await.entries.clone()
    }

    /// Current status of one host, `None` if it is not tracked
    pub async fn status(&self, host: &Host) -> Option<HostStatus> {
        let table = self.table.read().await;
        table
            .index
            .get(host)
            .map(|&slot| table.entries[slot].status)
    }

    /// Get the number of tracked hosts
    pub async fn len(&self) -> usize {
        self.table.read().await.entries.len()
    }

    /// Check if no hosts are tracked
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.entries.is_empty()
    }

    /// Per-host probe timeout used by refresh cycles
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }
}

/// Run one probe, bounded by `timeout` plus [`PROBE_GRACE`]
async fn probe_with_deadline(prober: &dyn Prober, host: &Host, timeout: Duration) -> ProbeOutcome {
    match tokio::time::timeout(timeout + PROBE_GRACE, prober.probe(host, timeout)).await {
        Ok(outcome) => {
            debug!(%host, ?outcome, "Probe finished");
            outcome
        }
        Err(_) => {
            warn!(
                %host,
                timeout_ms = timeout.as_millis() as u64,
                prober = prober.prober_name(),
                "Probe exceeded its deadline"
            );
            ProbeOutcome::Unreachable
        }
    }
}
