//! Test doubles and common utilities for registry contract tests
//!
//! These probers never touch the network; each host's behaviour is
//! scripted up front and every call is counted.

#![allow(dead_code)]

use hostwatch_core::{Host, HostRegistry, ProbeOutcome, Prober, RegistryConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted prober does for one host
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// Answer after the prober's delay
    Answer(ProbeOutcome),
    /// Never answer on its own (ignores its timeout)
    Hang,
    /// Panic inside the probe after the prober's delay
    Panic,
}

/// A prober whose answers are scripted per host
pub struct ScriptedProber {
    behaviours: Mutex<HashMap<Host, Behaviour>>,
    delay: Duration,
    calls: Mutex<HashMap<Host, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    in_flight_per_host: Mutex<HashMap<Host, usize>>,
    max_in_flight_per_host: AtomicUsize,
}

impl ScriptedProber {
    /// Create a prober that reports every host unreachable
    pub fn new() -> Self {
        Self {
            behaviours: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
            calls: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            in_flight_per_host: Mutex::new(HashMap::new()),
            max_in_flight_per_host: AtomicUsize::new(0),
        }
    }

    /// Make every answer take `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Script the behaviour for `addr`
    pub fn with(self, addr: &str, behaviour: Behaviour) -> Self {
        self.set(addr, behaviour);
        self
    }

    /// Change the behaviour for `addr` after construction
    pub fn set(&self, addr: &str, behaviour: Behaviour) {
        let host = host(addr);
        self.behaviours.lock().unwrap().insert(host, behaviour);
    }

    /// Number of probes sent to `addr`
    pub fn calls(&self, addr: &str) -> usize {
        let host = host(addr);
        self.calls.lock().unwrap().get(&host).copied().unwrap_or(0)
    }

    /// Total probes sent
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Highest number of probes observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of probes observed in flight for one host at once
    pub fn max_in_flight_per_host(&self) -> usize {
        self.max_in_flight_per_host.load(Ordering::SeqCst)
    }

    fn enter(&self, host: &Host) {
        *self.calls.lock().unwrap().entry(*host).or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let mut per_host = self.in_flight_per_host.lock().unwrap();
        let count = per_host.entry(*host).or_insert(0);
        *count += 1;
        self.max_in_flight_per_host.fetch_max(*count, Ordering::SeqCst);
    }

    fn exit(&self, host: &Host) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(count) = self.in_flight_per_host.lock().unwrap().get_mut(host) {
            *count -= 1;
        }
    }
}

/// Decrements in-flight counters even when the probe future is dropped
struct InFlight<'a> {
    prober: &'a ScriptedProber,
    host: Host,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.prober.exit(&self.host);
    }
}

#[async_trait::async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, host: &Host, _timeout: Duration) -> ProbeOutcome {
        self.enter(host);
        let _guard = InFlight {
            prober: self,
            host: *host,
        };

        let behaviour = self
            .behaviours
            .lock()
            .unwrap()
            .get(host)
            .copied()
            .unwrap_or(Behaviour::Answer(ProbeOutcome::Unreachable));

        match behaviour {
            Behaviour::Answer(outcome) => {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                outcome
            }
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                ProbeOutcome::Reachable
            }
            Behaviour::Panic => {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                panic!("scripted probe panic for {host}")
            }
        }
    }

    fn prober_name(&self) -> &'static str {
        "scripted"
    }
}

/// Parse a test address
pub fn host(addr: &str) -> Host {
    Host::parse(addr).expect("test address is valid")
}

/// Registry config with a short timeout for tests
pub fn fast_config() -> RegistryConfig {
    RegistryConfig::default().with_probe_timeout(Duration::from_millis(100))
}

/// Build a registry around a shared scripted prober
pub fn registry_with(prober: &Arc<ScriptedProber>, config: RegistryConfig) -> HostRegistry {
    HostRegistry::new(Arc::clone(prober) as Arc<dyn Prober>, config)
        .expect("registry construction succeeds")
}
