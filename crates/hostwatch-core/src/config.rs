//! Configuration types for the hostwatch system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main hostwatch configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Prober configuration
    #[serde(default)]
    pub prober: ProberConfig,

    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Addresses to track at startup
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl WatchConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    ///
    /// Startup host addresses are not checked here; they go through
    /// [`crate::HostRegistry::add_host`] and are rejected individually.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.prober.validate()?;
        self.registry.validate()?;
        Ok(())
    }
}

/// Prober configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProberConfig {
    /// Run the platform `ping` utility once per host
    System {
        /// Program to execute
        #[serde(default = "default_ping_program")]
        program: String,
    },

    /// Send ICMP echo requests from an ICMP socket
    Icmp {
        /// Echo payload size in bytes
        #[serde(default = "default_payload_size")]
        payload_size: usize,
    },

    /// Custom prober
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProberConfig {
    /// Validate the prober configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProberConfig::System { program } => {
                if program.trim().is_empty() {
                    return Err(crate::Error::config("Ping program cannot be empty"));
                }
                Ok(())
            }
            ProberConfig::Icmp { payload_size } => {
                if *payload_size > MAX_PAYLOAD_SIZE {
                    return Err(crate::Error::config(format!(
                        "ICMP payload size must be <= {} bytes",
                        MAX_PAYLOAD_SIZE
                    )));
                }
                Ok(())
            }
            ProberConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom prober factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom prober config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the prober type name
    pub fn type_name(&self) -> &str {
        match self {
            ProberConfig::System { .. } => "system",
            ProberConfig::Icmp { .. } => "icmp",
            ProberConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProberConfig {
    fn default() -> Self {
        ProberConfig::System {
            program: default_ping_program(),
        }
    }
}

/// Largest echo payload accepted by [`ProberConfig::Icmp`]
pub const MAX_PAYLOAD_SIZE: usize = 1472;

fn default_ping_program() -> String {
    "ping".to_string()
}

fn default_payload_size() -> usize {
    56
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Per-host probe timeout (in milliseconds)
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Maximum number of probes in flight during one refresh
    ///
    /// Every tracked host is still probed; extra probes wait for a slot.
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
}

impl RegistryConfig {
    /// Validate the registry configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.probe_timeout_ms == 0 {
            return Err(crate::Error::config("Probe timeout must be > 0"));
        }
        if self.max_concurrent_probes == 0 {
            return Err(crate::Error::config("Max concurrent probes must be > 0"));
        }
        Ok(())
    }

    /// Per-host probe timeout
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Set the probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the concurrency cap
    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = max;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            max_concurrent_probes: default_max_concurrent_probes(),
        }
    }
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_max_concurrent_probes() -> usize {
    64
}
