// # hostwatch-core
//
// Core library for tracking the reachability of a set of hosts.
//
// ## Architecture Overview
//
// - **Host / HostStatus**: Canonical address identity and last known status
// - **Prober**: Trait for sending one liveness probe to one host
// - **HostRegistry**: Owns the status table and fans probes out on refresh
// - **ProberCatalog**: Plugin-based catalog of prober factories
//
// ## Design Principles
//
// 1. **Failures are data**: A failed or stuck probe becomes `Offline`, never an error
// 2. **Isolated hosts**: One host's probe never delays or breaks another's
// 3. **Serialized refreshes**: Cycles never interleave writes to the same host
// 4. **Library-First**: The interactive binary is a thin layer over this crate

pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use catalog::ProberCatalog;
pub use config::{ProberConfig, RegistryConfig, WatchConfig};
pub use error::{Error, Result};
pub use host::{Host, HostEntry, HostStatus};
pub use registry::{HostRegistry, RefreshSummary};
pub use traits::{ProbeOutcome, Prober, ProberFactory};
