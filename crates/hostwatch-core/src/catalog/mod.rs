//! Plugin-based prober catalog
//!
//! The catalog lets prober crates register themselves by name at startup,
//! so the binary can pick one from configuration without an if-else chain.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hostwatch_core::{ProberCatalog, ProberConfig};
//!
//! let catalog = ProberCatalog::new();
//! hostwatch_ping::register(&catalog);
//!
//! let prober = catalog.create_prober(&ProberConfig::default())?;
//! ```
//!
//! ## Registration
//!
//! Prober crates expose a `register()` function:
//!
//! ```rust,ignore
//! pub fn register(catalog: &ProberCatalog) {
//!     catalog.register_prober("system", Box::new(SystemPingFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ProberConfig;
use crate::error::{Error, Result};
use crate::traits::{Prober, ProberFactory};

/// Name → factory map for probers
///
/// ## Thread Safety
///
/// Uses interior mutability with RwLock, allowing concurrent lookups and
/// exclusive registration.
#[derive(Default)]
pub struct ProberCatalog {
    probers: RwLock<HashMap<String, Box<dyn ProberFactory>>>,
}

impl ProberCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prober factory
    ///
    /// Registering a name twice replaces the earlier factory.
    ///
    /// # Parameters
    ///
    /// - `name`: Prober type name (e.g., "system", "icmp")
    /// - `factory`: Factory object for creating prober instances
    pub fn register_prober(&self, name: impl Into<String>, factory: Box<dyn ProberFactory>) {
        let name = name.into();
        let mut probers = self.probers.write().unwrap_or_else(PoisonError::into_inner);
        probers.insert(name, factory);
    }

    /// Create a prober from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Prober>)`: Created prober instance
    /// - `Err(Error)`: If the prober type is not registered or creation fails
    pub fn create_prober(&self, config: &ProberConfig) -> Result<Arc<dyn Prober>> {
        config.validate()?;

        let prober_type = config.type_name();
        let probers = self.probers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = probers
            .get(prober_type)
            .ok_or_else(|| Error::config(format!("Unknown prober type: {}", prober_type)))?;

        factory.create(config)
    }

    /// List all registered prober types, sorted
    pub fn list_probers(&self) -> Vec<String> {
        let probers = self.probers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = probers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a prober type is registered
    pub fn has_prober(&self, name: &str) -> bool {
        let probers = self.probers.read().unwrap_or_else(PoisonError::into_inner);
        probers.contains_key(name)
    }
}
