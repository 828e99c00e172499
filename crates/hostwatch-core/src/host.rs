//! Tracked host identity and status values

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated network address
///
/// Identity is the canonical textual form produced by [`IpAddr`]'s
/// `Display` (compressed lowercase IPv6, dotted-quad IPv4), so two inputs
/// that spell the same address differently map to the same `Host`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(IpAddr);

impl Host {
    /// Parse an IPv4 or IPv6 literal
    ///
    /// Surrounding whitespace is ignored. Hostnames, CIDR ranges, ports
    /// and zone suffixes are rejected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hostwatch_core::Host;
    ///
    /// let a = Host::parse("0:0:0:0:0:0:0:1").unwrap();
    /// let b = Host::parse("::1").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.to_string(), "::1");
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        input
            .trim()
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| Error::invalid_address(input))
    }

    /// The underlying address
    pub fn addr(&self) -> IpAddr {
        self.0
    }

    /// Canonical string form used as the registry key
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }
}

impl From<IpAddr> for Host {
    fn from(addr: IpAddr) -> Self {
        Self(addr)
    }
}

impl FromStr for Host {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Last known reachability of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    /// Tracked but never probed
    #[default]
    Unknown,
    /// Last probe succeeded
    Online,
    /// Last probe failed, errored or timed out
    Offline,
}

impl HostStatus {
    /// Upper-case label used by the status table
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Unknown => "UNKNOWN",
            HostStatus::Online => "ONLINE",
            HostStatus::Offline => "OFFLINE",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a registry snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// The tracked host
    pub host: Host,
    /// Status committed by the latest refresh
    pub status: HostStatus,
    /// When the latest probe result was committed (`None` while unknown)
    pub checked_at: Option<DateTime<Utc>>,
}

impl HostEntry {
    pub(crate) fn new(host: Host) -> Self {
        Self {
            host,
            status: HostStatus::Unknown,
            checked_at: None,
        }
    }
}
