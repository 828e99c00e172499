//! Core traits for the hostwatch system
//!
//! This module defines the abstract interfaces that probe implementations must follow.
//!
//! - [`Prober`]: Check whether a single host answers a liveness probe

pub mod prober;

pub use prober::{ProbeOutcome, Prober, ProberFactory};
