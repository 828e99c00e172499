// # System Ping Prober
//
// This crate provides a prober that runs the platform `ping` utility once
// per host, sending a single echo request.
//
// ## Purpose
//
// The default prober: it needs no extra privileges, because the system
// `ping` binary already carries whatever capability the platform requires
// to send ICMP.
//
// ## Outcome Rules
//
// A probe is `Reachable` only if `ping` exits successfully AND its output
// mentions neither "unreachable" nor 100% packet loss. Windows `ping`
// exits 0 on "Destination host unreachable", hence the output check.
// Everything else (non-zero exit, missing binary, timeout) is `Unreachable`.

use hostwatch_core::config::ProberConfig;
use hostwatch_core::{Error, Host, ProbeOutcome, Prober, ProberCatalog, ProberFactory, Result};

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Name this prober registers under
pub const PROBER_NAME: &str = "system";

/// Command-line dialect of the local `ping`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingDialect {
    /// iputils / busybox: `-c COUNT -W SECONDS`
    Linux,
    /// Windows: `-n COUNT -w MILLISECONDS`
    Windows,
    /// BSD / macOS: `-c COUNT`, timeout enforced by the caller only
    Bsd,
}

impl PingDialect {
    /// Dialect of the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            PingDialect::Windows
        } else if cfg!(target_os = "linux") {
            PingDialect::Linux
        } else {
            PingDialect::Bsd
        }
    }

    /// Arguments for a single-packet ping of `host`
    pub fn args(&self, host: &Host, timeout: Duration) -> Vec<String> {
        let target = host.canonical();
        match self {
            PingDialect::Linux => {
                // -W takes whole seconds; round up so we never undercut the timeout
                let secs = timeout.as_millis().div_ceil(1000).max(1);
                vec![
                    "-c".to_string(),
                    "1".to_string(),
                    "-W".to_string(),
                    secs.to_string(),
                    target,
                ]
            }
            PingDialect::Windows => {
                let millis = timeout.as_millis().max(1);
                vec![
                    "-n".to_string(),
                    "1".to_string(),
                    "-w".to_string(),
                    millis.to_string(),
                    target,
                ]
            }
            PingDialect::Bsd => vec!["-c".to_string(), "1".to_string(), target],
        }
    }
}

/// Decide the outcome from the exit status and combined output of `ping`
pub fn classify(exit_success: bool, output: &str) -> ProbeOutcome {
    if !exit_success {
        return ProbeOutcome::Unreachable;
    }

    let output = output.to_lowercase();
    if output.contains("unreachable")
        || output.contains("100% packet loss")
        || output.contains("100% loss")
    {
        return ProbeOutcome::Unreachable;
    }

    ProbeOutcome::Reachable
}

/// Prober that shells out to the platform `ping`
#[derive(Debug, Clone)]
pub struct SystemPingProber {
    /// Program to execute
    program: String,

    /// Argument dialect
    dialect: PingDialect,
}

impl SystemPingProber {
    /// Create a prober running `ping` from `PATH`
    pub fn new() -> Self {
        Self::with_program("ping")
    }

    /// Create a prober running a specific program
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            dialect: PingDialect::current(),
        }
    }
}

impl Default for SystemPingProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Prober for SystemPingProber {
    async fn probe(&self, host: &Host, timeout: Duration) -> ProbeOutcome {
        let mut command = Command::new(&self.program);
        command
            .args(self.dialect.args(host, timeout))
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(%host, program = %self.program, error = %e, "Failed to run ping");
                return ProbeOutcome::Unreachable;
            }
            Err(_) => {
                debug!(%host, timeout_ms = timeout.as_millis() as u64, "Ping timed out");
                return ProbeOutcome::Unreachable;
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let outcome = classify(output.status.success(), &text);
        debug!(%host, status = ?output.status.code(), ?outcome, "Ping finished");
        outcome
    }

    fn prober_name(&self) -> &'static str {
        PROBER_NAME
    }
}

/// Factory for creating system ping probers
pub struct SystemPingFactory;

impl ProberFactory for SystemPingFactory {
    fn create(&self, config: &ProberConfig) -> Result<Arc<dyn Prober>> {
        match config {
            ProberConfig::System { program } => {
                Ok(Arc::new(SystemPingProber::with_program(program.clone())))
            }
            _ => Err(Error::config("Invalid config for system ping prober")),
        }
    }
}

/// Register the system ping prober with a catalog
pub fn register(catalog: &ProberCatalog) {
    catalog.register_prober(PROBER_NAME, Box::new(SystemPingFactory));
}
