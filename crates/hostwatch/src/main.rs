// # hostwatch - Interactive Host Reachability Monitor
//
// A thin interactive layer over hostwatch-core. All tracking and probing
// logic lives in the library; this binary only:
// 1. Reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Registers the built-in probers and builds the registry
// 4. Runs the command loop on stdin/stdout
//
// ## Configuration
//
// - `HOSTWATCH_PROBER`: Prober type (system, icmp). Default: system
// - `HOSTWATCH_PING_PROGRAM`: Program used by the system prober. Default: ping
// - `HOSTWATCH_ICMP_PAYLOAD_SIZE`: Echo payload bytes for the icmp prober. Default: 56
// - `HOSTWATCH_PROBE_TIMEOUT_MS`: Per-host probe timeout (100-60000). Default: 2000
// - `HOSTWATCH_MAX_CONCURRENT_PROBES`: Probes in flight per refresh (1-1024). Default: 64
// - `HOSTWATCH_HOSTS`: Comma-separated addresses to track at startup
// - `HOSTWATCH_LOG_LEVEL`: trace, debug, info, warn, error. Default: warn
//
// Logs go to stderr; the prompt and status table go to stdout.
//
// ## Example
//
// ```bash
// export HOSTWATCH_HOSTS=127.0.0.1,192.168.1.1
// export HOSTWATCH_PROBE_TIMEOUT_MS=1000
//
// hostwatch
// ```

mod console;
mod render;

use anyhow::{Context, Result};
use hostwatch_core::{HostRegistry, ProberCatalog, ProberConfig, RegistryConfig, WatchConfig};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// How long to wait for leftover blocking tasks on exit
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

/// Exit codes for different termination scenarios
///
/// - 0: Clean exit (quit, end of input, Ctrl-C)
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HostwatchExitCode {
    /// Clean exit
    Clean = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<HostwatchExitCode> for ExitCode {
    fn from(code: HostwatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    prober_type: String,
    ping_program: String,
    icmp_payload_size: usize,
    probe_timeout_ms: u64,
    max_concurrent_probes: usize,
    hosts: Vec<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            prober_type: lookup("HOSTWATCH_PROBER").unwrap_or_else(|| "system".to_string()),
            ping_program: lookup("HOSTWATCH_PING_PROGRAM").unwrap_or_else(|| "ping".to_string()),
            icmp_payload_size: parse_or(&lookup, "HOSTWATCH_ICMP_PAYLOAD_SIZE", 56)?,
            probe_timeout_ms: parse_or(&lookup, "HOSTWATCH_PROBE_TIMEOUT_MS", 2000)?,
            max_concurrent_probes: parse_or(&lookup, "HOSTWATCH_MAX_CONCURRENT_PROBES", 64)?,
            hosts: lookup("HOSTWATCH_HOSTS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            log_level: lookup("HOSTWATCH_LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.prober_type.as_str() {
            "system" | "icmp" => {}
            _ => anyhow::bail!(
                "HOSTWATCH_PROBER '{}' is not supported. \
                Supported probers: system, icmp",
                self.prober_type
            ),
        }

        if !(100..=60_000).contains(&self.probe_timeout_ms) {
            anyhow::bail!(
                "HOSTWATCH_PROBE_TIMEOUT_MS must be between 100 and 60000. Got: {}",
                self.probe_timeout_ms
            );
        }

        if !(1..=1024).contains(&self.max_concurrent_probes) {
            anyhow::bail!(
                "HOSTWATCH_MAX_CONCURRENT_PROBES must be between 1 and 1024. Got: {}",
                self.max_concurrent_probes
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "HOSTWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.watch_config()
            .validate()
            .context("Invalid hostwatch configuration")?;

        Ok(())
    }

    /// Translate into the library configuration
    fn watch_config(&self) -> WatchConfig {
        let prober = match self.prober_type.as_str() {
            "icmp" => ProberConfig::Icmp {
                payload_size: self.icmp_payload_size,
            },
            _ => ProberConfig::System {
                program: self.ping_program.clone(),
            },
        };

        WatchConfig {
            prober,
            registry: RegistryConfig {
                probe_timeout_ms: self.probe_timeout_ms,
                max_concurrent_probes: self.max_concurrent_probes,
            },
            hosts: self.hosts.clone(),
        }
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

/// Parse a numeric variable, falling back to `default` when unset
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number. Got: {}", key, value)),
        None => Ok(default),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return HostwatchExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return HostwatchExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostwatchExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostwatchExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run(config).await {
            Ok(code) => code,
            Err(e) => {
                error!("hostwatch error: {:#}", e);
                HostwatchExitCode::RuntimeError
            }
        }
    });

    // A pending stdin read (after Ctrl-C) would otherwise block runtime drop
    rt.shutdown_timeout(SHUTDOWN_TIMEOUT);

    code.into()
}

/// Build the registry and drive the console until the user leaves
async fn run(config: Config) -> Result<HostwatchExitCode> {
    let watch_config = config.watch_config();

    let catalog = ProberCatalog::new();
    register_probers(&catalog);

    let prober = match catalog.create_prober(&watch_config.prober) {
        Ok(prober) => prober,
        Err(e) => {
            error!("Failed to create prober: {}", e);
            return Ok(HostwatchExitCode::ConfigError);
        }
    };
    info!(prober = prober.prober_name(), "Prober ready");

    let registry = HostRegistry::new(prober, watch_config.registry)?;

    let mut stdout = std::io::stdout();
    for addr in &watch_config.hosts {
        if let Err(e) = registry.add_host(addr).await {
            warn!("Skipping startup host: {}", e);
            writeln!(stdout, "{}", e)?;
        }
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());

    tokio::select! {
        reason = console::run(&registry, input, &mut stdout) => {
            let reason = reason?;
            info!(?reason, "Leaving");
        }
        _ = tokio::signal::ctrl_c() => {
            writeln!(std::io::stdout())?;
            info!("Interrupted");
        }
    }

    Ok(HostwatchExitCode::Clean)
}

/// Register the probers compiled into this binary
fn register_probers(catalog: &ProberCatalog) {
    #[cfg(feature = "system")]
    hostwatch_ping::register(catalog);

    #[cfg(feature = "icmp")]
    hostwatch_icmp::register(catalog);

    info!(probers = ?catalog.list_probers(), "Probers registered");
}
