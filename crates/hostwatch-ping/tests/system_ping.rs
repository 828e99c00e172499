//! Integration tests for the system ping prober
//!
//! The `true`/`false` stand-ins and a stalled shell script exercise the
//! process plumbing without network access. Tests that need a real `ping`
//! and network are ignored by default; run them with
//! `cargo test -- --ignored`.

use hostwatch_core::{Host, HostRegistry, HostStatus, ProbeOutcome, Prober, RegistryConfig};
use hostwatch_ping::SystemPingProber;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

fn host(addr: &str) -> Host {
    Host::parse(addr).unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn zero_exit_with_clean_output_is_reachable() {
    let prober = SystemPingProber::with_program("true");
    let outcome = prober.probe(&host("192.0.2.1"), Duration::from_secs(1)).await;
    assert_eq!(outcome, ProbeOutcome::Reachable);
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_is_unreachable() {
    let prober = SystemPingProber::with_program("false");
    let outcome = prober.probe(&host("192.0.2.1"), Duration::from_secs(1)).await;
    assert_eq!(outcome, ProbeOutcome::Unreachable);
}

#[cfg(unix)]
#[tokio::test]
async fn hung_ping_is_killed_at_timeout() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("stalled-ping");
    std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let prober = SystemPingProber::with_program(script.to_string_lossy());
    let timeout = Duration::from_millis(200);

    let started = std::time::Instant::now();
    let outcome = prober.probe(&host("192.0.2.1"), timeout).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome, ProbeOutcome::Unreachable);
    assert!(elapsed >= timeout, "returned before the timeout: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "waited for the stalled ping: {elapsed:?}");
}

#[tokio::test]
#[ignore = "requires a ping binary and loopback ICMP"]
async fn loopback_is_online() {
    let registry = assert_ok!(HostRegistry::new(
        Arc::new(SystemPingProber::new()),
        RegistryConfig::default(),
    ));

    let loopback = assert_ok!(registry.add_host("127.0.0.1").await);
    registry.refresh_all().await;

    let snapshot = registry.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].host, loopback);
    assert_eq!(snapshot[0].status, HostStatus::Online);
}

#[tokio::test]
#[ignore = "requires a ping binary"]
async fn documentation_address_is_offline() {
    let registry = assert_ok!(HostRegistry::new(
        Arc::new(SystemPingProber::new()),
        RegistryConfig::default().with_probe_timeout(Duration::from_secs(1)),
    ));

    assert_ok!(registry.add_host("127.0.0.1").await);
    let test_net = assert_ok!(registry.add_host("203.0.113.1").await);
    registry.refresh_all().await;

    assert_eq!(registry.status(&test_net).await, Some(HostStatus::Offline));
}
