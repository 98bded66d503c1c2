//! Probe executor tests against local mock backends.

use std::time::{Duration, Instant};

use url_probe_exporter::lifecycle::Shutdown;
use url_probe_exporter::probe::{ProbeError, Target};

mod common;

fn target(addr: std::net::SocketAddr) -> Target {
    Target::new(format!("http://{}/", addr), Duration::from_secs(5))
}

#[tokio::test]
async fn test_successful_probe_measures_body() {
    let addr = common::start_mock_backend("hello world").await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.code, Some(200));
    let measurement = result.measurement().expect("probe should succeed");
    assert_eq!(measurement.size, 11);
    assert!(measurement.duration > Duration::ZERO);
}

#[tokio::test]
async fn test_empty_body_is_an_error() {
    let addr = common::start_mock_backend("").await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.code, Some(200));
    assert_eq!(result.error(), Some(&ProbeError::EmptyResult));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let addr = common::closed_port().await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.code, None);
    assert!(matches!(result.error(), Some(ProbeError::Transport(_))));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let addr = common::start_programmable_backend(|| async { (302, "moved".to_string()) }).await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.code, Some(302));
    assert_eq!(result.measurement().map(|m| m.size), Some(5));
}

#[tokio::test]
async fn test_empty_redirect_keeps_its_code() {
    let addr = common::start_programmable_backend(|| async { (302, String::new()) }).await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.code, Some(302));
    assert_eq!(result.error(), Some(&ProbeError::EmptyResult));
    assert!(result.measurement().is_none());
}

#[tokio::test]
async fn test_error_status_is_still_a_measurement() {
    let addr = common::start_programmable_backend(|| async { (503, "down".to_string()) }).await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.code, Some(503));
    assert!(result.is_success());
}

#[tokio::test]
async fn test_request_bypasses_caches() {
    let (addr, mut requests) = common::start_recording_backend().await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;
    assert!(result.is_success());

    let head = requests.recv().await.unwrap().to_ascii_lowercase();
    assert!(head.starts_with("get / http/1.1"));
    assert!(head.contains("cache-control: no-cache"));
}

#[tokio::test]
async fn test_stalled_body_times_out() {
    let (addr, _connections) = common::start_stalling_backend().await;
    let executor = common::test_executor(Duration::from_millis(500));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        executor.execute(&target(addr), &mut signal),
    )
    .await
    .expect("client timeout should end the probe");

    assert_eq!(result.code, Some(200));
    assert!(matches!(result.error(), Some(ProbeError::Transport(_))));
}

#[tokio::test]
async fn test_cancel_during_body_read_aborts_promptly() {
    let (addr, mut connections) = common::start_stalling_backend().await;
    let executor = common::test_executor(Duration::from_secs(60));
    let shutdown = Shutdown::new();
    let mut signal = shutdown.subscribe();

    let probe = tokio::spawn({
        let target = target(addr);
        async move { executor.execute(&target, &mut signal).await }
    });

    connections.recv().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let cancelled_at = Instant::now();
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(2), probe)
        .await
        .expect("abort must not wait for the request timeout")
        .unwrap();

    assert!(cancelled_at.elapsed() < Duration::from_secs(2));
    assert_eq!(result.code, Some(200));
    assert_eq!(result.error(), Some(&ProbeError::Abort));
}

#[tokio::test]
async fn test_already_cancelled_probe_never_completes() {
    let addr = common::start_mock_backend("hello").await;
    let executor = common::test_executor(Duration::from_secs(5));
    let shutdown = Shutdown::new();
    shutdown.trigger();
    let mut signal = shutdown.subscribe();

    let result = executor.execute(&target(addr), &mut signal).await;

    assert_eq!(result.error(), Some(&ProbeError::Abort));
}
