//! Integration tests for the health monitor against mock HTTP backends.

mod common;

use common::{make_registry, mount_ready_health, ready_health_body, transport};
use ocr_router::health::{
    HealthCheckConfig, HealthCheckError, HealthMonitor, HealthStatus, OverallStatus, ProbeResult,
};
use ocr_router::registry::BackendFamily;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(failure_threshold: u32, recovery_threshold: u32) -> HealthCheckConfig {
    HealthCheckConfig {
        enabled: true,
        interval_seconds: 1,
        timeout_seconds: 1,
        failure_threshold,
        recovery_threshold,
    }
}

#[tokio::test]
async fn test_ready_backend_becomes_healthy_after_recovery_threshold() {
    let server = MockServer::start().await;
    mount_ready_health(&server).await;

    let registry = make_registry(&[("mineru", server.uri().as_str(), BackendFamily::Mineru)]);
    let monitor = HealthMonitor::new(registry, config(3, 2), transport());
    let table = monitor.table();

    let results = monitor.check_all_backends().await;
    assert_eq!(results.len(), 1);
    assert!(results[0].1.is_success());
    assert_eq!(table.current_status("mineru").unwrap().status, HealthStatus::Unknown);

    monitor.check_all_backends().await;
    let state = table.current_status("mineru").unwrap();
    assert_eq!(state.status, HealthStatus::Healthy);
    assert_eq!(state.consecutive_successes, 2);
    assert!(state.last_latency_ms.is_some());
}

#[tokio::test]
async fn test_model_not_loaded_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "model_loaded": false,
            "gpu_available": true
        })))
        .mount(&server)
        .await;

    let registry = make_registry(&[("deepseek-ocr", server.uri().as_str(), BackendFamily::DeepSeek)]);
    let monitor = HealthMonitor::new(registry, config(3, 2), transport());

    let results = monitor.check_all_backends().await;
    match &results[0].1 {
        ProbeResult::Failure { error } => assert!(matches!(error, HealthCheckError::NotReady(_))),
        other => panic!("expected failure, got {:?}", other),
    }
    let state = monitor.table().current_status("deepseek-ocr").unwrap();
    assert_eq!(state.status, HealthStatus::Degraded);
    assert_eq!(state.consecutive_failures, 1);
}

#[tokio::test]
async fn test_failure_threshold_marks_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = make_registry(&[("mineru", server.uri().as_str(), BackendFamily::Mineru)]);
    let monitor = HealthMonitor::new(registry, config(3, 2), transport());
    let table = monitor.table();

    monitor.check_all_backends().await;
    monitor.check_all_backends().await;
    assert_eq!(table.current_status("mineru").unwrap().status, HealthStatus::Degraded);

    monitor.check_all_backends().await;
    let state = table.current_status("mineru").unwrap();
    assert_eq!(state.status, HealthStatus::Unhealthy);
    assert_eq!(state.consecutive_failures, 3);
    assert!(state.last_error.unwrap().contains("500"));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ready_health_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let registry = make_registry(&[("mineru", server.uri().as_str(), BackendFamily::Mineru)]);
    let monitor = HealthMonitor::new(registry, config(1, 1), transport());

    let results = monitor.check_all_backends().await;
    match &results[0].1 {
        ProbeResult::Failure { error } => {
            assert!(matches!(error, HealthCheckError::Timeout(1)), "got {:?}", error)
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(
        monitor.table().current_status("mineru").unwrap().status,
        HealthStatus::Unhealthy
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_connection_failure() {
    let registry = make_registry(&[("mineru", "http://127.0.0.1:1", BackendFamily::Mineru)]);
    let monitor = HealthMonitor::new(registry, config(1, 1), transport());

    let results = monitor.check_all_backends().await;
    assert!(matches!(
        &results[0].1,
        ProbeResult::Failure {
            error: HealthCheckError::ConnectionFailed(_)
        }
    ));
}

#[tokio::test]
async fn test_one_of_two_healthy_is_degraded_overall() {
    let up = MockServer::start().await;
    mount_ready_health(&up).await;

    let registry = make_registry(&[
        ("deepseek-ocr", up.uri().as_str(), BackendFamily::DeepSeek),
        ("mineru", "http://127.0.0.1:1", BackendFamily::Mineru),
    ]);
    let monitor = HealthMonitor::new(Arc::clone(&registry), config(1, 1), transport());
    monitor.check_all_backends().await;

    let summary = monitor.table().summary(&registry);
    assert_eq!(summary.status, OverallStatus::Degraded);
    assert_eq!(summary.healthy, 1);
    assert_eq!(summary.unhealthy, 1);
}

#[tokio::test]
async fn test_background_monitor_publishes_and_stops() {
    let server = MockServer::start().await;
    mount_ready_health(&server).await;

    let registry = make_registry(&[("mineru", server.uri().as_str(), BackendFamily::Mineru)]);
    let monitor = HealthMonitor::new(registry, config(3, 1), transport());
    let table = monitor.table();

    let cancel = CancellationToken::new();
    let handle = monitor.start(cancel.clone());

    // First tick fires immediately
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while table.current_status("mineru").unwrap().status != HealthStatus::Healthy {
        assert!(tokio::time::Instant::now() < deadline, "monitor never published");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    cancel.cancel();
    let stopped = tokio::time::timeout(Duration::from_secs(2), handle).await;
    assert!(stopped.is_ok());
}

#[tokio::test]
async fn test_stalled_backend_does_not_hold_back_others() {
    let stalled = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ready_health_body())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&stalled)
        .await;
    let instant = MockServer::start().await;
    mount_ready_health(&instant).await;

    let registry = make_registry(&[
        ("deepseek-ocr", stalled.uri().as_str(), BackendFamily::DeepSeek),
        ("mineru", instant.uri().as_str(), BackendFamily::Mineru),
    ]);
    let mut slow_probe = config(1, 1);
    slow_probe.timeout_seconds = 3;
    let monitor = HealthMonitor::new(registry, slow_probe, transport());
    let table = monitor.table();

    let (results, mid_cycle) = tokio::join!(monitor.check_all_backends(), async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        (
            table.current_status("mineru").unwrap(),
            table.current_status("deepseek-ocr").unwrap(),
        )
    });

    let (mineru, deepseek) = mid_cycle;
    assert_eq!(mineru.status, HealthStatus::Healthy);
    assert!(mineru.last_checked_at.is_some());
    assert_eq!(deepseek.status, HealthStatus::Unknown);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "deepseek-ocr");
    assert_eq!(
        table.current_status("deepseek-ocr").unwrap().status,
        HealthStatus::Unhealthy
    );
}
