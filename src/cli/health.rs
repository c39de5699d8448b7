//! Health command implementation
//!
//! Runs a single probe cycle against the configured backends. With only one
//! observation there is nothing to debounce, so both thresholds are set to 1
//! and every backend ends up Healthy or Unhealthy.

use crate::cli::output::{colored_status, format_health_table, HealthRow};
use crate::cli::HealthArgs;
use crate::health::{HealthCheckConfig, HealthMonitor, HealthSummary, OverallStatus};
use crate::registry::Registry;
use crate::transport::OcrTransport;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthReportOutput {
    pub status: OverallStatus,
    pub version: String,
    pub summary: HealthSummary,
    pub backends: Vec<HealthRow>,
}

/// Format the probe cycle as pretty text
fn format_health_pretty(report: &HealthReportOutput) -> String {
    let mut output = String::new();

    let status_display = match report.status {
        OverallStatus::Healthy => "Healthy".green(),
        OverallStatus::Degraded => "Degraded".yellow(),
        OverallStatus::Unhealthy => "Unhealthy".red(),
    };

    let _ = writeln!(output, "Status: {}", status_display);
    let _ = writeln!(output, "Version: {}", report.version);
    let _ = writeln!(
        output,
        "Backends: {}/{} healthy",
        report.summary.healthy, report.summary.total
    );

    if !report.backends.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", format_health_table(&report.backends));
        for row in report.backends.iter().filter(|r| !r.state.status.is_routable()) {
            let _ = writeln!(
                output,
                "  {} {} will reject OCR requests",
                colored_status(row.state.status),
                row.id
            );
        }
    }

    output
}

/// Handle health command
pub async fn handle_health(
    args: &HealthArgs,
    registry: Arc<Registry>,
    config: &HealthCheckConfig,
    transport: Arc<dyn OcrTransport>,
) -> Result<String, Box<dyn std::error::Error>> {
    let one_shot = HealthCheckConfig {
        failure_threshold: 1,
        recovery_threshold: 1,
        ..config.clone()
    };

    let monitor = HealthMonitor::new(Arc::clone(&registry), one_shot, transport);
    monitor.check_all_backends().await;

    let table = monitor.table();
    let summary = table.summary(&registry);
    let backends = registry
        .list()
        .iter()
        .zip(table.snapshot(&registry))
        .map(|(backend, (id, state))| HealthRow {
            id,
            url: backend.base_url.clone(),
            state,
        })
        .collect();

    let report = HealthReportOutput {
        status: summary.status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        summary,
        backends,
    };

    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(format_health_pretty(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BackendDescriptor, BackendFamily};
    use crate::transport::HttpTransport;
    use std::path::PathBuf;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn health_args(json: bool) -> HealthArgs {
        HealthArgs {
            json,
            config: PathBuf::from("ocr-router.toml"),
        }
    }

    fn transport() -> Arc<dyn OcrTransport> {
        Arc::new(HttpTransport::new(Duration::from_secs(1)).unwrap())
    }

    async fn ready_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "model_loaded": true,
                "gpu_available": true
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_health_single_cycle_reports_degraded() {
        let up = ready_server().await;
        let registry = Arc::new(
            Registry::from_descriptors(vec![
                BackendDescriptor::new("deepseek-ocr", "DeepSeek", up.uri(), BackendFamily::DeepSeek),
                BackendDescriptor::new("mineru", "Mineru", "http://127.0.0.1:1", BackendFamily::Mineru),
            ])
            .unwrap(),
        );

        let output = handle_health(
            &health_args(true),
            registry,
            &HealthCheckConfig::default(),
            transport(),
        )
        .await
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "degraded");
        assert_eq!(parsed["backends"][0]["status"], "healthy");
        assert_eq!(parsed["backends"][1]["status"], "unhealthy");
        assert!(parsed["backends"][1]["last_error"].is_string());
    }

    #[tokio::test]
    async fn test_health_pretty_output() {
        let up = ready_server().await;
        let registry = Arc::new(
            Registry::from_descriptors(vec![BackendDescriptor::new(
                "mineru",
                "Mineru",
                up.uri(),
                BackendFamily::Mineru,
            )])
            .unwrap(),
        );

        let output = handle_health(
            &health_args(false),
            registry,
            &HealthCheckConfig::default(),
            transport(),
        )
        .await
        .unwrap();

        assert!(output.contains("Status:"));
        assert!(output.contains("1/1 healthy"));
    }

    #[tokio::test]
    async fn test_health_empty_registry_is_unhealthy() {
        let output = handle_health(
            &health_args(true),
            Arc::new(Registry::new()),
            &HealthCheckConfig::default(),
            transport(),
        )
        .await
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "unhealthy");
        assert_eq!(parsed["summary"]["total"], 0);
    }
}
