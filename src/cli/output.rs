//! Output formatting helpers for CLI commands

use crate::health::{HealthState, HealthStatus};
use crate::registry::BackendDescriptor;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for backend display
#[derive(Debug, Clone, serde::Serialize)]
pub struct BackendRow {
    pub id: String,
    pub name: String,
    pub family: String,
    pub url: String,
    pub capabilities: Vec<String>,
    pub gpu: Option<String>,
}

impl From<&BackendDescriptor> for BackendRow {
    fn from(backend: &BackendDescriptor) -> Self {
        Self {
            id: backend.id.clone(),
            name: backend.display_name.clone(),
            family: backend.family.to_string(),
            url: backend.base_url.clone(),
            capabilities: backend
                .capabilities
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            gpu: backend.metadata.get("gpu").cloned(),
        }
    }
}

/// One probed backend, as shown by `ocr-router health`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthRow {
    pub id: String,
    pub url: String,
    #[serde(flatten)]
    pub state: HealthState,
}

/// Format backends as a table
pub fn format_backends_table(backends: &[BackendRow]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Family", "URL", "Accepts", "GPU"]);

    for b in backends {
        table.add_row(vec![
            Cell::new(&b.id),
            Cell::new(&b.name),
            Cell::new(&b.family),
            Cell::new(&b.url),
            Cell::new(b.capabilities.join(", ")),
            Cell::new(b.gpu.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}

/// Format backends as JSON
pub fn format_backends_json(backends: &[BackendRow]) -> String {
    serde_json::to_string_pretty(&json!({ "backends": backends })).unwrap_or_default()
}

/// Format probe results as a table
pub fn format_health_table(rows: &[HealthRow]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Backend", "URL", "Status", "Latency", "Error"]);

    for row in rows {
        let latency = row
            .state
            .last_latency_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(status_icon(row.state.status)),
            Cell::new(&row.id),
            Cell::new(&row.url),
            Cell::new(colored_status(row.state.status)),
            Cell::new(latency),
            Cell::new(row.state.last_error.as_deref().unwrap_or("")),
        ]);
    }

    table.to_string()
}

/// Status label colored for terminals.
pub fn colored_status(status: HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "Healthy".green().to_string(),
        HealthStatus::Degraded => "Degraded".yellow().to_string(),
        HealthStatus::Unhealthy => "Unhealthy".red().to_string(),
        HealthStatus::Unknown => "Unknown".dimmed().to_string(),
    }
}

/// Get status icon for backend health
pub fn status_icon(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "✓",
        HealthStatus::Degraded => "~",
        HealthStatus::Unhealthy => "✗",
        HealthStatus::Unknown => "?",
    }
}
