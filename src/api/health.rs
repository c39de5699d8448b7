//! Health check endpoint handler.

use crate::api::AppState;
use crate::health::{HealthStatus, HealthSummary, OverallStatus};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: OverallStatus,
    pub orchestrator: OrchestratorInfo,
    pub backends: Vec<BackendHealthView>,
    pub summary: HealthSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorInfo {
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Latest published snapshot for one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealthView {
    pub id: String,
    pub name: String,
    pub status: HealthStatus,
    pub consecutive_successes: u32,
    pub consecutive_failures: u32,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_latency_ms: Option<u32>,
}

/// GET /health - Return orchestrator and backend health.
///
/// Reads published snapshots only.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.health.snapshot(&state.registry);
    let summary = HealthSummary::from_states(snapshot.iter().map(|(_, s)| s));

    let backends = state
        .registry
        .list()
        .iter()
        .zip(snapshot)
        .map(|(backend, (_, health))| BackendHealthView {
            id: backend.id.clone(),
            name: backend.display_name.clone(),
            status: health.status,
            consecutive_successes: health.consecutive_successes,
            consecutive_failures: health.consecutive_failures,
            last_checked_at: health.last_checked_at,
            last_error: health.last_error,
            last_latency_ms: health.last_latency_ms,
        })
        .collect();

    Json(HealthResponse {
        status: summary.status,
        orchestrator: OrchestratorInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            timestamp: Utc::now(),
        },
        backends,
        summary,
    })
}
