//! Per-backend health state tracking.

use super::config::HealthCheckConfig;
use super::error::HealthCheckError;
use super::parser::HealthReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Debounced liveness classification of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Not yet probed enough to decide
    #[default]
    Unknown,
    /// Passing probes
    Healthy,
    /// Failing probes, still below the failure threshold
    Degraded,
    /// Failure threshold reached; requests are rejected
    Unhealthy,
}

impl HealthStatus {
    /// Whether the router may send requests to a backend in this state.
    pub fn is_routable(&self) -> bool {
        !matches!(self, HealthStatus::Unhealthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One full health snapshot for a single backend.
///
/// Snapshots are values: the monitor computes the next one with
/// [`HealthState::apply`] and publishes it whole, so readers never observe a
/// counter that moved without the matching status change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthState {
    pub status: HealthStatus,
    pub consecutive_successes: u32,
    pub consecutive_failures: u32,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_latency_ms: Option<u32>,
}

/// Result of a single liveness probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    /// Backend answered 2xx with a ready report
    Success { latency_ms: u32, report: HealthReport },
    /// Timeout, connection error, non-2xx, malformed or not-ready body
    Failure { error: HealthCheckError },
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success { .. })
    }
}

impl HealthState {
    /// Compute the snapshot that follows `result`.
    ///
    /// Success resets the failure counter and promotes to Healthy once
    /// `recovery_threshold` consecutive successes are seen. Failure resets the
    /// success counter, marks Degraded below `failure_threshold` and Unhealthy
    /// at or above it. An Unhealthy backend stays Unhealthy until it recovers.
    pub fn apply(
        &self,
        result: &ProbeResult,
        config: &HealthCheckConfig,
        now: DateTime<Utc>,
    ) -> HealthState {
        match result {
            ProbeResult::Success { latency_ms, .. } => {
                let successes = self.consecutive_successes.saturating_add(1);
                let status = if successes >= config.recovery_threshold {
                    HealthStatus::Healthy
                } else {
                    self.status
                };

                HealthState {
                    status,
                    consecutive_successes: successes,
                    consecutive_failures: 0,
                    last_checked_at: Some(now),
                    last_error: None,
                    last_latency_ms: Some(*latency_ms),
                }
            }
            ProbeResult::Failure { error } => {
                let failures = self.consecutive_failures.saturating_add(1);
                let status = if failures >= config.failure_threshold
                    || self.status == HealthStatus::Unhealthy
                {
                    HealthStatus::Unhealthy
                } else {
                    HealthStatus::Degraded
                };

                HealthState {
                    status,
                    consecutive_successes: 0,
                    consecutive_failures: failures,
                    last_checked_at: Some(now),
                    last_error: Some(error.to_string()),
                    last_latency_ms: self.last_latency_ms,
                }
            }
        }
    }
}

/// Aggregate status of the whole orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every backend is Healthy
    Healthy,
    /// At least one backend is Healthy
    Degraded,
    /// No backend is Healthy
    Unhealthy,
}

/// Per-status backend counts plus the derived overall status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub status: OverallStatus,
    pub total: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub unhealthy: usize,
    pub unknown: usize,
}

impl HealthSummary {
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a HealthState>) -> Self {
        let (mut healthy, mut degraded, mut unhealthy, mut unknown) = (0, 0, 0, 0);
        for state in states {
            match state.status {
                HealthStatus::Healthy => healthy += 1,
                HealthStatus::Degraded => degraded += 1,
                HealthStatus::Unhealthy => unhealthy += 1,
                HealthStatus::Unknown => unknown += 1,
            }
        }
        let total = healthy + degraded + unhealthy + unknown;

        let status = match (healthy, total) {
            (h, t) if h == t && t > 0 => OverallStatus::Healthy,
            (h, _) if h > 0 => OverallStatus::Degraded,
            _ => OverallStatus::Unhealthy,
        };

        Self {
            status,
            total,
            healthy,
            degraded,
            unhealthy,
            unknown,
        }
    }
}
