//! Configuration for health checking.

use serde::{Deserialize, Serialize};

/// Configuration for backend health checking.
///
/// Thresholds are operational tuning values, not protocol constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Whether the background monitor runs at all
    pub enabled: bool,
    /// Seconds between probe cycles
    pub interval_seconds: u64,
    /// Timeout for each liveness request
    pub timeout_seconds: u64,
    /// Consecutive failures before marking unhealthy
    pub failure_threshold: u32,
    /// Consecutive successes before marking healthy
    pub recovery_threshold: u32,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 30,
            timeout_seconds: 10,
            failure_threshold: 3,
            recovery_threshold: 2,
        }
    }
}
