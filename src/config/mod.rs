//! Configuration module for the OCR router
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`OCR_ROUTER_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use ocr_router::config::OrchestratorConfig;
//!
//! let config = OrchestratorConfig::default();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.backends.len(), 2);
//!
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: OrchestratorConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

pub mod backend;
pub mod error;
pub mod logging;
pub mod routing;
pub mod server;

pub use backend::{default_backends, BackendConfig};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use routing::RoutingConfig;
pub use server::ServerConfig;

// Re-export HealthCheckConfig from health module
pub use crate::health::HealthCheckConfig;

use crate::registry::Registry;
use crate::routing::{is_compare_sentinel, COMPARE_ALIASES};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Health monitor configuration
    pub health_check: HealthCheckConfig,
    /// OCR forwarding timeouts
    pub routing: RoutingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Static backend definitions, in routing order
    pub backends: Vec<BackendConfig>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            health_check: HealthCheckConfig::default(),
            routing: RoutingConfig::default(),
            logging: LoggingConfig::default(),
            backends: default_backends(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports OCR_ROUTER_* environment variables for common settings.
    /// Invalid values are silently ignored (the previous value is kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("OCR_ROUTER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("OCR_ROUTER_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("OCR_ROUTER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("OCR_ROUTER_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(health) = std::env::var("OCR_ROUTER_HEALTH_CHECK") {
            self.health_check.enabled = health.to_lowercase() == "true";
        }
        if let Ok(timeout) = std::env::var("OCR_ROUTER_OCR_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.routing.ocr_timeout_seconds = t;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid(
                "server.max_body_bytes",
                "body limit must be non-zero",
            ));
        }

        let hc = &self.health_check;
        for (field, value) in [
            ("health_check.interval_seconds", hc.interval_seconds),
            ("health_check.timeout_seconds", hc.timeout_seconds),
            ("routing.ocr_timeout_seconds", self.routing.ocr_timeout_seconds),
            ("routing.connect_timeout_seconds", self.routing.connect_timeout_seconds),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        for (field, value) in [
            ("health_check.failure_threshold", hc.failure_threshold),
            ("health_check.recovery_threshold", hc.recovery_threshold),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }

        let mut seen = HashSet::new();
        for (i, backend) in self.backends.iter().enumerate() {
            if backend.id.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("backends[{}].id", i),
                    "id cannot be empty",
                ));
            }
            if is_compare_sentinel(&backend.id) {
                return Err(ConfigError::invalid(
                    format!("backends[{}].id", i),
                    format!(
                        "'{}' is reserved for compare mode ({})",
                        backend.id,
                        COMPARE_ALIASES.join(", ")
                    ),
                ));
            }
            if !seen.insert(backend.id.as_str()) {
                return Err(ConfigError::invalid(
                    format!("backends[{}].id", i),
                    format!("duplicate backend id '{}'", backend.id),
                ));
            }
            if backend.url.is_empty() {
                return Err(ConfigError::invalid(
                    format!("backends[{}].url", i),
                    "URL cannot be empty",
                ));
            }
            if !(backend.url.starts_with("http://") || backend.url.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    format!("backends[{}].url", i),
                    "URL must start with http:// or https://",
                ));
            }
            if backend.capabilities.is_empty() {
                return Err(ConfigError::invalid(
                    format!("backends[{}].capabilities", i),
                    "at least one capability is required",
                ));
            }
        }

        Ok(())
    }

    /// Build the backend registry from the `[[backends]]` entries.
    pub fn build_registry(&self) -> Result<Registry, ConfigError> {
        let descriptors = self.backends.iter().map(BackendConfig::to_descriptor).collect();
        Registry::from_descriptors(descriptors)
            .map_err(|e| ConfigError::invalid("backends", e.to_string()))
    }
}
