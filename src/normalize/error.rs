//! Error types for response normalization.

use thiserror::Error;

/// Why a backend body could not be turned into a unified result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The body does not have the shape this backend family produces
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The backend answered with `success: false`
    #[error("{0}")]
    BackendFailure(String),

    /// No extraction rule is registered for the backend id
    #[error("no normalizer registered for backend '{0}'")]
    NoStrategy(String),
}

impl NormalizeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        NormalizeError::Malformed(message.into())
    }
}
