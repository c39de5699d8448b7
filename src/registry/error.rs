/// Errors that can occur during registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("backend already exists: {0}")]
    DuplicateBackend(String),

    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("backend id is reserved: {0}")]
    ReservedId(String),
}
