//! Backend Registry module.
//!
//! Holds the static, ordered set of OCR backends the orchestrator routes to.
//! The registry is built once from configuration and is read-only afterwards,
//! so it is shared as a plain `Arc<Registry>` without interior locking.

mod backend;
mod error;
#[cfg(test)]
mod tests;

pub use backend::*;
pub use error::*;

use crate::routing::is_compare_sentinel;
use std::collections::HashMap;

/// The Backend Registry stores all known OCR backends in declaration order.
///
/// # Examples
///
/// ```
/// use ocr_router::registry::{BackendDescriptor, BackendFamily, Registry};
///
/// let registry = Registry::from_descriptors(vec![
///     BackendDescriptor::new("deepseek-ocr", "DeepSeek OCR", "http://localhost:5000", BackendFamily::DeepSeek),
///     BackendDescriptor::new("mineru", "Mineru", "http://localhost:5001", BackendFamily::Mineru),
/// ])
/// .unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.list()[0].id, "deepseek-ocr");
/// assert!(registry.get("tesseract").is_err());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    backends: Vec<BackendDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateBackend` if two descriptors share an id,
    /// and `RegistryError::ReservedId` if an id is a compare-mode selector.
    pub fn from_descriptors(descriptors: Vec<BackendDescriptor>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.add_backend(descriptor)?;
        }
        Ok(registry)
    }

    /// Append a backend. Only used while building the registry.
    fn add_backend(&mut self, backend: BackendDescriptor) -> Result<(), RegistryError> {
        if is_compare_sentinel(&backend.id) {
            return Err(RegistryError::ReservedId(backend.id));
        }
        if self.index.contains_key(&backend.id) {
            return Err(RegistryError::DuplicateBackend(backend.id));
        }

        self.index.insert(backend.id.clone(), self.backends.len());
        self.backends.push(backend);
        Ok(())
    }

    /// All backends in declaration order. Drives compare-mode fan-out.
    pub fn list(&self) -> &[BackendDescriptor] {
        &self.backends
    }

    /// Look up a backend by id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownBackend` if no backend has the given id.
    pub fn get(&self, id: &str) -> Result<&BackendDescriptor, RegistryError> {
        self.index
            .get(id)
            .map(|&i| &self.backends[i])
            .ok_or_else(|| RegistryError::UnknownBackend(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Backend ids in declaration order.
    pub fn ids(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
