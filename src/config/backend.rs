//! Backend configuration

use crate::registry::{BackendDescriptor, BackendFamily, Capability};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `[[backends]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub id: String,
    /// Display name; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    pub family: BackendFamily,
    /// Accepted upload kinds; defaults to image and pdf
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

fn default_capabilities() -> Vec<Capability> {
    Capability::ALL.to_vec()
}

impl BackendConfig {
    pub fn new(id: impl Into<String>, url: impl Into<String>, family: BackendFamily) -> Self {
        Self {
            id: id.into(),
            name: None,
            url: url.into(),
            family,
            capabilities: default_capabilities(),
            health_path: None,
            image_path: None,
            pdf_path: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build the registry descriptor for this entry.
    pub fn to_descriptor(&self) -> BackendDescriptor {
        let display_name = self.name.clone().unwrap_or_else(|| self.id.clone());
        let mut descriptor =
            BackendDescriptor::new(&self.id, display_name, &self.url, self.family)
                .with_capabilities(self.capabilities.clone());

        if let Some(path) = &self.health_path {
            descriptor.health_path = path.clone();
        }
        if let Some(path) = &self.image_path {
            descriptor.image_path = path.clone();
        }
        if let Some(path) = &self.pdf_path {
            descriptor.pdf_path = path.clone();
        }
        descriptor.metadata = self.metadata.clone();
        descriptor
    }
}

/// The two backends of the reference deployment, one per GPU.
pub fn default_backends() -> Vec<BackendConfig> {
    let deepseek = BackendConfig::new("deepseek-ocr", "http://localhost:5000", BackendFamily::DeepSeek)
        .with_name("DeepSeek OCR")
        .with_metadata("description", "DeepSeek OCR Backend")
        .with_metadata("gpu", "RTX 3090 #1");
    let mineru = BackendConfig::new("mineru", "http://localhost:5001", BackendFamily::Mineru)
        .with_name("Mineru")
        .with_metadata("description", "Mineru Backend")
        .with_metadata("gpu", "RTX 3090 #2");

    vec![deepseek, mineru]
}
