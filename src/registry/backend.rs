use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of upload a backend can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Single raster image (png, jpeg, ...)
    Image,
    /// Multi-page PDF document
    Pdf,
}

impl Capability {
    /// All capabilities, in display order.
    pub const ALL: [Capability; 2] = [Capability::Image, Capability::Pdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Image => "image",
            Capability::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend family, indicating the native response shape.
///
/// Each family has its own normalization rule in [`crate::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFamily {
    /// DeepSeek-OCR: free text with grounding markers (image) or per-page text (PDF)
    DeepSeek,
    /// Mineru: structured pipeline JSON
    Mineru,
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFamily::DeepSeek => f.write_str("deepseek"),
            BackendFamily::Mineru => f.write_str("mineru"),
        }
    }
}

/// An OCR backend known to the orchestrator.
///
/// Built once at startup from static configuration and never mutated.
/// Live health lives in [`crate::health::HealthTable`], keyed by `id`.
///
/// # Examples
///
/// ```
/// use ocr_router::registry::{BackendDescriptor, BackendFamily, Capability};
///
/// let backend = BackendDescriptor::new(
///     "deepseek-ocr",
///     "DeepSeek OCR",
///     "http://localhost:5000/",
///     BackendFamily::DeepSeek,
/// );
/// assert_eq!(backend.base_url, "http://localhost:5000");
/// assert!(backend.supports(Capability::Pdf));
/// assert_eq!(backend.health_url(), "http://localhost:5000/health");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Unique key used by clients in the `backend` form field
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Native response family
    pub family: BackendFamily,
    /// Upload kinds this backend accepts
    pub capabilities: Vec<Capability>,
    /// Liveness endpoint path
    pub health_path: String,
    /// Image OCR endpoint path
    pub image_path: String,
    /// PDF OCR endpoint path
    pub pdf_path: String,
    /// Free-form metadata (GPU assignment, description, ...)
    pub metadata: HashMap<String, String>,
}

impl BackendDescriptor {
    /// Create a descriptor with both capabilities and the standard endpoint paths.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_url: impl Into<String>,
        family: BackendFamily,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            family,
            capabilities: Capability::ALL.to_vec(),
            health_path: "/health".to_string(),
            image_path: "/ocr/image".to_string(),
            pdf_path: "/ocr/pdf".to_string(),
            metadata: HashMap::new(),
        }
    }

    /// Restrict the capability set.
    pub fn with_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health_path)
    }

    /// OCR endpoint for the given upload kind.
    pub fn ocr_url(&self, capability: Capability) -> String {
        let path = match capability {
            Capability::Image => &self.image_path,
            Capability::Pdf => &self.pdf_path,
        };
        format!("{}{}", self.base_url, path)
    }
}
