//! Unit tests for the registry module.

use super::*;

fn deepseek() -> BackendDescriptor {
    BackendDescriptor::new(
        "deepseek-ocr",
        "DeepSeek OCR",
        "http://localhost:5000",
        BackendFamily::DeepSeek,
    )
}

fn mineru() -> BackendDescriptor {
    BackendDescriptor::new("mineru", "Mineru", "http://localhost:5001", BackendFamily::Mineru)
}

// ============================================================================
// BackendDescriptor
// ============================================================================

#[test]
fn test_descriptor_defaults() {
    let backend = deepseek();
    assert_eq!(backend.capabilities, vec![Capability::Image, Capability::Pdf]);
    assert_eq!(backend.health_path, "/health");
    assert!(backend.metadata.is_empty());
}

#[test]
fn test_descriptor_trims_trailing_slash() {
    let backend = BackendDescriptor::new("a", "A", "http://host:5000///", BackendFamily::Mineru);
    assert_eq!(backend.base_url, "http://host:5000");
}

#[test]
fn test_descriptor_urls() {
    let backend = mineru();
    assert_eq!(backend.health_url(), "http://localhost:5001/health");
    assert_eq!(
        backend.ocr_url(Capability::Image),
        "http://localhost:5001/ocr/image"
    );
    assert_eq!(backend.ocr_url(Capability::Pdf), "http://localhost:5001/ocr/pdf");
}

#[test]
fn test_descriptor_with_capabilities() {
    let backend = deepseek().with_capabilities(vec![Capability::Image]);
    assert!(backend.supports(Capability::Image));
    assert!(!backend.supports(Capability::Pdf));
}

#[test]
fn test_descriptor_metadata() {
    let backend = deepseek().with_metadata("gpu", "RTX 3090 #1");
    assert_eq!(backend.metadata.get("gpu").map(String::as_str), Some("RTX 3090 #1"));
}

#[test]
fn test_family_serde() {
    assert_eq!(
        serde_json::to_string(&BackendFamily::DeepSeek).unwrap(),
        "\"deepseek\""
    );
    let family: BackendFamily = serde_json::from_str("\"mineru\"").unwrap();
    assert_eq!(family, BackendFamily::Mineru);
    assert_eq!(BackendFamily::DeepSeek.to_string(), "deepseek");
}

#[test]
fn test_capability_serde() {
    assert_eq!(serde_json::to_string(&Capability::Pdf).unwrap(), "\"pdf\"");
    assert_eq!(Capability::Image.to_string(), "image");
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_empty() {
    let registry = Registry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert!(registry.list().is_empty());
}

#[test]
fn test_registry_preserves_declaration_order() {
    let registry = Registry::from_descriptors(vec![mineru(), deepseek()]).unwrap();
    assert_eq!(registry.ids(), vec!["mineru", "deepseek-ocr"]);
    assert_eq!(registry.list()[1].id, "deepseek-ocr");
}

#[test]
fn test_registry_get() {
    let registry = Registry::from_descriptors(vec![deepseek(), mineru()]).unwrap();
    let backend = registry.get("mineru").unwrap();
    assert_eq!(backend.family, BackendFamily::Mineru);
    assert!(registry.contains("deepseek-ocr"));
}

#[test]
fn test_registry_get_unknown() {
    let registry = Registry::from_descriptors(vec![deepseek()]).unwrap();
    assert_eq!(
        registry.get("tesseract"),
        Err(RegistryError::UnknownBackend("tesseract".to_string()))
    );
}

#[test]
fn test_registry_rejects_duplicate() {
    let result = Registry::from_descriptors(vec![deepseek(), deepseek()]);
    assert!(matches!(result, Err(RegistryError::DuplicateBackend(id)) if id == "deepseek-ocr"));
}

#[test]
fn test_registry_rejects_sentinel_id() {
    for id in ["compare-all", "compare", "all", "Compare-All", "ALL"] {
        let backend =
            BackendDescriptor::new(id, "Bad", "http://localhost:1", BackendFamily::Mineru);
        let result = Registry::from_descriptors(vec![deepseek(), backend]);
        assert!(
            matches!(&result, Err(RegistryError::ReservedId(rejected)) if rejected == id),
            "{id} was accepted"
        );
    }
}

#[test]
fn test_registry_error_display() {
    assert_eq!(
        RegistryError::UnknownBackend("x".to_string()).to_string(),
        "unknown backend: x"
    );
    assert_eq!(
        RegistryError::DuplicateBackend("x".to_string()).to_string(),
        "backend already exists: x"
    );
}
