//! Backends command implementation

use crate::cli::output::{format_backends_json, format_backends_table, BackendRow};
use crate::cli::BackendsListArgs;
use crate::registry::{Capability, Registry};

/// Parse capability string to Capability
fn parse_capability(s: &str) -> Result<Capability, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "image" => Ok(Capability::Image),
        "pdf" => Ok(Capability::Pdf),
        _ => Err(format!("Invalid capability: {}. Use: image, pdf", s).into()),
    }
}

/// Handle backends list command
pub fn handle_backends_list(
    args: &BackendsListArgs,
    registry: &Registry,
) -> Result<String, Box<dyn std::error::Error>> {
    let filter = args.capability.as_deref().map(parse_capability).transpose()?;

    let rows: Vec<BackendRow> = registry
        .list()
        .iter()
        .filter(|b| filter.map_or(true, |c| b.supports(c)))
        .map(BackendRow::from)
        .collect();

    if args.json {
        Ok(format_backends_json(&rows))
    } else {
        Ok(format_backends_table(&rows))
    }
}
