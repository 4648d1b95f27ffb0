//! Template loading
//!
//! Loads a template from an override file or falls back to the embedded default.

use std::path::Path;

use eyre::{Result, eyre};
use tracing::{debug, info};

use super::embedded;

/// Load a template by name
///
/// Checks in order:
/// 1. Override file, when configured
/// 2. Embedded fallback
///
/// A configured override that can't be read is an error rather than a silent
/// fallback, so a typo in the config is noticed at startup.
pub fn load_template(name: &str, override_path: Option<&Path>) -> Result<String> {
    debug!(%name, ?override_path, "load_template: called");
    if let Some(path) = override_path {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read {} template override {}: {}", name, path.display(), e))?;
        info!("Using {} template override from {}", name, path.display());
        return Ok(content);
    }

    embedded::get_embedded(name)
        .map(str::to_string)
        .ok_or_else(|| eyre!("Prompt template not found: {}", name))
}
