//! Embedded prompts
//!
//! These are compiled into the binary from files under `prompts/`.

use tracing::debug;

/// Persona and style directive sent on the system channel
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Markdown preview template (Handlebars)
pub const PREVIEW: &str = include_str!("../../prompts/preview.hbs");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "preview" => Some(PREVIEW),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_system() {
        let system = get_embedded("system").unwrap();
        assert!(system.contains("expert business proposal writer"));
        assert!(system.contains("not salesy") || system.contains("never salesy"));
        assert!(system.contains("client benefits and outcomes"));
        assert!(system.contains("Address the client by name"));
        assert!(system.contains("ROI"));
        assert!(system.contains("concrete timelines"));
        assert!(system.contains("call to action"));
    }

    #[test]
    fn test_get_embedded_preview() {
        let preview = get_embedded("preview").unwrap();
        assert!(preview.contains("{{executive_summary}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
