//! Locating the JSON object inside a free-text model reply

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strategy for picking the JSON span out of the reply text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// First `{` through last `}`
    #[default]
    Greedy,
    /// First balanced `{...}` span that parses as a JSON object
    Balanced,
}

/// Extract the candidate JSON document from `text`
///
/// Returns `None` only when the text has no `{` at all. An opening brace with
/// no closing brace after it yields the tail of the text, which then fails to
/// parse rather than being reported as missing.
pub fn extract_json(text: &str, mode: ExtractionMode) -> Option<&str> {
    debug!(text_len = text.len(), ?mode, "extract_json: called");
    match mode {
        ExtractionMode::Greedy => greedy_span(text),
        ExtractionMode::Balanced => balanced_span(text).or_else(|| greedy_span(text)),
    }
}

fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => {
            debug!(start, "greedy_span: no closing brace after first opening brace");
            Some(&text[start..])
        }
    }
}

/// Try each `{` in turn; return the first balanced span that is a JSON object
fn balanced_span(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(end) = matching_brace(text, start) {
            let candidate = &text[start..=end];
            if serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(candidate).is_ok() {
                debug!(start, end, "balanced_span: found object");
                return Some(candidate);
            }
        }
        from = start + 1;
    }
    debug!("balanced_span: no balanced object found");
    None
}

/// Byte index of the `}` closing the `{` at `start`, skipping braces in strings
fn matching_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}
