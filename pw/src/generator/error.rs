//! Generation error types

use thiserror::Error;

use crate::llm::LlmError;

/// Why a proposal could not be generated
///
/// Every failure of [`super::ProposalGenerator::generate`] is exactly one of
/// these; no partial proposal is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("upstream call failed: {0}")]
    UpstreamCallFailed(#[from] LlmError),

    #[error("response contained no text content")]
    NoTextContent,

    #[error("no JSON object found in response")]
    NoJsonFound,

    #[error("malformed proposal JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
}

impl GenerationError {
    /// Stable tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::UpstreamCallFailed(_) => "upstream_call_failed",
            GenerationError::NoTextContent => "no_text_content",
            GenerationError::NoJsonFound => "no_json_found",
            GenerationError::MalformedJson(_) => "malformed_json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(GenerationError::NoTextContent.kind(), "no_text_content");
        assert_eq!(GenerationError::NoJsonFound.kind(), "no_json_found");

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(GenerationError::MalformedJson(parse_err).kind(), "malformed_json");

        let upstream: GenerationError = LlmError::InvalidResponse("boom".to_string()).into();
        assert_eq!(upstream.kind(), "upstream_call_failed");
        assert!(upstream.to_string().contains("boom"));
    }
}
