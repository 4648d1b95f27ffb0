//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors from one completion request
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// 401/403: the API key is missing, wrong or lacks access
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::ApiError { status: 401 | 403, .. })
    }

    /// How long the API asked us to wait, for rate limits
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> LlmError {
        LlmError::ApiError {
            status,
            message: "body".to_string(),
        }
    }

    #[test]
    fn test_rate_limit() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(42),
        };
        assert!(err.is_rate_limit());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));

        assert!(!api(500).is_rate_limit());
        assert_eq!(api(500).retry_after(), None);
    }

    #[test]
    fn test_is_auth() {
        assert!(api(401).is_auth());
        assert!(api(403).is_auth());
        assert!(!api(400).is_auth());
        assert!(!LlmError::Timeout(Duration::from_secs(1)).is_auth());
    }

    #[test]
    fn test_display_includes_status_and_body() {
        let msg = api(529).to_string();
        assert!(msg.contains("529"));
        assert!(msg.contains("body"));
    }
}
