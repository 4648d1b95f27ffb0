//! HTTP error mapping

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::generator::GenerationError;

/// Client-facing message for any generation failure
pub const GENERATE_FAILED: &str = "Failed to generate proposal";

/// Client-facing message for an unreadable request body
pub const INVALID_INPUT: &str = "Invalid proposal input";

/// Client-facing message for a preview failure
pub const RENDER_FAILED: &str = "Failed to render proposal";

/// Failure envelope: `{"success": false, "error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
}

/// Error returned by the HTTP handlers
///
/// The cause is logged; clients only see a fixed message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidInput(#[from] JsonRejection),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("render failed: {0}")]
    Render(eyre::Report),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, INVALID_INPUT),
            ApiError::Generation(_) => (StatusCode::INTERNAL_SERVER_ERROR, GENERATE_FAILED),
            ApiError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, RENDER_FAILED),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidInput(rejection) => {
                warn!(error = %rejection, "Rejected request body");
            }
            ApiError::Generation(err) => {
                error!(kind = err.kind(), error = %err, "Proposal generation failed");
            }
            ApiError::Render(err) => {
                error!(error = ?err, "Proposal render failed");
            }
        }

        let (status, message) = self.status_and_message();
        let body = ErrorBody {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}
