//! Request handlers

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use super::AppState;
use super::error::ApiError;
use crate::domain::{GeneratedProposal, ProposalInput};

const MARKDOWN: &str = "text/markdown; charset=utf-8";

/// Success envelope for `/api/generate`
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub proposal: GeneratedProposal,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/render", post(render))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<ProposalInput>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(input) = payload?;
    debug!(client = %input.client_name, "generate: request accepted");
    let proposal = state.generator.generate(input).await?;
    Ok(Json(GenerateResponse {
        success: true,
        proposal,
    }))
}

async fn render(
    State(state): State<AppState>,
    payload: Result<Json<GeneratedProposal>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(proposal) = payload?;
    debug!(id = %proposal.id, "render: request accepted");
    let markdown = state.renderer.render(&proposal).map_err(ApiError::Render)?;
    Ok(([(header::CONTENT_TYPE, MARKDOWN)], markdown))
}
