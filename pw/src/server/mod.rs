//! HTTP surface
//!
//! `POST /api/generate`, `POST /api/render` and `GET /api/health` over axum.
//! Handlers share one [`ProposalGenerator`] and one [`PreviewRenderer`]; a
//! request never touches another request's data.

pub mod error;
mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::generator::ProposalGenerator;
use crate::render::PreviewRenderer;

pub use error::ApiError;
pub use routes::GenerateResponse;

pub struct InnerAppState {
    pub generator: ProposalGenerator,
    pub renderer: PreviewRenderer,
}

pub type AppState = Arc<InnerAppState>;

/// Build the application router with CORS and request tracing
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = build_cors_layer(config)?;
    Ok(routes::routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// CORS for the browser form; an empty origin list allows any origin
pub fn build_cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    debug!(origins = ?config.cors_origins, "build_cors_layer: called");
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    if config.cors_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>().context(format!("Invalid CORS origin '{}'", o)))
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}

/// Serve until ctrl-c
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!(%addr, "Proposal server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Proposal server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_any_origin_by_default() {
        assert!(build_cors_layer(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_cors_explicit_origins() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        assert!(build_cors_layer(&config).is_ok());
    }

    #[test]
    fn test_cors_invalid_origin() {
        let config = ServerConfig {
            cors_origins: vec!["bad\norigin".to_string()],
            ..Default::default()
        };
        let err = build_cors_layer(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }
}
