//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Implementations hold only configuration and a connection pool, so one
/// instance can be shared across concurrent requests behind an `Arc`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
