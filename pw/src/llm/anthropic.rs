//! Messages API client
//!
//! One `complete` call is one `POST /v1/messages`, plus optional retries on
//! transient statuses when `llm.max-retries` is above zero.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// First retry waits this long; each later retry doubles it
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Upper bound on any single retry wait
const MAX_BACKOFF_MS: u64 = 30_000;

/// Wait before retry number `attempt` (1-based)
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(INITIAL_BACKOFF_MS.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

/// Statuses worth another attempt; 429 is reported, not retried
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504 | 529)
}

/// Client for the Anthropic Messages API
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    max_retries: u32,
    timeout: Duration,
}

impl AnthropicClient {
    /// Client configured from `llm`, with the key read from `llm.api-key-env`
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;
        Self::new(config, api_key)
    }

    /// Create a client with an explicit API key
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            timeout,
        })
    }

    /// JSON body for one Messages request
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "system": request.system_prompt,
            "messages": self.convert_messages(&request.messages),
        })
    }

    /// Messages in wire form
    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        debug!(message_count = %messages.len(), "convert_messages: called");
        messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role,
                    "content": msg.content,
                })
            })
            .collect()
    }

    /// Keep every content block in order; the generator picks the first text block
    fn parse_response(&self, api_response: AnthropicResponse) -> CompletionResponse {
        debug!(
            block_count = %api_response.content.len(),
            stop_reason = ?api_response.stop_reason,
            "parse_response: called"
        );
        CompletionResponse {
            content: api_response.content,
            stop_reason: api_response
                .stop_reason
                .as_deref()
                .map(StopReason::from_anthropic)
                .unwrap_or(StopReason::EndTurn),
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
        }
    }

    /// Map a transport error, separating deadline expiry from other failures
    fn network_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = backoff_delay(attempt);
                warn!(attempt, ?backoff, "complete: retrying after transient error");
                tokio::time::sleep(backoff).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("x-api-key", self.api_key.clone())
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(self.network_error(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                debug!("complete: rate limited (429)");
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            debug!("complete: success");
            let api_response: AnthropicResponse = response.json().await.map_err(|e| self.network_error(e))?;
            return Ok(self.parse_response(api_response));
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(max_tokens: u32) -> AnthropicClient {
        let config = LlmConfig {
            model: "claude-sonnet-4".to_string(),
            base_url: "https://api.anthropic.com/".to_string(),
            max_tokens,
            ..Default::default()
        };
        AnthropicClient::new(&config, "test-key").unwrap()
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = client(8192);

        let request = CompletionRequest {
            system_prompt: "You are helpful".to_string(),
            messages: vec![Message::user("Hello")],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "claude-sonnet-4");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["system"], "You are helpful");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = client(1000);

        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            max_tokens: 5000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client(1000).base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_parse_response_keeps_block_order() {
        let raw = serde_json::json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "thinking", "thinking": "...", "signature": "x" },
                { "type": "text", "text": "Here you go" }
            ],
            "stop_reason": "max_tokens",
            "usage": { "input_tokens": 12, "output_tokens": 34 }
        });
        let api_response: AnthropicResponse = serde_json::from_value(raw).unwrap();

        let response = client(1000).parse_response(api_response);
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.content[0], ContentBlock::Other);
        assert_eq!(response.first_text(), Some("Here you go"));
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
        assert_eq!(response.usage.output_tokens, 34);
    }

    mod http {
        use super::*;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn reply() -> serde_json::Value {
            serde_json::json!({
                "content": [{ "type": "text", "text": "{}" }],
                "stop_reason": "end_turn",
                "usage": { "input_tokens": 1, "output_tokens": 1 }
            })
        }

        fn request() -> CompletionRequest {
            CompletionRequest {
                system_prompt: "sys".to_string(),
                messages: vec![Message::user("hi")],
                max_tokens: 100,
            }
        }

        fn client_for(server: &MockServer, max_retries: u32) -> AnthropicClient {
            let config = LlmConfig {
                base_url: server.uri(),
                max_retries,
                ..Default::default()
            };
            AnthropicClient::new(&config, "test-key").unwrap()
        }

        #[tokio::test]
        async fn test_single_attempt_by_default() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
                .expect(1)
                .mount(&server)
                .await;

            let err = client_for(&server, 0).complete(request()).await.unwrap_err();
            assert!(matches!(err, LlmError::ApiError { status: 503, ref message } if message == "busy"));
        }

        #[tokio::test]
        async fn test_retries_transient_status() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(529))
                .up_to_n_times(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(200).set_body_json(reply()))
                .mount(&server)
                .await;

            let response = client_for(&server, 1).complete(request()).await.unwrap();
            assert_eq!(response.first_text(), Some("{}"));
            assert_eq!(server.received_requests().await.unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_rate_limit_reports_retry_after() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
                .expect(1)
                .mount(&server)
                .await;

            let err = client_for(&server, 3).complete(request()).await.unwrap_err();
            assert!(err.is_rate_limit());
            assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        }

        #[tokio::test]
        async fn test_auth_failure_not_retried() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
                .expect(1)
                .mount(&server)
                .await;

            let err = client_for(&server, 3).complete(request()).await.unwrap_err();
            assert!(err.is_auth());
        }

        #[tokio::test]
        async fn test_unparseable_body_is_an_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
                .mount(&server)
                .await;

            assert!(client_for(&server, 0).complete(request()).await.is_err());
        }
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(5), Duration::from_millis(16_000));
        assert_eq!(backoff_delay(6), Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(529));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(401));
    }
}
