//! ProposalWriter - client proposals from a short form
//!
//! A freelancer fills in who the client is, what the project is, the
//! deliverables, timeline and price. ProposalWriter turns that into a prompt,
//! asks the model for seven proposal sections as JSON, and hands back a
//! draft proposal that can be previewed as Markdown.
//!
//! # Modules
//!
//! - [`domain`] - Form input and generated proposal types
//! - [`prompts`] - Prompt assembly and template loading
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`generator`] - Prompt, completion, JSON extraction, proposal
//! - [`render`] - Markdown preview
//! - [`server`] - HTTP API
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod format;
pub mod generator;
pub mod llm;
pub mod prompts;
pub mod render;
pub mod server;

// Re-export commonly used types
pub use config::{Config, GeneratorConfig, LlmConfig, PromptsConfig, ServerConfig};
pub use domain::{GeneratedProposal, PricingType, ProjectType, ProposalInput, ProposalSections, ProposalStatus};
pub use generator::{ExtractionMode, GenerationError, ProposalGenerator};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use prompts::{Prompt, PromptBuilder};
pub use render::PreviewRenderer;
pub use server::{ApiError, AppState, InnerAppState};
