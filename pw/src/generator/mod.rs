//! ProposalGenerator - ProposalInput in, GeneratedProposal out
//!
//! One generation is: assemble the prompt, make one completion request, take
//! the first text block of the reply, cut the JSON object out of it, and parse
//! that into the seven proposal sections. The proposal is only built once all
//! seven parsed cleanly.

mod error;
mod extract;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::domain::{GeneratedProposal, ProposalInput, ProposalSections};
use crate::llm::{CompletionRequest, LlmClient, Message, StopReason};
use crate::prompts::{Prompt, PromptBuilder};

pub use error::GenerationError;
pub use extract::{ExtractionMode, extract_json};

/// Generates proposals through an injected LLM client
///
/// Holds no per-call state; share it behind an `Arc` and call `generate`
/// concurrently.
pub struct ProposalGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptBuilder,
    config: GeneratorConfig,
}

impl ProposalGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptBuilder, config: GeneratorConfig) -> Self {
        debug!(model = %llm.model(), ?config, "ProposalGenerator::new: called");
        Self { llm, prompts, config }
    }

    /// The prompt `generate` would send for this input
    pub fn prompt(&self, input: &ProposalInput) -> Prompt {
        self.prompts.build(input)
    }

    /// Generate a proposal from one input
    pub async fn generate(&self, input: ProposalInput) -> Result<GeneratedProposal, GenerationError> {
        info!(
            client = %input.client_name,
            project = %input.project_name,
            "Generating proposal"
        );
        for warning in input.warnings() {
            warn!(%warning, "generate: input looks inconsistent");
        }

        let prompt = self.prompts.build(&input);
        let request = CompletionRequest {
            system_prompt: prompt.system,
            messages: vec![Message::user(prompt.user)],
            max_tokens: self.config.max_tokens,
        };

        let response = self.llm.complete(request).await.inspect_err(|e| {
            if e.is_auth() {
                warn!("generate: API key rejected, check llm.api-key-env");
            } else if let Some(wait) = e.retry_after() {
                warn!(?wait, "generate: rate limited");
            }
        })?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generate: completion received"
        );
        if response.stop_reason == StopReason::MaxTokens {
            warn!("generate: reply hit max_tokens, JSON may be truncated");
        }

        let text = response.first_text().ok_or(GenerationError::NoTextContent)?;
        let sections = parse_sections(text, self.config.extraction)?;

        let proposal = GeneratedProposal::draft(input, sections);
        info!(
            id = %proposal.id,
            deliverables = proposal.sections.deliverables_list.len(),
            "Generated proposal"
        );
        Ok(proposal)
    }
}

/// Extract and parse the seven sections from the model's reply text
///
/// Keys the model adds beyond the seven are ignored; a missing or null key is
/// malformed output.
pub fn parse_sections(text: &str, mode: ExtractionMode) -> Result<ProposalSections, GenerationError> {
    debug!(text_len = text.len(), ?mode, "parse_sections: called");
    let candidate = extract_json(text, mode).ok_or(GenerationError::NoJsonFound)?;
    serde_json::from_str(candidate).map_err(GenerationError::MalformedJson)
}
