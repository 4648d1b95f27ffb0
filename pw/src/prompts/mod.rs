//! Prompt assembly
//!
//! Turns a [`ProposalInput`] into the system directive and user prompt sent to
//! the model. Assembly is a pure function of the input: the same input always
//! yields byte-identical prompt text.
//!
//! The persona directive can be replaced with a file (`prompts.system-file`);
//! otherwise the embedded `prompts/system.pmt` is used.

pub mod embedded;
mod loader;

use eyre::Result;
use tracing::debug;

use crate::config::PromptsConfig;
use crate::domain::{ProposalInput, ProposalSections};
use crate::format;

pub use loader::load_template;

/// Opening line of every user prompt
const REQUEST_PREAMBLE: &str = "Generate a professional client proposal based on the following information:";

/// Description of each JSON key, in [`ProposalSections::KEYS`] order
const SECTION_GUIDANCE: [&str; 7] = [
    "A compelling 2-3 paragraph executive summary that hooks the client",
    "Detailed scope of work section (3-4 paragraphs)",
    "Array of specific, detailed deliverables",
    "Timeline section with phases and milestones",
    "Professional pricing/investment section",
    "Standard terms and conditions",
    "Clear next steps and call to action",
];

/// Assembled prompt, ready for one completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Persona/style directive (system channel)
    pub system: String,
    /// Serialized input plus output schema (user channel)
    pub user: String,
}

/// Builds prompts from proposal inputs
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    /// Builder using the embedded persona directive
    pub fn new() -> Self {
        Self::with_system(embedded::SYSTEM)
    }

    /// Builder using a custom persona directive
    pub fn with_system(system: impl Into<String>) -> Self {
        Self {
            system: system.into().trim_end().to_string(),
        }
    }

    /// Builder honoring `prompts.system-file`
    pub fn from_config(config: &PromptsConfig) -> Result<Self> {
        debug!(?config.system_file, "PromptBuilder::from_config: called");
        let system = load_template("system", config.system_file.as_deref())?;
        Ok(Self::with_system(system))
    }

    /// The persona directive this builder sends
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Assemble the prompt for one input
    pub fn build(&self, input: &ProposalInput) -> Prompt {
        debug!(
            project = %input.project_name,
            deliverable_count = input.deliverables.len(),
            "PromptBuilder::build: called"
        );
        Prompt {
            system: self.system.clone(),
            user: render_request(input),
        }
    }
}

/// Render the user prompt: labeled input sections, then the output schema
fn render_request(input: &ProposalInput) -> String {
    let mut prompt = String::new();

    push_line(&mut prompt, REQUEST_PREAMBLE);
    prompt.push('\n');

    prompt.push_str("CLIENT INFORMATION:\n");
    push_field(&mut prompt, "Name", &input.client_name);
    push_field(&mut prompt, "Company", &input.client_company);
    push_field(&mut prompt, "Email", &input.client_email);
    prompt.push('\n');

    prompt.push_str("PROJECT DETAILS:\n");
    push_field(&mut prompt, "Project Name", &input.project_name);
    push_field(&mut prompt, "Type", input.project_type.as_str());
    push_field(&mut prompt, "Description", &input.project_description);
    prompt.push('\n');

    prompt.push_str("DELIVERABLES:\n");
    for deliverable in &input.deliverables {
        push_line(&mut prompt, &format!("- {}", deliverable));
    }
    prompt.push('\n');

    prompt.push_str("TIMELINE:\n");
    push_field(&mut prompt, "Duration", &input.estimated_duration);
    push_field(&mut prompt, "Start Date", &input.start_date);
    prompt.push('\n');

    prompt.push_str("PRICING:\n");
    push_field(&mut prompt, "Type", input.pricing_type.as_str());
    push_field(&mut prompt, "Total", &format::currency(input.total_price));
    push_field(&mut prompt, "Deposit", &format::currency(input.deposit_required));
    push_field(&mut prompt, "Payment Terms", &input.payment_terms);
    prompt.push('\n');

    prompt.push_str("SENDER:\n");
    push_field(&mut prompt, "Name", &input.your_name);
    push_field(&mut prompt, "Company", &input.your_company);
    push_field(&mut prompt, "Email", &input.your_email);
    if let Some(phone) = input.your_phone.as_deref().filter(|p| !p.trim().is_empty()) {
        push_field(&mut prompt, "Phone", phone);
    }
    prompt.push('\n');

    prompt.push_str(&render_schema());

    prompt.push_str(
        "\nMake the proposal persuasive, professional, and tailored to this specific client and project. \
         Return a single JSON object with exactly these seven keys.\n",
    );

    prompt
}

/// The JSON shape the reply must follow
fn render_schema() -> String {
    let mut schema = String::from("Please generate the following sections in JSON format:\n{\n");
    let last = ProposalSections::KEYS.len() - 1;
    for (i, (key, guidance)) in ProposalSections::KEYS.iter().zip(SECTION_GUIDANCE).enumerate() {
        let value = if *key == "deliverablesList" {
            format!("[\"{}\"]", guidance)
        } else {
            format!("\"{}\"", guidance)
        };
        let comma = if i == last { "" } else { "," };
        push_line(&mut schema, &format!("  \"{}\": {}{}", key, value, comma));
    }
    schema.push_str("}\n");
    schema
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// `- Label: value` bullet
fn push_field(out: &mut String, label: &str, value: &str) {
    push_line(out, &format!("- {}: {}", label, value));
}
