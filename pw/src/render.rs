//! Markdown preview of a generated proposal
//!
//! All presentation formatting lives here: dollar amounts with thousands
//! separators, `M/D/YYYY` dates, numbered deliverables. The proposal itself
//! keeps raw numbers and ISO strings.

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::config::PromptsConfig;
use crate::domain::GeneratedProposal;
use crate::format;
use crate::prompts::load_template;

const TEMPLATE_NAME: &str = "preview";

/// Shown when the input has no start date
const START_DATE_FALLBACK: &str = "Upon agreement";

/// One line of the numbered deliverables list
#[derive(Debug, Clone, Serialize)]
struct NumberedItem {
    number: usize,
    text: String,
}

/// Flattened, pre-formatted view of a proposal for the template
#[derive(Debug, Clone, Serialize)]
struct PreviewContext {
    title: String,
    project_type: &'static str,
    client_name: String,
    client_company: String,
    your_name: String,
    your_company: String,
    your_email: String,
    your_phone: Option<String>,
    created_date: String,
    status: &'static str,
    executive_summary: String,
    scope_of_work: String,
    deliverables: Vec<NumberedItem>,
    timeline: String,
    estimated_duration: String,
    start_date: String,
    investment_section: String,
    pricing_type: &'static str,
    total_price: String,
    deposit_required: String,
    payment_terms: String,
    terms_and_conditions: String,
    next_steps: String,
}

impl PreviewContext {
    fn from_proposal(proposal: &GeneratedProposal) -> Self {
        let input = &proposal.input;
        let sections = &proposal.sections;

        let title = if input.project_name.trim().is_empty() {
            "Project Proposal".to_string()
        } else {
            input.project_name.clone()
        };

        Self {
            title,
            project_type: input.project_type.label(),
            client_name: input.client_name.clone(),
            client_company: input.client_company.clone(),
            your_name: input.your_name.clone(),
            your_company: input.your_company.clone(),
            your_email: input.your_email.clone(),
            your_phone: input.your_phone.clone().filter(|p| !p.trim().is_empty()),
            created_date: proposal.created_at.format("%-m/%-d/%Y").to_string(),
            status: proposal.status.as_str(),
            executive_summary: sections.executive_summary.clone(),
            scope_of_work: sections.scope_of_work.clone(),
            deliverables: sections
                .deliverables_list
                .iter()
                .enumerate()
                .map(|(i, text)| NumberedItem {
                    number: i + 1,
                    text: text.clone(),
                })
                .collect(),
            timeline: sections.timeline.clone(),
            estimated_duration: input.estimated_duration.clone(),
            start_date: format::short_date(&input.start_date).unwrap_or_else(|| START_DATE_FALLBACK.to_string()),
            investment_section: sections.investment_section.clone(),
            pricing_type: input.pricing_type.as_str(),
            total_price: format::currency(input.total_price),
            deposit_required: format::currency(input.deposit_required),
            payment_terms: input.payment_terms.clone(),
            terms_and_conditions: sections.terms_and_conditions.clone(),
            next_steps: sections.next_steps.clone(),
        }
    }
}

/// Renders proposals to Markdown
pub struct PreviewRenderer {
    hbs: Handlebars<'static>,
}

impl PreviewRenderer {
    /// Renderer using the embedded template
    pub fn new() -> Result<Self> {
        Self::with_template(&load_template(TEMPLATE_NAME, None)?)
    }

    /// Renderer honoring `prompts.preview-template`
    pub fn from_config(config: &PromptsConfig) -> Result<Self> {
        debug!(?config.preview_template, "PreviewRenderer::from_config: called");
        Self::with_template(&load_template(TEMPLATE_NAME, config.preview_template.as_deref())?)
    }

    /// Renderer for a template string; fails if the template doesn't compile
    pub fn with_template(template: &str) -> Result<Self> {
        let mut hbs = Handlebars::new();
        // Output is Markdown, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| eyre!("Failed to compile preview template: {}", e))?;
        Ok(Self { hbs })
    }

    /// Render one proposal
    pub fn render(&self, proposal: &GeneratedProposal) -> Result<String> {
        debug!(id = %proposal.id, "PreviewRenderer::render: called");
        let context = PreviewContext::from_proposal(proposal);
        self.hbs
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| eyre!("Failed to render proposal {}: {}", proposal.id, e))
    }
}
