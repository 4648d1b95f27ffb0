//! GeneratedProposal - the document produced from a ProposalInput

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProposalInput;

/// Lifecycle of a proposal once it leaves the generator
///
/// Generation always yields `Draft`; later transitions belong to whoever
/// stores and sends the proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
    Viewed,
    Accepted,
    Declined,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Viewed => "viewed",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The seven sections the model must return
///
/// Field names double as the JSON schema sent in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSections {
    pub executive_summary: String,
    pub scope_of_work: String,
    pub deliverables_list: Vec<String>,
    pub timeline: String,
    pub investment_section: String,
    pub terms_and_conditions: String,
    pub next_steps: String,
}

impl ProposalSections {
    /// JSON keys, in the order the prompt lists them
    pub const KEYS: [&'static str; 7] = [
        "executiveSummary",
        "scopeOfWork",
        "deliverablesList",
        "timeline",
        "investmentSection",
        "termsAndConditions",
        "nextSteps",
    ];
}

/// A complete generated proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProposal {
    pub id: String,

    /// Owned copy of the originating input
    pub input: ProposalInput,

    #[serde(flatten)]
    pub sections: ProposalSections,

    pub created_at: DateTime<Utc>,

    pub status: ProposalStatus,
}

impl GeneratedProposal {
    /// Assemble a fresh draft from an input and its generated sections
    pub fn draft(input: ProposalInput, sections: ProposalSections) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            input,
            sections,
            created_at: Utc::now(),
            status: ProposalStatus::Draft,
        }
    }
}
