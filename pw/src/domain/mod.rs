//! Domain types: what the form collects and what generation produces

mod input;
mod proposal;

pub use input::{DEFAULT_DELIVERABLES, PricingType, ProjectType, ProposalInput};
pub use proposal::{GeneratedProposal, ProposalSections, ProposalStatus};
