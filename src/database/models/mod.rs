pub mod analyst;
pub mod proposal;

pub use analyst::Analyst;
pub use proposal::{NewProposal, Proposal, ProposalFields, ProposalWithAnalyst};
