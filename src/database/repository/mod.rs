pub mod analyst;
pub mod proposal;

pub use analyst::{AnalystError, AnalystRepository};
pub use proposal::{normalize_date, ProposalRepository};
