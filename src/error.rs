//! Ledger error taxonomy.
//!
//! Every rejected command maps to exactly one kind. Payloads carry only the
//! offending identifier, never internal state.

use crate::account::Account;
use thiserror::Error;

/// Contribution identifier.
pub type ContributionId = u64;

/// Errors surfaced by ledger and registry commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Unauthorized: {0} lacks the required role")]
    Unauthorized(Account),

    #[error("Ledger is paused")]
    Paused,

    #[error("Mint would exceed max supply")]
    SupplyExceeded,

    #[error("Insufficient balance for {0}")]
    InsufficientBalance(Account),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Contribution {0} not found")]
    NotFound(ContributionId),

    #[error("Contribution {0} is already finalized")]
    AlreadyFinalized(ContributionId),

    #[error("Contributors cannot vote on their own contribution {0}")]
    SelfVote(ContributionId),

    #[error("{voter} already voted on contribution {id}")]
    DuplicateVote { id: ContributionId, voter: Account },

    #[error("Contribution {0} is not approved")]
    NotApproved(ContributionId),

    #[error("Only the contributor can claim the reward for contribution {0}")]
    NotContributor(ContributionId),

    #[error("Reward for contribution {0} already claimed")]
    AlreadyClaimed(ContributionId),
}

impl LedgerError {
    /// Stable machine-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "Unauthorized",
            Self::Paused => "Paused",
            Self::SupplyExceeded => "SupplyExceeded",
            Self::InsufficientBalance(_) => "InsufficientBalance",
            Self::InvalidInput(_) => "InvalidInput",
            Self::NotFound(_) => "NotFound",
            Self::AlreadyFinalized(_) => "AlreadyFinalized",
            Self::SelfVote(_) => "SelfVote",
            Self::DuplicateVote { .. } => "DuplicateVote",
            Self::NotApproved(_) => "NotApproved",
            Self::NotContributor(_) => "NotContributor",
            Self::AlreadyClaimed(_) => "AlreadyClaimed",
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
