//! Contribution registry and voting engine.
//!
//! - Pending → Approved | Rejected, both terminal
//! - One vote per account per contribution, contributors cannot vote on their own work
//! - Quorum + threshold checks after every vote, ties reject
//! - Rewards computed once at approval and minted on claim

pub mod contribution;
pub mod engine;
pub mod reward;
pub mod voting;

pub use contribution::{Category, Contribution, ContributionStatus, Submission};
pub use engine::{ContributionRegistry, ContributorStats, VoteOutcome};
pub use reward::{CategoryRewards, RewardPolicy};
pub use voting::{Finalization, VoteTally, VotingPolicy};
