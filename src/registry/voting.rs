//! Finalization policy for contribution votes.
//!
//! A contribution is evaluated after every recorded vote:
//! 1. Quorum: at least `quorum` distinct votes must be cast
//! 2. Threshold: `approve / cast >= approval_threshold_bps / 10_000`
//! 3. Majority: approvals must strictly outnumber rejections (ties reject)
//!
//! All arithmetic is integer; no rounding is involved.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};

/// Basis-point denominator (100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Quorum and threshold configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPolicy {
    /// Minimum distinct votes before a contribution can finalize.
    #[serde(default = "default_quorum")]
    pub quorum: u32,

    /// Share of cast votes that must approve, in basis points.
    /// e.g., 5_000 = at least half of the votes cast.
    #[serde(default = "default_approval_threshold_bps")]
    pub approval_threshold_bps: u16,
}

fn default_quorum() -> u32 {
    3
}

fn default_approval_threshold_bps() -> u16 {
    5_000 // 50%
}

impl Default for VotingPolicy {
    fn default() -> Self {
        Self {
            quorum: default_quorum(),
            approval_threshold_bps: default_approval_threshold_bps(),
        }
    }
}

impl VotingPolicy {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.quorum == 0 {
            return Err(LedgerError::InvalidInput("quorum must be at least 1".to_string()));
        }
        if u64::from(self.approval_threshold_bps) > BPS_DENOMINATOR {
            return Err(LedgerError::InvalidInput(format!(
                "approval threshold {} bps exceeds {}",
                self.approval_threshold_bps, BPS_DENOMINATOR
            )));
        }
        Ok(())
    }

    /// Evaluate a tally against this policy.
    pub fn evaluate(&self, tally: &VoteTally) -> Finalization {
        let cast = tally.cast();
        if cast < self.quorum {
            return Finalization::QuorumNotMet {
                votes_cast: cast,
                quorum: self.quorum,
            };
        }

        let meets_threshold = u64::from(tally.approve) * BPS_DENOMINATOR
            >= u64::from(self.approval_threshold_bps) * u64::from(cast);
        let has_majority = tally.approve > tally.reject;

        if meets_threshold && has_majority {
            Finalization::Approved
        } else {
            Finalization::Rejected
        }
    }
}

/// Vote counts for one contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteTally {
    pub approve: u32,
    pub reject: u32,
}

impl VoteTally {
    pub fn cast(&self) -> u32 {
        self.approve + self.reject
    }

    /// Approval margin in basis points of votes cast (zero when not ahead).
    pub fn margin_bps(&self) -> u64 {
        let cast = u64::from(self.cast());
        if cast == 0 || self.approve <= self.reject {
            return 0;
        }
        u64::from(self.approve - self.reject) * BPS_DENOMINATOR / cast
    }
}

/// Outcome of evaluating a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalization {
    Approved,
    Rejected,
    QuorumNotMet { votes_cast: u32, quorum: u32 },
}
