//! Contribution records and their canonical enums.
//!
//! `Category` and `ContributionStatus` are the single source of truth for
//! display names, form slugs and numeric discriminants.

use crate::account::Account;
use crate::error::{ContributionId, LedgerError, LedgerResult};
use crate::token::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Kind of open-source work being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    BugFix,
    Feature,
    Security,
    Documentation,
    Performance,
    Research,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::BugFix,
        Category::Feature,
        Category::Security,
        Category::Documentation,
        Category::Performance,
        Category::Research,
    ];

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::BugFix => "Bug Fix",
            Category::Feature => "Feature",
            Category::Security => "Security",
            Category::Documentation => "Documentation",
            Category::Performance => "Performance",
            Category::Research => "Research",
        }
    }

    /// Form value (`bug-fix`, `feature`, ...).
    pub fn slug(self) -> &'static str {
        match self {
            Category::BugFix => "bug-fix",
            Category::Feature => "feature",
            Category::Security => "security",
            Category::Documentation => "documentation",
            Category::Performance => "performance",
            Category::Research => "research",
        }
    }

    /// Numeric discriminant used by existing clients.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    /// Accepts the slug, the display name (case-insensitive) or the discriminant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if let Ok(index) = needle.parse::<u8>() {
            return Self::from_index(index)
                .ok_or_else(|| LedgerError::InvalidInput(format!("unknown category '{}'", s)));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == needle || c.display_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| LedgerError::InvalidInput(format!("unknown category '{}'", s)))
    }
}

/// Lifecycle state. `Pending` moves to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            ContributionStatus::Pending => "Pending",
            ContributionStatus::Approved => "Approved",
            ContributionStatus::Rejected => "Rejected",
        }
    }

    pub fn is_final(self) -> bool {
        !matches!(self, ContributionStatus::Pending)
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Submission fields supplied by the contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub project_url: String,
    pub github_pr: String,
    pub category: Category,
}

impl Submission {
    /// Reject empty (or whitespace-only) text fields.
    pub fn validate(&self) -> LedgerResult<()> {
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("project_url", &self.project_url),
            ("github_pr", &self.github_pr),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(LedgerError::InvalidInput(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

/// A submitted contribution.
///
/// Core fields never change after creation. Voting and reward fields only
/// move forward: counters increase, status finalizes once, `claimed` flips once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub contributor: Account,
    pub title: String,
    pub description: String,
    pub project_url: String,
    pub github_pr: String,
    pub category: Category,
    /// Unix seconds.
    pub submission_time: u64,
    pub status: ContributionStatus,
    pub approval_votes: u32,
    pub rejection_votes: u32,
    pub voters: BTreeSet<Account>,
    /// Distinct accounts that have voted, refreshed on every vote.
    pub total_validators: u32,
    /// Set once on approval; zero otherwise.
    pub reward_amount: Amount,
    pub claimed: bool,
}

impl Contribution {
    pub(crate) fn new(
        id: ContributionId,
        contributor: Account,
        submission: Submission,
        submission_time: u64,
    ) -> Self {
        Self {
            id,
            contributor,
            title: submission.title,
            description: submission.description,
            project_url: submission.project_url,
            github_pr: submission.github_pr,
            category: submission.category,
            submission_time,
            status: ContributionStatus::Pending,
            approval_votes: 0,
            rejection_votes: 0,
            voters: BTreeSet::new(),
            total_validators: 0,
            reward_amount: 0,
            claimed: false,
        }
    }

    pub fn votes_cast(&self) -> u32 {
        self.approval_votes + self.rejection_votes
    }

    pub fn has_voted(&self, account: &Account) -> bool {
        self.voters.contains(account)
    }

    /// Whether the contributor could claim right now.
    pub fn is_claimable(&self) -> bool {
        self.status == ContributionStatus::Approved && !self.claimed
    }
}
