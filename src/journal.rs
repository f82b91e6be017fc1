//! Event journal.
//!
//! Every committed command appends exactly one entry; rejected commands
//! append nothing.
//!
//! Design principles:
//! - Immutable append-only log (no deletion)
//! - Ordered by command sequence number
//! - Query interface for the `history` command

use crate::account::Account;
use crate::error::ContributionId;
use crate::registry::{Category, ContributionStatus};
use crate::token::{format_amount, Amount};
use serde::{Deserialize, Serialize};

/// Ledger events, one per committed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Transfer { from: Account, to: Account, amount: Amount },
    Mint { to: Account, amount: Amount },
    Burn { from: Account, amount: Amount },
    MinterAdded { account: Account },
    MinterRemoved { account: Account },
    Paused,
    Unpaused,
    ContributionSubmitted { id: ContributionId, category: Category },
    VoteCast { id: ContributionId, approve: bool },
    ContributionFinalized {
        id: ContributionId,
        status: ContributionStatus,
        reward_amount: Amount,
    },
    RewardClaimed { id: ContributionId, amount: Amount },
    PolicyUpdated,
}

/// Event kind, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Transfer,
    Mint,
    Burn,
    MinterAdded,
    MinterRemoved,
    Paused,
    Unpaused,
    ContributionSubmitted,
    VoteCast,
    ContributionFinalized,
    RewardClaimed,
    PolicyUpdated,
}

impl LedgerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LedgerEvent::Transfer { .. } => EventKind::Transfer,
            LedgerEvent::Mint { .. } => EventKind::Mint,
            LedgerEvent::Burn { .. } => EventKind::Burn,
            LedgerEvent::MinterAdded { .. } => EventKind::MinterAdded,
            LedgerEvent::MinterRemoved { .. } => EventKind::MinterRemoved,
            LedgerEvent::Paused => EventKind::Paused,
            LedgerEvent::Unpaused => EventKind::Unpaused,
            LedgerEvent::ContributionSubmitted { .. } => EventKind::ContributionSubmitted,
            LedgerEvent::VoteCast { .. } => EventKind::VoteCast,
            LedgerEvent::ContributionFinalized { .. } => EventKind::ContributionFinalized,
            LedgerEvent::RewardClaimed { .. } => EventKind::RewardClaimed,
            LedgerEvent::PolicyUpdated => EventKind::PolicyUpdated,
        }
    }

    /// One-line description (amounts rendered with `decimals`).
    pub fn describe(&self, decimals: u8) -> String {
        let amt = |a: &Amount| format_amount(*a, decimals);
        match self {
            LedgerEvent::Transfer { from, to, amount } => {
                format!("Transfer {} from {} to {}", amt(amount), from.short(), to.short())
            }
            LedgerEvent::Mint { to, amount } => format!("Mint {} to {}", amt(amount), to.short()),
            LedgerEvent::Burn { from, amount } => {
                format!("Burn {} from {}", amt(amount), from.short())
            }
            LedgerEvent::MinterAdded { account } => format!("Minter added: {}", account.short()),
            LedgerEvent::MinterRemoved { account } => {
                format!("Minter removed: {}", account.short())
            }
            LedgerEvent::Paused => "Ledger paused".to_string(),
            LedgerEvent::Unpaused => "Ledger unpaused".to_string(),
            LedgerEvent::ContributionSubmitted { id, category } => {
                format!("Contribution #{} submitted ({})", id, category)
            }
            LedgerEvent::VoteCast { id, approve } => format!(
                "Vote on #{}: {}",
                id,
                if *approve { "approve" } else { "reject" }
            ),
            LedgerEvent::ContributionFinalized {
                id,
                status,
                reward_amount,
            } => match status {
                ContributionStatus::Approved => {
                    format!("Contribution #{} approved, reward {}", id, amt(reward_amount))
                }
                other => format!("Contribution #{} {}", id, other.display_name().to_lowercase()),
            },
            LedgerEvent::RewardClaimed { id, amount } => {
                format!("Reward for #{} claimed: {}", id, amt(amount))
            }
            LedgerEvent::PolicyUpdated => "Voting and reward policy updated".to_string(),
        }
    }
}

/// Single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Command sequence number that produced this entry.
    pub sequence: u64,
    /// Unix timestamp (seconds since epoch).
    pub timestamp: u64,
    /// Account that issued the command.
    pub actor: Account,
    pub event: LedgerEvent,
    /// Set when the same command also finalized a contribution.
    #[serde(default)]
    pub follow_up: Option<LedgerEvent>,
}

/// Query options for the journal.
#[derive(Debug, Clone)]
pub struct JournalQuery {
    /// Filter by event kind (matches the primary event or its follow-up).
    pub kind: Option<EventKind>,
    /// Filter by actor.
    pub actor: Option<Account>,
    /// Only entries with a larger sequence number.
    pub after_sequence: Option<u64>,
    /// Limit number of results (most recent first).
    pub limit: Option<usize>,
}

impl Default for JournalQuery {
    fn default() -> Self {
        Self {
            kind: None,
            actor: None,
            after_sequence: None,
            limit: Some(50), // Default: last 50 entries
        }
    }
}

/// Append-only event journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Query with filters. Returns entries newest first.
    pub fn query(&self, query: &JournalQuery) -> Vec<&JournalEntry> {
        let matches = self.entries.iter().rev().filter(|entry| {
            if let Some(kind) = query.kind {
                let follow_up_matches = entry
                    .follow_up
                    .as_ref()
                    .is_some_and(|e| e.kind() == kind);
                if entry.event.kind() != kind && !follow_up_matches {
                    return false;
                }
            }

            if let Some(ref actor) = query.actor {
                if &entry.actor != actor {
                    return false;
                }
            }

            if let Some(after) = query.after_sequence {
                if entry.sequence <= after {
                    return false;
                }
            }

            true
        });

        match query.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }
}

/// Format entries for terminal display.
pub fn format_journal(entries: &[&JournalEntry], decimals: u8) -> String {
    if entries.is_empty() {
        return "No journal entries found.".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "#{:<6} {} {}\n",
            entry.sequence,
            entry.actor.short(),
            entry.event.describe(decimals)
        ));
        if let Some(follow_up) = &entry.follow_up {
            output.push_str(&format!("        ↳ {}\n", follow_up.describe(decimals)));
        }
    }

    output.trim_end().to_string()
}
