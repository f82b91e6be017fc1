//! Platform state machine.
//!
//! `Platform` is the single owned state object holding the token ledger, the
//! contribution registry and the event journal. Commands are applied one at a
//! time through [`Platform::execute`]; each either commits completely and
//! receives the next sequence number, or fails with no visible effect.

#[cfg(test)]
mod proptests;

use crate::account::Account;
use crate::config::PlatformConfig;
use crate::error::{ContributionId, LedgerError, LedgerResult};
use crate::journal::{EventJournal, JournalEntry, LedgerEvent};
use crate::registry::{
    Contribution, ContributionRegistry, ContributionStatus, RewardPolicy, Submission, VoteOutcome,
    VotingPolicy,
};
use crate::serialization::to_cbor;
use crate::token::{Amount, TokenLedger, TokenMetadata};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// A state-changing request, attributed to the caller passed to `execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Mint { to: Account, amount: Amount },
    Burn { amount: Amount },
    Transfer { to: Account, amount: Amount },
    AddMinter { account: Account },
    RemoveMinter { account: Account },
    Pause,
    Unpause,
    SubmitContribution(Submission),
    Vote { id: ContributionId, approve: bool },
    ClaimReward { id: ContributionId },
    UpdatePolicy {
        voting: VotingPolicy,
        rewards: RewardPolicy,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Mint { .. } => "mint",
            Command::Burn { .. } => "burn",
            Command::Transfer { .. } => "transfer",
            Command::AddMinter { .. } => "add_minter",
            Command::RemoveMinter { .. } => "remove_minter",
            Command::Pause => "pause",
            Command::Unpause => "unpause",
            Command::SubmitContribution(_) => "submit_contribution",
            Command::Vote { .. } => "vote",
            Command::ClaimReward { .. } => "claim_reward",
            Command::UpdatePolicy { .. } => "update_policy",
        }
    }
}

/// Command-specific result data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Whether a role or flag actually changed.
    Changed(bool),
    Submitted(ContributionId),
    Voted(VoteOutcome),
    Claimed(Amount),
}

/// Acknowledgment for a committed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub sequence: u64,
    /// Hex SHA-256 of the CBOR-encoded `(sequence, caller, command)`.
    pub tx_id: String,
    pub outcome: Outcome,
}

/// The platform state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    ledger: TokenLedger,
    registry: ContributionRegistry,
    journal: EventJournal,
    sequence: u64,
}

impl Platform {
    /// Create the platform.
    ///
    /// The deployer owns the ledger and receives the initial supply; the
    /// registry account is authorized to mint rewards. Both genesis effects
    /// are journaled under sequence 0.
    pub fn genesis(
        deployer: Account,
        registry_account: Account,
        config: &PlatformConfig,
        now: u64,
    ) -> LedgerResult<Self> {
        let token = &config.token;
        let invalid = |e: crate::token::AmountError| LedgerError::InvalidInput(e.to_string());
        let initial_supply = token.initial_supply_units().map_err(invalid)?;
        let max_supply = token.max_supply_units().map_err(invalid)?;

        let mut ledger = TokenLedger::genesis(
            deployer,
            TokenMetadata {
                name: token.name.clone(),
                symbol: token.symbol.clone(),
                decimals: token.decimals,
            },
            initial_supply,
            max_supply,
        )?;
        ledger.add_minter(&deployer, &registry_account)?;

        let registry = ContributionRegistry::new(
            registry_account,
            token.decimals,
            config.voting,
            config.rewards,
        )?;

        let mut journal = EventJournal::new();
        for event in [
            LedgerEvent::Mint {
                to: deployer,
                amount: initial_supply,
            },
            LedgerEvent::MinterAdded {
                account: registry_account,
            },
        ] {
            journal.append(JournalEntry {
                sequence: 0,
                timestamp: now,
                actor: deployer,
                event,
                follow_up: None,
            });
        }

        info!(deployer = %deployer, registry = %registry_account, "platform genesis");

        Ok(Self {
            ledger,
            registry,
            journal,
            sequence: 0,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &ContributionRegistry {
        &self.registry
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Sequence number of the last committed command.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn balance_of(&self, account: &Account) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn get_contribution(&self, id: ContributionId) -> LedgerResult<&Contribution> {
        self.registry.get(id)
    }

    /// All contributions, newest first.
    pub fn list_contributions(&self) -> Vec<&Contribution> {
        self.registry.list().collect()
    }

    /// Names of violated invariants; empty when the state is sound.
    pub fn invariant_violations(&self) -> Vec<&'static str> {
        let mut violations = Vec::new();

        if !self.ledger.supply_is_consistent() {
            violations.push("sum(balances) == total_supply <= max_supply");
        }
        if !self.registry.records_are_consistent() {
            violations.push("contribution records consistent");
        }

        let mut claims: BTreeMap<ContributionId, usize> = BTreeMap::new();
        for entry in self.journal.entries() {
            if let LedgerEvent::RewardClaimed { id, .. } = entry.event {
                *claims.entry(id).or_default() += 1;
            }
        }
        let claims_match = self.registry.list().all(|c| {
            let count = claims.get(&c.id).copied().unwrap_or(0);
            if c.claimed {
                count == 1 && c.status == ContributionStatus::Approved
            } else {
                count == 0
            }
        });
        if !claims_match {
            violations.push("claimed implies exactly one reward mint");
        }

        violations
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply one command atomically.
    pub fn execute(
        &mut self,
        caller: &Account,
        command: Command,
        now: u64,
    ) -> LedgerResult<Receipt> {
        let sequence = self.sequence + 1;
        let tx_id = receipt_id(sequence, caller, &command)?;
        let name = command.name();

        let result = self.apply(caller, command, now);
        let (outcome, event, follow_up) = match result {
            Ok(applied) => applied,
            Err(err) => {
                warn!(caller = %caller, command = name, error = %err, "command rejected");
                return Err(err);
            }
        };

        self.sequence = sequence;
        self.journal.append(JournalEntry {
            sequence,
            timestamp: now,
            actor: *caller,
            event,
            follow_up,
        });

        info!(sequence, tx_id = %tx_id, caller = %caller, command = name, "command committed");
        Ok(Receipt {
            sequence,
            tx_id,
            outcome,
        })
    }

    fn apply(
        &mut self,
        caller: &Account,
        command: Command,
        now: u64,
    ) -> LedgerResult<(Outcome, LedgerEvent, Option<LedgerEvent>)> {
        let applied = match command {
            Command::Mint { to, amount } => {
                self.ledger.mint(caller, &to, amount)?;
                (Outcome::Done, LedgerEvent::Mint { to, amount }, None)
            }
            Command::Burn { amount } => {
                self.ledger.burn(caller, amount)?;
                (
                    Outcome::Done,
                    LedgerEvent::Burn {
                        from: *caller,
                        amount,
                    },
                    None,
                )
            }
            Command::Transfer { to, amount } => {
                self.ledger.transfer(caller, &to, amount)?;
                (
                    Outcome::Done,
                    LedgerEvent::Transfer {
                        from: *caller,
                        to,
                        amount,
                    },
                    None,
                )
            }
            Command::AddMinter { account } => {
                let changed = self.ledger.add_minter(caller, &account)?;
                (
                    Outcome::Changed(changed),
                    LedgerEvent::MinterAdded { account },
                    None,
                )
            }
            Command::RemoveMinter { account } => {
                let changed = self.ledger.remove_minter(caller, &account)?;
                (
                    Outcome::Changed(changed),
                    LedgerEvent::MinterRemoved { account },
                    None,
                )
            }
            Command::Pause => {
                let changed = self.ledger.pause(caller)?;
                (Outcome::Changed(changed), LedgerEvent::Paused, None)
            }
            Command::Unpause => {
                let changed = self.ledger.unpause(caller)?;
                (Outcome::Changed(changed), LedgerEvent::Unpaused, None)
            }
            Command::SubmitContribution(submission) => {
                let category = submission.category;
                let id = self.registry.submit_contribution(caller, submission, now)?;
                (
                    Outcome::Submitted(id),
                    LedgerEvent::ContributionSubmitted { id, category },
                    None,
                )
            }
            Command::Vote { id, approve } => {
                let vote = self.registry.vote(id, caller, approve)?;
                let follow_up = vote.finalized.map(|status| LedgerEvent::ContributionFinalized {
                    id,
                    status,
                    reward_amount: vote.reward_amount,
                });
                (
                    Outcome::Voted(vote),
                    LedgerEvent::VoteCast { id, approve },
                    follow_up,
                )
            }
            Command::ClaimReward { id } => {
                let amount = self.registry.claim_reward(&mut self.ledger, id, caller)?;
                (
                    Outcome::Claimed(amount),
                    LedgerEvent::RewardClaimed { id, amount },
                    None,
                )
            }
            Command::UpdatePolicy { voting, rewards } => {
                if *caller != self.ledger.owner() {
                    return Err(LedgerError::Unauthorized(*caller));
                }
                self.registry.update_policy(voting, rewards)?;
                (Outcome::Done, LedgerEvent::PolicyUpdated, None)
            }
        };
        Ok(applied)
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn receipt_id(sequence: u64, caller: &Account, command: &Command) -> LedgerResult<String> {
    let encoded = to_cbor(&(sequence, caller, command))
        .map_err(|e| LedgerError::InvalidInput(format!("unencodable command: {}", e)))?;
    Ok(hex::encode(Sha256::digest(&encoded)))
}
