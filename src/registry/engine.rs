//! Contribution registry and voting engine.
//!
//! Owns the contribution lifecycle:
//! 1. `submit_contribution` creates a Pending record with the next id
//! 2. `vote` records one vote per account and re-evaluates finalization
//! 3. On approval the reward is computed and frozen on the record
//! 4. `claim_reward` mints the frozen reward to the contributor, once
//!
//! Records are never deleted. Every command validates before mutating.

use super::contribution::{Contribution, ContributionStatus, Submission};
use super::reward::RewardPolicy;
use super::voting::{Finalization, VoteTally, VotingPolicy};
use crate::account::Account;
use crate::error::{ContributionId, LedgerError, LedgerResult};
use crate::token::{Amount, TokenLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Result of a recorded vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub id: ContributionId,
    pub approval_votes: u32,
    pub rejection_votes: u32,
    /// Set when this vote finalized the contribution.
    pub finalized: Option<ContributionStatus>,
    pub reward_amount: Amount,
}

/// Per-contributor aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContributorStats {
    pub submitted: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Sum of rewards already claimed.
    pub earned: Amount,
    /// Sum of approved rewards not yet claimed.
    pub unclaimed: Amount,
}

/// Contribution registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRegistry {
    /// Account the registry mints rewards under.
    account: Account,
    decimals: u8,
    contributions: BTreeMap<ContributionId, Contribution>,
    next_id: ContributionId,
    voting: VotingPolicy,
    rewards: RewardPolicy,
}

impl ContributionRegistry {
    /// Create an empty registry. Ids start at 1.
    pub fn new(
        account: Account,
        decimals: u8,
        voting: VotingPolicy,
        rewards: RewardPolicy,
    ) -> LedgerResult<Self> {
        voting.validate()?;
        rewards.validate()?;
        Ok(Self {
            account,
            decimals,
            contributions: BTreeMap::new(),
            next_id: 1,
            voting,
            rewards,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Account the registry acts under when minting.
    pub fn account(&self) -> Account {
        self.account
    }

    pub fn voting_policy(&self) -> &VotingPolicy {
        &self.voting
    }

    pub fn reward_policy(&self) -> &RewardPolicy {
        &self.rewards
    }

    pub fn get(&self, id: ContributionId) -> LedgerResult<&Contribution> {
        self.contributions.get(&id).ok_or(LedgerError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// All contributions, newest first.
    pub fn list(&self) -> impl Iterator<Item = &Contribution> {
        self.contributions.values().rev()
    }

    /// Contributions by one account, newest first.
    pub fn contributions_by<'a>(
        &'a self,
        contributor: &'a Account,
    ) -> impl Iterator<Item = &'a Contribution> + 'a {
        self.list().filter(move |c| c.contributor == *contributor)
    }

    /// Pending contributions, newest first.
    pub fn pending(&self) -> impl Iterator<Item = &Contribution> {
        self.list()
            .filter(|c| c.status == ContributionStatus::Pending)
    }

    pub fn count_by_status(&self, status: ContributionStatus) -> usize {
        self.contributions
            .values()
            .filter(|c| c.status == status)
            .count()
    }

    pub fn contributor_stats(&self, contributor: &Account) -> ContributorStats {
        self.contributions_by(contributor)
            .fold(ContributorStats::default(), |mut stats, c| {
                stats.submitted += 1;
                match c.status {
                    ContributionStatus::Pending => stats.pending += 1,
                    ContributionStatus::Approved => {
                        stats.approved += 1;
                        if c.claimed {
                            stats.earned += c.reward_amount;
                        } else {
                            stats.unclaimed += c.reward_amount;
                        }
                    }
                    ContributionStatus::Rejected => stats.rejected += 1,
                }
                stats
            })
    }

    /// Per-record invariants: unique voters, consistent counters, rewards
    /// only on approval, claims only when approved.
    pub fn records_are_consistent(&self) -> bool {
        self.contributions.iter().all(|(id, c)| {
            *id == c.id
                && c.id < self.next_id
                && c.voters.len() == c.votes_cast() as usize
                && c.total_validators as usize == c.voters.len()
                && !c.voters.contains(&c.contributor)
                && (c.status == ContributionStatus::Approved || c.reward_amount == 0)
                && (!c.claimed || c.status == ContributionStatus::Approved)
        })
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Record a new Pending contribution.
    pub fn submit_contribution(
        &mut self,
        contributor: &Account,
        submission: Submission,
        now: u64,
    ) -> LedgerResult<ContributionId> {
        submission.validate()?;

        let id = self.next_id;
        let category = submission.category;
        self.contributions
            .insert(id, Contribution::new(id, *contributor, submission, now));
        self.next_id += 1;

        info!(id, contributor = %contributor, category = %category, "contribution submitted");
        Ok(id)
    }

    /// Record a vote and finalize if the policy is satisfied.
    pub fn vote(
        &mut self,
        id: ContributionId,
        voter: &Account,
        approve: bool,
    ) -> LedgerResult<VoteOutcome> {
        let contribution = self.contributions.get(&id).ok_or(LedgerError::NotFound(id))?;

        if contribution.status.is_final() {
            return Err(LedgerError::AlreadyFinalized(id));
        }
        if contribution.contributor == *voter {
            return Err(LedgerError::SelfVote(id));
        }
        if contribution.has_voted(voter) {
            return Err(LedgerError::DuplicateVote { id, voter: *voter });
        }

        let mut tally = VoteTally {
            approve: contribution.approval_votes,
            reject: contribution.rejection_votes,
        };
        if approve {
            tally.approve += 1;
        } else {
            tally.reject += 1;
        }

        // Decide everything before touching the record.
        let (finalized, reward_amount) = match self.voting.evaluate(&tally) {
            Finalization::Approved => {
                let reward =
                    self.rewards
                        .reward_for(contribution.category, &tally, self.decimals)?;
                (Some(ContributionStatus::Approved), reward)
            }
            Finalization::Rejected => (Some(ContributionStatus::Rejected), 0),
            Finalization::QuorumNotMet { votes_cast, quorum } => {
                debug!(id, votes_cast, quorum, "quorum not yet met");
                (None, 0)
            }
        };

        let contribution = self
            .contributions
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;
        contribution.voters.insert(*voter);
        contribution.approval_votes = tally.approve;
        contribution.rejection_votes = tally.reject;
        contribution.total_validators = contribution.voters.len() as u32;
        if let Some(status) = finalized {
            contribution.status = status;
            contribution.reward_amount = reward_amount;
        }

        info!(id, voter = %voter, approve, "vote recorded");
        if let Some(status) = finalized {
            info!(
                id,
                status = %status,
                approvals = tally.approve,
                rejections = tally.reject,
                reward = %reward_amount,
                "contribution finalized"
            );
        }

        Ok(VoteOutcome {
            id,
            approval_votes: tally.approve,
            rejection_votes: tally.reject,
            finalized,
            reward_amount,
        })
    }

    /// Claim an approved reward: mint it to the contributor and mark it claimed.
    ///
    /// The mint and the claim flag commit together; if the ledger rejects the
    /// mint, the contribution stays unclaimed and the error is returned.
    pub fn claim_reward(
        &mut self,
        ledger: &mut TokenLedger,
        id: ContributionId,
        claimant: &Account,
    ) -> LedgerResult<Amount> {
        let contribution = self.contributions.get(&id).ok_or(LedgerError::NotFound(id))?;

        if contribution.status != ContributionStatus::Approved {
            return Err(LedgerError::NotApproved(id));
        }
        if contribution.contributor != *claimant {
            return Err(LedgerError::NotContributor(id));
        }
        if contribution.claimed {
            return Err(LedgerError::AlreadyClaimed(id));
        }

        let amount = contribution.reward_amount;
        ledger.mint(&self.account, claimant, amount)?;

        if let Some(contribution) = self.contributions.get_mut(&id) {
            contribution.claimed = true;
        }

        info!(id, contributor = %claimant, amount = %amount, "reward claimed");
        Ok(amount)
    }

    /// Replace the voting and reward policies for future finalizations.
    ///
    /// Rewards already frozen on approved contributions are unaffected.
    pub fn update_policy(&mut self, voting: VotingPolicy, rewards: RewardPolicy) -> LedgerResult<()> {
        voting.validate()?;
        rewards.validate()?;
        self.voting = voting;
        self.rewards = rewards;
        info!(
            quorum = voting.quorum,
            threshold_bps = voting.approval_threshold_bps,
            margin_bonus_bps = rewards.margin_bonus_bps,
            "policy updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::contribution::Category;
    use crate::token::TokenMetadata;

    fn owner() -> Account {
        Account::from_identity("owner")
    }

    fn rewards_account() -> Account {
        Account::from_identity("rewards")
    }

    fn contributor() -> Account {
        Account::from_identity("contributor")
    }

    fn validator(n: u8) -> Account {
        Account::from_identity(&format!("validator-{}", n))
    }

    fn submission(category: Category) -> Submission {
        Submission {
            title: "Improve parser".to_string(),
            description: "Rewrite tokenizer".to_string(),
            project_url: "https://github.com/example/parser".to_string(),
            github_pr: "https://github.com/example/parser/pull/7".to_string(),
            category,
        }
    }

    fn registry(quorum: u32) -> ContributionRegistry {
        ContributionRegistry::new(
            rewards_account(),
            0,
            VotingPolicy {
                quorum,
                approval_threshold_bps: 5_000,
            },
            RewardPolicy::default(),
        )
        .unwrap()
    }

    fn ledger() -> TokenLedger {
        let mut ledger = TokenLedger::genesis(
            owner(),
            TokenMetadata {
                name: "Open Source Rewards".to_string(),
                symbol: "OSS".to_string(),
                decimals: 0,
            },
            10_000_000,
            100_000_000,
        )
        .unwrap();
        ledger.add_minter(&owner(), &rewards_account()).unwrap();
        ledger
    }

    #[test]
    fn test_submit_assigns_sequential_ids() {
        let mut registry = registry(1);
        let a = registry
            .submit_contribution(&contributor(), submission(Category::BugFix), 100)
            .unwrap();
        let b = registry
            .submit_contribution(&contributor(), submission(Category::Feature), 200)
            .unwrap();
        assert_eq!((a, b), (1, 2));

        let record = registry.get(a).unwrap();
        assert_eq!(record.status, ContributionStatus::Pending);
        assert_eq!(record.submission_time, 100);
        assert_eq!(record.votes_cast(), 0);
    }

    #[test]
    fn test_submit_rejects_empty_fields() {
        let mut registry = registry(1);
        let mut bad = submission(Category::BugFix);
        bad.title.clear();
        assert!(matches!(
            registry.submit_contribution(&contributor(), bad, 0),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut registry = registry(1);
        for _ in 0..3 {
            registry
                .submit_contribution(&contributor(), submission(Category::Research), 0)
                .unwrap();
        }
        let ids: Vec<_> = registry.list().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_vote_preconditions() {
        let mut registry = registry(3);
        let id = registry
            .submit_contribution(&contributor(), submission(Category::BugFix), 0)
            .unwrap();

        assert_eq!(registry.vote(99, &validator(1), true), Err(LedgerError::NotFound(99)));
        assert_eq!(registry.vote(id, &contributor(), true), Err(LedgerError::SelfVote(id)));

        registry.vote(id, &validator(1), true).unwrap();
        let before = registry.clone();
        assert_eq!(
            registry.vote(id, &validator(1), false),
            Err(LedgerError::DuplicateVote {
                id,
                voter: validator(1)
            })
        );
        assert_eq!(registry, before);
    }

    #[test]
    fn test_finalizes_at_quorum() {
        let mut registry = registry(3);
        let id = registry
            .submit_contribution(&contributor(), submission(Category::Security), 0)
            .unwrap();

        let first = registry.vote(id, &validator(1), true).unwrap();
        assert_eq!(first.finalized, None);
        let second = registry.vote(id, &validator(2), false).unwrap();
        assert_eq!(second.finalized, None);
        let third = registry.vote(id, &validator(3), true).unwrap();
        assert_eq!(third.finalized, Some(ContributionStatus::Approved));
        assert_eq!(third.reward_amount, 500);

        let record = registry.get(id).unwrap();
        assert_eq!(record.status, ContributionStatus::Approved);
        assert_eq!(record.reward_amount, 500);
        assert_eq!(record.total_validators, 3);

        assert_eq!(
            registry.vote(id, &validator(4), true),
            Err(LedgerError::AlreadyFinalized(id))
        );
    }

    #[test]
    fn test_rejection_leaves_zero_reward() {
        let mut registry = registry(2);
        let id = registry
            .submit_contribution(&contributor(), submission(Category::Feature), 0)
            .unwrap();
        registry.vote(id, &validator(1), true).unwrap();
        let outcome = registry.vote(id, &validator(2), false).unwrap();

        assert_eq!(outcome.finalized, Some(ContributionStatus::Rejected));
        assert_eq!(registry.get(id).unwrap().reward_amount, 0);
    }

    #[test]
    fn test_claim_mints_once() {
        let mut registry = registry(1);
        let mut ledger = ledger();
        let id = registry
            .submit_contribution(&contributor(), submission(Category::Performance), 0)
            .unwrap();
        registry.vote(id, &validator(1), true).unwrap();

        let supply = ledger.total_supply();
        assert_eq!(registry.claim_reward(&mut ledger, id, &contributor()).unwrap(), 350);
        assert_eq!(ledger.balance_of(&contributor()), 350);
        assert_eq!(ledger.total_supply(), supply + 350);
        assert!(registry.get(id).unwrap().claimed);

        assert_eq!(
            registry.claim_reward(&mut ledger, id, &contributor()),
            Err(LedgerError::AlreadyClaimed(id))
        );
        assert_eq!(ledger.balance_of(&contributor()), 350);
    }

    #[test]
    fn test_claim_preconditions() {
        let mut registry = registry(1);
        let mut ledger = ledger();
        let id = registry
            .submit_contribution(&contributor(), submission(Category::BugFix), 0)
            .unwrap();

        assert_eq!(
            registry.claim_reward(&mut ledger, 42, &contributor()),
            Err(LedgerError::NotFound(42))
        );
        assert_eq!(
            registry.claim_reward(&mut ledger, id, &contributor()),
            Err(LedgerError::NotApproved(id))
        );

        registry.vote(id, &validator(1), true).unwrap();
        assert_eq!(
            registry.claim_reward(&mut ledger, id, &validator(1)),
            Err(LedgerError::NotContributor(id))
        );
    }

    #[test]
    fn test_failed_mint_leaves_claim_open() {
        let mut registry = registry(1);
        let mut ledger = ledger();
        let id = registry
            .submit_contribution(&contributor(), submission(Category::BugFix), 0)
            .unwrap();
        registry.vote(id, &validator(1), true).unwrap();

        ledger.pause(&owner()).unwrap();
        assert_eq!(
            registry.claim_reward(&mut ledger, id, &contributor()),
            Err(LedgerError::Paused)
        );
        assert!(!registry.get(id).unwrap().claimed);
        assert_eq!(ledger.balance_of(&contributor()), 0);

        ledger.unpause(&owner()).unwrap();
        registry.claim_reward(&mut ledger, id, &contributor()).unwrap();
        assert!(registry.get(id).unwrap().claimed);
    }

    #[test]
    fn test_policy_change_does_not_alter_frozen_reward() {
        let mut registry = registry(1);
        let id = registry
            .submit_contribution(&contributor(), submission(Category::Security), 0)
            .unwrap();
        registry.vote(id, &validator(1), true).unwrap();

        let mut richer = RewardPolicy::default();
        richer.base.security = 5_000;
        registry
            .update_policy(*registry.voting_policy(), richer)
            .unwrap();

        assert_eq!(registry.get(id).unwrap().reward_amount, 500);

        let next = registry
            .submit_contribution(&contributor(), submission(Category::Security), 0)
            .unwrap();
        registry.vote(next, &validator(1), true).unwrap();
        assert_eq!(registry.get(next).unwrap().reward_amount, 5_000);
    }

    #[test]
    fn test_contributor_stats() {
        let mut registry = registry(1);
        let mut ledger = ledger();
        let approved = registry
            .submit_contribution(&contributor(), submission(Category::Security), 0)
            .unwrap();
        let rejected = registry
            .submit_contribution(&contributor(), submission(Category::Feature), 0)
            .unwrap();
        let claimed = registry
            .submit_contribution(&contributor(), submission(Category::BugFix), 0)
            .unwrap();
        registry
            .submit_contribution(&contributor(), submission(Category::Research), 0)
            .unwrap();

        registry.vote(approved, &validator(1), true).unwrap();
        registry.vote(rejected, &validator(1), false).unwrap();
        registry.vote(claimed, &validator(1), true).unwrap();
        registry.claim_reward(&mut ledger, claimed, &contributor()).unwrap();

        let stats = registry.contributor_stats(&contributor());
        assert_eq!(stats.submitted, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.earned, 200);
        assert_eq!(stats.unclaimed, 500);
        assert!(registry.records_are_consistent());
    }
}
