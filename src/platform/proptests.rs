//! Property-based tests for the platform state machine
//!
//! Tests for:
//! - Invariants hold after any command sequence
//! - Rejected commands change nothing, not even the sequence number
//! - Status and claim flags only move forward
//! - Rewards never change after approval

use super::{Command, Platform};
use crate::account::Account;
use crate::config::{PlatformConfig, TokenConfig};
use crate::registry::{Category, ContributionStatus, RewardPolicy, Submission, VotingPolicy};
use proptest::prelude::*;

const ACCOUNTS: u8 = 6;

#[derive(Debug, Clone)]
enum Op {
    Submit { caller: u8, category: u8 },
    Vote { caller: u8, id: u64, approve: bool },
    Claim { caller: u8, id: u64 },
    Transfer { caller: u8, to: u8, amount: u128 },
    Mint { caller: u8, to: u8, amount: u128 },
    RemoveRegistryMinter { caller: u8 },
    Pause { caller: u8 },
    Unpause { caller: u8 },
    UpdatePolicy { caller: u8, quorum: u32, bonus_bps: u16 },
}

fn account(id: u8) -> Account {
    Account::from_identity(&format!("member-{}", id % ACCOUNTS))
}

fn registry_account() -> Account {
    Account::from_identity("OSSRewards")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<u8>(), 0u8..6).prop_map(|(caller, category)| Op::Submit { caller, category }),
        6 => (any::<u8>(), 1u64..6, any::<bool>())
            .prop_map(|(caller, id, approve)| Op::Vote { caller, id, approve }),
        3 => (any::<u8>(), 1u64..6).prop_map(|(caller, id)| Op::Claim { caller, id }),
        1 => (any::<u8>(), any::<u8>(), 0u128..5_000)
            .prop_map(|(caller, to, amount)| Op::Transfer { caller, to, amount }),
        1 => (any::<u8>(), any::<u8>(), 0u128..5_000)
            .prop_map(|(caller, to, amount)| Op::Mint { caller, to, amount }),
        1 => any::<u8>().prop_map(|caller| Op::RemoveRegistryMinter { caller }),
        1 => any::<u8>().prop_map(|caller| Op::Pause { caller }),
        1 => any::<u8>().prop_map(|caller| Op::Unpause { caller }),
        1 => (any::<u8>(), 0u32..5, 0u16..3_000)
            .prop_map(|(caller, quorum, bonus_bps)| Op::UpdatePolicy { caller, quorum, bonus_bps }),
    ]
}

fn fresh_platform() -> Platform {
    let config = PlatformConfig {
        token: TokenConfig {
            decimals: 0,
            initial_supply: 10_000,
            max_supply: 20_000,
            ..Default::default()
        },
        voting: VotingPolicy {
            quorum: 2,
            ..Default::default()
        },
        rewards: RewardPolicy::default(),
    };
    Platform::genesis(account(0), registry_account(), &config, 1_700_000_000).unwrap()
}

fn command(op: &Op) -> (Account, Command) {
    match *op {
        Op::Submit { caller, category } => (
            account(caller),
            Command::SubmitContribution(Submission {
                title: "Fix overflow".to_string(),
                description: "Checked arithmetic in parser".to_string(),
                project_url: "https://github.com/example/project".to_string(),
                github_pr: "https://github.com/example/project/pull/1".to_string(),
                category: Category::from_index(category).unwrap_or(Category::BugFix),
            }),
        ),
        Op::Vote { caller, id, approve } => (account(caller), Command::Vote { id, approve }),
        Op::Claim { caller, id } => (account(caller), Command::ClaimReward { id }),
        Op::Transfer { caller, to, amount } => (
            account(caller),
            Command::Transfer {
                to: account(to),
                amount,
            },
        ),
        Op::Mint { caller, to, amount } => (
            account(caller),
            Command::Mint {
                to: account(to),
                amount,
            },
        ),
        Op::RemoveRegistryMinter { caller } => (
            account(caller),
            Command::RemoveMinter {
                account: registry_account(),
            },
        ),
        Op::Pause { caller } => (account(caller), Command::Pause),
        Op::Unpause { caller } => (account(caller), Command::Unpause),
        Op::UpdatePolicy {
            caller,
            quorum,
            bonus_bps,
        } => (
            account(caller),
            Command::UpdatePolicy {
                voting: VotingPolicy {
                    quorum,
                    ..Default::default()
                },
                rewards: RewardPolicy {
                    margin_bonus_bps: bonus_bps,
                    ..Default::default()
                },
            },
        ),
    }
}

fn status_rank(status: ContributionStatus) -> u8 {
    match status {
        ContributionStatus::Pending => 0,
        ContributionStatus::Approved | ContributionStatus::Rejected => 1,
    }
}

proptest! {
    /// Property: Invariants hold after every command
    /// Supply conservation, record consistency and claim accounting are never violated
    #[test]
    fn invariants_hold_after_any_sequence(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut platform = fresh_platform();
        for (step, op) in ops.iter().enumerate() {
            let (caller, cmd) = command(op);
            let _ = platform.execute(&caller, cmd, 1_700_000_000 + step as u64);
            let violations = platform.invariant_violations();
            prop_assert!(violations.is_empty(), "violated {:?} after {:?}", violations, op);
        }
    }

    /// Property: Rejected commands are invisible
    /// A failing command leaves state, journal and sequence number untouched
    #[test]
    fn rejected_commands_do_not_mutate(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut platform = fresh_platform();
        for op in &ops {
            let before = platform.clone();
            let (caller, cmd) = command(op);
            match platform.execute(&caller, cmd, 1_700_000_000) {
                Ok(receipt) => {
                    prop_assert_eq!(receipt.sequence, before.sequence() + 1);
                    prop_assert_eq!(platform.journal().len(), before.journal().len() + 1);
                }
                Err(_) => prop_assert_eq!(&platform, &before),
            }
        }
    }

    /// Property: Lifecycle is monotonic
    /// Status never returns to Pending, rewards are frozen once approved, claims never revert
    #[test]
    fn lifecycle_is_monotonic(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut platform = fresh_platform();
        for op in &ops {
            let before = platform.clone();
            let (caller, cmd) = command(op);
            let _ = platform.execute(&caller, cmd, 1_700_000_000);

            for old in before.registry().list() {
                let new = platform.registry().get(old.id).unwrap();
                prop_assert!(status_rank(new.status) >= status_rank(old.status));
                if old.status.is_final() {
                    prop_assert_eq!(new.status, old.status);
                    prop_assert_eq!(new.reward_amount, old.reward_amount);
                    prop_assert_eq!(new.approval_votes, old.approval_votes);
                    prop_assert_eq!(new.rejection_votes, old.rejection_votes);
                }
                prop_assert!(new.claimed || !old.claimed);
                prop_assert!(new.votes_cast() >= old.votes_cast());
            }
        }
    }
}
