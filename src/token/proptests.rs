//! Property-based tests for the token ledger
//!
//! Tests for:
//! - Supply conservation: sum(balances) == total_supply <= max_supply after any sequence
//! - Mint/burn symmetry
//! - Failed commands leave the ledger untouched
//! - Amount parse/format agreement

use super::amount::{format_amount, parse_amount, Amount};
use super::ledger::{TokenLedger, TokenMetadata};
use crate::account::Account;
use proptest::prelude::*;

const MAX_SUPPLY: Amount = 1_000_000;

#[derive(Debug, Clone)]
enum Op {
    Mint { caller: u8, to: u8, amount: Amount },
    Burn { caller: u8, amount: Amount },
    Transfer { caller: u8, to: u8, amount: Amount },
    AddMinter { caller: u8, account: u8 },
    Pause { caller: u8 },
    Unpause { caller: u8 },
}

fn account(id: u8) -> Account {
    Account::from_identity(&format!("account-{}", id % 4))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let amount = 0..(MAX_SUPPLY / 2);
    prop_oneof![
        (any::<u8>(), any::<u8>(), amount.clone())
            .prop_map(|(caller, to, amount)| Op::Mint { caller, to, amount }),
        (any::<u8>(), amount.clone()).prop_map(|(caller, amount)| Op::Burn { caller, amount }),
        (any::<u8>(), any::<u8>(), amount)
            .prop_map(|(caller, to, amount)| Op::Transfer { caller, to, amount }),
        (any::<u8>(), any::<u8>()).prop_map(|(caller, account)| Op::AddMinter { caller, account }),
        any::<u8>().prop_map(|caller| Op::Pause { caller }),
        any::<u8>().prop_map(|caller| Op::Unpause { caller }),
    ]
}

fn fresh_ledger() -> TokenLedger {
    TokenLedger::genesis(
        account(0),
        TokenMetadata {
            name: "Open Source Rewards".to_string(),
            symbol: "OSS".to_string(),
            decimals: 0,
        },
        MAX_SUPPLY / 10,
        MAX_SUPPLY,
    )
    .unwrap()
}

fn apply(ledger: &mut TokenLedger, op: &Op) -> bool {
    match *op {
        Op::Mint { caller, to, amount } => ledger.mint(&account(caller), &account(to), amount).is_ok(),
        Op::Burn { caller, amount } => ledger.burn(&account(caller), amount).is_ok(),
        Op::Transfer { caller, to, amount } => {
            ledger.transfer(&account(caller), &account(to), amount).is_ok()
        }
        Op::AddMinter { caller, account: target } => {
            ledger.add_minter(&account(caller), &account(target)).is_ok()
        }
        Op::Pause { caller } => ledger.pause(&account(caller)).is_ok(),
        Op::Unpause { caller } => ledger.unpause(&account(caller)).is_ok(),
    }
}

proptest! {
    /// Property: Supply conservation holds for every reachable state
    #[test]
    fn supply_is_conserved(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut ledger = fresh_ledger();
        for op in &ops {
            apply(&mut ledger, op);
            prop_assert!(ledger.supply_is_consistent(), "invariant broken after {:?}", op);
        }
    }

    /// Property: A rejected command has no visible effect
    #[test]
    fn failed_commands_do_not_mutate(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut ledger = fresh_ledger();
        for op in &ops {
            let before = ledger.clone();
            if !apply(&mut ledger, op) {
                prop_assert_eq!(&ledger, &before);
            }
        }
    }

    /// Property: Mint followed by burn of the same amount restores supply and balance
    #[test]
    fn mint_then_burn_is_identity(holder in any::<u8>(), amount in 0..(MAX_SUPPLY / 2)) {
        let mut ledger = fresh_ledger();
        let owner = account(0);
        let holder = account(holder);
        let supply = ledger.total_supply();
        let balance = ledger.balance_of(&holder);

        ledger.mint(&owner, &holder, amount).unwrap();
        ledger.burn(&holder, amount).unwrap();

        prop_assert_eq!(ledger.total_supply(), supply);
        prop_assert_eq!(ledger.balance_of(&holder), balance);
    }

    /// Property: Formatting then parsing yields the same amount
    #[test]
    fn format_parse_agree(amount in any::<u64>(), decimals in 0u8..=18) {
        let amount = amount as Amount;
        let text = format_amount(amount, decimals);
        prop_assert_eq!(parse_amount(&text, decimals).unwrap(), amount);
    }
}
