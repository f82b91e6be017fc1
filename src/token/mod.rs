//! Token ledger: capped supply, minter registry, pause, burn.

pub mod amount;
pub mod ledger;

#[cfg(test)]
mod proptests;

pub use amount::{format_amount, parse_amount, whole_tokens, Amount, AmountError};
pub use ledger::{TokenLedger, TokenMetadata};
