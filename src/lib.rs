//! OSS Rewards - contribution rewards ledger and voting engine
//!
//! A capped token ledger plus a registry where open-source contributions are
//! submitted, reviewed by peer vote, and rewarded with freshly minted tokens.
//!
//! Key principles:
//! - One owned `Platform` state, one command at a time
//! - Every command commits completely or not at all
//! - Supply never exceeds the cap, balances always sum to supply
//! - A reward is fixed at approval and minted at most once

pub mod account;
pub mod config;
pub mod deployment;
pub mod error;
pub mod journal;
pub mod platform;
pub mod registry;
pub mod serialization;
pub mod store;
pub mod token;
pub mod transport;

pub use account::Account;
pub use error::{ContributionId, LedgerError, LedgerResult};
pub use platform::{Command, Outcome, Platform, Receipt};
