//! Platform configuration: token parameters and governance policies.
//!
//! Figures are in whole tokens (TOML integers are 64-bit); they are scaled to
//! smallest units by `decimals` when the platform is created.

use crate::registry::{RewardPolicy, VotingPolicy};
use crate::token::{whole_tokens, Amount, AmountError};
use serde::{Deserialize, Serialize};

/// Token parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Supply credited to the deployer at genesis (whole tokens).
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,

    /// Hard cap on total supply (whole tokens).
    #[serde(default = "default_max_supply")]
    pub max_supply: u64,
}

fn default_name() -> String {
    "Open Source Rewards".to_string()
}

fn default_symbol() -> String {
    "OSS".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_initial_supply() -> u64 {
    10_000_000 // 10 million
}

fn default_max_supply() -> u64 {
    100_000_000 // 100 million
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
            max_supply: default_max_supply(),
        }
    }
}

impl TokenConfig {
    pub fn initial_supply_units(&self) -> Result<Amount, AmountError> {
        whole_tokens(self.initial_supply, self.decimals)
    }

    pub fn max_supply_units(&self) -> Result<Amount, AmountError> {
        whole_tokens(self.max_supply, self.decimals)
    }
}

/// Everything needed to create a platform at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlatformConfig {
    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub voting: VotingPolicy,

    #[serde(default)]
    pub rewards: RewardPolicy,
}
