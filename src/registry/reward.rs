//! Reward policy: base amount per category plus an optional margin bonus.
//!
//! The reward is computed once, at the moment a contribution is approved,
//! and stored on the contribution. Later policy changes never touch it.

use super::contribution::Category;
use super::voting::{VoteTally, BPS_DENOMINATOR};
use crate::error::{LedgerError, LedgerResult};
use crate::token::{whole_tokens, Amount};
use serde::{Deserialize, Serialize};

/// Base rewards in whole tokens, keyed by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRewards {
    #[serde(default = "default_bug_fix")]
    pub bug_fix: u64,
    #[serde(default = "default_feature")]
    pub feature: u64,
    #[serde(default = "default_security")]
    pub security: u64,
    #[serde(default = "default_documentation")]
    pub documentation: u64,
    #[serde(default = "default_performance")]
    pub performance: u64,
    #[serde(default = "default_research")]
    pub research: u64,
}

fn default_bug_fix() -> u64 {
    200
}

fn default_feature() -> u64 {
    300
}

fn default_security() -> u64 {
    500
}

fn default_documentation() -> u64 {
    275
}

fn default_performance() -> u64 {
    350
}

fn default_research() -> u64 {
    400
}

impl Default for CategoryRewards {
    fn default() -> Self {
        Self {
            bug_fix: default_bug_fix(),
            feature: default_feature(),
            security: default_security(),
            documentation: default_documentation(),
            performance: default_performance(),
            research: default_research(),
        }
    }
}

impl CategoryRewards {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::BugFix => self.bug_fix,
            Category::Feature => self.feature,
            Category::Security => self.security,
            Category::Documentation => self.documentation,
            Category::Performance => self.performance,
            Category::Research => self.research,
        }
    }
}

/// Reward configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RewardPolicy {
    /// Base reward per category (whole tokens).
    #[serde(default)]
    pub base: CategoryRewards,

    /// Bonus proportional to the approval margin, in basis points of the base.
    /// A unanimous approval earns the full bonus; 0 disables it.
    #[serde(default)]
    pub margin_bonus_bps: u16,
}

impl RewardPolicy {
    pub fn validate(&self) -> LedgerResult<()> {
        if u64::from(self.margin_bonus_bps) > BPS_DENOMINATOR {
            return Err(LedgerError::InvalidInput(format!(
                "margin bonus {} bps exceeds {}",
                self.margin_bonus_bps, BPS_DENOMINATOR
            )));
        }
        // An approved contribution always earns something.
        if let Some(category) = Category::ALL
            .into_iter()
            .find(|c| self.base.get(*c) == 0)
        {
            return Err(LedgerError::InvalidInput(format!(
                "base reward for {} must be positive",
                category.display_name()
            )));
        }
        Ok(())
    }

    /// Reward in smallest units for an approved contribution.
    ///
    /// `base + base * margin_bonus_bps * margin_bps / 10_000^2`
    pub fn reward_for(
        &self,
        category: Category,
        tally: &VoteTally,
        decimals: u8,
    ) -> LedgerResult<Amount> {
        let base = whole_tokens(self.base.get(category), decimals)
            .map_err(|e| LedgerError::InvalidInput(e.to_string()))?;

        // k <= 10^8, so splitting base around D keeps every product in range.
        let k = u128::from(self.margin_bonus_bps) * u128::from(tally.margin_bps());
        let d = u128::from(BPS_DENOMINATOR * BPS_DENOMINATOR);
        let bonus = (base / d)
            .checked_mul(k)
            .and_then(|whole| whole.checked_add((base % d) * k / d))
            .ok_or(LedgerError::SupplyExceeded)?;

        base.checked_add(bonus).ok_or(LedgerError::SupplyExceeded)
    }
}
