//! Division catalog: static per-tier economy settings.
//!
//! The catalog is read-only once built. It is validated at construction so
//! every lookup through the closed [`DivisionTier`] enum succeeds; the
//! `UnknownTier` failure path only guards lookups from raw names or codes.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::tier::DivisionTier;

/// Coins per conversion block when none is configured.
pub const DEFAULT_CONVERSION_BLOCK: u64 = 50;

/// Economy settings for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionConfig {
    pub tier: DivisionTier,
    /// Coins needed to advance. `None` for the top tier.
    #[serde(default)]
    pub promotion_threshold: Option<u64>,
    /// Coins added on a win.
    pub win_reward: u64,
    /// Coins removed on a loss.
    pub loss_penalty: u64,
    /// Protection charges granted on refresh.
    pub pity_grant_size: u32,
    /// Currency units paid per conversion block of coins.
    pub conversion_rate: Decimal,
}

/// Read-only lookup of [`DivisionConfig`] by tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionCatalog {
    divisions: Vec<DivisionConfig>,
    conversion_block: u64,
}

impl DivisionCatalog {
    /// Build a validated catalog.
    ///
    /// Requires exactly one entry per tier, strictly increasing promotion
    /// thresholds on every tier but the top one, no threshold on the top
    /// tier, a positive win reward, a non-negative conversion rate and a
    /// positive conversion block.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] describing the first problem found.
    pub fn try_new(
        mut divisions: Vec<DivisionConfig>,
        conversion_block: u64,
    ) -> Result<Self, LedgerError> {
        if conversion_block == 0 {
            return Err(LedgerError::validation(
                "conversion_block",
                "must be greater than zero",
            ));
        }

        divisions.sort_by_key(|d| d.tier);
        let tiers: Vec<DivisionTier> = divisions.iter().map(|d| d.tier).collect();
        if tiers != DivisionTier::ALL {
            return Err(LedgerError::validation(
                "divisions",
                format!("expected exactly one entry per tier (SILVER, GOLD, DIAMOND), got {tiers:?}"),
            ));
        }

        let mut previous_threshold = 0u64;
        for division in &divisions {
            if division.win_reward == 0 {
                return Err(LedgerError::validation(
                    "win_reward",
                    format!("{} win reward must be positive", division.tier),
                ));
            }
            if division.conversion_rate.is_sign_negative() {
                return Err(LedgerError::validation(
                    "conversion_rate",
                    format!("{} conversion rate must not be negative", division.tier),
                ));
            }
            match (division.tier.next(), division.promotion_threshold) {
                (Some(_), None) => {
                    return Err(LedgerError::validation(
                        "promotion_threshold",
                        format!("{} needs a promotion threshold", division.tier),
                    ));
                }
                (None, Some(_)) => {
                    return Err(LedgerError::validation(
                        "promotion_threshold",
                        format!("{} is the top tier and cannot promote", division.tier),
                    ));
                }
                (Some(_), Some(threshold)) => {
                    if threshold <= previous_threshold {
                        return Err(LedgerError::validation(
                            "promotion_threshold",
                            format!(
                                "{} threshold {threshold} must exceed {previous_threshold}",
                                division.tier
                            ),
                        ));
                    }
                    previous_threshold = threshold;
                }
                (None, None) => {}
            }
        }

        Ok(Self {
            divisions,
            conversion_block,
        })
    }

    /// Settings for a tier.
    ///
    /// # Errors
    /// Returns [`LedgerError::UnknownTier`] if the tier has no entry.
    pub fn config_for(&self, tier: DivisionTier) -> Result<&DivisionConfig, LedgerError> {
        self.divisions
            .iter()
            .find(|d| d.tier == tier)
            .ok_or_else(|| LedgerError::UnknownTier {
                tier: tier.to_string(),
            })
    }

    /// All divisions, lowest tier first.
    #[must_use]
    pub fn divisions(&self) -> &[DivisionConfig] {
        &self.divisions
    }

    /// Coins per conversion block.
    #[must_use]
    pub const fn conversion_block(&self) -> u64 {
        self.conversion_block
    }

    /// Currency owed for `coins` at the tier's rate, truncated to cents.
    ///
    /// # Errors
    /// Returns [`LedgerError::UnknownTier`] if the tier has no entry.
    pub fn currency_for(&self, tier: DivisionTier, coins: u64) -> Result<Decimal, LedgerError> {
        let rate = self.config_for(tier)?.conversion_rate;
        let amount = Decimal::from(coins) * rate / Decimal::from(self.conversion_block);
        Ok(amount.round_dp_with_strategy(2, RoundingStrategy::ToZero))
    }
}

impl Default for DivisionCatalog {
    fn default() -> Self {
        Self {
            divisions: default_divisions(),
            conversion_block: DEFAULT_CONVERSION_BLOCK,
        }
    }
}

/// Built-in tier settings. Win and loss amounts match across tiers today.
#[must_use]
pub fn default_divisions() -> Vec<DivisionConfig> {
    vec![
        DivisionConfig {
            tier: DivisionTier::Silver,
            promotion_threshold: Some(250),
            win_reward: 50,
            loss_penalty: 25,
            pity_grant_size: 2,
            conversion_rate: dec!(1.00),
        },
        DivisionConfig {
            tier: DivisionTier::Gold,
            promotion_threshold: Some(600),
            win_reward: 50,
            loss_penalty: 25,
            pity_grant_size: 2,
            conversion_rate: dec!(1.50),
        },
        DivisionConfig {
            tier: DivisionTier::Diamond,
            promotion_threshold: None,
            win_reward: 50,
            loss_penalty: 25,
            pity_grant_size: 2,
            conversion_rate: dec!(2.00),
        },
    ]
}
