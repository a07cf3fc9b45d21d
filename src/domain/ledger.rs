//! Per-squad progression ledger.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::division::DivisionCatalog;
use super::error::LedgerError;
use super::id::{MatchResultId, SquadId};
use super::tier::DivisionTier;

/// Unprotected losses at zero coins that trigger a demotion.
pub const DEMOTION_LOSS_STREAK: u32 = 2;

/// Durable per-squad economy record.
///
/// Only the outcome processor and the ledger service produce new values of
/// this type; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadLedger {
    pub squad_id: SquadId,
    pub tier: DivisionTier,
    pub current_bounty_coins: u64,
    /// Audit counter. Never decreases.
    pub total_bounty_coins_earned: u64,
    /// Audit counter. Never decreases.
    pub total_bounty_coins_spent: u64,
    pub protection_charges: u32,
    pub consecutive_unprotected_losses: u32,
    /// Optimistic concurrency token, bumped on every committed write.
    pub version: u64,
    /// Most recent applied match results, oldest first.
    pub applied_match_result_ids: VecDeque<MatchResultId>,
    pub last_transition_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl SquadLedger {
    /// Fresh ledger for a newly created squad.
    #[must_use]
    pub fn new(squad_id: SquadId, now: DateTime<Utc>) -> Self {
        Self {
            squad_id,
            tier: DivisionTier::FLOOR,
            current_bounty_coins: 0,
            total_bounty_coins_earned: 0,
            total_bounty_coins_spent: 0,
            protection_charges: 0,
            consecutive_unprotected_losses: 0,
            version: 0,
            applied_match_result_ids: VecDeque::new(),
            last_transition_at: now,
            created_at: now,
            archived_at: None,
        }
    }

    /// True if `id` is inside the recent-history window.
    #[must_use]
    pub fn has_applied(&self, id: &MatchResultId) -> bool {
        self.applied_match_result_ids.contains(id)
    }

    /// Record an applied match result, evicting the oldest beyond `window`.
    pub fn remember_match(&mut self, id: MatchResultId, window: usize) {
        self.applied_match_result_ids.push_back(id);
        while self.applied_match_result_ids.len() > window.max(1) {
            self.applied_match_result_ids.pop_front();
        }
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Read model for standings and division display.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            squad_id: self.squad_id.clone(),
            tier: self.tier,
            current_bounty_coins: self.current_bounty_coins,
            protection_charges: self.protection_charges,
            consecutive_unprotected_losses: self.consecutive_unprotected_losses,
        }
    }

    /// Check the invariants a stored ledger must satisfy.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvariantViolation`] naming the broken rule.
    pub fn check_invariants(&self, catalog: &DivisionCatalog) -> Result<(), LedgerError> {
        let config = catalog.config_for(self.tier)?;
        if self.protection_charges > config.pity_grant_size {
            return Err(LedgerError::invariant(
                &self.squad_id,
                format!(
                    "protection charges {} exceed {} grant size {}",
                    self.protection_charges, self.tier, config.pity_grant_size
                ),
            ));
        }
        if self.consecutive_unprotected_losses > DEMOTION_LOSS_STREAK {
            return Err(LedgerError::invariant(
                &self.squad_id,
                format!(
                    "consecutive unprotected losses {} outside [0, {DEMOTION_LOSS_STREAK}]",
                    self.consecutive_unprotected_losses
                ),
            ));
        }
        if self.consecutive_unprotected_losses > 0 && self.current_bounty_coins > 0 {
            return Err(LedgerError::invariant(
                &self.squad_id,
                "unprotected loss streak recorded while holding coins",
            ));
        }
        Ok(())
    }
}

/// `GetSquadLedger` query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub squad_id: SquadId,
    pub tier: DivisionTier,
    pub current_bounty_coins: u64,
    pub protection_charges: u32,
    pub consecutive_unprotected_losses: u32,
}
