//! Outcome processor: the pure progression state machine.
//!
//! [`apply`] maps a ledger and a match outcome to the next ledger and the
//! events describing what changed. [`spend`] does the same for a withdrawal
//! debit. Neither touches I/O or the clock; the caller passes `now`.
//!
//! # Rules
//!
//! **Win.** Add the tier's win reward, refresh protection to the grant size,
//! clear the loss streak, then promote while the balance meets the current
//! tier's threshold. The balance carries forward through promotions.
//!
//! **Loss.** Subtract the loss penalty, clamped at zero. A loss that leaves
//! coins is absorbed outright. A loss that lands on zero consumes a protection
//! charge when one is left; otherwise it extends the unprotected streak. Two
//! unprotected losses demote to the tier below, placed one coin under that
//! tier's promotion threshold with protection refreshed. At the floor tier the
//! squad stays put at zero coins and gets [`TransitionEvent::FloorReached`].
//!
//! **Event order.** [`TransitionEvent::WinApplied`] or
//! [`TransitionEvent::LossApplied`] is always the first event, even when the
//! win also promotes. Promotions, demotions, protection and floor events
//! follow in the order they happened.

use chrono::{DateTime, Utc};

use super::division::DivisionCatalog;
use super::error::LedgerError;
use super::ledger::{SquadLedger, DEMOTION_LOSS_STREAK};
use super::outcome::{MatchOutcome, TransitionEvent};

/// Next ledger state plus the events that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub ledger: SquadLedger,
    pub events: Vec<TransitionEvent>,
}

impl Transition {
    /// True if any event moved the squad between tiers.
    #[must_use]
    pub fn changed_tier(&self) -> bool {
        self.events.iter().any(TransitionEvent::changes_tier)
    }
}

/// Apply a match outcome.
///
/// The returned ledger keeps the input `version`; bumping it is the
/// persistence layer's job.
///
/// # Errors
/// Returns [`LedgerError::InvariantViolation`] if `state` is already
/// inconsistent or a counter would overflow, and
/// [`LedgerError::UnknownTier`] if the catalog lacks a tier.
pub fn apply(
    state: &SquadLedger,
    outcome: MatchOutcome,
    catalog: &DivisionCatalog,
    now: DateTime<Utc>,
) -> Result<Transition, LedgerError> {
    state.check_invariants(catalog)?;

    let mut next = state.clone();
    let mut events = Vec::with_capacity(3);
    match outcome {
        MatchOutcome::Win => apply_win(&mut next, &mut events, catalog, now)?,
        MatchOutcome::Loss => apply_loss(&mut next, &mut events, catalog, now)?,
    }

    Ok(Transition {
        ledger: next,
        events,
    })
}

fn apply_win(
    ledger: &mut SquadLedger,
    events: &mut Vec<TransitionEvent>,
    catalog: &DivisionCatalog,
    now: DateTime<Utc>,
) -> Result<(), LedgerError> {
    let reward = catalog.config_for(ledger.tier)?.win_reward;
    ledger.current_bounty_coins = ledger
        .current_bounty_coins
        .checked_add(reward)
        .ok_or_else(|| LedgerError::invariant(&ledger.squad_id, "coin balance overflow"))?;
    ledger.total_bounty_coins_earned = ledger
        .total_bounty_coins_earned
        .checked_add(reward)
        .ok_or_else(|| LedgerError::invariant(&ledger.squad_id, "earned counter overflow"))?;
    ledger.consecutive_unprotected_losses = 0;
    events.push(TransitionEvent::WinApplied {
        coins_awarded: reward,
    });

    loop {
        let config = catalog.config_for(ledger.tier)?;
        match (config.promotion_threshold, ledger.tier.next()) {
            (Some(threshold), Some(higher)) if ledger.current_bounty_coins >= threshold => {
                events.push(TransitionEvent::Promoted {
                    from: ledger.tier,
                    to: higher,
                });
                ledger.tier = higher;
                ledger.last_transition_at = now;
            }
            _ => break,
        }
    }

    ledger.protection_charges = catalog.config_for(ledger.tier)?.pity_grant_size;
    Ok(())
}

fn apply_loss(
    ledger: &mut SquadLedger,
    events: &mut Vec<TransitionEvent>,
    catalog: &DivisionCatalog,
    now: DateTime<Utc>,
) -> Result<(), LedgerError> {
    let config = catalog.config_for(ledger.tier)?;
    let deducted = ledger.current_bounty_coins.min(config.loss_penalty);
    ledger.current_bounty_coins -= deducted;
    events.push(TransitionEvent::LossApplied {
        coins_deducted: deducted,
    });

    if ledger.current_bounty_coins > 0 {
        ledger.consecutive_unprotected_losses = 0;
        return Ok(());
    }

    if ledger.protection_charges > 0 {
        ledger.protection_charges -= 1;
        ledger.consecutive_unprotected_losses = 0;
        events.push(TransitionEvent::ProtectionConsumed {
            remaining: ledger.protection_charges,
        });
        return Ok(());
    }

    ledger.consecutive_unprotected_losses += 1;
    if ledger.consecutive_unprotected_losses < DEMOTION_LOSS_STREAK {
        return Ok(());
    }

    match ledger.tier.previous() {
        Some(lower) => {
            let lower_config = catalog.config_for(lower)?;
            let threshold = lower_config.promotion_threshold.ok_or_else(|| {
                LedgerError::invariant(
                    &ledger.squad_id,
                    format!("{lower} has no promotion threshold"),
                )
            })?;
            events.push(TransitionEvent::Demoted {
                from: ledger.tier,
                to: lower,
            });
            ledger.tier = lower;
            ledger.current_bounty_coins = threshold.saturating_sub(1);
            ledger.protection_charges = lower_config.pity_grant_size;
        }
        None => {
            ledger.current_bounty_coins = 0;
            ledger.protection_charges = config.pity_grant_size;
            events.push(TransitionEvent::FloorReached);
        }
    }
    ledger.consecutive_unprotected_losses = 0;
    ledger.last_transition_at = now;
    Ok(())
}

/// Debit `amount` coins for a withdrawal.
///
/// # Errors
/// Returns [`LedgerError::Validation`] for a zero amount,
/// [`LedgerError::InsufficientBalance`] when the balance is too small, and
/// [`LedgerError::InvariantViolation`] for an inconsistent input.
pub fn spend(
    state: &SquadLedger,
    amount: u64,
    catalog: &DivisionCatalog,
) -> Result<SquadLedger, LedgerError> {
    if amount == 0 {
        return Err(LedgerError::validation("amount", "must be greater than zero"));
    }
    state.check_invariants(catalog)?;
    if amount > state.current_bounty_coins {
        return Err(LedgerError::InsufficientBalance {
            requested: amount,
            available: state.current_bounty_coins,
        });
    }

    let mut next = state.clone();
    next.current_bounty_coins -= amount;
    next.total_bounty_coins_spent = next
        .total_bounty_coins_spent
        .checked_add(amount)
        .ok_or_else(|| LedgerError::invariant(&next.squad_id, "spent counter overflow"))?;
    Ok(next)
}
