//! Squad ledger service.
//!
//! Owns every write to a squad's ledger. Each write is a read, a pure state
//! transition, and a compare-and-swap keyed on the ledger version; a version
//! mismatch reloads and retries up to a bounded number of attempts. Match
//! outcomes are deduplicated against the ledger's recent-history window inside
//! the same loop, so a redelivered outcome is a no-op even when it races with
//! its own first delivery.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::domain::error::LedgerError;
use crate::domain::processor::{self, Transition};
use crate::domain::{
    DivisionCatalog, LedgerSnapshot, MatchOutcomeEvent, SquadId, SquadLedger,
    WithdrawalReservation,
};
use crate::error::Result;
use crate::port::outbound::notifier::{Event, Notifier, TransitionCommitted, WithdrawalEvent};
use crate::port::outbound::store::LedgerStore;

/// Default bound on compare-and-swap attempts per operation.
pub const DEFAULT_MAX_CAS_ATTEMPTS: u32 = 5;

/// Default number of recent match result ids kept per squad.
pub const DEFAULT_IDEMPOTENCY_WINDOW: usize = 256;

/// Retry and deduplication limits for ledger writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    pub max_cas_attempts: u32,
    pub idempotency_window: usize,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            max_cas_attempts: DEFAULT_MAX_CAS_ATTEMPTS,
            idempotency_window: DEFAULT_IDEMPOTENCY_WINDOW,
        }
    }
}

/// Result of applying a match outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyResult {
    /// The outcome was committed. The ledger carries the new version.
    Applied(Transition),
    /// The match result was already applied; this is the unchanged ledger.
    Duplicate(SquadLedger),
}

impl ApplyResult {
    /// Ledger state after the call.
    #[must_use]
    pub fn ledger(&self) -> &SquadLedger {
        match self {
            ApplyResult::Applied(t) => &t.ledger,
            ApplyResult::Duplicate(l) => l,
        }
    }

    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ApplyResult::Duplicate(_))
    }
}

enum Step<T> {
    Write(SquadLedger, T),
    Skip(SquadLedger),
}

/// Application service for squad ledgers.
pub struct SquadLedgerService<S> {
    store: Arc<S>,
    catalog: Arc<DivisionCatalog>,
    notifier: Arc<dyn Notifier>,
    policy: LedgerPolicy,
}

impl<S: LedgerStore> SquadLedgerService<S> {
    pub fn new(
        store: Arc<S>,
        catalog: Arc<DivisionCatalog>,
        notifier: Arc<dyn Notifier>,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            notifier,
            policy,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &DivisionCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Create the ledger for a new squad, or return the existing one.
    ///
    /// # Errors
    /// Returns a validation error for an empty id, or a storage error.
    pub async fn create_squad(&self, squad_id: &SquadId) -> Result<SquadLedger> {
        if squad_id.as_str().trim().is_empty() {
            return Err(LedgerError::validation("squad_id", "must not be empty").into());
        }

        let ledger = SquadLedger::new(squad_id.clone(), Utc::now());
        if self.store.insert(&ledger).await? {
            info!(squad_id = %squad_id, tier = %ledger.tier, "Squad ledger created");
            self.notifier.notify(Event::SquadCreated {
                squad_id: squad_id.clone(),
                tier: ledger.tier,
            });
            return Ok(ledger);
        }
        debug!(squad_id = %squad_id, "Squad ledger already exists");
        self.ledger(squad_id).await
    }

    /// Full ledger record.
    ///
    /// # Errors
    /// Returns [`LedgerError::SquadNotFound`] if no ledger exists.
    pub async fn ledger(&self, squad_id: &SquadId) -> Result<SquadLedger> {
        self.store
            .load(squad_id)
            .await?
            .ok_or_else(|| LedgerError::SquadNotFound(squad_id.clone()).into())
    }

    /// `GetSquadLedger` query.
    ///
    /// # Errors
    /// Returns [`LedgerError::SquadNotFound`] if no ledger exists.
    pub async fn get_ledger(&self, squad_id: &SquadId) -> Result<LedgerSnapshot> {
        Ok(self.ledger(squad_id).await?.snapshot())
    }

    /// Apply a match outcome exactly once.
    ///
    /// # Errors
    /// Returns [`LedgerError::ConcurrencyConflict`] when every attempt lost
    /// the version race, [`LedgerError::InvariantViolation`] when the stored
    /// ledger is inconsistent, and [`LedgerError::SquadArchived`] for a
    /// disbanded squad.
    pub async fn apply_outcome(&self, event: &MatchOutcomeEvent) -> Result<ApplyResult> {
        if event.match_result_id.as_str().trim().is_empty() {
            return Err(LedgerError::validation("match_result_id", "must not be empty").into());
        }

        let window = self.policy.idempotency_window;
        let step = self
            .commit(&event.squad_id, None, |current| {
                if current.has_applied(&event.match_result_id) {
                    return Ok(Step::Skip(current.clone()));
                }
                if current.is_archived() {
                    return Err(LedgerError::SquadArchived(current.squad_id.clone()));
                }
                let transition = processor::apply(current, event.outcome, &self.catalog, Utc::now())?;
                let mut next = transition.ledger;
                next.remember_match(event.match_result_id.clone(), window);
                Ok(Step::Write(next, transition.events))
            })
            .await?;

        match step {
            Step::Skip(ledger) => {
                info!(
                    squad_id = %event.squad_id,
                    match_result_id = %event.match_result_id,
                    "Duplicate match result ignored"
                );
                Ok(ApplyResult::Duplicate(ledger))
            }
            Step::Write(ledger, events) => {
                let transition = Transition { ledger, events };
                self.log_transition(event, &transition);
                self.notifier
                    .notify(Event::TransitionCommitted(TransitionCommitted {
                        match_result_id: event.match_result_id.clone(),
                        outcome: event.outcome,
                        events: transition.events.clone(),
                        snapshot: transition.ledger.snapshot(),
                        version: transition.ledger.version,
                    }));
                Ok(ApplyResult::Applied(transition))
            }
        }
    }

    /// Debit coins without recording a withdrawal.
    ///
    /// # Errors
    /// Returns [`LedgerError::InsufficientBalance`] when `amount` exceeds the
    /// balance, plus the same failures as [`Self::apply_outcome`].
    pub async fn spend(&self, squad_id: &SquadId, amount: u64) -> Result<SquadLedger> {
        let ledger = self.debit(squad_id, amount, None).await?;
        info!(squad_id = %squad_id, amount, remaining = ledger.current_bounty_coins, "Coins spent");
        self.notifier.notify(Event::CoinsSpent {
            squad_id: squad_id.clone(),
            tier: ledger.tier,
            amount,
            remaining_coins: ledger.current_bounty_coins,
        });
        Ok(ledger)
    }

    /// Debit a reservation's coins and persist the reservation in the same
    /// atomic write.
    ///
    /// # Errors
    /// Same as [`Self::spend`].
    pub async fn spend_with_reservation(
        &self,
        reservation: &WithdrawalReservation,
    ) -> Result<SquadLedger> {
        let ledger = self
            .debit(&reservation.squad_id, reservation.coins, Some(reservation))
            .await?;
        info!(
            squad_id = %reservation.squad_id,
            reservation_id = %reservation.id,
            coins = reservation.coins,
            currency = %reservation.currency_amount,
            remaining = ledger.current_bounty_coins,
            "Withdrawal reserved"
        );
        self.notifier.notify(Event::WithdrawalReserved(WithdrawalEvent {
            reservation_id: reservation.id.clone(),
            squad_id: reservation.squad_id.clone(),
            tier: reservation.tier,
            coins: reservation.coins,
            currency_amount: reservation.currency_amount,
            remaining_coins: ledger.current_bounty_coins,
        }));
        Ok(ledger)
    }

    /// Archive a disbanded squad's ledger. Archiving twice is a no-op.
    ///
    /// # Errors
    /// Returns [`LedgerError::SquadNotFound`] or a concurrency conflict.
    pub async fn archive_squad(&self, squad_id: &SquadId) -> Result<SquadLedger> {
        let step = self
            .commit(squad_id, None, |current| {
                if current.is_archived() {
                    return Ok(Step::Skip(current.clone()));
                }
                let mut next = current.clone();
                next.archived_at = Some(Utc::now());
                Ok(Step::Write(next, ()))
            })
            .await?;

        match step {
            Step::Skip(ledger) => Ok(ledger),
            Step::Write(ledger, ()) => {
                info!(squad_id = %squad_id, tier = %ledger.tier, "Squad ledger archived");
                self.notifier.notify(Event::SquadArchived {
                    squad_id: squad_id.clone(),
                    tier: ledger.tier,
                });
                Ok(ledger)
            }
        }
    }

    /// Reservations recorded for a squad, oldest first.
    ///
    /// # Errors
    /// Returns [`LedgerError::SquadNotFound`] if no ledger exists.
    pub async fn withdrawals(&self, squad_id: &SquadId) -> Result<Vec<WithdrawalReservation>> {
        self.ledger(squad_id).await?;
        self.store.withdrawals(squad_id).await
    }

    async fn debit(
        &self,
        squad_id: &SquadId,
        amount: u64,
        reservation: Option<&WithdrawalReservation>,
    ) -> Result<SquadLedger> {
        let step = self
            .commit(squad_id, reservation, |current| {
                if current.is_archived() {
                    return Err(LedgerError::SquadArchived(current.squad_id.clone()));
                }
                Ok(Step::Write(processor::spend(current, amount, &self.catalog)?, ()))
            })
            .await?;

        match step {
            Step::Write(ledger, ()) | Step::Skip(ledger) => Ok(ledger),
        }
    }

    /// Load, transform, and compare-and-swap until the write lands.
    ///
    /// `step` runs once per attempt against a freshly loaded ledger. A
    /// returned `Write` ledger gets the next version before the swap.
    async fn commit<T, F>(
        &self,
        squad_id: &SquadId,
        reservation: Option<&WithdrawalReservation>,
        mut step: F,
    ) -> Result<Step<T>>
    where
        F: FnMut(&SquadLedger) -> std::result::Result<Step<T>, LedgerError> + Send,
        T: Send,
    {
        let attempts = self.policy.max_cas_attempts.max(1);
        for attempt in 1..=attempts {
            let current = self.ledger(squad_id).await?;

            let (mut next, value) = match step(&current).map_err(|e| self.reject(e))? {
                Step::Skip(ledger) => return Ok(Step::Skip(ledger)),
                Step::Write(next, value) => (next, value),
            };
            next.check_invariants(&self.catalog)
                .map_err(|e| self.reject(e))?;
            next.version = current.version + 1;

            if self
                .store
                .compare_and_swap(current.version, &next, reservation)
                .await?
            {
                return Ok(Step::Write(next, value));
            }
            debug!(
                squad_id = %squad_id,
                version = current.version,
                attempt,
                "Ledger version conflict, reloading"
            );
        }

        warn!(squad_id = %squad_id, attempts, "Ledger write retries exhausted");
        Err(LedgerError::ConcurrencyConflict {
            squad_id: squad_id.clone(),
            attempts,
        }
        .into())
    }

    fn reject(&self, err: LedgerError) -> crate::error::Error {
        if let LedgerError::InvariantViolation { squad_id, detail } = &err {
            error!(squad_id = %squad_id, detail = %detail, "Ledger invariant violated, write aborted");
            self.notifier.notify(Event::OperatorAlert {
                squad_id: squad_id.clone(),
                detail: detail.clone(),
            });
        }
        err.into()
    }

    fn log_transition(&self, event: &MatchOutcomeEvent, transition: &Transition) {
        let ledger = &transition.ledger;
        if transition.changed_tier() {
            info!(
                squad_id = %event.squad_id,
                match_result_id = %event.match_result_id,
                outcome = %event.outcome,
                tier = %ledger.tier,
                coins = ledger.current_bounty_coins,
                version = ledger.version,
                "Squad changed division"
            );
        } else {
            debug!(
                squad_id = %event.squad_id,
                match_result_id = %event.match_result_id,
                outcome = %event.outcome,
                coins = ledger.current_bounty_coins,
                protection = ledger.protection_charges,
                version = ledger.version,
                "Match outcome applied"
            );
        }
    }
}
