//! Notifier port for committed ledger events.
//!
//! This module defines the events published after a ledger write commits,
//! the fire-and-forget [`Notifier`] used by the application layer, and the
//! fallible [`NotificationSink`] that delivery backends implement.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    DivisionTier, LedgerSnapshot, MatchOutcome, MatchResultId, ReservationId, SquadId,
    TransitionEvent,
};
use crate::error::Result;

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A match outcome was committed to a ledger.
    TransitionCommitted(TransitionCommitted),
    /// Coins were reserved for a withdrawal.
    WithdrawalReserved(WithdrawalEvent),
    /// Coins were debited without a reservation.
    CoinsSpent {
        /// The squad that spent.
        squad_id: SquadId,
        /// Tier at the time of the debit.
        tier: DivisionTier,
        /// Coins debited.
        amount: u64,
        /// Coins left after the debit.
        remaining_coins: u64,
    },
    /// A new squad ledger was created.
    SquadCreated {
        /// The new squad.
        squad_id: SquadId,
        /// Starting tier.
        tier: DivisionTier,
    },
    /// A disbanded squad's ledger was archived.
    SquadArchived {
        /// The archived squad.
        squad_id: SquadId,
        /// Tier at the time of archiving.
        tier: DivisionTier,
    },
    /// An invariant violation aborted a ledger operation.
    OperatorAlert {
        /// The squad whose operation failed.
        squad_id: SquadId,
        /// Description of the violation.
        detail: String,
    },
}

impl Event {
    /// Squad the event concerns.
    #[must_use]
    pub fn squad_id(&self) -> &SquadId {
        match self {
            Event::TransitionCommitted(e) => &e.snapshot.squad_id,
            Event::WithdrawalReserved(e) => &e.squad_id,
            Event::CoinsSpent { squad_id, .. }
            | Event::SquadCreated { squad_id, .. }
            | Event::SquadArchived { squad_id, .. }
            | Event::OperatorAlert { squad_id, .. } => squad_id,
        }
    }

    /// Tiers whose standings this event may reorder.
    #[must_use]
    pub fn affected_tiers(&self) -> Vec<DivisionTier> {
        let mut tiers = match self {
            Event::TransitionCommitted(e) => {
                let mut tiers = vec![e.snapshot.tier];
                for event in &e.events {
                    if let TransitionEvent::Promoted { from, to }
                    | TransitionEvent::Demoted { from, to } = event
                    {
                        tiers.push(*from);
                        tiers.push(*to);
                    }
                }
                tiers
            }
            Event::WithdrawalReserved(e) => vec![e.tier],
            Event::CoinsSpent { tier, .. }
            | Event::SquadCreated { tier, .. }
            | Event::SquadArchived { tier, .. } => vec![*tier],
            Event::OperatorAlert { .. } => vec![],
        };
        tiers.sort();
        tiers.dedup();
        tiers
    }
}

/// Committed outcome application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionCommitted {
    /// Idempotency key of the applied match result.
    pub match_result_id: MatchResultId,
    /// The applied outcome.
    pub outcome: MatchOutcome,
    /// Events emitted by the outcome processor, in order.
    pub events: Vec<TransitionEvent>,
    /// Ledger state after the commit.
    pub snapshot: LedgerSnapshot,
    /// Ledger version after the commit.
    pub version: u64,
}

/// Committed withdrawal reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalEvent {
    /// Reservation reference for the payout workflow.
    pub reservation_id: ReservationId,
    /// The squad that withdrew.
    pub squad_id: SquadId,
    /// Tier whose rate was applied.
    pub tier: DivisionTier,
    /// Coins debited.
    pub coins: u64,
    /// Currency owed.
    pub currency_amount: Decimal,
    /// Coins left after the debit.
    pub remaining_coins: u64,
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget: `notify` is called after a ledger write
/// has committed and must return without waiting on delivery.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// Delivery backend driven by the transition notifier worker.
///
/// A returned error makes the worker retry the same event with backoff;
/// after the retry budget is spent the event is logged and dropped for this
/// sink only.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Deliver one event.
    async fn deliver(&self, event: &Event) -> Result<()>;
}
