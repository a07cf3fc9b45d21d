//! Storage-agnostic progression domain.
//!
//! Everything here is pure: tiers and their economy settings, the squad
//! ledger record, and the outcome processor that advances it.

pub mod division;
pub mod error;
pub mod processor;

mod id;
mod ledger;
mod outcome;
mod tier;
mod withdrawal;

pub use division::{DivisionCatalog, DivisionConfig};
pub use id::{MatchResultId, ReservationId, SquadId};
pub use ledger::{LedgerSnapshot, SquadLedger, DEMOTION_LOSS_STREAK};
pub use outcome::{MatchOutcome, MatchOutcomeEvent, TransitionEvent};
pub use processor::Transition;
pub use tier::DivisionTier;
pub use withdrawal::{WithdrawalRequest, WithdrawalReservation, WithdrawalStatus};
