//! Ledger errors for the progression engine.
//!
//! Every failure the engine can surface to a caller is a variant here. The
//! variants map onto the caller-facing taxonomy:
//!
//! - validation failures ([`LedgerError::Validation`], [`LedgerError::InvalidOutcome`],
//!   [`LedgerError::UnknownTier`]) are rejected before any mutation;
//! - [`LedgerError::InsufficientBalance`] is rejected before any mutation;
//! - [`LedgerError::ConcurrencyConflict`] is retryable;
//! - [`LedgerError::InvariantViolation`] indicates an engine bug and fails closed.
//!
//! A duplicate outcome application is not an error; see
//! [`ApplyResult::Duplicate`](crate::application::ledger::ApplyResult).
//!
//! # Examples
//!
//! ```
//! use squadledger::domain::error::LedgerError;
//! use squadledger::domain::MatchOutcome;
//!
//! let result: Result<MatchOutcome, _> = "DRAW".parse();
//! assert!(matches!(result, Err(LedgerError::InvalidOutcome { .. })));
//! ```

use thiserror::Error;

use super::SquadId;

/// Errors raised by the progression engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed request input (amount, payout details, identifiers).
    #[error("validation failed for {field}: {reason}")]
    Validation {
        /// The offending input field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Match outcome outside WIN/LOSS.
    #[error("invalid match outcome '{value}'")]
    InvalidOutcome {
        /// The raw outcome that was supplied.
        value: String,
    },

    /// Tier lookup outside the division catalog.
    #[error("unknown division tier '{tier}'")]
    UnknownTier {
        /// The tier name or code that could not be resolved.
        tier: String,
    },

    /// Withdrawal larger than the current balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Coins requested.
        requested: u64,
        /// Coins currently held.
        available: u64,
    },

    /// Compare-and-swap retries exhausted. Safe to resubmit.
    #[error("concurrency conflict on squad {squad_id} after {attempts} attempts")]
    ConcurrencyConflict {
        /// Squad whose ledger kept changing underneath us.
        squad_id: SquadId,
        /// Number of attempts made.
        attempts: u32,
    },

    /// Ledger state breaks an invariant. Never corrected silently.
    #[error("invariant violation on squad {squad_id}: {detail}")]
    InvariantViolation {
        /// Squad whose ledger is inconsistent.
        squad_id: SquadId,
        /// Which invariant failed.
        detail: String,
    },

    /// No ledger exists for the squad.
    #[error("squad {0} has no ledger")]
    SquadNotFound(SquadId),

    /// The squad has been disbanded and its ledger archived.
    #[error("squad {0} is archived")]
    SquadArchived(SquadId),
}

impl LedgerError {
    /// Build a validation error.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Build an invariant violation.
    pub fn invariant(squad_id: &SquadId, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            squad_id: squad_id.clone(),
            detail: detail.into(),
        }
    }
}
