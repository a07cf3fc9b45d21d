//! Withdrawal requests and the reservations they produce.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::id::{ReservationId, SquadId};
use super::tier::DivisionTier;

/// Inbound coin-to-currency request from a squad leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub squad_id: SquadId,
    pub requested_coins: u64,
    /// Opaque payout destination, forwarded to the payout workflow as-is.
    pub payout_details: String,
}

impl WithdrawalRequest {
    /// Reject malformed requests before touching the ledger.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] for a zero amount or empty payout
    /// details.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.requested_coins == 0 {
            return Err(LedgerError::validation(
                "requested_coins",
                "must be greater than zero",
            ));
        }
        if self.payout_details.trim().is_empty() {
            return Err(LedgerError::validation(
                "payout_details",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Fulfillment state, advanced by the manual payout workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Paid,
}

impl WithdrawalStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Paid => "PAID",
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithdrawalStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "PAID" => Ok(Self::Paid),
            other => Err(LedgerError::validation(
                "status",
                format!("unknown withdrawal status '{other}'"),
            )),
        }
    }
}

/// Coins debited for a withdrawal, with the rate locked at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReservation {
    pub id: ReservationId,
    pub squad_id: SquadId,
    /// Tier whose rate was applied.
    pub tier: DivisionTier,
    pub coins: u64,
    pub conversion_rate: Decimal,
    pub currency_amount: Decimal,
    pub payout_details: String,
    pub status: WithdrawalStatus,
    pub requested_at: DateTime<Utc>,
}
