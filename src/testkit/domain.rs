//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for squads, match outcomes, and
//! ledgers in a chosen state so tests focus on assertions rather than
//! construction boilerplate.

use chrono::{TimeZone, Utc};

use crate::domain::{
    DivisionTier, MatchOutcome, MatchOutcomeEvent, MatchResultId, SquadId, SquadLedger,
    WithdrawalRequest,
};

/// Create a [`SquadId`] from a string.
pub fn squad(id: &str) -> SquadId {
    SquadId::new(id)
}

/// Create a [`MatchResultId`] from a string.
pub fn match_id(id: &str) -> MatchResultId {
    MatchResultId::new(id)
}

/// Outcome event for `squad` with match id `id`.
pub fn outcome(squad_id: &str, id: &str, outcome: MatchOutcome) -> MatchOutcomeEvent {
    MatchOutcomeEvent {
        squad_id: squad(squad_id),
        match_result_id: match_id(id),
        outcome,
    }
}

/// Win event.
pub fn win(squad_id: &str, id: &str) -> MatchOutcomeEvent {
    outcome(squad_id, id, MatchOutcome::Win)
}

/// Loss event.
pub fn loss(squad_id: &str, id: &str) -> MatchOutcomeEvent {
    outcome(squad_id, id, MatchOutcome::Loss)
}

/// Ledger for `squad_id` at `tier` holding `coins` and `protection` charges.
///
/// Timestamps are fixed so ledgers built twice compare equal.
pub fn ledger_at(squad_id: &str, tier: DivisionTier, coins: u64, protection: u32) -> SquadLedger {
    let epoch = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let mut ledger = SquadLedger::new(squad(squad_id), epoch);
    ledger.tier = tier;
    ledger.current_bounty_coins = coins;
    ledger.protection_charges = protection;
    ledger
}

/// Withdrawal request with placeholder payout details.
pub fn withdrawal(squad_id: &str, coins: u64) -> WithdrawalRequest {
    WithdrawalRequest {
        squad_id: squad(squad_id),
        requested_coins: coins,
        payout_details: "acct:test-payout".to_string(),
    }
}
