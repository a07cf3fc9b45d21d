//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{squad_ledgers, withdrawals};

/// Database row for a squad ledger.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = squad_ledgers)]
#[diesel(primary_key(squad_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerRow {
    pub squad_id: String,
    pub tier: i32,
    pub current_bounty_coins: i64,
    pub total_bounty_coins_earned: i64,
    pub total_bounty_coins_spent: i64,
    pub protection_charges: i32,
    pub consecutive_unprotected_losses: i32,
    pub version: i64,
    pub applied_match_result_ids: String,
    pub last_transition_at: String,
    pub created_at: String,
    pub archived_at: Option<String>,
}

/// Database row for a withdrawal reservation.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = withdrawals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WithdrawalRow {
    pub id: String,
    pub squad_id: String,
    pub tier: i32,
    pub coins: i64,
    pub conversion_rate: String,
    pub currency_amount: String,
    pub payout_details: String,
    pub status: String,
    pub requested_at: String,
}
