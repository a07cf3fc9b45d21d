//! SQLite ledger store implementation.
//!
//! Provides persistent storage for squad ledgers and withdrawal reservations
//! using SQLite and Diesel ORM. Compare-and-swap is a single
//! `UPDATE ... WHERE version = ?` inside an immediate transaction, together
//! with the reservation insert.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{LedgerRow, WithdrawalRow};
use crate::adapter::outbound::sqlite::database::schema::{squad_ledgers, withdrawals};
use crate::domain::{
    DivisionTier, MatchResultId, ReservationId, SquadId, SquadLedger, WithdrawalReservation,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::LedgerStore;

/// SQLite-backed ledger store.
pub struct SqliteLedgerStore {
    /// Database connection pool.
    pool: DbPool,
}

fn to_i64(field: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::Parse(format!("{field} {value} exceeds storage range")))
}

fn to_u64(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::Parse(format!("{field} {value} is negative")))
}

fn to_u32(field: &str, value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Parse(format!("{field} {value} is negative")))
}

fn to_i32(field: &str, value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::Parse(format!("{field} {value} exceeds storage range")))
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| Error::Parse(e.to_string()))?
        .with_timezone(&Utc))
}

fn parse_decimal(value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| Error::Parse(e.to_string()))
}

impl SqliteLedgerStore {
    /// Create a new SQLite ledger store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(ledger: &SquadLedger) -> Result<LedgerRow> {
        Ok(LedgerRow {
            squad_id: ledger.squad_id.to_string(),
            tier: ledger.tier.code(),
            current_bounty_coins: to_i64("current_bounty_coins", ledger.current_bounty_coins)?,
            total_bounty_coins_earned: to_i64(
                "total_bounty_coins_earned",
                ledger.total_bounty_coins_earned,
            )?,
            total_bounty_coins_spent: to_i64(
                "total_bounty_coins_spent",
                ledger.total_bounty_coins_spent,
            )?,
            protection_charges: to_i32("protection_charges", ledger.protection_charges)?,
            consecutive_unprotected_losses: to_i32(
                "consecutive_unprotected_losses",
                ledger.consecutive_unprotected_losses,
            )?,
            version: to_i64("version", ledger.version)?,
            applied_match_result_ids: serde_json::to_string(&ledger.applied_match_result_ids)?,
            last_transition_at: ledger.last_transition_at.to_rfc3339(),
            created_at: ledger.created_at.to_rfc3339(),
            archived_at: ledger.archived_at.map(|t| t.to_rfc3339()),
        })
    }

    fn from_row(row: LedgerRow) -> Result<SquadLedger> {
        let applied: VecDeque<MatchResultId> = serde_json::from_str(&row.applied_match_result_ids)?;

        Ok(SquadLedger {
            squad_id: SquadId::from(row.squad_id),
            tier: DivisionTier::from_code(row.tier)?,
            current_bounty_coins: to_u64("current_bounty_coins", row.current_bounty_coins)?,
            total_bounty_coins_earned: to_u64(
                "total_bounty_coins_earned",
                row.total_bounty_coins_earned,
            )?,
            total_bounty_coins_spent: to_u64(
                "total_bounty_coins_spent",
                row.total_bounty_coins_spent,
            )?,
            protection_charges: to_u32("protection_charges", row.protection_charges)?,
            consecutive_unprotected_losses: to_u32(
                "consecutive_unprotected_losses",
                row.consecutive_unprotected_losses,
            )?,
            version: to_u64("version", row.version)?,
            applied_match_result_ids: applied,
            last_transition_at: parse_time(&row.last_transition_at)?,
            created_at: parse_time(&row.created_at)?,
            archived_at: row.archived_at.as_deref().map(parse_time).transpose()?,
        })
    }

    fn to_withdrawal_row(reservation: &WithdrawalReservation) -> Result<WithdrawalRow> {
        Ok(WithdrawalRow {
            id: reservation.id.to_string(),
            squad_id: reservation.squad_id.to_string(),
            tier: reservation.tier.code(),
            coins: to_i64("coins", reservation.coins)?,
            conversion_rate: reservation.conversion_rate.to_string(),
            currency_amount: reservation.currency_amount.to_string(),
            payout_details: reservation.payout_details.clone(),
            status: reservation.status.as_str().to_string(),
            requested_at: reservation.requested_at.to_rfc3339(),
        })
    }

    fn from_withdrawal_row(row: WithdrawalRow) -> Result<WithdrawalReservation> {
        Ok(WithdrawalReservation {
            id: ReservationId::from(row.id),
            squad_id: SquadId::from(row.squad_id),
            tier: DivisionTier::from_code(row.tier)?,
            coins: to_u64("coins", row.coins)?,
            conversion_rate: parse_decimal(&row.conversion_rate)?,
            currency_amount: parse_decimal(&row.currency_amount)?,
            payout_details: row.payout_details,
            status: row.status.parse()?,
            requested_at: parse_time(&row.requested_at)?,
        })
    }
}

impl LedgerStore for SqliteLedgerStore {
    async fn insert(&self, ledger: &SquadLedger) -> Result<bool> {
        let row = Self::to_row(ledger)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let inserted = diesel::insert_or_ignore_into(squad_ledgers::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    async fn load(&self, squad_id: &SquadId) -> Result<Option<SquadLedger>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<LedgerRow> = squad_ledgers::table
            .find(squad_id.as_str())
            .select(LedgerRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        next: &SquadLedger,
        reservation: Option<&WithdrawalReservation>,
    ) -> Result<bool> {
        let row = Self::to_row(next)?;
        let reservation_row = reservation.map(Self::to_withdrawal_row).transpose()?;
        let expected = to_i64("version", expected_version)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.immediate_transaction(|conn| {
            let updated = diesel::update(
                squad_ledgers::table
                    .filter(squad_ledgers::squad_id.eq(&row.squad_id))
                    .filter(squad_ledgers::version.eq(expected)),
            )
            .set(&row)
            .execute(conn)?;

            if updated == 0 {
                return Ok(false);
            }

            if let Some(withdrawal) = &reservation_row {
                diesel::insert_into(withdrawals::table)
                    .values(withdrawal)
                    .execute(conn)?;
            }

            Ok::<bool, diesel::result::Error>(true)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<SquadLedger>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let query = squad_ledgers::table
            .select(LedgerRow::as_select())
            .order((
                squad_ledgers::tier.desc(),
                squad_ledgers::current_bounty_coins.desc(),
            ));
        let rows: Vec<LedgerRow> = if include_archived {
            query
                .load(&mut conn)
                .map_err(|e| Error::Database(e.to_string()))?
        } else {
            query
                .filter(squad_ledgers::archived_at.is_null())
                .load(&mut conn)
                .map_err(|e| Error::Database(e.to_string()))?
        };

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn withdrawals(&self, squad_id: &SquadId) -> Result<Vec<WithdrawalReservation>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<WithdrawalRow> = withdrawals::table
            .filter(withdrawals::squad_id.eq(squad_id.as_str()))
            .order(withdrawals::requested_at.asc())
            .select(WithdrawalRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_withdrawal_row).collect()
    }
}
