//! Persistence port for squad ledgers and withdrawal reservations.

use std::future::Future;

use crate::domain::{SquadId, SquadLedger, WithdrawalReservation};
use crate::error::Result;

/// Storage operations for squad ledgers.
///
/// Every mutation goes through [`LedgerStore::compare_and_swap`]; there is no
/// unconditional update. Implementations must make the ledger write and the
/// optional reservation insert a single atomic unit.
pub trait LedgerStore: Send + Sync {
    /// Insert a new ledger. Returns `false` if one already exists.
    fn insert(&self, ledger: &SquadLedger) -> impl Future<Output = Result<bool>> + Send;

    /// Get a ledger by squad ID.
    fn load(&self, squad_id: &SquadId) -> impl Future<Output = Result<Option<SquadLedger>>> + Send;

    /// Replace the stored ledger with `next` if its version still equals
    /// `expected_version`, inserting `reservation` in the same write.
    ///
    /// Returns `false` on a version mismatch, leaving storage untouched.
    fn compare_and_swap(
        &self,
        expected_version: u64,
        next: &SquadLedger,
        reservation: Option<&WithdrawalReservation>,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// List ledgers, optionally including archived ones.
    fn list(&self, include_archived: bool) -> impl Future<Output = Result<Vec<SquadLedger>>> + Send;

    /// Reservations recorded for a squad, oldest first.
    fn withdrawals(
        &self,
        squad_id: &SquadId,
    ) -> impl Future<Output = Result<Vec<WithdrawalReservation>>> + Send;
}
