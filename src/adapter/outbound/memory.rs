//! In-memory ledger store for tests and embedding.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::{SquadId, SquadLedger, WithdrawalReservation};
use crate::error::Result;
use crate::port::outbound::store::LedgerStore;

/// In-memory store.
///
/// The ledger map's write lock covers the version check, the ledger write and
/// the reservation insert, which makes each compare-and-swap atomic.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledgers: RwLock<HashMap<SquadId, SquadLedger>>,
    withdrawals: RwLock<Vec<WithdrawalReservation>>,
}

impl MemoryLedgerStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn insert(&self, ledger: &SquadLedger) -> Result<bool> {
        let mut ledgers = self.ledgers.write();
        if ledgers.contains_key(&ledger.squad_id) {
            return Ok(false);
        }
        ledgers.insert(ledger.squad_id.clone(), ledger.clone());
        Ok(true)
    }

    async fn load(&self, squad_id: &SquadId) -> Result<Option<SquadLedger>> {
        Ok(self.ledgers.read().get(squad_id).cloned())
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        next: &SquadLedger,
        reservation: Option<&WithdrawalReservation>,
    ) -> Result<bool> {
        let mut ledgers = self.ledgers.write();
        let Some(current) = ledgers.get_mut(&next.squad_id) else {
            return Ok(false);
        };
        if current.version != expected_version {
            return Ok(false);
        }
        *current = next.clone();
        if let Some(reservation) = reservation {
            self.withdrawals.write().push(reservation.clone());
        }
        Ok(true)
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<SquadLedger>> {
        let ledgers = self.ledgers.read();
        Ok(ledgers
            .values()
            .filter(|l| include_archived || !l.is_archived())
            .cloned()
            .collect())
    }

    async fn withdrawals(&self, squad_id: &SquadId) -> Result<Vec<WithdrawalReservation>> {
        Ok(self
            .withdrawals
            .read()
            .iter()
            .filter(|w| &w.squad_id == squad_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ledger(id: &str) -> SquadLedger {
        SquadLedger::new(SquadId::new(id), Utc::now())
    }

    #[tokio::test]
    async fn insert_is_create_if_absent() {
        let store = MemoryLedgerStore::new();
        assert!(store.insert(&ledger("a")).await.unwrap());
        assert!(!store.insert(&ledger("a")).await.unwrap());
    }

    #[tokio::test]
    async fn compare_and_swap_checks_version() {
        let store = MemoryLedgerStore::new();
        let original = ledger("a");
        store.insert(&original).await.unwrap();

        let mut next = original.clone();
        next.current_bounty_coins = 50;
        next.version = 1;

        assert!(!store.compare_and_swap(3, &next, None).await.unwrap());
        assert!(store.compare_and_swap(0, &next, None).await.unwrap());
        // Stale writer loses.
        assert!(!store.compare_and_swap(0, &next, None).await.unwrap());

        let loaded = store.load(&SquadId::new("a")).await.unwrap().unwrap();
        assert_eq!(loaded.current_bounty_coins, 50);
        assert_eq!(loaded.version, 1);
    }

    #[tokio::test]
    async fn compare_and_swap_on_missing_squad_fails() {
        let store = MemoryLedgerStore::new();
        assert!(!store.compare_and_swap(0, &ledger("ghost"), None).await.unwrap());
    }

    #[tokio::test]
    async fn list_filters_archived_by_default() {
        let store = MemoryLedgerStore::new();
        store.insert(&ledger("a")).await.unwrap();
        let mut archived = ledger("b");
        archived.archived_at = Some(Utc::now());
        store.insert(&archived).await.unwrap();

        assert_eq!(store.list(false).await.unwrap().len(), 1);
        assert_eq!(store.list(true).await.unwrap().len(), 2);
    }
}
