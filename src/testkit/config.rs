//! Canonical test configurations.
//!
//! Single source of truth for config structs and service wiring used across
//! tests. Avoids each test module defining its own slightly-different setup.

use std::sync::Arc;

use crate::adapter::outbound::memory::MemoryLedgerStore;
use crate::application::ledger::{LedgerPolicy, SquadLedgerService};
use crate::domain::DivisionCatalog;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::Notifier;
use crate::port::outbound::store::LedgerStore;

/// Defaults over an in-memory SQLite database with near-zero retry delays.
pub fn fast() -> Config {
    let mut config = Config {
        database: ":memory:".to_string(),
        ..Config::default()
    };
    config.notifier.initial_backoff_ms = 1;
    config.notifier.max_backoff_ms = 2;
    config
}

/// Ledger service over `store` with the default catalog and policy.
pub fn ledger_service<S: LedgerStore>(
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
) -> SquadLedgerService<S> {
    SquadLedgerService::new(
        store,
        Arc::new(DivisionCatalog::default()),
        notifier,
        LedgerPolicy::default(),
    )
}

/// Ledger service over a fresh in-memory store.
pub fn memory_service(
    notifier: Arc<dyn Notifier>,
) -> (Arc<MemoryLedgerStore>, SquadLedgerService<MemoryLedgerStore>) {
    let store = Arc::new(MemoryLedgerStore::new());
    (Arc::clone(&store), ledger_service(store, notifier))
}
