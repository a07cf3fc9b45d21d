//! Composition root: wires stores, services, and the notifier worker.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapter::outbound::memory::MemoryLedgerStore;
use crate::adapter::outbound::notifier::{LeaderboardSink, LogSink, SubscriberSink};
use crate::adapter::outbound::sqlite::database::connection;
use crate::adapter::outbound::sqlite::SqliteLedgerStore;
use crate::application::conversion::ConversionService;
use crate::application::leaderboard::{LeaderboardCache, StandingsService};
use crate::application::ledger::{LedgerPolicy, SquadLedgerService};
use crate::application::notifier::TransitionNotifier;
use crate::application::registry::ConnectionRegistry;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::NotificationSink;
use crate::port::outbound::store::LedgerStore;

/// Build the default sink set: log, leaderboard invalidation, live fan-out.
pub(crate) fn build_sinks(
    leaderboard: &Arc<LeaderboardCache>,
    registry: &Arc<ConnectionRegistry>,
) -> Vec<Arc<dyn NotificationSink>> {
    vec![
        Arc::new(LogSink),
        Arc::new(LeaderboardSink::new(Arc::clone(leaderboard))),
        Arc::new(SubscriberSink::new(Arc::clone(registry))),
    ]
}

/// Fully wired engine over one ledger store.
///
/// Must be built inside a tokio runtime; the notifier worker is spawned on
/// construction and runs until [`Engine::shutdown`] or drop.
pub struct Engine<S> {
    pub ledger: Arc<SquadLedgerService<S>>,
    pub conversion: ConversionService<S>,
    pub standings: StandingsService<S>,
    pub registry: Arc<ConnectionRegistry>,
    pub leaderboard: Arc<LeaderboardCache>,
    worker: JoinHandle<()>,
}

impl<S: LedgerStore + 'static> Engine<S> {
    /// Wire services over `store` using `config`.
    ///
    /// # Errors
    /// Returns a config error if the divisions are invalid.
    pub fn new(store: Arc<S>, config: &Config) -> Result<Self> {
        let catalog = Arc::new(config.catalog()?);
        let leaderboard = Arc::new(LeaderboardCache::new());
        let registry = Arc::new(ConnectionRegistry::new(config.notifier.subscriber_buffer));

        let (notifier, worker) = TransitionNotifier::spawn(
            build_sinks(&leaderboard, &registry),
            config.notifier.delivery_policy(),
        );

        let ledger = Arc::new(SquadLedgerService::new(
            Arc::clone(&store),
            catalog,
            Arc::new(notifier),
            LedgerPolicy::from(&config.ledger),
        ));

        Ok(Self {
            conversion: ConversionService::new(Arc::clone(&ledger)),
            standings: StandingsService::new(store, Arc::clone(&leaderboard)),
            ledger,
            registry,
            leaderboard,
            worker,
        })
    }

    /// Drop the services and wait for queued notifications to drain.
    pub async fn shutdown(self) {
        let Self {
            ledger,
            conversion,
            standings,
            registry,
            leaderboard,
            worker,
        } = self;
        // The worker exits once the last notifier handle is gone.
        drop((ledger, conversion, standings, registry, leaderboard));
        if let Err(e) = worker.await {
            error!(error = %e, "Notifier worker panicked");
        }
    }
}

impl Engine<SqliteLedgerStore> {
    /// Open (creating and migrating if needed) the configured database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_sqlite(config: &Config) -> Result<Self> {
        let pool = connection::open(&config.database)?;
        info!(database = %config.database, "Ledger database ready");
        Self::new(Arc::new(SqliteLedgerStore::new(pool)), config)
    }
}

impl Engine<MemoryLedgerStore> {
    /// Engine over a fresh in-memory store.
    ///
    /// # Errors
    /// Returns a config error if the divisions are invalid.
    pub fn in_memory(config: &Config) -> Result<Self> {
        Self::new(Arc::new(MemoryLedgerStore::new()), config)
    }
}
