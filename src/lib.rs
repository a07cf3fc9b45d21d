//! Squadledger - squad divisions and bounty-coin progression.
//!
//! Squads earn bounty coins for match wins and lose them for losses. Enough
//! coins promote a squad to the next division; repeated losses at zero coins,
//! once protection charges run out, demote it. Coins convert into a payout at
//! the division's rate.
//!
//! # Architecture
//!
//! - **`domain`** - Pure types and the outcome processor state machine
//! - **`port`** - Store and notifier traits the application depends on
//! - **`application`** - Ledger, conversion, standings, and notifier services
//! - **`adapter`** - SQLite and in-memory stores, notification sinks, CLI
//! - **`infrastructure`** - Configuration and the composition root
//!
//! Every ledger write is a compare-and-swap on the ledger version, so
//! concurrent outcomes for one squad serialize without a lock held across
//! I/O, and a redelivered match result is applied at most once.
//!
//! # Example
//!
//! ```no_run
//! use squadledger::domain::{MatchOutcome, MatchOutcomeEvent, MatchResultId, SquadId};
//! use squadledger::infrastructure::bootstrap::Engine;
//! use squadledger::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> squadledger::error::Result<()> {
//! let engine = Engine::open_sqlite(&Config::default())?;
//! let squad = SquadId::new("night-owls");
//! engine.ledger.create_squad(&squad).await?;
//! engine
//!     .ledger
//!     .apply_outcome(&MatchOutcomeEvent {
//!         squad_id: squad.clone(),
//!         match_result_id: MatchResultId::new("match-0001"),
//!         outcome: MatchOutcome::Win,
//!     })
//!     .await?;
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
