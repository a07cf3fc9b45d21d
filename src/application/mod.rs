//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod conversion;
pub mod leaderboard;
pub mod ledger;
pub mod notifier;
pub mod registry;

pub use conversion::ConversionService;
pub use leaderboard::{LeaderboardCache, StandingsService};
pub use ledger::{ApplyResult, LedgerPolicy, SquadLedgerService};
pub use notifier::{DeliveryPolicy, TransitionNotifier};
pub use registry::{ConnectionId, ConnectionRegistry};
