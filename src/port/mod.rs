//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (databases, notification backends, live subscribers).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!          ┌─────────┤  Domain + Port          ├─────────┐
//!          │         │                         │         │
//!          │         └─────────────────────────┘         │
//!          ▼                                             ▼
//!   ┌─────────────┐                               ┌───────────┐
//!   │   Store     │                               │ Notifier  │
//!   │   Adapter   │                               │  Adapter  │
//!   └─────────────┘                               └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`LedgerStore`] - Persistence for squad ledgers and reservations
//! - [`Notifier`], [`NotificationSink`] - Committed event delivery

pub mod outbound;

pub use outbound::notifier::{
    Event, NotificationSink, Notifier, NullNotifier, TransitionCommitted, WithdrawalEvent,
};
pub use outbound::store::LedgerStore;
