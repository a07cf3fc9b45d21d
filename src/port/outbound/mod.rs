//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's infrastructure dependencies:
//! ledger storage and notification delivery.

pub mod notifier;
pub mod store;
