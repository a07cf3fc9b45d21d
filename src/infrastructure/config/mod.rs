//! Infrastructure configuration modules.

pub mod ledger;
pub mod logging;
pub mod notifier;
pub mod settings;
