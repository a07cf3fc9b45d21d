//! Ledger write configuration.

use serde::{Deserialize, Serialize};

use crate::application::ledger::{
    LedgerPolicy, DEFAULT_IDEMPOTENCY_WINDOW, DEFAULT_MAX_CAS_ATTEMPTS,
};

/// `[ledger]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Compare-and-swap attempts before a write reports a conflict.
    #[serde(default = "default_max_cas_attempts")]
    pub max_cas_attempts: u32,
    /// Recent match result ids remembered per squad for deduplication.
    #[serde(default = "default_idempotency_window")]
    pub idempotency_window: usize,
}

const fn default_max_cas_attempts() -> u32 {
    DEFAULT_MAX_CAS_ATTEMPTS
}

const fn default_idempotency_window() -> usize {
    DEFAULT_IDEMPOTENCY_WINDOW
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_cas_attempts: default_max_cas_attempts(),
            idempotency_window: default_idempotency_window(),
        }
    }
}

impl From<&LedgerConfig> for LedgerPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            max_cas_attempts: config.max_cas_attempts,
            idempotency_window: config.idempotency_window,
        }
    }
}
