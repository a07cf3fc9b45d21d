//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `SQUADLEDGER_DATABASE` overrides
//! the database path so deployments can relocate storage without editing it.
//!
//! # Example
//!
//! ```no_run
//! use squadledger::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     let catalog = config.catalog()?;
//!     println!("{} divisions", catalog.divisions().len());
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ledger::LedgerConfig;
use super::logging::LoggingConfig;
use super::notifier::NotifierConfig;
use crate::domain::division::{default_divisions, DEFAULT_CONVERSION_BLOCK};
use crate::domain::error::LedgerError;
use crate::domain::{DivisionCatalog, DivisionConfig};
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "SQUADLEDGER_DATABASE";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the built-in divisions and
/// defaults. Load from a TOML file using [`Config::load`] or parse directly
/// with [`Config::parse_toml`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Path to SQLite database file, or `:memory:`.
    ///
    /// Defaults to "squadledger.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Coins per currency conversion block.
    #[serde(default = "default_conversion_block")]
    pub conversion_block: u64,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ledger retry and deduplication limits.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Notification delivery settings.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Per-tier progression and conversion settings, lowest tier first.
    #[serde(default = "default_divisions")]
    pub divisions: Vec<DivisionConfig>,
}

fn default_database_path() -> String {
    "squadledger.db".to_string()
}

const fn default_conversion_block() -> u64 {
    DEFAULT_CONVERSION_BLOCK
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            conversion_block: default_conversion_block(),
            logging: LoggingConfig::default(),
            ledger: LedgerConfig::default(),
            notifier: NotifierConfig::default(),
            divisions: default_divisions(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                self.database = database;
            }
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            }
            .into());
        }
        if self.ledger.max_cas_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ledger.max_cas_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.ledger.idempotency_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ledger.idempotency_window",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.notifier.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifier.max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.notifier.initial_backoff_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifier.initial_backoff_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.notifier.max_backoff_ms < self.notifier.initial_backoff_ms {
            return Err(ConfigError::InvalidValue {
                field: "notifier.max_backoff_ms",
                reason: "must be >= initial_backoff_ms".to_string(),
            }
            .into());
        }
        if self.notifier.subscriber_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifier.subscriber_buffer",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        self.catalog()?;
        Ok(())
    }

    /// Build the division catalog from `[[divisions]]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the divisions are inconsistent.
    #[allow(clippy::result_large_err)]
    pub fn catalog(&self) -> Result<DivisionCatalog> {
        DivisionCatalog::try_new(self.divisions.clone(), self.conversion_block).map_err(|e| {
            match e {
                LedgerError::Validation { field, reason } => ConfigError::InvalidValue {
                    field,
                    reason,
                }
                .into(),
                other => ConfigError::InvalidValue {
                    field: "divisions",
                    reason: other.to_string(),
                }
                .into(),
            }
        })
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
