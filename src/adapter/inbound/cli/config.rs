//! Handlers for the `config` command group.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

/// Execute `config show`.
pub fn execute_show(config: &Config) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "config": config,
        }));
        return Ok(());
    }

    let rendered = toml::to_string_pretty(config).map_err(|e| Error::Parse(e.to_string()))?;
    output::section("Effective Configuration");
    println!("{rendered}");
    Ok(())
}

/// Execute `config validate`.
///
/// Loading already validated the file; this reports the result.
pub fn execute_validate(config: &Config) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "divisions": config.divisions.len(),
        }));
        return Ok(());
    }

    output::success("Configuration is valid");
    output::field("Database", &config.database);
    output::field("Divisions", config.divisions.len());
    output::field("CAS attempts", config.ledger.max_cas_attempts);
    Ok(())
}
