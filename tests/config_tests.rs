use std::fs;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use squadledger::domain::DivisionTier;
use squadledger::error::{ConfigError, Error};
use squadledger::infrastructure::config::settings::Config;
use tempfile::TempDir;

fn write_temp_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn empty_file_yields_builtin_divisions() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(write_temp_config(&dir, "")).unwrap();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.ledger.max_cas_attempts, 5);
    assert_eq!(config.conversion_block, 50);

    let catalog = config.catalog().unwrap();
    let silver = catalog.config_for(DivisionTier::Silver).unwrap();
    assert_eq!(silver.promotion_threshold, Some(250));
    assert_eq!(silver.win_reward, 50);
    assert_eq!(silver.loss_penalty, 25);
    assert_eq!(silver.pity_grant_size, 2);
    assert_eq!(
        catalog.config_for(DivisionTier::Gold).unwrap().conversion_rate,
        dec!(1.50)
    );
    assert_eq!(
        catalog.config_for(DivisionTier::Diamond).unwrap().promotion_threshold,
        None
    );
}

#[test]
fn custom_divisions_replace_defaults() {
    let toml = r#"
conversion_block = 100

[[divisions]]
tier = "SILVER"
promotion_threshold = 100
win_reward = 40
loss_penalty = 10
pity_grant_size = 1
conversion_rate = "1.00"

[[divisions]]
tier = "GOLD"
promotion_threshold = 300
win_reward = 40
loss_penalty = 20
pity_grant_size = 1
conversion_rate = "1.25"

[[divisions]]
tier = "DIAMOND"
win_reward = 40
loss_penalty = 30
pity_grant_size = 3
conversion_rate = "3.00"
"#;
    let config = Config::parse_toml(toml).unwrap();
    let catalog = config.catalog().unwrap();

    assert_eq!(
        catalog.config_for(DivisionTier::Gold).unwrap().promotion_threshold,
        Some(300)
    );
    assert_eq!(catalog.currency_for(DivisionTier::Diamond, 150).unwrap(), dec!(4.50));
}

#[test]
fn config_rejects_non_increasing_thresholds() {
    let toml = r#"
[[divisions]]
tier = "SILVER"
promotion_threshold = 600
win_reward = 50
loss_penalty = 25
pity_grant_size = 2
conversion_rate = "1.00"

[[divisions]]
tier = "GOLD"
promotion_threshold = 250
win_reward = 50
loss_penalty = 25
pity_grant_size = 2
conversion_rate = "1.50"

[[divisions]]
tier = "DIAMOND"
win_reward = 50
loss_penalty = 25
pity_grant_size = 2
conversion_rate = "2.00"
"#;
    let result = Config::parse_toml(toml);
    assert!(
        matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ),
        "expected thresholds to be rejected, got {result:?}"
    );
}

#[test]
fn config_rejects_unknown_log_format() {
    let toml = r#"
[logging]
level = "info"
format = "xml"
"#;
    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        })) => {}
        other => panic!("expected invalid logging.format, got {other:?}"),
    }
}

#[test]
fn config_rejects_zero_cas_attempts() {
    let toml = r#"
[ledger]
max_cas_attempts = 0
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "ledger.max_cas_attempts",
            ..
        }))
    ));
}

#[test]
fn config_rejects_backoff_cap_below_initial() {
    let toml = r#"
[notifier]
initial_backoff_ms = 500
max_backoff_ms = 100
"#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "notifier.max_backoff_ms",
            ..
        }))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        Config::parse_toml("[ledger\nmax_cas_attempts = 1"),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn shown_config_parses_back_to_itself() {
    let config = Config::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let mut reparsed: Config = toml::from_str(&rendered).unwrap();
    reparsed.database = config.database.clone();
    assert_eq!(reparsed, config);
}

#[test]
fn example_config_matches_defaults() {
    let config = Config::parse_toml(include_str!("../config.example.toml")).unwrap();
    let defaults = Config::default();
    assert_eq!(config.divisions, defaults.divisions);
    assert_eq!(config.ledger, defaults.ledger);
    assert_eq!(config.notifier, defaults.notifier);
    assert_eq!(config.logging, defaults.logging);
}
