//! CLI module graph and command dispatch.

pub mod command;
pub mod config;
pub mod outcome;
pub mod output;
pub mod squad;
pub mod standings;
pub mod withdraw;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::infrastructure::bootstrap::Engine;
use crate::infrastructure::config::settings::Config;

use command::{Cli, ColorChoice, Commands, ConfigCommand, MatchCommand, SquadCommand};

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Resolve and load configuration for a CLI invocation.
///
/// An explicit path must exist. Without one, `config.toml` in the working
/// directory is used if present, otherwise built-in defaults.
///
/// # Errors
/// Returns a config error if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Config::load(default)
            } else {
                Ok(Config::from_env())
            }
        }
    }
}

/// Apply global presentation flags.
pub fn configure_output(cli: &Cli) {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));
    match cli.color {
        ColorChoice::Auto => {}
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Run one parsed command against `config`.
///
/// # Errors
/// Returns the first error raised by the command.
pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Config(ConfigCommand::Show) => config::execute_show(config),
        Commands::Config(ConfigCommand::Validate) => config::execute_validate(config),
        Commands::Divisions => standings::execute_divisions(&config.catalog()?),
        command => {
            let engine = Engine::open_sqlite(config)?;
            debug!(database = %config.database, "Engine started");
            let result = run_with_engine(command, &engine).await;
            engine.shutdown().await;
            result
        }
    }
}

async fn run_with_engine<S>(command: Commands, engine: &Engine<S>) -> Result<()>
where
    S: crate::port::outbound::store::LedgerStore + 'static,
{
    match command {
        Commands::Squad(SquadCommand::Create(args)) => {
            squad::execute_create(engine, &args.squad_id).await
        }
        Commands::Squad(SquadCommand::Show(args)) => squad::execute_show(engine, &args.squad_id).await,
        Commands::Squad(SquadCommand::Archive(args)) => {
            squad::execute_archive(engine, &args.squad_id).await
        }
        Commands::Match(MatchCommand::Apply(args)) => {
            outcome::execute_apply(engine, &args.squad_id, &args.match_result_id, &args.outcome)
                .await
        }
        Commands::Withdraw(args) => {
            withdraw::execute_withdraw(engine, &args.squad_id, args.coins, &args.payout).await
        }
        Commands::Withdrawals(args) => withdraw::execute_list(engine, &args.squad_id).await,
        Commands::Standings(args) => {
            standings::execute_standings(engine, args.tier.as_deref()).await
        }
        Commands::Config(_) | Commands::Divisions => Ok(()),
    }
}
