//! Command-line interface definitions.
//!
//! Defines the CLI structure for the squadledger application using `clap`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Squad division and bounty-coin ledger CLI
#[derive(Parser, Debug)]
#[command(name = "squadledger")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: config.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage squad ledgers
    #[command(subcommand)]
    Squad(SquadCommand),

    /// Submit match results
    #[command(subcommand)]
    Match(MatchCommand),

    /// Convert bounty coins into a payout reservation
    Withdraw(WithdrawArgs),

    /// List a squad's withdrawal reservations
    Withdrawals(SquadArg),

    /// Show standings, highest division first
    Standings(StandingsArgs),

    /// Show the division catalog
    Divisions,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `squadledger squad`.
#[derive(Subcommand, Debug)]
pub enum SquadCommand {
    /// Create a squad ledger (no-op if it exists).
    Create(SquadArg),
    /// Show a squad's ledger.
    Show(SquadArg),
    /// Archive a disbanded squad.
    Archive(SquadArg),
}

/// Subcommands for `squadledger match`.
#[derive(Subcommand, Debug)]
pub enum MatchCommand {
    /// Apply one match outcome. Resubmitting the same match id is a no-op.
    Apply(MatchApplyArgs),
}

/// Subcommands for `squadledger config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

/// A single squad id.
#[derive(Args, Debug)]
pub struct SquadArg {
    /// Squad identifier
    pub squad_id: String,
}

/// Arguments for `match apply`.
#[derive(Args, Debug)]
pub struct MatchApplyArgs {
    /// Squad identifier
    pub squad_id: String,

    /// Idempotency key of the match result
    pub match_result_id: String,

    /// WIN or LOSS
    pub outcome: String,
}

/// Arguments for `withdraw`.
#[derive(Args, Debug)]
pub struct WithdrawArgs {
    /// Squad identifier
    pub squad_id: String,

    /// Coins to convert
    pub coins: u64,

    /// Payout destination passed to the payout workflow
    #[arg(long)]
    pub payout: String,
}

/// Arguments for `standings`.
#[derive(Args, Debug)]
pub struct StandingsArgs {
    /// Only this division (SILVER, GOLD, DIAMOND)
    #[arg(long)]
    pub tier: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_match_apply_with_global_flags() {
        let cli = Cli::parse_from([
            "squadledger",
            "match",
            "apply",
            "alpha",
            "m-1",
            "WIN",
            "--json",
            "--config",
            "custom.toml",
        ]);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let Commands::Match(MatchCommand::Apply(args)) = cli.command else {
            panic!("expected match apply");
        };
        assert_eq!(args.match_result_id, "m-1");
        assert_eq!(args.outcome, "WIN");
    }

    #[test]
    fn withdraw_requires_payout() {
        assert!(Cli::try_parse_from(["squadledger", "withdraw", "alpha", "10"]).is_err());
    }
}
