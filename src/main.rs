use clap::Parser;
use tracing::error;

use squadledger::adapter::inbound::cli::command::Cli;
use squadledger::adapter::inbound::cli::{self, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli_args = Cli::parse();
    cli::configure_output(&cli_args);

    let config = match cli::load_config(cli_args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };
    config.init_logging();

    if let Err(e) = cli::run(cli_args, &config).await {
        error!(error = %e, retryable = e.is_retryable(), "Command failed");
        output::error(&e.to_string());
        std::process::exit(if e.is_retryable() { 75 } else { 1 });
    }
}
