use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{Command, Commands, Context},
    config::Config,
};

mod commands;
mod config;
mod server;

/// Classroom quiz game server and operator tools.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the config file.
    #[arg(long, short, env = "QUIZBET_CONFIG", default_value = "quizbet.toml")]
    config: PathBuf,
    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
    /// Commands.
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_directive = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_directive.parse()?)
                .from_env_lossy(),
        )
        .init();

    let config_path = PathBuf::from(shellexpand::tilde(&cli.config.to_string_lossy()).as_ref());
    let config = Config::load(&config_path)?;
    tracing::debug!(config = %config_path.display(), "loaded config");

    cli.command
        .execute(Context::new(&config_path, &config, cli.verbose))
        .await
}
