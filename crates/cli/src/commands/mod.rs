use std::path::Path;

use enum_dispatch::enum_dispatch;
use init_config::InitConfig;
use inspect::Inspect;
use quizbet_core::Game;
use ranking::Ranking;
use serve::Serve;

use crate::config::Config;

mod init_config;
mod inspect;
mod ranking;
mod serve;

/// Commands.
#[enum_dispatch(Command)]
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Initialize config file.
    InitConfig(InitConfig),
    /// Run the game server.
    Serve(Serve),
    /// Print the ranking.
    Ranking(Ranking),
    /// Inspect the current round.
    Inspect(Inspect),
}

#[enum_dispatch]
pub(crate) trait Command {
    async fn execute(&self, ctx: Context<'_>) -> eyre::Result<()>;
}

pub(crate) struct Context<'a> {
    config_path: &'a Path,
    config: &'a Config,
    verbose: bool,
}

impl<'a> Context<'a> {
    pub(super) fn new(config_path: &'a Path, config: &'a Config, verbose: bool) -> Self {
        Self {
            config_path,
            config,
            verbose,
        }
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    pub(crate) fn config_path(&self) -> &Path {
        self.config_path
    }

    pub(crate) fn verbose(&self) -> bool {
        self.verbose
    }

    /// Open the game documents in the configured data directory.
    pub(crate) async fn game(&self) -> eyre::Result<Game> {
        let game = Game::open(self.config.backend(), self.config.game_options()).await?;
        Ok(game)
    }

    /// Open the game documents without creating missing ones.
    pub(crate) async fn game_read_only(&self) -> eyre::Result<Game> {
        let game =
            Game::open_read_only(self.config.backend(), self.config.game_options()).await?;
        Ok(game)
    }
}
