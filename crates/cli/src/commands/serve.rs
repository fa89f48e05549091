use std::net::SocketAddr;

/// Run the game server.
#[derive(Debug, clap::Args)]
pub struct Serve {
    /// Override the configured listen address.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

impl super::Command for Serve {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let config = ctx.config();
        let listen = self.listen.unwrap_or_else(|| config.listen());
        if ctx.verbose() {
            tracing::debug!(data_dir = %config.data_dir().display(), "opening documents");
        }
        let game = ctx.game().await?;
        crate::server::serve(game, config, listen).await
    }
}
