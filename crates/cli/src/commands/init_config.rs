use crate::config::Config;

/// Write a config file with default values.
#[derive(Debug, clap::Args)]
pub struct InitConfig {
    /// Overwrite an existing file.
    #[arg(long, short)]
    force: bool,
}

impl super::Command for InitConfig {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let path = ctx.config_path();
        if path.exists() && !self.force {
            eyre::bail!(
                "config file `{}` already exists, use `--force` to overwrite",
                path.display()
            );
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&Config::default())?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "wrote config");
        Ok(())
    }
}
