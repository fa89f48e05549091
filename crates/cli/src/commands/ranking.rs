use prettytable::{row, Table};

/// Print students by balance.
#[derive(Debug, clap::Args)]
pub struct Ranking {
    /// Show at most this many rows.
    #[arg(long, short)]
    limit: Option<usize>,
    /// Output JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl super::Command for Ranking {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let game = ctx.game_read_only().await?;
        let mut ranking = game.ranking().await;
        if let Some(limit) = self.limit {
            ranking.truncate(limit);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ranking)?);
            return Ok(());
        }

        let mut table = Table::new();
        table.set_titles(row!["Rank", "Student ID", "Name", "Balance"]);
        for (idx, entry) in ranking.iter().enumerate() {
            table.add_row(row![
                idx + 1,
                entry.student_id,
                entry.name,
                format!("{}G", entry.balance)
            ]);
        }
        table.printstd();
        Ok(())
    }
}
