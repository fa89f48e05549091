use prettytable::{row, Table};

/// Inspect the current round.
#[derive(Debug, clap::Args)]
pub struct Inspect {
    /// Output the raw round document.
    #[arg(long)]
    json: bool,
}

impl super::Command for Inspect {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let game = ctx.game_read_only().await?;
        let round = game.round().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&round)?);
            return Ok(());
        }

        let answer = round
            .answer
            .map(|answer| answer.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("Phase: {}", round.phase);
        println!("Answer: {answer}");

        if !round.bets.is_empty() {
            let mut bets = Table::new();
            bets.set_titles(row!["Student ID", "Name", "Bet", "Choice", "Time"]);
            for bet in &round.bets {
                bets.add_row(row![bet.student_id, bet.name, bet.bet, bet.choice, bet.time]);
            }
            println!("Pending bets:");
            bets.printstd();
        }

        if !round.results.is_empty() {
            let mut results = Table::new();
            results.set_titles(row!["Student ID", "Result"]);
            for (student_id, message) in &round.results {
                results.add_row(row![student_id, message]);
            }
            println!("Results:");
            results.printstd();
        }
        Ok(())
    }
}
