use serde::{Deserialize, Serialize};

use crate::{
    instructions::{self, BetStatus, RankEntry, Registration, Settlement},
    state::{BetRecord, Choice, RoundPhase, RoundState, Student},
    store::{Backend, Store},
    Error,
};

/// Default balance of a newly registered name.
pub const DEFAULT_INITIAL_BALANCE: i64 = 100;

/// Game options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOptions {
    /// Balance given to a name on first registration.
    pub initial_balance: i64,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
        }
    }
}

/// Admin dashboard snapshot.
#[derive(Debug, Clone)]
pub struct Overview {
    pub round: RoundState,
    /// Students in directory order with their balances.
    pub students: Vec<RankEntry>,
}

/// The quiz game over a [`Store`].
///
/// Every mutating operation locks the documents it touches, stages the change,
/// and commits ledger before round. Nothing is written when validation fails.
#[derive(Debug)]
pub struct Game {
    store: Store,
    options: GameOptions,
}

impl Game {
    /// Open the game documents on `backend`.
    pub async fn open(backend: Backend, options: GameOptions) -> crate::Result<Self> {
        let store = Store::open(backend).await?;
        Ok(Self { store, options })
    }

    /// Open the game documents on `backend` for reading only. Nothing is
    /// created when documents are missing.
    pub async fn open_read_only(backend: Backend, options: GameOptions) -> crate::Result<Self> {
        let store = Store::open_read_only(backend).await?;
        Ok(Self { store, options })
    }

    /// Register or update a student.
    pub async fn register(
        &self,
        student_id: &str,
        name: &str,
        password: &str,
    ) -> crate::Result<Registration> {
        let backend = self.store.backend();
        let mut users = self.store.users.stage().await;
        let mut ledger = self.store.ledger.stage().await;

        let registration = instructions::register_handler(
            &mut users,
            &mut ledger,
            student_id,
            name,
            password,
            self.options.initial_balance,
        )?;

        users.commit(backend).await?;
        ledger.commit(backend).await?;
        tracing::info!(
            student_id = %registration.student_id,
            name = %registration.name,
            balance = registration.balance,
            funded = registration.funded,
            "registered student"
        );
        Ok(registration)
    }

    /// Match student credentials.
    pub async fn authenticate(
        &self,
        student_id: &str,
        name: &str,
        password: &str,
    ) -> crate::Result<Student> {
        let users = self.store.users.snapshot().await;
        instructions::authenticate_handler(&users, student_id, name, password)
    }

    /// Start a round.
    pub async fn start(&self) -> crate::Result<RoundPhase> {
        self.update_round(instructions::start_handler).await
    }

    /// Stop accepting bets.
    pub async fn stop(&self) -> crate::Result<RoundPhase> {
        self.update_round(instructions::stop_handler).await
    }

    /// Set the correct answer.
    pub async fn set_answer(&self, answer: &str) -> crate::Result<Choice> {
        self.update_round(|round| instructions::set_answer_handler(round, answer))
            .await
    }

    async fn update_round<T: std::fmt::Debug>(
        &self,
        f: impl FnOnce(&mut RoundState) -> crate::Result<T>,
    ) -> crate::Result<T> {
        let mut round = self.store.round.stage().await;
        let output = f(&mut *round)?;
        round.commit(self.store.backend()).await?;
        tracing::info!(?output, "updated round");
        Ok(output)
    }

    /// Resolve all pending bets.
    pub async fn settle(&self) -> crate::Result<Settlement> {
        let backend = self.store.backend();
        let mut ledger = self.store.ledger.stage().await;
        let mut round = self.store.round.stage().await;

        let settlement = instructions::settle_handler(&mut ledger, &mut round)?;

        ledger.commit(backend).await?;
        round.commit(backend).await?;
        tracing::info!(
            bets = settlement.outcomes.len(),
            paid = settlement.outcomes.iter().map(|o| o.delta()).sum::<i64>(),
            "settled round"
        );
        Ok(settlement)
    }

    /// Overwrite a student's balance.
    pub async fn set_money(&self, student_id: &str, amount: &str) -> crate::Result<(String, i64)> {
        let users = self.store.users.snapshot().await;
        let mut ledger = self.store.ledger.stage().await;

        let (name, amount) =
            instructions::set_money_handler(&users, &mut ledger, student_id, amount)?;

        ledger.commit(self.store.backend()).await?;
        tracing::info!(%student_id, %name, amount, "set balance");
        Ok((name, amount))
    }

    /// Place a bet for `student`.
    pub async fn place_bet(
        &self,
        student: &Student,
        amount: &str,
        choice: &str,
    ) -> crate::Result<BetRecord> {
        let backend = self.store.backend();
        let mut ledger = self.store.ledger.stage().await;
        let mut round = self.store.round.stage().await;

        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let record =
            instructions::place_bet_handler(&mut ledger, &mut round, student, amount, choice, now)?;

        ledger.commit(backend).await?;
        round.commit(backend).await?;
        tracing::info!(
            student_id = %record.student_id,
            bet = record.bet,
            choice = %record.choice,
            "placed bet"
        );
        Ok(record)
    }

    /// Poll the result of `student`.
    ///
    /// Both documents are read under their locks so the balance always matches
    /// the announced result.
    pub async fn bet_status(&self, student: &Student) -> BetStatus {
        let ledger = self.store.ledger.stage().await;
        let round = self.store.round.stage().await;
        instructions::bet_status(&ledger, &round, student)
    }

    /// Get the result message and balance of `student`.
    pub async fn result(&self, student: &Student) -> crate::Result<(String, i64)> {
        match self.bet_status(student).await {
            BetStatus {
                resolved: true,
                message: Some(message),
                money: Some(money),
            } => Ok((message, money)),
            _ => Err(Error::ResultPending),
        }
    }

    /// Current balance of `name`.
    pub async fn balance(&self, name: &str) -> i64 {
        self.store.ledger.snapshot().await.balance(name)
    }

    /// Current round state.
    pub async fn round(&self) -> RoundState {
        self.store.round.snapshot().await
    }

    /// Students by balance, descending.
    pub async fn ranking(&self) -> Vec<RankEntry> {
        let users = self.store.users.snapshot().await;
        let ledger = self.store.ledger.snapshot().await;
        instructions::ranking(&users, &ledger)
    }

    /// Snapshot for the admin dashboard.
    pub async fn overview(&self) -> Overview {
        let users = self.store.users.snapshot().await;
        let ledger = self.store.ledger.snapshot().await;
        let round = self.store.round.snapshot().await;
        let students = users
            .iter()
            .map(|(id, record)| RankEntry {
                student_id: id.clone(),
                name: record.name.clone(),
                balance: ledger.balance(&record.name),
            })
            .collect();
        Overview { round, students }
    }
}
