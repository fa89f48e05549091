//! # Quizbet Core
//!
//! Round lifecycle, escrowed betting and settlement for the classroom quiz game,
//! over three whole-document JSON records.

/// Error type.
pub mod error;

/// Persisted documents.
pub mod state;

/// Document store.
pub mod store;

/// Operations over the documents.
pub mod instructions;

/// Game facade.
pub mod game;

pub use crate::{
    error::Error,
    game::{Game, GameOptions},
    instructions::{BetStatus, RankEntry, Settlement},
    state::{BetRecord, Choice, Ledger, RoundPhase, RoundState, Student, UserDirectory},
    store::Backend,
};

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Test utils.
#[cfg(test)]
pub(crate) mod test {
    /// Install a `fmt` subscriber for test output, ignoring repeated installs.
    pub(crate) fn setup_fmt_tracing(default_directive: &str) {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(default_directive.parse().expect("valid directive"))
                    .from_env_lossy(),
            )
            .with_test_writer()
            .try_init();
    }
}
