/// Balance ledger.
pub mod ledger;

/// User directory.
pub mod users;

/// Round state.
pub mod round;

pub use self::{
    ledger::Ledger,
    round::{BetRecord, Choice, RoundAction, RoundPhase, RoundState},
    users::{Student, StudentId, UserDirectory, UserRecord},
};
