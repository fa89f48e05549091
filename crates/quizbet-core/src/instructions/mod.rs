//! Operations over staged documents.
//!
//! Handlers mutate the documents they are given and never touch storage, so a
//! failed precondition leaves nothing to undo.

/// Round controller.
pub mod admin;

/// Student and admin login.
pub mod login;

/// Bet placement.
pub mod place_bet;

/// Settlement.
pub mod settle;

/// Read-only views.
pub mod query;

pub use self::{
    admin::{
        register_handler, set_answer_handler, set_money_handler, start_handler, stop_handler,
        Registration,
    },
    login::{authenticate_handler, verify_admin_password},
    place_bet::place_bet_handler,
    query::{bet_status, ranking, BetStatus, RankEntry},
    settle::{settle_handler, BetOutcome, Outcome, Settlement},
};
