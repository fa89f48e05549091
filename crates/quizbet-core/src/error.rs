use std::path::PathBuf;

use crate::state::{RoundAction, RoundPhase};

/// Error type.
///
/// Variants up to [`Error::AdminLoginFailed`] are validation failures whose
/// display text is shown to the user as-is. The rest are fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller has no student session.
    #[error("login required")]
    LoginRequired,
    /// Bets are only accepted while the round is running.
    #[error("betting is closed; the admin has to start the round first")]
    RoundNotRunning,
    /// The bet amount is not an integer.
    #[error("the bet amount must be an integer")]
    InvalidBetAmount,
    /// The bet amount is zero or negative.
    #[error("the bet amount must be at least 1")]
    NonPositiveBet,
    /// The bet amount exceeds the balance.
    #[error("the bet amount ({bet}G) is larger than your balance ({balance}G)")]
    InsufficientBalance {
        /// Requested bet.
        bet: i64,
        /// Balance at submission time.
        balance: i64,
    },
    /// The answer is not one of A/B/C/D.
    #[error("choose a valid answer (A/B/C/D), got {0:?}")]
    InvalidAnswer(String),
    /// No student with the given id.
    #[error("no student is registered with id {0}")]
    UnknownStudent(String),
    /// The amount is not an integer.
    #[error("the amount must be an integer")]
    InvalidAmount,
    /// A required form field is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// Both target fields of a balance override are required.
    #[error("enter both the student id and the amount")]
    MissingTarget,
    /// The round lifecycle does not allow the action.
    #[error("cannot {action} while the round is {phase}")]
    InvalidTransition {
        /// Attempted action.
        action: RoundAction,
        /// Phase at the time of the call.
        phase: RoundPhase,
    },
    /// No result for the caller yet.
    #[error("no result has been announced yet")]
    ResultPending,
    /// Student credentials do not match.
    #[error("login failed; check your student id, name and password")]
    LoginFailed,
    /// Admin password does not match.
    #[error("incorrect admin password")]
    AdminLoginFailed,
    /// IO error on a document.
    #[error("io: {path}: {source}")]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A document exists but cannot be decoded.
    #[error("corrupt document {path}: {source}")]
    Corrupt {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// JSON error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for validation failures that leave all state untouched
    /// and should be reported back to the user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            Self::Io { .. } | Self::Corrupt { .. } | Self::Json(_)
        )
    }
}

/// Return early with the given error if the condition does not hold.
#[macro_export]
macro_rules! require {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
