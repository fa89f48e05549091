use serde::Serialize;

use crate::state::{Ledger, RoundState, Student, StudentId, UserDirectory};

/// Answer to a result poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BetStatus {
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money: Option<i64>,
}

impl BetStatus {
    /// No result for the caller yet.
    pub fn pending() -> Self {
        Self {
            resolved: false,
            message: None,
            money: None,
        }
    }
}

/// Look up the caller's settlement message and current balance.
pub fn bet_status(ledger: &Ledger, round: &RoundState, student: &Student) -> BetStatus {
    match round.results.get(&student.id) {
        Some(message) => BetStatus {
            resolved: true,
            message: Some(message.clone()),
            money: Some(ledger.balance(&student.name)),
        },
        None => BetStatus::pending(),
    }
}

/// A ranking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub student_id: StudentId,
    pub name: String,
    pub balance: i64,
}

/// Students by balance, descending. Ties keep directory order.
pub fn ranking(users: &UserDirectory, ledger: &Ledger) -> Vec<RankEntry> {
    let mut entries = users
        .iter()
        .map(|(id, record)| RankEntry {
            student_id: id.clone(),
            name: record.name.clone(),
            balance: ledger.balance(&record.name),
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| b.balance.cmp(&a.balance));
    entries
}
