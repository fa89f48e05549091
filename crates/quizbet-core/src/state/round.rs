use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{state::StudentId, Error};

/// Answer choice.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// Parse an admin-supplied answer. Only exact `A`, `B`, `C` or `D` is accepted.
    pub fn parse(value: &str) -> crate::Result<Self> {
        value
            .parse()
            .map_err(|_| Error::InvalidAnswer(value.to_owned()))
    }
}

/// Round lifecycle phase.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoundPhase {
    /// No round has been played yet.
    #[default]
    Idle,
    /// Accepting bets.
    Running,
    /// Betting closed, waiting for settlement.
    Stopped,
    /// Bets resolved; results are available.
    Settled,
}

/// Lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RoundAction {
    Start,
    Stop,
    Settle,
}

impl RoundPhase {
    /// Apply `action`, rejecting moves outside the lifecycle
    /// `Idle|Settled -> Running -> Stopped -> Settled`.
    pub fn transition(self, action: RoundAction) -> crate::Result<Self> {
        use RoundAction::*;
        use RoundPhase::*;

        match (self, action) {
            (Idle | Settled, Start) => Ok(Running),
            (Running, Stop) => Ok(Stopped),
            (Stopped, Settle) => Ok(Settled),
            (phase, action) => Err(Error::InvalidTransition { action, phase }),
        }
    }

    /// Returns whether bets are accepted.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// A single escrowed bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRecord {
    pub student_id: StudentId,
    pub name: String,
    pub bet: i64,
    /// Submitted choice, kept verbatim.
    pub choice: String,
    /// Submission time in unix seconds.
    pub time: i64,
}

impl BetRecord {
    /// Returns whether the bet matches `answer`.
    pub fn is_correct(&self, answer: Choice) -> bool {
        self.choice == answer.as_ref()
    }
}

/// The singleton round record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoundDocument", into = "RoundDocument")]
pub struct RoundState {
    pub phase: RoundPhase,
    /// Correct answer, kept across rounds until overwritten.
    pub answer: Option<Choice>,
    /// Pending bets in submission order.
    pub bets: Vec<BetRecord>,
    /// Settlement message per student.
    pub results: IndexMap<StudentId, String>,
}

impl RoundState {
    /// Returns whether bets are accepted.
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }
}

/// On-disk layout. `running` is written for readers of the flat layout and
/// `phase` is optional so that documents without it still load.
#[derive(Serialize, Deserialize)]
struct RoundDocument {
    #[serde(default)]
    running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phase: Option<RoundPhase>,
    #[serde(default)]
    answer: Option<Choice>,
    #[serde(default)]
    bets: Vec<BetRecord>,
    #[serde(default)]
    results: IndexMap<StudentId, String>,
}

impl From<RoundDocument> for RoundState {
    fn from(doc: RoundDocument) -> Self {
        let phase = doc.phase.unwrap_or(match (doc.running, doc.bets.is_empty()) {
            (true, _) => RoundPhase::Running,
            (false, false) => RoundPhase::Stopped,
            (false, true) if !doc.results.is_empty() => RoundPhase::Settled,
            (false, true) => RoundPhase::Idle,
        });
        Self {
            phase,
            answer: doc.answer,
            bets: doc.bets,
            results: doc.results,
        }
    }
}

impl From<RoundState> for RoundDocument {
    fn from(state: RoundState) -> Self {
        Self {
            running: state.is_running(),
            phase: Some(state.phase),
            answer: state.answer,
            bets: state.bets,
            results: state.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let phase = RoundPhase::Idle;
        let phase = phase.transition(RoundAction::Start).unwrap();
        assert!(phase.is_running());
        let phase = phase.transition(RoundAction::Stop).unwrap();
        let phase = phase.transition(RoundAction::Settle).unwrap();
        assert_eq!(phase, RoundPhase::Settled);
        assert_eq!(
            phase.transition(RoundAction::Start).unwrap(),
            RoundPhase::Running
        );
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        use RoundAction::*;
        use RoundPhase::*;

        for (phase, action) in [
            (Idle, Stop),
            (Idle, Settle),
            (Running, Start),
            (Running, Settle),
            (Stopped, Start),
            (Stopped, Stop),
            (Settled, Stop),
            (Settled, Settle),
        ] {
            assert!(
                matches!(
                    phase.transition(action),
                    Err(Error::InvalidTransition { .. })
                ),
                "{action} from {phase} must be rejected"
            );
        }
    }

    #[test]
    fn choice_parsing_is_strict() {
        assert_eq!(Choice::parse("C").unwrap(), Choice::C);
        assert!(Choice::parse("c").is_err());
        assert!(Choice::parse("E").is_err());
        assert!(Choice::parse("").is_err());
    }

    #[test]
    fn flat_document_loads() {
        let json = r#"{
            "running": false,
            "answer": "B",
            "bets": [{"student_id": "1001", "name": "Kim", "bet": 10, "choice": "B", "time": 1700000000}],
            "results": {}
        }"#;
        let state: RoundState = serde_json::from_str(json).unwrap();
        assert_eq!(state.phase, RoundPhase::Stopped);
        assert_eq!(state.answer, Some(Choice::B));
        assert!(state.bets[0].is_correct(Choice::B));

        let state: RoundState =
            serde_json::from_str(r#"{"running": true, "answer": null, "bets": [], "results": {}}"#)
                .unwrap();
        assert_eq!(state.phase, RoundPhase::Running);

        let state: RoundState = serde_json::from_str(
            r#"{"running": false, "answer": "A", "bets": [], "results": {"1001": "Correct!"}}"#,
        )
        .unwrap();
        assert_eq!(state.phase, RoundPhase::Settled);
        assert_eq!(state.results["1001"], "Correct!");

        let state: RoundState =
            serde_json::from_str(r#"{"running": false, "answer": null, "bets": [], "results": {}}"#)
                .unwrap();
        assert_eq!(state.phase, RoundPhase::Idle);

        let state: RoundState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, RoundState::default());
    }

    #[test]
    fn written_document_keeps_running_flag() {
        let state = RoundState {
            phase: RoundPhase::Running,
            ..Default::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["running"], true);
        assert_eq!(value["phase"], "running");
        assert!(value["answer"].is_null());
    }
}
