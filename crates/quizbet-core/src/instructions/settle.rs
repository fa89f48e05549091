use std::fmt;

use indexmap::IndexMap;

use crate::state::{Ledger, RoundAction, RoundState, StudentId};

/// How a single bet was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No answer was set; the stake went back.
    Refunded,
    /// Correct choice; `payout` is twice the stake.
    Won { payout: i64 },
    /// Wrong choice; the escrowed stake is kept.
    Lost,
}

/// A resolved bet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetOutcome {
    pub student_id: StudentId,
    pub name: String,
    pub bet: i64,
    pub choice: String,
    pub outcome: Outcome,
    /// Balance right after this bet was resolved.
    pub balance: i64,
}

impl BetOutcome {
    /// Ledger change applied at settlement.
    pub fn delta(&self) -> i64 {
        match self.outcome {
            Outcome::Refunded => self.bet,
            Outcome::Won { payout } => payout,
            Outcome::Lost => 0,
        }
    }
}

impl fmt::Display for BetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            bet,
            choice,
            balance,
            ..
        } = self;
        match self.outcome {
            Outcome::Refunded => write!(
                f,
                "The answer was not set, so your bet of {bet}G was refunded. (balance: {balance}G)"
            ),
            Outcome::Won { payout } => write!(
                f,
                "Correct! You chose {choice} and bet {bet}G, paid out {payout}G. (balance: {balance}G)"
            ),
            Outcome::Lost => write!(
                f,
                "Wrong. You chose {choice} and lost your bet of {bet}G. (balance: {balance}G)"
            ),
        }
    }
}

/// Result of a settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Outcomes in submission order.
    pub outcomes: Vec<BetOutcome>,
    /// Message per student; the last bet of a student wins.
    pub results: IndexMap<StudentId, String>,
}

/// Resolve every pending bet against the current answer.
///
/// Results are replaced wholesale and the bet queue is emptied.
pub fn settle_handler(ledger: &mut Ledger, round: &mut RoundState) -> crate::Result<Settlement> {
    let phase = round.phase.transition(RoundAction::Settle)?;

    let answer = round.answer;
    let mut settlement = Settlement::default();
    for bet in round.bets.drain(..) {
        let outcome = match answer {
            None => Outcome::Refunded,
            Some(answer) if bet.is_correct(answer) => Outcome::Won {
                payout: bet.bet.saturating_mul(2),
            },
            Some(_) => Outcome::Lost,
        };
        let mut resolved = BetOutcome {
            balance: 0,
            outcome,
            student_id: bet.student_id,
            name: bet.name,
            bet: bet.bet,
            choice: bet.choice,
        };
        resolved.balance = ledger.credit(&resolved.name, resolved.delta());
        settlement
            .results
            .insert(resolved.student_id.clone(), resolved.to_string());
        settlement.outcomes.push(resolved);
    }

    round.results = settlement.results.clone();
    round.phase = phase;
    Ok(settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::{BetRecord, Choice, RoundPhase},
        Error,
    };

    fn bet(student_id: &str, name: &str, bet: i64, choice: &str) -> BetRecord {
        BetRecord {
            student_id: student_id.into(),
            name: name.into(),
            bet,
            choice: choice.into(),
            time: 0,
        }
    }

    fn stopped(answer: Option<Choice>, bets: Vec<BetRecord>) -> RoundState {
        RoundState {
            phase: RoundPhase::Stopped,
            answer,
            bets,
            ..Default::default()
        }
    }

    #[test]
    fn fold_over_bets() {
        let mut ledger: Ledger = [("Kim", 70), ("Lee", 50)].into_iter().collect();
        let mut round = stopped(
            Some(Choice::A),
            vec![bet("1001", "Kim", 30, "A"), bet("1002", "Lee", 50, "B")],
        );

        let settlement = settle_handler(&mut ledger, &mut round).unwrap();

        assert_eq!(ledger.balance("Kim"), 130);
        assert_eq!(ledger.balance("Lee"), 50);
        assert_eq!(
            settlement
                .outcomes
                .iter()
                .map(BetOutcome::delta)
                .collect::<Vec<_>>(),
            [60, 0]
        );
        assert!(round.bets.is_empty());
        assert_eq!(round.phase, RoundPhase::Settled);
        assert!(round.results["1001"].contains("paid out 60G"));
        assert!(round.results["1001"].contains("balance: 130G"));
        assert!(round.results["1002"].starts_with("Wrong."));
        assert_eq!(round.results, settlement.results);
    }

    #[test]
    fn unset_answer_refunds() {
        let mut ledger: Ledger = [("Kim", 80)].into_iter().collect();
        let mut round = stopped(None, vec![bet("1001", "Kim", 20, "C")]);

        settle_handler(&mut ledger, &mut round).unwrap();

        assert_eq!(ledger.balance("Kim"), 100);
        assert!(round.results["1001"].contains("answer was not set"));
    }

    #[test]
    fn unknown_name_starts_from_zero() {
        let mut ledger = Ledger::default();
        let mut round = stopped(Some(Choice::B), vec![bet("2001", "Ghost", 5, "B")]);
        settle_handler(&mut ledger, &mut round).unwrap();
        assert_eq!(ledger.balance("Ghost"), 10);
    }

    #[test]
    fn last_bet_message_wins() {
        let mut ledger: Ledger = [("Kim", 0)].into_iter().collect();
        let mut round = stopped(
            Some(Choice::A),
            vec![bet("1001", "Kim", 10, "A"), bet("1001", "Kim", 10, "B")],
        );
        let settlement = settle_handler(&mut ledger, &mut round).unwrap();
        assert_eq!(settlement.outcomes.len(), 2);
        assert_eq!(round.results.len(), 1);
        assert!(round.results["1001"].starts_with("Wrong."));
        assert_eq!(ledger.balance("Kim"), 20);
    }

    #[test]
    fn settle_requires_stopped_round() {
        let mut ledger = Ledger::default();
        let mut round = stopped(None, vec![]);
        round.results.insert("1001".into(), "kept".into());

        round.phase = RoundPhase::Running;
        assert!(matches!(
            settle_handler(&mut ledger, &mut round),
            Err(Error::InvalidTransition { .. })
        ));

        round.phase = RoundPhase::Settled;
        assert!(matches!(
            settle_handler(&mut ledger, &mut round),
            Err(Error::InvalidTransition { .. })
        ));
        assert_eq!(round.results["1001"], "kept");
    }
}
