use crate::{
    require,
    state::{BetRecord, Ledger, RoundState, Student},
    Error,
};

/// Validate and escrow a bet.
///
/// Checks run in order: round running, amount is an integer, amount is
/// positive, amount is covered by the balance. On success the amount is
/// debited, the bet is appended and the caller's previous result is cleared.
pub fn place_bet_handler(
    ledger: &mut Ledger,
    round: &mut RoundState,
    student: &Student,
    amount: &str,
    choice: &str,
    now: i64,
) -> crate::Result<BetRecord> {
    require!(round.is_running(), Error::RoundNotRunning);

    let bet = amount
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidBetAmount)?;
    require!(bet > 0, Error::NonPositiveBet);

    let balance = ledger.balance(&student.name);
    require!(bet <= balance, Error::InsufficientBalance { bet, balance });

    ledger.debit(&student.name, bet);

    let record = BetRecord {
        student_id: student.id.clone(),
        name: student.name.clone(),
        bet,
        choice: choice.to_owned(),
        time: now,
    };
    round.bets.push(record.clone());
    round.results.shift_remove(&student.id);

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RoundPhase;

    fn kim() -> Student {
        Student {
            id: "1001".into(),
            name: "Kim".into(),
        }
    }

    fn running() -> RoundState {
        RoundState {
            phase: RoundPhase::Running,
            ..Default::default()
        }
    }

    #[test]
    fn accepted_bet_is_escrowed() {
        let mut ledger: Ledger = [("Kim", 100)].into_iter().collect();
        let mut round = running();
        round
            .results
            .insert("1001".into(), "old result".into());

        let record = place_bet_handler(&mut ledger, &mut round, &kim(), " 30 ", "A", 7).unwrap();

        assert_eq!(record.bet, 30);
        assert_eq!(record.time, 7);
        assert_eq!(ledger.balance("Kim"), 70);
        assert_eq!(round.bets, vec![record]);
        assert!(round.results.is_empty());
    }

    #[test]
    fn rejections_leave_state_untouched() {
        let cases: [(&str, RoundPhase, fn(&Error) -> bool); 5] = [
            ("10", RoundPhase::Stopped, |e| {
                matches!(e, Error::RoundNotRunning)
            }),
            ("ten", RoundPhase::Running, |e| {
                matches!(e, Error::InvalidBetAmount)
            }),
            ("1.5", RoundPhase::Running, |e| {
                matches!(e, Error::InvalidBetAmount)
            }),
            ("0", RoundPhase::Running, |e| matches!(e, Error::NonPositiveBet)),
            ("101", RoundPhase::Running, |e| {
                matches!(
                    e,
                    Error::InsufficientBalance {
                        bet: 101,
                        balance: 100
                    }
                )
            }),
        ];

        for (amount, phase, expected) in cases {
            let mut ledger: Ledger = [("Kim", 100)].into_iter().collect();
            let mut round = RoundState {
                phase,
                ..Default::default()
            };
            let before = (ledger.clone(), round.clone());
            let err = place_bet_handler(&mut ledger, &mut round, &kim(), amount, "A", 0).unwrap_err();
            assert!(expected(&err), "{amount}: unexpected {err}");
            assert_eq!((ledger, round), before);
        }
    }

    #[test]
    fn multiple_bets_per_round() {
        let mut ledger: Ledger = [("Kim", 100)].into_iter().collect();
        let mut round = running();
        place_bet_handler(&mut ledger, &mut round, &kim(), "60", "A", 0).unwrap();
        place_bet_handler(&mut ledger, &mut round, &kim(), "40", "B", 0).unwrap();
        assert_eq!(ledger.balance("Kim"), 0);
        assert_eq!(round.bets.len(), 2);
        assert!(place_bet_handler(&mut ledger, &mut round, &kim(), "1", "C", 0).is_err());
    }

    #[test]
    fn choice_is_kept_verbatim() {
        let mut ledger: Ledger = [("Kim", 100)].into_iter().collect();
        let mut round = running();
        let record = place_bet_handler(&mut ledger, &mut round, &kim(), "5", "z", 0).unwrap();
        assert_eq!(record.choice, "z");
    }
}
