use crate::{
    require,
    state::{Choice, Ledger, RoundAction, RoundPhase, RoundState, UserDirectory, UserRecord},
    Error,
};

/// Outcome of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub student_id: String,
    pub name: String,
    /// Balance after registration.
    pub balance: i64,
    /// Whether the ledger entry was created by this registration.
    pub funded: bool,
}

/// Upsert a student and fund a fresh ledger entry with `initial_balance`.
pub fn register_handler(
    users: &mut UserDirectory,
    ledger: &mut Ledger,
    student_id: &str,
    name: &str,
    password: &str,
    initial_balance: i64,
) -> crate::Result<Registration> {
    let student_id = student_id.trim();
    let name = name.trim();
    require!(!student_id.is_empty(), Error::EmptyField("student id"));
    require!(!name.is_empty(), Error::EmptyField("name"));

    users.upsert(
        student_id.to_owned(),
        UserRecord {
            name: name.to_owned(),
            password: password.to_owned(),
        },
    );

    let funded = !ledger.contains(name);
    let balance = ledger.init_if_absent(name, initial_balance);

    Ok(Registration {
        student_id: student_id.to_owned(),
        name: name.to_owned(),
        balance,
        funded,
    })
}

/// Open the round for bets.
pub fn start_handler(round: &mut RoundState) -> crate::Result<RoundPhase> {
    round.phase = round.phase.transition(RoundAction::Start)?;
    Ok(round.phase)
}

/// Close the round for bets. Pending bets stay queued.
pub fn stop_handler(round: &mut RoundState) -> crate::Result<RoundPhase> {
    round.phase = round.phase.transition(RoundAction::Stop)?;
    Ok(round.phase)
}

/// Set the correct answer. Allowed in every phase.
pub fn set_answer_handler(round: &mut RoundState, answer: &str) -> crate::Result<Choice> {
    let answer = Choice::parse(answer)?;
    round.answer = Some(answer);
    Ok(answer)
}

/// Overwrite the balance of a registered student. Returns the student's name
/// and the new balance.
pub fn set_money_handler(
    users: &UserDirectory,
    ledger: &mut Ledger,
    student_id: &str,
    amount: &str,
) -> crate::Result<(String, i64)> {
    let student_id = student_id.trim();
    let amount = amount.trim();
    require!(
        !student_id.is_empty() && !amount.is_empty(),
        Error::MissingTarget
    );
    let amount = amount.parse::<i64>().map_err(|_| Error::InvalidAmount)?;
    let name = users
        .get(student_id)
        .ok_or_else(|| Error::UnknownStudent(student_id.to_owned()))?
        .name
        .clone();
    ledger.set(&name, amount);
    Ok((name, amount))
}
