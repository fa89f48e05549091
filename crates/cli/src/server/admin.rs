use std::sync::Arc;

use poem::{
    handler,
    session::Session,
    web::{Data, Form, Html, Redirect},
    IntoResponse, Response,
};
use quizbet_core::instructions::verify_admin_password;
use serde::Deserialize;

use super::{
    flash_or_fail,
    session::{flash, require_admin, set_identity, take_flashes, Identity},
    views, AppState,
};

const DASHBOARD: &str = "/admin";

/// Flash the outcome of an admin action and go back to the dashboard.
fn finish(session: &Session, outcome: quizbet_core::Result<String>) -> poem::Result<Response> {
    match outcome {
        Ok(message) => {
            flash(session, message);
            Ok(Redirect::see_other(DASHBOARD).into_response())
        }
        Err(err) => flash_or_fail(session, err, DASHBOARD),
    }
}

macro_rules! admin_only {
    ($session:expr) => {
        if let Err(redirect) = require_admin($session) {
            return Ok(redirect);
        }
    };
}

#[handler]
pub(crate) fn admin_login_page(session: &Session) -> Html<String> {
    views::admin_login(&take_flashes(session))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminLoginForm {
    #[serde(default)]
    password: String,
}

#[handler]
pub(crate) fn admin_login(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
    Form(form): Form<AdminLoginForm>,
) -> poem::Result<Response> {
    match verify_admin_password(&state.admin_password, &form.password) {
        Ok(()) => {
            tracing::info!("admin logged in");
            set_identity(session, &Identity::Admin);
            flash(session, "Admin login succeeded.");
            Ok(Redirect::see_other(DASHBOARD).into_response())
        }
        Err(err) => {
            tracing::warn!("admin login failed");
            flash_or_fail(session, err, "/admin_login")
        }
    }
}

#[handler]
pub(crate) async fn dashboard(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
) -> poem::Result<Response> {
    admin_only!(session);
    let overview = state.game.overview().await;
    Ok(views::admin(&take_flashes(session), &overview).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterForm {
    #[serde(default)]
    student_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    password: String,
}

#[handler]
pub(crate) async fn register(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> poem::Result<Response> {
    admin_only!(session);
    let outcome = state
        .game
        .register(&form.student_id, &form.name, &form.password)
        .await
        .map(|reg| {
            if reg.funded {
                format!(
                    "Registered {} ({}) with {}G.",
                    reg.name, reg.student_id, reg.balance
                )
            } else {
                format!(
                    "Updated {} ({}); balance stays at {}G.",
                    reg.name, reg.student_id, reg.balance
                )
            }
        });
    finish(session, outcome)
}

#[handler]
pub(crate) async fn start(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
) -> poem::Result<Response> {
    admin_only!(session);
    let outcome = state
        .game
        .start()
        .await
        .map(|_| "Round started. Students can place bets now.".to_string());
    finish(session, outcome)
}

#[handler]
pub(crate) async fn stop(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
) -> poem::Result<Response> {
    admin_only!(session);
    let outcome = state
        .game
        .stop()
        .await
        .map(|_| "Betting closed.".to_string());
    finish(session, outcome)
}

#[handler]
pub(crate) async fn settle(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
) -> poem::Result<Response> {
    admin_only!(session);
    let outcome = state
        .game
        .settle()
        .await
        .map(|settlement| format!("Settled {} bets.", settlement.outcomes.len()));
    finish(session, outcome)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerForm {
    #[serde(default)]
    answer: String,
}

#[handler]
pub(crate) async fn set_answer(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
    Form(form): Form<AnswerForm>,
) -> poem::Result<Response> {
    admin_only!(session);
    let outcome = state
        .game
        .set_answer(&form.answer)
        .await
        .map(|answer| format!("Answer set to {answer}."));
    finish(session, outcome)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoneyForm {
    #[serde(default)]
    target_student_id: String,
    #[serde(default)]
    amount: String,
}

#[handler]
pub(crate) async fn set_money(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
    Form(form): Form<MoneyForm>,
) -> poem::Result<Response> {
    admin_only!(session);
    let outcome = state
        .game
        .set_money(&form.target_student_id, &form.amount)
        .await
        .map(|(name, amount)| {
            format!(
                "Set the balance of {name} ({}) to {amount}G.",
                form.target_student_id.trim()
            )
        });
    finish(session, outcome)
}
