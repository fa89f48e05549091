use std::sync::Arc;

use poem::{
    handler,
    http::StatusCode,
    session::Session,
    web::{Data, Form, Html, Json, Redirect},
    IntoResponse, Response,
};
use serde::Deserialize;

use super::{
    flash_or_fail,
    session::{flash, identity, require_student, set_identity, take_flashes, Identity},
    views, AppState,
};

#[handler]
pub(crate) fn index(session: &Session) -> Html<String> {
    views::index(&take_flashes(session), &identity(session))
}

#[handler]
pub(crate) fn login_page(session: &Session) -> Html<String> {
    views::login(&take_flashes(session))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    student_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    password: String,
}

#[handler]
pub(crate) async fn login(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> poem::Result<Response> {
    match state
        .game
        .authenticate(&form.student_id, &form.name, &form.password)
        .await
    {
        Ok(student) => {
            tracing::info!(student_id = %student.id, "student logged in");
            set_identity(session, &Identity::Student(student));
            Ok(Redirect::see_other("/play").into_response())
        }
        Err(err) => flash_or_fail(session, err, "/login"),
    }
}

#[handler]
pub(crate) fn logout(session: &Session) -> Redirect {
    session.clear();
    flash(session, "You have been logged out.");
    Redirect::see_other("/")
}

#[handler]
pub(crate) async fn play(session: &Session, Data(state): Data<&Arc<AppState>>) -> Response {
    let student = match require_student(session) {
        Ok(student) => student,
        Err(redirect) => return redirect,
    };
    let money = state.game.balance(&student.name).await;
    let running = state.game.round().await.is_running();
    views::play(&take_flashes(session), &student, money, running).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct BetForm {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    bet: Option<String>,
}

/// Place a bet.
#[handler]
pub(crate) async fn check_answer(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
    Form(form): Form<BetForm>,
) -> poem::Result<Response> {
    let student = match require_student(session) {
        Ok(student) => student,
        Err(redirect) => return Ok(redirect),
    };
    let amount = form.bet.as_deref().unwrap_or("0");
    let choice = form.answer.as_deref().unwrap_or_default();
    match state.game.place_bet(&student, amount, choice).await {
        Ok(_) => Ok(Redirect::see_other("/waiting").into_response()),
        Err(err) => flash_or_fail(session, err, "/play"),
    }
}

#[handler]
pub(crate) fn waiting(session: &Session) -> Response {
    if let Err(redirect) = require_student(session) {
        return redirect;
    }
    views::waiting(&take_flashes(session)).into_response()
}

/// Result poll. Answers 401 instead of redirecting when not logged in.
#[handler]
pub(crate) async fn bet_status(session: &Session, Data(state): Data<&Arc<AppState>>) -> Response {
    match identity(session) {
        Identity::Student(student) => Json(state.game.bet_status(&student).await).into_response(),
        _ => Json(serde_json::json!({ "error": "login required" }))
            .with_status(StatusCode::UNAUTHORIZED)
            .into_response(),
    }
}

#[handler]
pub(crate) async fn result(
    session: &Session,
    Data(state): Data<&Arc<AppState>>,
) -> poem::Result<Response> {
    let student = match require_student(session) {
        Ok(student) => student,
        Err(redirect) => return Ok(redirect),
    };
    match state.game.result(&student).await {
        Ok((message, money)) => {
            Ok(views::result(&take_flashes(session), &message, money).into_response())
        }
        Err(err) => flash_or_fail(session, err, "/waiting"),
    }
}

#[handler]
pub(crate) async fn ranking(session: &Session, Data(state): Data<&Arc<AppState>>) -> Html<String> {
    let identity = identity(session);
    let me = identity.student();
    let my_money = match me {
        Some(student) => state.game.balance(&student.name).await,
        None => 0,
    };
    let ranking = state.game.ranking().await;
    views::ranking(&take_flashes(session), &ranking, me, my_money)
}
