use std::{net::SocketAddr, sync::Arc};

use poem::{
    get,
    http::StatusCode,
    listener::TcpListener,
    middleware::Tracing,
    post,
    session::{CookieConfig, CookieSession, Session},
    web::{cookie::CookieKey, Redirect},
    Endpoint, EndpointExt, IntoResponse, Response, Route, Server,
};
use quizbet_core::Game;

use self::session::flash;
use crate::config::Config;

mod admin;
mod session;
mod student;
mod views;


/// Name of the session cookie.
pub(crate) const SESSION_COOKIE: &str = "quizbet-session";

/// Shared server state.
pub(crate) struct AppState {
    pub(crate) game: Game,
    pub(crate) admin_password: String,
    /// Mark the session cookie `Secure`; needs HTTPS in front of the server.
    pub(crate) secure_cookies: bool,
}

/// Build the route table.
pub(crate) fn app(state: Arc<AppState>, key: CookieKey) -> impl Endpoint {
    let cookie = CookieConfig::signed(key)
        .name(SESSION_COOKIE)
        .secure(state.secure_cookies);
    Route::new()
        .at("/", get(student::index))
        .at("/login", get(student::login_page).post(student::login))
        .at("/logout", get(student::logout))
        .at("/play", get(student::play))
        .at("/check_answer", post(student::check_answer))
        .at("/waiting", get(student::waiting))
        .at("/bet_status", get(student::bet_status))
        .at("/result", get(student::result))
        .at("/ranking", get(student::ranking))
        .at(
            "/admin_login",
            get(admin::admin_login_page).post(admin::admin_login),
        )
        .at("/admin", get(admin::dashboard))
        .at("/admin/register", post(admin::register))
        .at("/admin/start", post(admin::start))
        .at("/admin/stop", post(admin::stop))
        .at("/admin/settle", post(admin::settle))
        .at("/admin/answer", post(admin::set_answer))
        .at("/admin/money", post(admin::set_money))
        .with(CookieSession::new(cookie))
        .with(Tracing)
        .data(state)
}

/// Serve `game` until the listener fails.
pub(crate) async fn serve(game: Game, config: &Config, listen: SocketAddr) -> eyre::Result<()> {
    let state = Arc::new(AppState {
        game,
        admin_password: config.admin_password().to_owned(),
        secure_cookies: config.secure_cookies(),
    });
    let app = app(state, config.session_key()?);

    tracing::info!(%listen, "serving");
    Server::new(TcpListener::bind(listen)).run(app).await?;
    Ok(())
}

/// Report a validation failure as a flash message and redirect to `back`.
/// Anything else is logged and turned into a 500.
pub(crate) fn flash_or_fail(
    session: &Session,
    err: quizbet_core::Error,
    back: &str,
) -> poem::Result<Response> {
    if err.is_user_facing() {
        tracing::debug!(%err, back, "rejected request");
        flash(session, &err);
        Ok(Redirect::see_other(back).into_response())
    } else {
        tracing::error!(%err, "request failed");
        Err(poem::Error::from_string(
            format!("storage error: {err}"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}
