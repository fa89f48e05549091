use poem::{session::Session, web::Redirect, IntoResponse, Response};
use quizbet_core::{Error, Student};
use serde::{Deserialize, Serialize};

const IDENTITY: &str = "identity";
const FLASH: &str = "flash";

/// Who the browser session belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Identity {
    #[default]
    Anonymous,
    Student(Student),
    Admin,
}

impl Identity {
    pub(crate) fn student(&self) -> Option<&Student> {
        match self {
            Self::Student(student) => Some(student),
            _ => None,
        }
    }
}

pub(crate) fn identity(session: &Session) -> Identity {
    session.get(IDENTITY).unwrap_or_default()
}

pub(crate) fn set_identity(session: &Session, identity: &Identity) {
    session.set(IDENTITY, identity);
}

/// Queue a message for the next rendered page.
pub(crate) fn flash(session: &Session, message: impl ToString) {
    let mut messages = session.get::<Vec<String>>(FLASH).unwrap_or_default();
    messages.push(message.to_string());
    session.set(FLASH, messages);
}

/// Drain queued messages.
pub(crate) fn take_flashes(session: &Session) -> Vec<String> {
    let messages = session.get::<Vec<String>>(FLASH).unwrap_or_default();
    if !messages.is_empty() {
        session.remove(FLASH);
    }
    messages
}

/// The logged-in student, or a redirect to the login page.
pub(crate) fn require_student(session: &Session) -> Result<Student, Response> {
    match identity(session) {
        Identity::Student(student) => Ok(student),
        _ => {
            flash(session, Error::LoginRequired);
            Err(Redirect::see_other("/login").into_response())
        }
    }
}

/// Succeeds only for an admin session, otherwise redirects to the admin login.
pub(crate) fn require_admin(session: &Session) -> Result<(), Response> {
    match identity(session) {
        Identity::Admin => Ok(()),
        _ => {
            flash(session, "Enter the admin password.");
            Err(Redirect::see_other("/admin_login").into_response())
        }
    }
}
