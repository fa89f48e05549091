//! Minimal server-rendered pages.

use std::fmt::Write;

use poem::web::Html;
use quizbet_core::{game::Overview, Choice, RankEntry, Student};
use strum::IntoEnumIterator;

use super::session::Identity;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, flashes: &[String], body: &str) -> Html<String> {
    let mut messages = String::new();
    for message in flashes {
        let _ = write!(messages, "<li>{}</li>", escape(message));
    }
    if !messages.is_empty() {
        messages = format!("<ul class=\"flash\">{messages}</ul>");
    }
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><nav><a href=\"/\">Home</a> | <a href=\"/ranking\">Ranking</a></nav>\
         <h1>{title}</h1>{messages}{body}</body></html>"
    ))
}

fn answer_options() -> String {
    Choice::iter()
        .map(|choice| format!("<option value=\"{choice}\">{choice}</option>"))
        .collect()
}

pub(super) fn index(flashes: &[String], identity: &Identity) -> Html<String> {
    let links = match identity {
        Identity::Anonymous => {
            "<a href=\"/login\">Student login</a> | <a href=\"/admin_login\">Admin</a>".to_string()
        }
        Identity::Student(student) => format!(
            "Logged in as {}. <a href=\"/play\">Play</a> | <a href=\"/logout\">Logout</a>",
            escape(&student.name)
        ),
        Identity::Admin => {
            "<a href=\"/admin\">Dashboard</a> | <a href=\"/logout\">Logout</a>".to_string()
        }
    };
    page("Quizbet", flashes, &format!("<p>{links}</p>"))
}

pub(super) fn login(flashes: &[String]) -> Html<String> {
    page(
        "Student login",
        flashes,
        "<form method=\"post\" action=\"/login\">\
         <input name=\"student_id\" placeholder=\"Student ID\">\
         <input name=\"name\" placeholder=\"Name\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <button>Login</button></form>",
    )
}

pub(super) fn play(flashes: &[String], student: &Student, money: i64, running: bool) -> Html<String> {
    let form = if running {
        format!(
            "<form method=\"post\" action=\"/check_answer\">\
             <select name=\"answer\">{}</select>\
             <input name=\"bet\" type=\"number\" min=\"1\" max=\"{money}\" placeholder=\"Bet\">\
             <button>Place bet</button></form>",
            answer_options()
        )
    } else {
        "<p>Betting is closed. Wait for the round to start.</p>".to_string()
    };
    page(
        "Play",
        flashes,
        &format!(
            "<p>{} ({}): {money}G</p>{form}",
            escape(&student.name),
            escape(&student.id)
        ),
    )
}

pub(super) fn waiting(flashes: &[String]) -> Html<String> {
    page(
        "Waiting for results",
        flashes,
        "<p id=\"status\">Your bet is in. Waiting for the round to be settled...</p>\
         <script>\
         async function poll() {\
           const res = await fetch('/bet_status');\
           if (res.ok) {\
             const body = await res.json();\
             if (body.resolved) { window.location = '/result'; return; }\
           }\
           setTimeout(poll, 2000);\
         }\
         poll();\
         </script>",
    )
}

pub(super) fn result(flashes: &[String], message: &str, money: i64) -> Html<String> {
    page(
        "Result",
        flashes,
        &format!(
            "<p>{}</p><p>Balance: {money}G</p><p><a href=\"/play\">Play again</a></p>",
            escape(message)
        ),
    )
}

pub(super) fn ranking(
    flashes: &[String],
    ranking: &[RankEntry],
    me: Option<&Student>,
    my_money: i64,
) -> Html<String> {
    let mut rows = String::new();
    for (idx, entry) in ranking.iter().enumerate() {
        let mine = me.is_some_and(|me| me.id == entry.student_id);
        let _ = write!(
            rows,
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}G</td></tr>",
            if mine { " class=\"me\"" } else { "" },
            idx + 1,
            escape(&entry.student_id),
            escape(&entry.name),
            entry.balance
        );
    }
    let mine = me
        .map(|me| format!("<p>You: {} ({my_money}G)</p>", escape(&me.name)))
        .unwrap_or_default();
    page(
        "Ranking",
        flashes,
        &format!(
            "{mine}<table><tr><th>Rank</th><th>Student ID</th><th>Name</th><th>Balance</th></tr>{rows}</table>"
        ),
    )
}

pub(super) fn admin_login(flashes: &[String]) -> Html<String> {
    page(
        "Admin login",
        flashes,
        "<form method=\"post\" action=\"/admin_login\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <button>Login</button></form>",
    )
}

pub(super) fn admin(flashes: &[String], overview: &Overview) -> Html<String> {
    let round = &overview.round;
    let answer = round
        .answer
        .map(|answer| answer.to_string())
        .unwrap_or_else(|| "not set".to_string());

    let mut students = String::new();
    for entry in &overview.students {
        let _ = write!(
            students,
            "<tr><td>{}</td><td>{}</td><td>{}G</td></tr>",
            escape(&entry.student_id),
            escape(&entry.name),
            entry.balance
        );
    }
    let mut results = String::new();
    for (student_id, message) in &round.results {
        let _ = write!(
            results,
            "<li>{}: {}</li>",
            escape(student_id),
            escape(message)
        );
    }

    let body = format!(
        "<p>Phase: {phase} | Running: {running} | Answer: {answer} | Pending bets: {bets}</p>\
         <form method=\"post\" action=\"/admin/start\"><button>Start</button></form>\
         <form method=\"post\" action=\"/admin/stop\"><button>Stop betting</button></form>\
         <form method=\"post\" action=\"/admin/settle\"><button>Settle</button></form>\
         <form method=\"post\" action=\"/admin/answer\"><select name=\"answer\">{options}</select>\
         <button>Set answer</button></form>\
         <h2>Register student</h2>\
         <form method=\"post\" action=\"/admin/register\">\
         <input name=\"student_id\" placeholder=\"Student ID\">\
         <input name=\"name\" placeholder=\"Name\">\
         <input name=\"password\" placeholder=\"Password\">\
         <button>Register</button></form>\
         <h2>Set balance</h2>\
         <form method=\"post\" action=\"/admin/money\">\
         <input name=\"target_student_id\" placeholder=\"Student ID\">\
         <input name=\"amount\" type=\"number\" placeholder=\"Amount\">\
         <button>Set</button></form>\
         <h2>Students</h2><table><tr><th>Student ID</th><th>Name</th><th>Balance</th></tr>{students}</table>\
         <h2>Results</h2><ul>{results}</ul>",
        phase = round.phase,
        running = round.is_running(),
        bets = round.bets.len(),
        options = answer_options(),
    );
    page("Admin", flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Kim\" & 'Lee'</b>"),
            "&lt;b&gt;&quot;Kim&quot; &amp; &#39;Lee&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn flashes_are_rendered_escaped() {
        let Html(html) = login(&["<oops>".to_string()]);
        assert!(html.contains("<li>&lt;oops&gt;</li>"));
    }
}
