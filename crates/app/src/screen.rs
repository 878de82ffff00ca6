//! Plain-text screens for the terminal host. Each returns the text to print.

use std::fmt::Write as _;

use quiz_core::model::{QuizConfig, ScoredResult};
use services::{NavigatorCell, ProgressKind, QuizSession, QuizStatus};

#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[must_use]
pub fn intro(config: &QuizConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", config.title());
    if !config.description().is_empty() {
        let _ = writeln!(out, "{}", config.description());
    }
    let _ = writeln!(
        out,
        "{} questions, time limit {}",
        config.len(),
        format_clock(config.time_limit().as_secs())
    );
    if let Some(mins) = config.estimated_mins() {
        let _ = writeln!(out, "Estimated time: {mins} min");
    }
    let _ = writeln!(out, "Press Enter to start, or q to go back.");
    out
}

#[must_use]
pub fn question(session: &QuizSession) -> String {
    let mut out = String::new();
    let Some(question) = session.current_question() else {
        return out;
    };
    let index = session.current_index();
    let progress = session.progress(ProgressKind::Position);

    let _ = writeln!(
        out,
        "\nQuestion {} of {} ({}%)   time left {}",
        index + 1,
        progress.total_count,
        progress.percentage,
        format_clock(session.remaining_secs())
    );
    let mut tags = vec![question.subject().to_string(), question.difficulty().label().to_string()];
    if let Some(topic) = question.topic() {
        tags.push(topic.to_string());
    }
    let _ = writeln!(out, "[{}]", tags.join(" / "));
    let _ = writeln!(out, "{}", question.prompt());

    let selected = session.answers().get(index);
    for (pos, option) in question.options().iter().enumerate() {
        let mark = if selected == Some(option.id()) { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}. {}", pos + 1, option.text());
    }
    out
}

#[must_use]
pub fn navigator(cells: &[NavigatorCell]) -> String {
    cells
        .iter()
        .map(|cell| {
            let answered = if cell.is_answered { "*" } else { " " };
            if cell.is_current {
                format!("<{}{answered}>", cell.index + 1)
            } else {
                format!("[{}{answered}]", cell.index + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn review(session: &QuizSession) -> String {
    let completion = session.progress(ProgressKind::Completion);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nAnswered {} of {} ({}%)",
        completion.answered_count, completion.total_count, completion.percentage
    );
    let _ = writeln!(out, "{}", navigator(&session.navigator()));
    if session.can_submit() {
        let _ = writeln!(out, "All questions answered. Type s to submit.");
    } else {
        let _ = writeln!(out, "Answer every question before submitting (g <n> to jump).");
    }
    out
}

#[must_use]
pub fn status_line(session: &QuizSession) -> Option<String> {
    match session.status() {
        QuizStatus::Failed => Some(format!(
            "Submission failed: {}\nType r to retry, d to dismiss, or q to go back.",
            session.last_error().unwrap_or("unknown error")
        )),
        QuizStatus::Submitting => Some("Submitting...".to_string()),
        _ => None,
    }
}

#[must_use]
pub fn result(session: &QuizSession, result: &ScoredResult) -> String {
    let mut out = String::new();
    if session.is_auto_submit() {
        let _ = writeln!(out, "\nTime is up! Your answers were submitted automatically.");
    }
    let _ = writeln!(
        out,
        "\nScore: {}/{} ({}%)   time {}",
        result.correct_answers,
        result.total_questions,
        result.rounded_percentage(),
        format_clock(result.total_time_taken)
    );
    if let Some(message) = &result.message {
        let _ = writeln!(out, "{message}");
    }
    if let Some(streak) = result.streak {
        let _ = writeln!(out, "Streak: {streak} day(s)");
    }
    for subject in &result.subject_performance {
        let _ = writeln!(
            out,
            "  {:<16} {}/{} ({:.0}%)",
            subject.subject, subject.correct, subject.total, subject.percentage
        );
    }

    let (Some(config), Some(items)) = (session.config(), session.review()) else {
        return out;
    };
    for item in items {
        let Some(question) = config.question(item.index) else {
            continue;
        };
        let verdict = match item.is_correct {
            Some(true) => "correct",
            Some(false) => "wrong",
            None => "not graded",
        };
        let _ = writeln!(out, "\n{}. {} ({verdict})", item.index + 1, question.prompt());
        let text = |id: Option<&quiz_core::model::OptionId>| {
            id.and_then(|id| question.option(id))
                .map_or("-", |o| o.text())
                .to_string()
        };
        let _ = writeln!(out, "   your answer: {}", text(item.selected.as_ref()));
        if item.is_correct == Some(false) {
            let _ = writeln!(out, "   correct:     {}", text(item.correct.as_ref()));
        }
        if let Some(explanation) = question.explanation() {
            let _ = writeln!(out, "   {explanation}");
        }
    }
    let _ = writeln!(out, "\nType new for another quiz, or q to quit.");
    out
}

#[must_use]
pub fn intro_help() -> &'static str {
    "Commands:\n  \
     Enter / start   begin the quiz\n  \
     q               go back"
}

#[must_use]
pub fn help() -> &'static str {
    "Commands:\n  \
     1..9      choose an option\n  \
     c         clear your answer\n  \
     n / p     next / previous question\n  \
     g <n>     go to question n\n  \
     v         review progress\n  \
     s         submit (all questions answered)\n  \
     r / d     retry a failed submission / dismiss the error\n  \
     new       take a new quiz\n  \
     q         quit"
}
