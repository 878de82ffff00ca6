use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::model::{
    AnswerSheet, AttemptSnapshot, OptionId, Question, QuizConfig, ReviewItem, ScoredResult,
    SubmissionPayload,
};
use tracing::{debug, info, warn};

use super::progress::{NavigatorCell, ProgressKind, QuizProgress, rounded_percent};
use crate::error::SubmitError;
use crate::gateway::QuizSubmitter;

//
// ─── STATUS ───────────────────────────────────────────────────────────────────
//

/// Lifecycle of one attempt.
///
/// Moves forward only (`NotStarted → InProgress → Submitting → Completed | Failed`,
/// `Failed → Submitting` on retry); `reset` returns to `NotStarted` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizStatus {
    NotStarted,
    InProgress,
    Submitting,
    Completed,
    Failed,
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizStatus::NotStarted => "not started",
            QuizStatus::InProgress => "in progress",
            QuizStatus::Submitting => "submitting",
            QuizStatus::Completed => "completed",
            QuizStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// What a timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running.
    Idle,
    Running { remaining_secs: u32 },
    /// Time ran out on this tick. Reported at most once per attempt; the
    /// caller must submit.
    Expired,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// In-memory state of a single quiz attempt, independent of rendering.
///
/// Guarded operations called in the wrong status are ignored rather than
/// reported: duplicate clicks and late timer ticks are expected traffic.
pub struct QuizSession {
    clock: Clock,
    config: Option<Arc<QuizConfig>>,
    answers: AnswerSheet,
    current: usize,
    remaining_secs: u32,
    time_spent: Vec<u32>,
    status: QuizStatus,
    started_at: Option<DateTime<Utc>>,
    expiry_handled: bool,
    auto_submit: bool,
    result: Option<ScoredResult>,
    last_error: Option<String>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

impl QuizSession {
    /// `clock` stamps the attempt's start time.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            config: None,
            answers: AnswerSheet::new(),
            current: 0,
            remaining_secs: 0,
            time_spent: Vec::new(),
            status: QuizStatus::NotStarted,
            started_at: None,
            expiry_handled: false,
            auto_submit: false,
            result: None,
            last_error: None,
        }
    }

    /// Attach a question set. Ignored while an attempt is running or being submitted.
    pub fn load(&mut self, config: impl Into<Arc<QuizConfig>>) {
        if matches!(self.status, QuizStatus::InProgress | QuizStatus::Submitting) {
            debug!(status = %self.status, "load ignored");
            return;
        }
        let config = config.into();

        self.answers.clear_all();
        self.current = 0;
        self.remaining_secs = config.time_limit().as_secs();
        self.time_spent = vec![0; config.len()];
        self.status = QuizStatus::NotStarted;
        self.started_at = None;
        self.expiry_handled = false;
        self.auto_submit = false;
        self.result = None;
        self.last_error = None;
        debug!(quiz_id = %config.id(), questions = config.len(), "quiz attached");
        self.config = Some(config);
    }

    /// Begin the attempt and arm the countdown.
    pub fn start(&mut self) {
        if self.status != QuizStatus::NotStarted || self.config.is_none() {
            debug!(status = %self.status, loaded = self.config.is_some(), "start ignored");
            return;
        }
        self.status = QuizStatus::InProgress;
        self.started_at = Some(self.clock.now());
        info!(remaining_secs = self.remaining_secs, "quiz started");
    }

    /// Select an option for the current question, replacing any prior choice.
    ///
    /// Options that do not belong to the current question are dropped with a warning.
    pub fn select_answer(&mut self, option_id: OptionId) {
        if !self.is_running() {
            debug!(status = %self.status, "select ignored");
            return;
        }
        let Some(question) = self.current_question() else {
            return;
        };
        if !question.has_option(&option_id) {
            warn!(
                question_id = %question.id(),
                option_id = %option_id,
                "option does not belong to the current question"
            );
            return;
        }
        self.answers.select(self.current, option_id);
    }

    /// Remove the selection for the current question.
    pub fn clear_answer(&mut self) {
        if !self.is_running() {
            debug!(status = %self.status, "clear ignored");
            return;
        }
        self.answers.clear(self.current);
    }

    /// Jump to a question. Out-of-range positions are ignored.
    pub fn go_to(&mut self, index: usize) {
        if !self.is_running() {
            debug!(status = %self.status, "navigation ignored");
            return;
        }
        if index >= self.total_questions() {
            debug!(index, total = self.total_questions(), "navigation out of range");
            return;
        }
        self.current = index;
    }

    pub fn next(&mut self) {
        self.go_to(self.current.saturating_add(1));
    }

    pub fn previous(&mut self) {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => {
                debug!("already at the first question");
            }
        }
    }

    /// Answered/total counts plus the requested percentage.
    #[must_use]
    pub fn progress(&self, kind: ProgressKind) -> QuizProgress {
        let total_count = self.total_questions();
        let answered_count = self.answers.answered_count();
        let percentage = match kind {
            ProgressKind::Position => rounded_percent(self.current + 1, total_count),
            ProgressKind::Completion => rounded_percent(answered_count, total_count),
        };
        QuizProgress {
            answered_count,
            total_count,
            percentage,
        }
    }

    /// True when every question has a selection and the attempt is running.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_running() && self.answers.covers(self.total_questions())
    }

    /// Cells for the question-navigator grid.
    #[must_use]
    pub fn navigator(&self) -> Vec<NavigatorCell> {
        (0..self.total_questions())
            .map(|index| NavigatorCell {
                index,
                is_answered: self.answers.is_answered(index),
                is_current: index == self.current,
            })
            .collect()
    }

    /// Assemble the payload for the current state without changing it.
    ///
    /// Does not require every question to be answered. Returns `None`
    /// before the attempt has started.
    #[must_use]
    pub fn build_submission(&self) -> Option<SubmissionPayload> {
        let config = self.config.as_deref()?;
        let started_at = self.started_at?;
        Some(SubmissionPayload::assemble(AttemptSnapshot {
            config,
            answers: &self.answers,
            time_spent: &self.time_spent,
            started_at,
            remaining_secs: self.remaining_secs,
            is_auto_submit: self.auto_submit,
        }))
    }

    /// Enter `Submitting` and return the payload to send.
    ///
    /// Allowed from `InProgress` and, for a retry, from `Failed`.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::NotSubmittable` in any other status; the session is unchanged.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitError> {
        if !matches!(self.status, QuizStatus::InProgress | QuizStatus::Failed) {
            debug!(status = %self.status, "submit ignored");
            return Err(SubmitError::NotSubmittable {
                status: self.status,
            });
        }
        let payload = self
            .build_submission()
            .ok_or(SubmitError::NotSubmittable {
                status: self.status,
            })?;

        self.status = QuizStatus::Submitting;
        self.last_error = None;
        info!(
            answered = payload.answered_questions,
            total = payload.total_questions,
            auto = payload.is_auto_submit,
            "submitting quiz"
        );
        Ok(payload)
    }

    /// Apply the submitter's answer to a submission started with `begin_submit`.
    ///
    /// On failure the answers and position are kept so the attempt can be retried.
    ///
    /// # Errors
    ///
    /// Passes the submitter's error through after recording its message.
    pub fn finish_submit(
        &mut self,
        outcome: Result<ScoredResult, SubmitError>,
    ) -> Result<ScoredResult, SubmitError> {
        if self.status != QuizStatus::Submitting {
            debug!(status = %self.status, "stale submission outcome ignored");
            return outcome;
        }
        match outcome {
            Ok(result) => {
                info!(
                    correct = result.correct_answers,
                    total = result.total_questions,
                    "quiz completed"
                );
                self.status = QuizStatus::Completed;
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "quiz submission failed");
                self.status = QuizStatus::Failed;
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Submit the attempt and wait for the grade.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::NotSubmittable` when the status does not allow
    /// submitting, or the submitter's error (the session is then `Failed`).
    pub async fn submit(
        &mut self,
        submitter: &dyn QuizSubmitter,
    ) -> Result<ScoredResult, SubmitError> {
        let payload = self.begin_submit()?;
        let outcome = submitter.submit(&payload).await;
        self.finish_submit(outcome)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `TickOutcome::Expired` on the tick that reaches zero and never
    /// again for this attempt.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() || self.expiry_handled {
            return TickOutcome::Idle;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            if let Some(spent) = self.time_spent.get_mut(self.current) {
                *spent = spent.saturating_add(1);
            }
        }
        if self.remaining_secs == 0 {
            self.expiry_handled = true;
            self.auto_submit = true;
            info!("time is up");
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Discard everything, as if newly constructed.
    pub fn reset(&mut self) {
        debug!(status = %self.status, "session reset");
        *self = Self::new(self.clock);
    }

    /// Clear the stored failure message; the status stays as it is.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn config(&self) -> Option<&QuizConfig> {
        self.config.as_deref()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.config.as_ref()?.question(self.current)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.config.as_ref().map_or(0, |c| c.len())
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn is_auto_submit(&self) -> bool {
        self.auto_submit
    }

    #[must_use]
    pub fn result(&self) -> Option<&ScoredResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Per-question review once graded.
    #[must_use]
    pub fn review(&self) -> Option<Vec<ReviewItem>> {
        let config = self.config.as_deref()?;
        Some(self.result.as_ref()?.review(config, &self.answers))
    }

    fn is_running(&self) -> bool {
        self.status == QuizStatus::InProgress
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.config.as_ref().map(|c| c.id().clone()))
            .field("status", &self.status)
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("remaining_secs", &self.remaining_secs)
            .field("auto_submit", &self.auto_submit)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::TimeLimit;
    use quiz_core::model::{AnswerOption, Difficulty, QuestionId, QuizId};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn build_config(questions: usize, secs: u32) -> QuizConfig {
        let questions = (0..questions)
            .map(|n| {
                Question::new(
                    QuestionId::new(format!("q{n}")).unwrap(),
                    format!("Question {n}"),
                    vec![
                        AnswerOption::new(OptionId::new(format!("q{n}-a")).unwrap(), "A"),
                        AnswerOption::new(OptionId::new(format!("q{n}-b")).unwrap(), "B"),
                    ],
                    "general",
                    Difficulty::Easy,
                )
                .unwrap()
            })
            .collect();
        QuizConfig::new(
            QuizId::new("quiz").unwrap(),
            "Quiz",
            "",
            questions,
            TimeLimit::from_secs(secs),
        )
        .unwrap()
    }

    fn opt(id: &str) -> OptionId {
        OptionId::new(id).unwrap()
    }

    fn started(questions: usize, secs: u32) -> QuizSession {
        let mut session = QuizSession::new(fixed_clock());
        session.load(build_config(questions, secs));
        session.start();
        session
    }

    #[test]
    fn load_attaches_config_without_starting() {
        let mut session = QuizSession::new(fixed_clock());
        session.load(build_config(2, 90));
        assert_eq!(session.status(), QuizStatus::NotStarted);
        assert_eq!(session.remaining_secs(), 90);
        assert_eq!(session.total_questions(), 2);
        assert!(session.started_at().is_none());
    }

    #[test]
    fn start_without_config_is_ignored() {
        let mut session = QuizSession::new(fixed_clock());
        session.start();
        assert_eq!(session.status(), QuizStatus::NotStarted);
    }

    #[test]
    fn start_twice_leaves_state_unchanged() {
        let mut session = started(3, 60);
        session.select_answer(opt("q0-a"));
        session.go_to(2);
        session.start();
        assert_eq!(session.status(), QuizStatus::InProgress);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.answers().get(0), Some(&opt("q0-a")));
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn load_is_ignored_mid_attempt() {
        let mut session = started(3, 60);
        session.select_answer(opt("q0-b"));
        session.load(build_config(5, 10));
        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.answers().answered_count(), 1);
    }

    #[test]
    fn foreign_option_is_rejected() {
        let mut session = started(2, 60);
        session.select_answer(opt("q1-a"));
        assert!(!session.answers().is_answered(0));
        session.select_answer(opt("q0-b"));
        assert_eq!(session.answers().get(0), Some(&opt("q0-b")));
    }

    #[test]
    fn selecting_before_start_is_ignored() {
        let mut session = QuizSession::new(fixed_clock());
        session.load(build_config(2, 60));
        session.select_answer(opt("q0-a"));
        assert_eq!(session.answers().answered_count(), 0);
    }

    #[test]
    fn clear_answer_removes_current_selection_only() {
        let mut session = started(2, 60);
        session.select_answer(opt("q0-a"));
        session.next();
        session.select_answer(opt("q1-a"));
        session.clear_answer();
        assert!(session.answers().is_answered(0));
        assert!(!session.answers().is_answered(1));
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut session = started(5, 60);
        session.previous();
        assert_eq!(session.current_index(), 0);
        session.go_to(5);
        assert_eq!(session.current_index(), 0);
        session.go_to(4);
        session.next();
        assert_eq!(session.current_index(), 4);
    }

    #[test]
    fn position_and_completion_progress_differ() {
        let mut session = started(4, 60);
        session.go_to(2);
        session.select_answer(opt("q2-a"));

        let position = session.progress(ProgressKind::Position);
        let completion = session.progress(ProgressKind::Completion);
        assert_eq!(position.percentage, 75);
        assert_eq!(completion.percentage, 25);
        assert_eq!(position.answered_count, 1);
        assert_eq!(completion.total_count, 4);
    }

    #[test]
    fn can_submit_requires_all_answers() {
        let mut session = started(2, 60);
        session.select_answer(opt("q0-a"));
        assert!(!session.can_submit());
        session.next();
        session.select_answer(opt("q1-b"));
        assert!(session.can_submit());
    }

    #[test]
    fn navigator_marks_answered_and_current() {
        let mut session = started(3, 60);
        session.select_answer(opt("q0-a"));
        session.go_to(1);
        let cells = session.navigator();
        assert_eq!(cells.len(), 3);
        assert!(cells[0].is_answered && !cells[0].is_current);
        assert!(!cells[1].is_answered && cells[1].is_current);
    }

    #[test]
    fn tick_counts_down_and_tracks_time_per_question() {
        let mut session = started(2, 5);
        assert_eq!(session.tick(), TickOutcome::Running { remaining_secs: 4 });
        session.next();
        session.tick();
        session.tick();

        let payload = session.build_submission().unwrap();
        assert_eq!(payload.time_taken, 3);
        assert_eq!(payload.answers[0].time_taken, 1);
        assert_eq!(payload.answers[1].time_taken, 2);
    }

    #[test]
    fn expiry_is_reported_once() {
        let mut session = started(1, 2);
        assert_eq!(session.tick(), TickOutcome::Running { remaining_secs: 1 });
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.remaining_secs(), 0);
        assert!(session.is_auto_submit());
    }

    #[test]
    fn zero_time_limit_expires_on_first_tick() {
        let mut session = started(1, 0);
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn build_submission_is_stable() {
        let mut session = started(3, 60);
        session.select_answer(opt("q0-a"));
        session.tick();
        assert_eq!(session.build_submission(), session.build_submission());
    }

    #[test]
    fn begin_submit_blocks_mutation_until_finished() {
        let mut session = started(2, 60);
        session.select_answer(opt("q0-a"));
        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.answered_questions, 1);
        assert_eq!(session.status(), QuizStatus::Submitting);

        session.go_to(1);
        session.clear_answer();
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_answered(0));
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert!(matches!(
            session.begin_submit(),
            Err(SubmitError::NotSubmittable {
                status: QuizStatus::Submitting
            })
        ));
    }

    #[test]
    fn failed_submit_keeps_answers_and_records_message() {
        let mut session = started(2, 60);
        session.select_answer(opt("q0-a"));
        session.go_to(1);
        session.begin_submit().unwrap();
        let err = session
            .finish_submit(Err(SubmitError::Rejected {
                message: "Server busy".into(),
            }))
            .unwrap_err();

        assert!(matches!(err, SubmitError::Rejected { .. }));
        assert_eq!(session.status(), QuizStatus::Failed);
        assert_eq!(session.last_error(), Some("Server busy"));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.answers().get(0), Some(&opt("q0-a")));

        session.dismiss_error();
        assert_eq!(session.last_error(), None);
        assert_eq!(session.status(), QuizStatus::Failed);
    }

    #[test]
    fn completed_session_is_frozen() {
        let mut session = started(1, 60);
        session.select_answer(opt("q0-a"));
        session.begin_submit().unwrap();
        session
            .finish_submit(Ok(ScoredResult {
                total_questions: 1,
                correct_answers: 1,
                percentage: 100.0,
                total_time_taken: 0,
                subject_performance: Vec::new(),
                question_results: Vec::new(),
                message: None,
                streak: None,
            }))
            .unwrap();

        session.select_answer(opt("q0-b"));
        session.clear_answer();
        session.start();
        assert_eq!(session.status(), QuizStatus::Completed);
        assert_eq!(session.answers().get(0), Some(&opt("q0-a")));
        assert!(session.begin_submit().is_err());
        assert_eq!(session.review().map(|r| r.len()), Some(1));
    }

    #[test]
    fn reset_returns_to_a_blank_session() {
        let mut session = started(2, 60);
        session.select_answer(opt("q0-a"));
        session.reset();
        assert_eq!(session.status(), QuizStatus::NotStarted);
        assert!(session.config().is_none());
        assert_eq!(session.answers().answered_count(), 0);
        assert_eq!(session.total_questions(), 0);
        assert_eq!(session.progress(ProgressKind::Position).percentage, 0);
    }
}
