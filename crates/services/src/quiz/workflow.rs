use std::sync::Arc;
use std::time::Duration;

use quiz_core::Clock;
use quiz_core::model::ScoredResult;
use tracing::{info, warn};

use super::session::{QuizSession, QuizStatus, TickOutcome};
use super::timer::{Countdown, SharedSession};
use crate::error::{QuizError, SubmitError};
use crate::gateway::{QuizRequest, QuizSource, QuizSubmitter};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Orchestrates quiz loading, countdown and submission around a `QuizSession`.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuizSource>,
    submitter: Arc<dyn QuizSubmitter>,
    tick_period: Duration,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuizSource>,
        submitter: Arc<dyn QuizSubmitter>,
    ) -> Self {
        Self {
            clock,
            source,
            submitter,
            tick_period: TICK_PERIOD,
        }
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Fetch a quiz and return a session with it attached (not started).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when the quiz has no playable questions,
    /// or `QuizError::Source` when it cannot be fetched.
    pub async fn load_quiz(&self, request: &QuizRequest) -> Result<QuizSession, QuizError> {
        let mut session = QuizSession::new(self.clock);
        self.take_new_quiz(&mut session, request).await?;
        Ok(session)
    }

    /// Discard `session` and attach a freshly fetched quiz.
    ///
    /// On error the session is left blank in `NotStarted`.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::load_quiz`].
    pub async fn take_new_quiz(
        &self,
        session: &mut QuizSession,
        request: &QuizRequest,
    ) -> Result<(), QuizError> {
        session.reset();
        let config = self.source.fetch_quiz(request).await.map_err(|err| {
            if err.is_unplayable() {
                warn!(error = %err, "quiz has no playable questions");
                QuizError::Empty
            } else {
                QuizError::Source(err)
            }
        })?;
        info!(quiz_id = %config.id(), title = config.title(), "quiz ready");
        session.load(config);
        Ok(())
    }

    /// Submit the attempt through the configured submitter.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::submit`].
    pub async fn submit(&self, session: &mut QuizSession) -> Result<ScoredResult, SubmitError> {
        session.submit(self.submitter.as_ref()).await
    }

    /// Re-send a failed submission without touching the answers.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::NotSubmittable` unless the session is `Failed`.
    pub async fn retry_submit(
        &self,
        session: &mut QuizSession,
    ) -> Result<ScoredResult, SubmitError> {
        if session.status() != QuizStatus::Failed {
            return Err(SubmitError::NotSubmittable {
                status: session.status(),
            });
        }
        self.submit(session).await
    }

    /// Advance the countdown once, submitting if time ran out on this tick.
    ///
    /// Returns `None` unless this tick triggered the submission.
    pub async fn tick(
        &self,
        session: &mut QuizSession,
    ) -> Option<Result<ScoredResult, SubmitError>> {
        match session.tick() {
            TickOutcome::Expired => Some(self.submit(session).await),
            TickOutcome::Idle | TickOutcome::Running { .. } => None,
        }
    }

    /// Run the countdown for a shared session in the background.
    #[must_use]
    pub fn spawn_countdown(&self, session: SharedSession) -> Countdown {
        Countdown::spawn(session, Arc::clone(&self.submitter), self.tick_period)
    }
}
