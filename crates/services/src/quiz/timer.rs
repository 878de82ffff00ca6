use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::ScoredResult;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

use super::session::{QuizSession, TickOutcome};
use crate::error::SubmitError;
use crate::gateway::QuizSubmitter;

/// Session shared between the UI event loop and its countdown.
pub type SharedSession = Arc<Mutex<QuizSession>>;

/// How a countdown task ended.
#[derive(Debug)]
pub enum CountdownEnd {
    /// The session left `InProgress` some other way (manual submit, reset).
    Stopped,
    /// Time ran out and this countdown submitted the attempt.
    Submitted(Result<ScoredResult, SubmitError>),
}

/// Handle to a running countdown. Dropping it disarms the timer.
#[derive(Debug)]
pub struct Countdown {
    task: Option<JoinHandle<CountdownEnd>>,
}

impl Countdown {
    /// Tick `session` every `period` and auto-submit when time runs out.
    ///
    /// The session lock is held from the expiring tick until the session has
    /// entered `Submitting`, so overlapping countdowns cannot both submit.
    /// It is released while the submitter is awaited.
    #[must_use]
    pub fn spawn(
        session: SharedSession,
        submitter: Arc<dyn QuizSubmitter>,
        period: Duration,
    ) -> Self {
        let task = tokio::spawn(run(session, submitter, period));
        Self { task: Some(task) }
    }

    /// Wait for the countdown to end.
    ///
    /// Cancel safe: the task stays owned by `self` until it has finished, so
    /// dropping this future leaves the countdown armed and dropping `self`
    /// still aborts it. Once an end has been returned, later calls return
    /// `Stopped`.
    pub async fn join(&mut self) -> CountdownEnd {
        let Some(task) = self.task.as_mut() else {
            return CountdownEnd::Stopped;
        };
        let end = task.await.unwrap_or(CountdownEnd::Stopped);
        self.task = None;
        end
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    session: SharedSession,
    submitter: Arc<dyn QuizSubmitter>,
    period: Duration,
) -> CountdownEnd {
    let mut interval = time::interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let payload = {
            let mut guard = session.lock().await;
            match guard.tick() {
                TickOutcome::Running { .. } => continue,
                TickOutcome::Idle => {
                    debug!("countdown stopped");
                    return CountdownEnd::Stopped;
                }
                TickOutcome::Expired => match guard.begin_submit() {
                    Ok(payload) => payload,
                    Err(err) => return CountdownEnd::Submitted(Err(err)),
                },
            }
        };

        let outcome = submitter.submit(&payload).await;
        let mut guard = session.lock().await;
        return CountdownEnd::Submitted(guard.finish_submit(outcome));
    }
}
