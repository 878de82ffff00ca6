use std::path::PathBuf;
use std::sync::Arc;

use crate::Clock;
use crate::gateway::{
    HttpQuizGateway, QuizSource, QuizSubmitter, StaticQuizSource, time_limit_unit_from_env,
};
use crate::quiz::QuizLoopService;

/// Where question sets come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizOrigin {
    /// The backend's quiz endpoint.
    Api,
    /// A quiz document on disk, in the backend's JSON shape.
    File(PathBuf),
}

/// Assembles app-facing services from the environment.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    gateway: Arc<HttpQuizGateway>,
}

impl AppServices {
    /// Build services using `GatewayConfig::from_env` for the backend.
    ///
    /// Submissions always go to the backend; with no backend configured
    /// they fail with `SubmitError::Disabled` and the attempt stays retryable.
    #[must_use]
    pub fn from_env(clock: Clock, origin: QuizOrigin) -> Self {
        let gateway = Arc::new(HttpQuizGateway::from_env());
        let source: Arc<dyn QuizSource> = match origin {
            QuizOrigin::Api => Arc::clone(&gateway) as Arc<dyn QuizSource>,
            QuizOrigin::File(path) => Arc::new(StaticQuizSource::from_path(
                path,
                time_limit_unit_from_env(),
            )),
        };
        let submitter: Arc<dyn QuizSubmitter> = Arc::clone(&gateway) as Arc<dyn QuizSubmitter>;
        let quiz_loop = Arc::new(QuizLoopService::new(clock, source, submitter));

        Self { quiz_loop, gateway }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    /// Whether a backend is configured to grade submissions.
    #[must_use]
    pub fn submissions_enabled(&self) -> bool {
        self.gateway.enabled()
    }
}
