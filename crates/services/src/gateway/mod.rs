//! Collaborators that supply question sets and grade finished attempts.

mod file;
mod http;
mod wire;

use async_trait::async_trait;
use quiz_core::model::{QuizConfig, ScoredResult, SubmissionPayload};

use crate::error::{SourceError, SubmitError};

pub use file::StaticQuizSource;
pub use http::{GatewayConfig, HttpQuizGateway, time_limit_unit_from_env};

/// Which quiz the user asked for, based on their profile selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizRequest {
    pub class_level: String,
    pub stream: Option<String>,
}

impl QuizRequest {
    #[must_use]
    pub fn new(class_level: impl Into<String>) -> Self {
        Self {
            class_level: class_level.into(),
            stream: None,
        }
    }

    #[must_use]
    pub fn with_stream(mut self, stream: Option<String>) -> Self {
        self.stream = stream.filter(|s| !s.trim().is_empty());
        self
    }
}

/// Supplies a validated question set for a request.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `SourceError` when the quiz cannot be fetched or is malformed.
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizConfig, SourceError>;
}

/// Grades a finished attempt.
#[async_trait]
pub trait QuizSubmitter: Send + Sync {
    /// # Errors
    ///
    /// Returns `SubmitError` for transport failures, non-2xx responses,
    /// rejected submissions and unparseable responses.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ScoredResult, SubmitError>;
}
