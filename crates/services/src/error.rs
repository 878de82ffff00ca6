//! Shared error types for the services crate.

use thiserror::Error;

use crate::quiz::QuizStatus;

/// Errors emitted while fetching a question set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("quiz source is not configured")]
    Disabled,
    #[error("quiz request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed quiz data: {0}")]
    Malformed(String),
    #[error("could not read quiz file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Model(#[from] quiz_core::Error),
}

impl SourceError {
    /// True when the source answered but the quiz cannot be taken
    /// (no questions, or a question without options).
    #[must_use]
    pub fn is_unplayable(&self) -> bool {
        matches!(self, SourceError::Model(err) if err.is_unplayable())
    }
}

/// Errors emitted while submitting an attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("submission endpoint is not configured")]
    Disabled,
    #[error("submission failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("submission rejected: {message}")]
    Rejected { message: String },
    #[error("malformed grading response: {0}")]
    Malformed(String),
    #[error("quiz cannot be submitted while {status}")]
    NotSubmittable { status: QuizStatus },
}

impl SubmitError {
    /// Message shown next to the "retry submit" action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Disabled => "Submitting is not available right now.".to_string(),
            SubmitError::Http(err) if err.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            SubmitError::Http(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            SubmitError::HttpStatus(status) if status.is_server_error() => {
                "The server had a problem grading your quiz. Please try again.".to_string()
            }
            SubmitError::HttpStatus(status) => {
                format!("Submission failed ({status}). Please try again.")
            }
            SubmitError::Rejected { message } => message.clone(),
            SubmitError::Malformed(_) => {
                "The server sent an unexpected response. Please try again.".to_string()
            }
            SubmitError::NotSubmittable { status } => {
                format!("This quiz cannot be submitted while {status}.")
            }
        }
    }
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available")]
    Empty,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}
