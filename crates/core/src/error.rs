use thiserror::Error;

use crate::model::{ParseIdError, QuestionError, QuizConfigError};

/// Errors raised while turning raw quiz data into validated domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Config(#[from] QuizConfigError),
}

impl Error {
    /// True when the data describes a quiz that cannot be taken at all
    /// (no questions, or a question without any option to choose).
    #[must_use]
    pub fn is_unplayable(&self) -> bool {
        matches!(
            self,
            Error::Config(QuizConfigError::NoQuestions)
                | Error::Question(QuestionError::NoOptions { .. })
        )
    }
}
