use thiserror::Error;

use crate::model::ids::{ExamId, QuestionId, QuizId};
use crate::model::question::Question;
use crate::time::TimeLimit;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizConfigError {
    #[error("no questions available")]
    NoQuestions,

    #[error("question {question_id} appears more than once")]
    DuplicateQuestion { question_id: QuestionId },
}

/// The question set and time limit for one attempt.
///
/// Supplied by a quiz source and never mutated afterwards; sessions hold it
/// behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    id: QuizId,
    exam_id: Option<ExamId>,
    title: String,
    description: String,
    questions: Vec<Question>,
    time_limit: TimeLimit,
    estimated_mins: Option<u32>,
}

impl QuizConfig {
    /// # Errors
    ///
    /// Returns `QuizConfigError::NoQuestions` when `questions` is empty and
    /// `QuizConfigError::DuplicateQuestion` when two questions share an id.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
        time_limit: TimeLimit,
    ) -> Result<Self, QuizConfigError> {
        if questions.is_empty() {
            return Err(QuizConfigError::NoQuestions);
        }
        for (i, question) in questions.iter().enumerate() {
            if questions[..i].iter().any(|prev| prev.id() == question.id()) {
                return Err(QuizConfigError::DuplicateQuestion {
                    question_id: question.id().clone(),
                });
            }
        }

        Ok(Self {
            id,
            exam_id: None,
            title: title.into(),
            description: description.into(),
            questions,
            time_limit,
            estimated_mins: None,
        })
    }

    #[must_use]
    pub fn with_exam_id(mut self, exam_id: Option<ExamId>) -> Self {
        self.exam_id = exam_id;
        self
    }

    #[must_use]
    pub fn with_estimated_mins(mut self, mins: Option<u32>) -> Self {
        self.estimated_mins = mins;
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn exam_id(&self) -> Option<&ExamId> {
        self.exam_id.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions; always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }

    #[must_use]
    pub fn estimated_mins(&self) -> Option<u32> {
        self.estimated_mins
    }

    /// Position of the question with the given id.
    #[must_use]
    pub fn position_of(&self, question_id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == question_id)
    }
}
