use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {question_id} has an empty prompt")]
    EmptyPrompt { question_id: QuestionId },

    #[error("question {question_id} has no options")]
    NoOptions { question_id: QuestionId },

    #[error("question {question_id} lists option {option_id} more than once")]
    DuplicateOption {
        question_id: QuestionId,
        option_id: OptionId,
    },
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty tag attached to a question by the quiz source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Any tag the source sends that is not one of the above.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unknown => "unrated",
        }
    }
}

//
// ─── OPTION ───────────────────────────────────────────────────────────────────
//

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    id: OptionId,
    text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &OptionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    subject: String,
    difficulty: Difficulty,
    topic: Option<String>,
    explanation: Option<String>,
}

impl Question {
    /// Build a question, checking that it can actually be answered.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::NoOptions` when `options` is empty and
    /// `QuestionError::DuplicateOption` when two options share an id.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
        subject: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { question_id: id });
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions { question_id: id });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|prev| prev.id == option.id) {
                return Err(QuestionError::DuplicateOption {
                    question_id: id,
                    option_id: option.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            prompt,
            options,
            subject: subject.into(),
            difficulty,
            topic: None,
            explanation: None,
        })
    }

    #[must_use]
    pub fn with_topic(mut self, topic: Option<String>) -> Self {
        self.topic = topic.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation.filter(|e| !e.trim().is_empty());
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Whether `option_id` is one of this question's options.
    #[must_use]
    pub fn has_option(&self, option_id: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == option_id)
    }

    #[must_use]
    pub fn option(&self, option_id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }

    /// Option at a 0-based display position.
    #[must_use]
    pub fn option_at(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }
}
