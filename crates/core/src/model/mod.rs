mod answers;
mod ids;
mod question;
mod quiz;
mod result;
mod submission;

pub use answers::AnswerSheet;
pub use ids::{ExamId, OptionId, ParseIdError, QuestionId, QuizId};
pub use question::{AnswerOption, Difficulty, Question, QuestionError};
pub use quiz::{QuizConfig, QuizConfigError};
pub use result::{OptionRef, QuestionResult, ReviewItem, ScoredResult, SubjectPerformance};
pub use submission::{AnswerEntry, AttemptSnapshot, SubmissionPayload};
