use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answers::AnswerSheet;
use crate::model::ids::{ExamId, OptionId, QuestionId, QuizId};
use crate::model::quiz::QuizConfig;

/// One row of the submission, in question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
    pub is_answered: bool,
    /// Seconds the question was on screen.
    pub time_taken: u32,
}

/// Finished attempt as sent to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub quiz_id: QuizId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_id: Option<ExamId>,
    pub answers: Vec<AnswerEntry>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Seconds used out of the time limit.
    pub time_taken: u32,
    pub total_questions: usize,
    pub answered_questions: usize,
    pub is_auto_submit: bool,
}

/// Attempt state needed to assemble a payload.
#[derive(Debug, Clone, Copy)]
pub struct AttemptSnapshot<'a> {
    pub config: &'a QuizConfig,
    pub answers: &'a AnswerSheet,
    pub time_spent: &'a [u32],
    pub started_at: DateTime<Utc>,
    pub remaining_secs: u32,
    pub is_auto_submit: bool,
}

impl SubmissionPayload {
    /// Assemble the payload for an attempt.
    ///
    /// `end_time` is derived from `started_at` plus the time used, so the
    /// result depends only on the snapshot.
    #[must_use]
    pub fn assemble(snapshot: AttemptSnapshot<'_>) -> Self {
        let AttemptSnapshot {
            config,
            answers,
            time_spent,
            started_at,
            remaining_secs,
            is_auto_submit,
        } = snapshot;

        let entries: Vec<AnswerEntry> = config
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = answers.get(index).cloned();
                AnswerEntry {
                    question_id: question.id().clone(),
                    is_answered: selected.is_some(),
                    selected_option_id: selected,
                    time_taken: time_spent.get(index).copied().unwrap_or(0),
                }
            })
            .collect();

        let time_taken = config.time_limit().as_secs().saturating_sub(remaining_secs);
        let answered_questions = entries.iter().filter(|e| e.is_answered).count();

        Self {
            quiz_id: config.id().clone(),
            exam_id: config.exam_id().cloned(),
            total_questions: entries.len(),
            answered_questions,
            answers: entries,
            start_time: started_at,
            end_time: started_at + Duration::seconds(i64::from(time_taken)),
            time_taken,
            is_auto_submit,
        }
    }
}
