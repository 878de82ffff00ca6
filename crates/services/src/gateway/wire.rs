//! JSON shapes exchanged with the quiz backend.

use serde::Deserialize;
use tracing::warn;

use quiz_core::model::{
    AnswerOption, Difficulty, ExamId, OptionId, Question, QuestionId, QuizConfig, QuizId,
    ScoredResult,
};
use quiz_core::{TimeLimit, TimeUnit};

use crate::error::SubmitError;

/// A quiz document, either bare or wrapped in the API envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum QuizDocument {
    Envelope {
        success: bool,
        data: Option<QuizDto>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(QuizDto),
}

impl QuizDocument {
    /// Unwrap the envelope, returning the server's message when it declined.
    pub(crate) fn into_quiz(self) -> Result<QuizDto, String> {
        match self {
            QuizDocument::Bare(quiz) => Ok(quiz),
            QuizDocument::Envelope {
                success: true,
                data: Some(quiz),
                ..
            } => Ok(quiz),
            QuizDocument::Envelope { message, .. } => {
                Err(message.unwrap_or_else(|| "quiz response has no data".to_string()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizDto {
    #[serde(alias = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    exam_id: Option<String>,
    #[serde(default)]
    estimated_time: Option<u32>,
    #[serde(default)]
    total_questions: Option<usize>,
    time_limit: u32,
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    question: String,
    #[serde(default)]
    options: Vec<OptionDto>,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    text: String,
}

impl QuizDto {
    pub(crate) fn into_config(self, unit: TimeUnit) -> Result<QuizConfig, quiz_core::Error> {
        let actual = self.questions.len();
        if self.total_questions.is_some_and(|declared| declared != actual) {
            warn!(
                quiz_id = %self.id,
                declared = ?self.total_questions,
                actual,
                "quiz declares a different question count"
            );
        }

        let questions = self
            .questions
            .into_iter()
            .map(QuestionDto::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        let exam_id = self.exam_id.map(ExamId::new).transpose()?;

        Ok(QuizConfig::new(
            QuizId::new(self.id)?,
            self.title,
            self.description,
            questions,
            TimeLimit::from_raw(self.time_limit, unit),
        )?
        .with_exam_id(exam_id)
        .with_estimated_mins(self.estimated_time))
    }
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, quiz_core::Error> {
        let options = self
            .options
            .into_iter()
            .map(|o| -> Result<AnswerOption, quiz_core::Error> {
                Ok(AnswerOption::new(OptionId::new(o.id)?, o.text))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Question::new(
            QuestionId::new(self.id)?,
            self.question,
            options,
            self.subject,
            self.difficulty,
        )?
        .with_topic(self.topic)
        .with_explanation(self.explanation))
    }
}

//
// ─── SUBMISSION RESPONSE ──────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    success: bool,
    #[serde(default)]
    data: Option<SubmitData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    results: ScoredResult,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    streak: Option<u32>,
}

impl SubmitResponse {
    pub(crate) fn into_result(self) -> Result<ScoredResult, SubmitError> {
        if !self.success {
            return Err(SubmitError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "submission was not accepted".to_string()),
            });
        }
        let data = self
            .data
            .ok_or_else(|| SubmitError::Malformed("response has no data".to_string()))?;

        let mut result = data.results;
        result.message = data.message.or(self.message).or(result.message);
        result.streak = data.streak.or(result.streak);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ: &str = r#"{
        "success": true,
        "data": {
            "id": "quiz-10-sci",
            "title": "Class 10 Science Stream Quiz",
            "description": "Find the stream that suits you",
            "estimatedTime": 10,
            "totalQuestions": 2,
            "timeLimit": 10,
            "questions": [
                {
                    "_id": "q1",
                    "question": "Which activity do you enjoy most?",
                    "options": [{"_id": "o1", "text": "Experiments"}, {"_id": "o2", "text": "Debates"}],
                    "subject": "aptitude",
                    "difficulty": "easy",
                    "topic": "interests"
                },
                {
                    "_id": "q2",
                    "question": "2 + 2 = ?",
                    "options": [{"_id": "o3", "text": "4"}, {"_id": "o4", "text": "5"}],
                    "subject": "math",
                    "difficulty": "medium",
                    "explanation": "Basic arithmetic"
                }
            ]
        }
    }"#;

    #[test]
    fn envelope_quiz_maps_to_config() {
        let doc: QuizDocument = serde_json::from_str(QUIZ).unwrap();
        let config = doc
            .into_quiz()
            .unwrap()
            .into_config(TimeUnit::Minutes)
            .unwrap();

        assert_eq!(config.id().as_str(), "quiz-10-sci");
        assert_eq!(config.len(), 2);
        assert_eq!(config.time_limit().as_secs(), 600);
        assert_eq!(config.estimated_mins(), Some(10));
        let q2 = config.question(1).unwrap();
        assert_eq!(q2.difficulty(), Difficulty::Medium);
        assert_eq!(q2.explanation(), Some("Basic arithmetic"));
        assert_eq!(config.question(0).unwrap().topic(), Some("interests"));
    }

    #[test]
    fn bare_quiz_with_mongo_id_parses() {
        let json = r#"{"_id":"abc","title":"T","timeLimit":90,
            "questions":[{"_id":"q","question":"?","options":[{"_id":"o","text":"x"}]}]}"#;
        let doc: QuizDocument = serde_json::from_str(json).unwrap();
        let config = doc.into_quiz().unwrap().into_config(TimeUnit::Seconds).unwrap();
        assert_eq!(config.id().as_str(), "abc");
        assert_eq!(config.time_limit().as_secs(), 90);
        assert_eq!(config.question(0).unwrap().difficulty(), Difficulty::Unknown);
    }

    #[test]
    fn question_without_options_is_unplayable() {
        let json = r#"{"id":"abc","title":"T","timeLimit":5,
            "questions":[{"_id":"q","question":"?","options":[]}]}"#;
        let doc: QuizDocument = serde_json::from_str(json).unwrap();
        let err = doc
            .into_quiz()
            .unwrap()
            .into_config(TimeUnit::Minutes)
            .unwrap_err();
        assert!(err.is_unplayable());
    }

    #[test]
    fn declined_envelope_surfaces_message() {
        let json = r#"{"success":false,"message":"No quiz for this class"}"#;
        let doc: QuizDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.into_quiz().unwrap_err(), "No quiz for this class");
    }

    #[test]
    fn submit_response_merges_envelope_fields() {
        let json = r#"{"success":true,"data":{
            "results":{"totalQuestions":3,"correctAnswers":2,"percentage":66.7,"totalTimeTaken":120,
                "subjectPerformance":[{"subject":"math","correct":1,"total":2,"percentage":50.0}]},
            "message":"Quiz submitted successfully","streak":4}}"#;
        let response: SubmitResponse = serde_json::from_str(json).unwrap();
        let result = response.into_result().unwrap();
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.message.as_deref(), Some("Quiz submitted successfully"));
        assert_eq!(result.streak, Some(4));
        assert_eq!(result.subject_performance[0].subject, "math");
    }

    #[test]
    fn blank_correct_option_still_yields_a_graded_result() {
        let json = r#"{"success":true,"data":{
            "results":{"totalQuestions":1,"correctAnswers":0,"percentage":0,
                "questionResults":[{"question":"q1","isCorrect":false,"correctOption":""}]}}}"#;
        let response: SubmitResponse = serde_json::from_str(json).unwrap();
        let result = response.into_result().unwrap();
        assert_eq!(result.question_results[0].correct_option, None);
        assert!(!result.question_results[0].is_correct);
    }

    #[test]
    fn unsuccessful_submit_is_rejected() {
        let json = r#"{"success":false,"message":"Quiz expired"}"#;
        let response: SubmitResponse = serde_json::from_str(json).unwrap();
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, SubmitError::Rejected { ref message } if message == "Quiz expired"));
    }

    #[test]
    fn successful_submit_without_data_is_malformed() {
        let response: SubmitResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(response.into_result(), Err(SubmitError::Malformed(_))));
    }
}
