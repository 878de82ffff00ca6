use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::answers::AnswerSheet;
use crate::model::ids::{OptionId, QuestionId};
use crate::model::question::Question;
use crate::model::quiz::QuizConfig;

//
// ─── SCORED RESULT ────────────────────────────────────────────────────────────
//

/// Reference to a question's correct option as returned by the grader.
///
/// Graders normally send the option id. Some older responses send the
/// option's position instead; that form is only resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionRef {
    Id(OptionId),
    Index(usize),
}

impl OptionRef {
    /// Resolve to an option id of `question`.
    #[must_use]
    pub fn resolve(&self, question: &Question) -> Option<OptionId> {
        match self {
            OptionRef::Id(id) => question.has_option(id).then(|| id.clone()),
            OptionRef::Index(i) => question.option_at(*i).map(|o| o.id().clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub correct: u32,
    pub total: u32,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: QuestionId,
    pub is_correct: bool,
    /// Display only; a value that names no option is read as `None`.
    #[serde(default, deserialize_with = "lenient_option_ref")]
    pub correct_option: Option<OptionRef>,
}

fn lenient_option_ref<'de, D>(deserializer: D) -> Result<Option<OptionRef>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Ref(OptionRef),
        Other(IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Ref(option) => Some(option),
        Lenient::Other(_) => None,
    })
}

/// Grading response for a submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub percentage: f64,
    #[serde(default)]
    pub total_time_taken: u32,
    #[serde(default)]
    pub subject_performance: Vec<SubjectPerformance>,
    #[serde(default)]
    pub question_results: Vec<QuestionResult>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub streak: Option<u32>,
}

//
// ─── REVIEW ───────────────────────────────────────────────────────────────────
//

/// One question of the post-submission review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub index: usize,
    pub question_id: QuestionId,
    pub selected: Option<OptionId>,
    pub correct: Option<OptionId>,
    /// `None` when the grader reported nothing for this question.
    pub is_correct: Option<bool>,
}

impl ScoredResult {
    /// Join the grader's per-question results with the attempt.
    ///
    /// Results are matched by question id; a result whose id is unknown to
    /// `config` is ignored. Questions the grader skipped still get a row.
    #[must_use]
    pub fn review(&self, config: &QuizConfig, answers: &AnswerSheet) -> Vec<ReviewItem> {
        config
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = answers.get(index).cloned();
                let graded = self
                    .question_results
                    .iter()
                    .find(|r| &r.question == question.id());
                let correct = graded
                    .and_then(|r| r.correct_option.as_ref())
                    .and_then(|c| c.resolve(question));
                let is_correct = graded.map(|r| r.is_correct).or_else(|| {
                    correct
                        .as_ref()
                        .map(|c| selected.as_ref() == Some(c))
                });

                ReviewItem {
                    index,
                    question_id: question.id().clone(),
                    selected,
                    correct,
                    is_correct,
                }
            })
            .collect()
    }

    /// Percentage rounded for display.
    #[must_use]
    pub fn rounded_percentage(&self) -> u32 {
        // Graders report 0..=100; clamp anything else.
        self.percentage.clamp(0.0, 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, Difficulty, QuizId};
    use crate::time::TimeLimit;

    fn config() -> QuizConfig {
        let questions = ["q1", "q2", "q3"]
            .iter()
            .map(|id| {
                Question::new(
                    QuestionId::new(*id).unwrap(),
                    "Which?",
                    vec![
                        AnswerOption::new(OptionId::new("a").unwrap(), "A"),
                        AnswerOption::new(OptionId::new("b").unwrap(), "B"),
                    ],
                    "math",
                    Difficulty::Easy,
                )
                .unwrap()
            })
            .collect();
        QuizConfig::new(
            QuizId::new("quiz").unwrap(),
            "Quiz",
            "",
            questions,
            TimeLimit::from_secs(60),
        )
        .unwrap()
    }

    fn parse(json: &str) -> ScoredResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserializes_minimal_result() {
        let result = parse(r#"{"totalQuestions":3,"correctAnswers":2,"percentage":66.67}"#);
        assert_eq!(result.total_questions, 3);
        assert!(result.question_results.is_empty());
        assert_eq!(result.rounded_percentage(), 67);
    }

    #[test]
    fn correct_option_accepts_id_or_position() {
        let result = parse(
            r#"{"totalQuestions":3,"correctAnswers":1,"percentage":33.3,
                "questionResults":[
                    {"question":"q1","isCorrect":true,"correctOption":"a"},
                    {"question":"q2","isCorrect":false,"correctOption":1}
                ]}"#,
        );
        assert_eq!(
            result.question_results[0].correct_option,
            Some(OptionRef::Id(OptionId::new("a").unwrap()))
        );
        assert_eq!(result.question_results[1].correct_option, Some(OptionRef::Index(1)));
    }

    #[test]
    fn unreadable_correct_option_does_not_fail_the_result() {
        let result = parse(
            r#"{"totalQuestions":3,"correctAnswers":1,"percentage":33.3,
                "questionResults":[
                    {"question":"q1","isCorrect":true,"correctOption":""},
                    {"question":"q2","isCorrect":false,"correctOption":null},
                    {"question":"q3","isCorrect":false,"correctOption":{"_id":"b"}},
                    {"question":"q3","isCorrect":false,"correctOption":-1}
                ]}"#,
        );
        assert_eq!(result.question_results.len(), 4);
        assert!(result.question_results.iter().all(|r| r.correct_option.is_none()));
        assert!(result.question_results[0].is_correct);
    }

    #[test]
    fn review_resolves_positions_and_keeps_ungraded_rows() {
        let config = config();
        let mut answers = AnswerSheet::new();
        answers.select(0, OptionId::new("a").unwrap());
        answers.select(1, OptionId::new("a").unwrap());

        let result = parse(
            r#"{"totalQuestions":3,"correctAnswers":1,"percentage":33.3,
                "questionResults":[
                    {"question":"q1","isCorrect":true,"correctOption":"a"},
                    {"question":"q2","isCorrect":false,"correctOption":1},
                    {"question":"zz","isCorrect":true}
                ]}"#,
        );
        let review = result.review(&config, &answers);

        assert_eq!(review.len(), 3);
        assert_eq!(review[0].is_correct, Some(true));
        assert_eq!(review[1].correct, Some(OptionId::new("b").unwrap()));
        assert_eq!(review[1].is_correct, Some(false));
        assert_eq!(review[2].selected, None);
        assert_eq!(review[2].is_correct, None);
    }

    #[test]
    fn out_of_range_position_does_not_resolve() {
        let config = config();
        let question = config.question(0).unwrap();
        assert_eq!(OptionRef::Index(9).resolve(question), None);
        assert_eq!(
            OptionRef::Id(OptionId::new("zz").unwrap()).resolve(question),
            None
        );
    }
}
