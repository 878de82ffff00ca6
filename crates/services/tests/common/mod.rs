#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{
    AnswerOption, Difficulty, OptionId, Question, QuestionId, QuizConfig, QuizId, ScoredResult,
    SubmissionPayload,
};
use quiz_core::TimeLimit;
use services::{QuizSubmitter, SubmitError};

pub fn quiz(questions: usize, secs: u32) -> QuizConfig {
    let questions = (0..questions)
        .map(|n| {
            Question::new(
                QuestionId::new(format!("q{n}")).unwrap(),
                format!("Question {n}"),
                vec![
                    AnswerOption::new(option(n, 'a'), "A"),
                    AnswerOption::new(option(n, 'b'), "B"),
                ],
                if n % 2 == 0 { "math" } else { "science" },
                Difficulty::Medium,
            )
            .unwrap()
        })
        .collect();
    QuizConfig::new(
        QuizId::new("stream-quiz").unwrap(),
        "Which stream fits you?",
        "Answer honestly",
        questions,
        TimeLimit::from_secs(secs),
    )
    .unwrap()
}

pub fn option(question: usize, letter: char) -> OptionId {
    OptionId::new(format!("q{question}-{letter}")).unwrap()
}

/// Submitter that replays scripted outcomes and records every payload.
#[derive(Default)]
pub struct ScriptedSubmitter {
    failures: Mutex<VecDeque<String>>,
    payloads: Mutex<Vec<SubmissionPayload>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedSubmitter {
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Fails once per message, in order, then succeeds.
    pub fn failing_with(messages: &[&str]) -> Self {
        Self {
            failures: Mutex::new(messages.iter().map(|m| (*m).to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizSubmitter for ScriptedSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ScoredResult, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().pop_front();
        if let Some(message) = failure {
            return Err(SubmitError::Rejected { message });
        }

        let total = u32::try_from(payload.total_questions).unwrap();
        let answered = u32::try_from(payload.answered_questions).unwrap();
        Ok(ScoredResult {
            total_questions: total,
            correct_answers: answered,
            percentage: f64::from(answered) * 100.0 / f64::from(total),
            total_time_taken: payload.time_taken,
            subject_performance: Vec::new(),
            question_results: Vec::new(),
            message: Some("Quiz submitted successfully".to_string()),
            streak: None,
        })
    }
}
