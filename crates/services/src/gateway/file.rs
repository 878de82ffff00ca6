use std::path::PathBuf;

use async_trait::async_trait;
use quiz_core::TimeUnit;
use quiz_core::model::QuizConfig;
use tracing::debug;

use super::wire::QuizDocument;
use super::{QuizRequest, QuizSource};
use crate::error::SourceError;

#[derive(Clone, Debug)]
enum Origin {
    File(PathBuf),
    Inline(String),
}

/// Serves one fixed quiz regardless of the request, read from a JSON
/// document in the backend's wire shape.
#[derive(Clone, Debug)]
pub struct StaticQuizSource {
    origin: Origin,
    unit: TimeUnit,
}

impl StaticQuizSource {
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>, unit: TimeUnit) -> Self {
        Self {
            origin: Origin::File(path.into()),
            unit,
        }
    }

    #[must_use]
    pub fn from_json(json: impl Into<String>, unit: TimeUnit) -> Self {
        Self {
            origin: Origin::Inline(json.into()),
            unit,
        }
    }

    fn parse(&self, raw: &str) -> Result<QuizConfig, SourceError> {
        let document: QuizDocument =
            serde_json::from_str(raw).map_err(|e| SourceError::Malformed(e.to_string()))?;
        let quiz = document.into_quiz().map_err(SourceError::Malformed)?;
        Ok(quiz.into_config(self.unit)?)
    }
}

#[async_trait]
impl QuizSource for StaticQuizSource {
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizConfig, SourceError> {
        debug!(class = %request.class_level, "serving static quiz");
        match &self.origin {
            Origin::File(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                self.parse(&raw)
            }
            Origin::Inline(json) => self.parse(json),
        }
    }
}
