use std::env;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::TimeUnit;
use quiz_core::model::{QuizConfig, ScoredResult, SubmissionPayload};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::wire::{QuizDocument, SubmitResponse};
use super::{QuizRequest, QuizSource, QuizSubmitter};
use crate::error::{SourceError, SubmitError};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub time_limit_unit: TimeUnit,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            time_limit_unit: TimeUnit::Minutes,
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_token = env::var("QUIZ_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let timeout = env::var("QUIZ_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(e) => {
                    warn!("Invalid QUIZ_HTTP_TIMEOUT_SECS value: {e}");
                    None
                }
            })
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let time_limit_unit = time_limit_unit_from_env();

        Some(Self {
            base_url,
            api_token,
            timeout: Duration::from_secs(timeout),
            time_limit_unit,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Unit of quiz time limits, from `QUIZ_TIME_LIMIT_UNIT` (minutes by default).
#[must_use]
pub fn time_limit_unit_from_env() -> TimeUnit {
    env::var("QUIZ_TIME_LIMIT_UNIT")
        .ok()
        .and_then(|raw| match raw.parse::<TimeUnit>() {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!("Invalid QUIZ_TIME_LIMIT_UNIT value: {e}");
                None
            }
        })
        .unwrap_or_default()
}

/// REST client for the quiz backend; serves as both source and submitter.
#[derive(Clone)]
pub struct HttpQuizGateway {
    client: Client,
    config: Option<GatewayConfig>,
}

impl HttpQuizGateway {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GatewayConfig>) -> Self {
        let timeout = config
            .as_ref()
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), |c| c.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {e}");
                Client::new()
            });
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        config: &GatewayConfig,
    ) -> reqwest::RequestBuilder {
        match &config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl QuizSource for HttpQuizGateway {
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizConfig, SourceError> {
        let config = self.config.as_ref().ok_or(SourceError::Disabled)?;

        let mut query = vec![("class", request.class_level.as_str())];
        if let Some(stream) = request.stream.as_deref() {
            query.push(("stream", stream));
        }

        debug!(class = %request.class_level, stream = ?request.stream, "fetching quiz");
        let response = self
            .authorize(self.client.get(config.endpoint("quiz/questions")), config)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let document: QuizDocument = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        let quiz = document.into_quiz().map_err(SourceError::Malformed)?;
        let quiz = quiz.into_config(config.time_limit_unit)?;

        info!(quiz_id = %quiz.id(), questions = quiz.len(), "quiz loaded");
        Ok(quiz)
    }
}

#[async_trait]
impl QuizSubmitter for HttpQuizGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ScoredResult, SubmitError> {
        let config = self.config.as_ref().ok_or(SubmitError::Disabled)?;

        let response = self
            .authorize(self.client.post(config.endpoint("quiz/submit")), config)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmitError::HttpStatus(response.status()));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::Malformed(e.to_string()))?;
        body.into_result()
    }
}
