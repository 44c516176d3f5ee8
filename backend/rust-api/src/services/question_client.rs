use reqwest::{Client, Response};
use serde_json::Value;
use thiserror::Error;

use crate::models::attempt::{QuestionStats, RecordAttemptRequest};
use crate::models::level::{tag_for_level, LevelId, FALLBACK_TAG};
use crate::models::question::Question;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Question store returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// HTTP access to the question store for the game client.
///
/// No timeout or retry policy: each failure is reported once to the caller.
#[derive(Clone)]
pub struct QuestionClient {
    http: Client,
    base_url: String,
}

impl QuestionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn questions_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<Question>, ClientError> {
        let response = self
            .http
            .get(format!("{}/questions", self.base_url))
            .query(&[("tag", tag.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Questions tagged for the level, falling back to the general pool.
    pub async fn questions_for_level(&self, level: LevelId, limit: u32) -> Result<Vec<Question>, ClientError> {
        let questions = self.questions_by_tag(&tag_for_level(level), limit).await?;
        if !questions.is_empty() {
            return Ok(questions);
        }

        tracing::debug!("No questions for level {}, using '{}' pool", level, FALLBACK_TAG);
        self.questions_by_tag(FALLBACK_TAG, limit).await
    }

    pub async fn record_attempt(&self, attempt: &RecordAttemptRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/attempts", self.base_url))
            .json(attempt)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<Vec<QuestionStats>, ClientError> {
        let response = self
            .http
            .get(format!("{}/stats", self.base_url))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
