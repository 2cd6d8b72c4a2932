//! `reqwest`-backed client for OpenAI-compatible endpoints.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::*;
use super::CompletionService;
use crate::config::{Credential, ToolConfig};
use crate::error::GenerationError;

/// OpenAI-compatible chat client bound to one credential and one model.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    credential: Credential,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// Create a client from the tool configuration and the caller's credential.
    pub fn new(config: &ToolConfig, credential: Credential) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        info!(
            "Initializing completion client: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            credential,
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            GenerationError::Request {
                reason: e.to_string(),
            }
        }
    }

    /// Turn a non-success response into a typed error.
    async fn error_from_response(&self, response: reqwest::Response) -> GenerationError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorResponse>(&text).ok();
        let error = classify_status(status, body.as_ref().map(|b| &b.error), &text, &self.model);
        warn!("Completion service returned {}: {}", status, error);
        error
    }
}

/// Map an HTTP status (and optional error body) to a [`GenerationError`].
pub fn classify_status(
    status: StatusCode,
    body: Option<&ApiErrorBody>,
    raw_body: &str,
    model: &str,
) -> GenerationError {
    let message = body
        .map(|b| b.message.clone())
        .unwrap_or_else(|| {
            let raw = raw_body.trim();
            if raw.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                raw.chars().take(200).collect()
            }
        });
    let is_quota = body.is_some_and(|b| {
        b.code.as_deref() == Some("insufficient_quota")
            || b.error_type.as_deref() == Some("insufficient_quota")
    });

    match status.as_u16() {
        401 | 403 => GenerationError::Authentication {
            status: status.as_u16(),
            message,
        },
        429 if is_quota => GenerationError::QuotaExceeded { message },
        429 => GenerationError::RateLimited { message },
        404 => GenerationError::ModelNotFound {
            model: model.to_string(),
            message,
        },
        code => GenerationError::Api {
            status: code,
            message,
        },
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let response = self
            .client
            .get(self.url("/models"))
            .bearer_auth(self.credential.expose())
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let list: ModelList =
            response
                .json()
                .await
                .map_err(|e| GenerationError::MalformedResponse {
                    detail: e.to_string(),
                })?;

        debug!("Credential accepted; {} models visible", list.data.len());
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, GenerationError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        };

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let result: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::MalformedResponse {
                    detail: e.to_string(),
                })?;

        let choice = result
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;
        if let Some(ref reason) = choice.finish_reason {
            debug!("finish_reason={}", reason);
        }
        let usage = result.usage.unwrap_or_default();

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
