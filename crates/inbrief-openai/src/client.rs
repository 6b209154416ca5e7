// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Retries rate limits, server errors, and connection failures with
//! exponential backoff. Every wait and request races the caller's
//! cancellation token.

use std::time::Duration;

use inbrief_config::{LlmConfig, LlmProvider};
use inbrief_core::BriefError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::prompts::JSON_ONLY_SUFFIX;
use crate::types::{ApiErrorResponse, ApiMessage, CompletionRequest, CompletionResponse, ResponseFormat};

/// Delay before the first retry; doubled after each attempt.
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Message carried by errors produced by cancellation.
pub const CANCELLED_MESSAGE: &str = "request cancelled";

/// Outcome of a single HTTP attempt that did not produce content.
enum AttemptError {
    /// Worth another attempt (429, 5xx, connect or timeout failure).
    Transient(String),
    /// Stop retrying and surface this error.
    Fatal(BriefError),
}

/// Chat-completions client bound to one provider, model, and credential.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    provider: LlmProvider,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Builds a client from the `[llm]` section.
    ///
    /// A missing key is not an error here; callers check
    /// [`LlmConfig::is_configured`] before issuing requests.
    pub fn new(config: &LlmConfig) -> Result<Self, BriefError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| BriefError::Config(format!("invalid API key header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BriefError::Classification {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            provider: config.provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries.max(1),
            retry_delay: INITIAL_RETRY_DELAY,
        })
    }

    /// Overrides the initial backoff delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Requests a JSON completion for `system` + `user` and returns the raw
    /// message content.
    pub async fn complete_json(
        &self,
        system: &str,
        user: String,
        cancel: &CancellationToken,
    ) -> Result<String, BriefError> {
        let request = self.build_request(system, user);

        let mut delay = self.retry_delay;
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            if cancel.is_cancelled() {
                return Err(cancelled());
            }

            match self.send_once(&request, cancel).await {
                Ok(content) => return Ok(content),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Transient(message)) => {
                    last_error = message;
                    if attempt < self.max_retries {
                        warn!(
                            attempt,
                            max_retries = self.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %last_error,
                            "transient LLM error, will retry"
                        );
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => {}
                            _ = cancel.cancelled() => return Err(cancelled()),
                        }
                        delay *= 2;
                    }
                }
            }
        }

        error!(attempts = self.max_retries, error = %last_error, "LLM request failed");
        Err(BriefError::classification_error(format!(
            "LLM request failed after {} attempts: {last_error}",
            self.max_retries
        )))
    }

    fn build_request(&self, system: &str, user: String) -> CompletionRequest {
        let (system, response_format) = match self.provider {
            LlmProvider::OpenAi => (system.to_string(), Some(ResponseFormat::json_object())),
            LlmProvider::Ollama => (format!("{system}{JSON_ONLY_SUFFIX}"), None),
        };
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::system(system), ApiMessage::user(user)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format,
        }
    }

    async fn send_once(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String, AttemptError> {
        let send = self.client.post(&self.endpoint).json(request).send();
        let result = tokio::select! {
            result = send => result,
            _ = cancel.cancelled() => return Err(AttemptError::Fatal(cancelled())),
        };

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                return Err(AttemptError::Transient(format!("request failed: {e}")));
            }
            Err(e) => {
                return Err(AttemptError::Fatal(BriefError::Classification {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                }));
            }
        };

        let status = response.status();
        debug!(status = %status, "completion response received");

        if status.is_success() {
            let body: CompletionResponse = response.json().await.map_err(|e| {
                AttemptError::Fatal(BriefError::Classification {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                })
            })?;
            // An empty reply is returned as-is; the caller falls back per chat.
            return body
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content.unwrap_or_default())
                .ok_or_else(|| {
                    AttemptError::Fatal(BriefError::classification_error("no response choices"))
                });
        }

        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => api_err.error.message,
            Err(_) => body,
        };
        let message = format!("API error ({}): {detail}", status.as_u16());

        if is_transient_status(status) {
            Err(AttemptError::Transient(message))
        } else {
            Err(AttemptError::Fatal(BriefError::classification_error(message)))
        }
    }
}

fn cancelled() -> BriefError {
    BriefError::classification_error(CANCELLED_MESSAGE)
}

/// Status codes worth retrying.
fn is_transient_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}
