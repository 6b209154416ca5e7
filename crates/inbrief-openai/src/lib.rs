// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible briefing classifier.
//!
//! Implements [`ClassifierAdapter`] by asking the model about each submitted
//! chat separately and assembling the verdicts into a [`BriefingResponse`].
//! Works against OpenAI proper and against Ollama's compatible endpoint.

pub mod cache;
pub mod client;
pub mod json;
pub mod prompts;
pub mod sanitize;
pub mod types;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use inbrief_config::{LlmConfig, LlmProvider};
use inbrief_core::traits::{ClassifierAdapter, PluginAdapter};
use inbrief_core::{
    AdapterType, BriefError, BriefingResponse, ChatContext, FyiItem, HealthStatus,
    NeedsResponseItem, Priority,
};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{contexts_key, format_cache_age, ResultCache};
use crate::client::OpenAiClient;
use crate::json::parse_lenient;
use crate::prompts::{format_chat_prompt, CLASSIFY_SYSTEM_PROMPT};
use crate::types::ChatVerdict;

/// Summary used when the model's reply for a chat cannot be understood.
pub const FALLBACK_SUMMARY: &str = "Unable to analyze this chat";

/// Error text when the provider needs a key and none is configured.
pub const NOT_CONFIGURED: &str = "LLM not configured: API key required";

/// Classified result for one chat, before it is sorted into a list.
enum Verdict {
    Needs(NeedsResponseItem),
    Fyi(FyiItem),
}

/// [`ClassifierAdapter`] backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiClassifier {
    client: OpenAiClient,
    configured: bool,
    /// Bounds concurrent requests for backends that cannot take many.
    limiter: Option<Arc<Semaphore>>,
    cache: ResultCache,
    cancel: Mutex<CancellationToken>,
}

impl OpenAiClassifier {
    /// Builds the classifier from the `[llm]` section.
    pub fn new(config: &LlmConfig) -> Result<Self, BriefError> {
        let client = OpenAiClient::new(config)?;
        let limiter = match config.provider {
            LlmProvider::Ollama => Some(Arc::new(Semaphore::new(config.max_concurrency.max(1)))),
            LlmProvider::OpenAi => None,
        };

        info!(
            provider = %config.provider,
            model = %config.model,
            configured = config.is_configured(),
            "briefing classifier initialized"
        );

        Ok(Self {
            client,
            configured: config.is_configured(),
            limiter,
            cache: ResultCache::new(),
            cancel: Mutex::new(CancellationToken::new()),
        })
    }

    /// Overrides the initial retry backoff.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.client = self.client.with_retry_delay(delay);
        self
    }

    fn current_token(&self) -> CancellationToken {
        match self.cancel.lock() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn classify_chat(
        &self,
        id: u32,
        context: &ChatContext,
        cancel: &CancellationToken,
    ) -> Result<Verdict, BriefError> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| BriefError::Internal(format!("concurrency limiter closed: {e}")))?,
            ),
            None => None,
        };

        let content = self
            .client
            .complete_json(CLASSIFY_SYSTEM_PROMPT, format_chat_prompt(context), cancel)
            .await?;

        let verdict = match parse_lenient::<ChatVerdict>(&content) {
            Some(verdict) => verdict,
            None => {
                warn!(chat_id = context.chat_id, "unparseable classification, falling back to fyi");
                return Ok(Verdict::Fyi(fyi_item(id, context, FALLBACK_SUMMARY.to_string())));
            }
        };

        let priority = match verdict.priority.trim().to_lowercase().as_str() {
            "urgent" => Priority::Urgent,
            "needs_reply" => Priority::NeedsReply,
            _ => Priority::Fyi,
        };
        debug!(chat_id = context.chat_id, %priority, "chat classified");

        Ok(match priority {
            Priority::Fyi => Verdict::Fyi(fyi_item(id, context, verdict.summary)),
            _ => Verdict::Needs(NeedsResponseItem {
                id,
                chat_id: context.chat_id,
                chat_name: context.chat_title.clone(),
                chat_type: context.chat_type,
                unread_count: context.unread_count,
                last_message: context.last_message.clone(),
                last_message_date: context.last_message_date.clone(),
                priority,
                summary: verdict.summary,
                suggested_reply: verdict
                    .suggested_reply
                    .filter(|reply| !reply.trim().is_empty()),
            }),
        })
    }
}

fn fyi_item(id: u32, context: &ChatContext, summary: String) -> FyiItem {
    FyiItem {
        id,
        chat_id: context.chat_id,
        chat_name: context.chat_title.clone(),
        chat_type: context.chat_type,
        unread_count: context.unread_count,
        last_message: context.last_message.clone(),
        last_message_date: context.last_message_date.clone(),
        priority: Priority::Fyi,
        summary,
    }
}

fn cancelled_response() -> BriefingResponse {
    BriefingResponse {
        cancelled: true,
        ..BriefingResponse::empty()
    }
}

#[async_trait]
impl PluginAdapter for OpenAiClassifier {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, BriefError> {
        if self.configured {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(NOT_CONFIGURED.to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), BriefError> {
        self.cancel();
        self.cache.clear();
        Ok(())
    }
}

#[async_trait]
impl ClassifierAdapter for OpenAiClassifier {
    async fn classify(
        &self,
        contexts: Vec<ChatContext>,
        force: bool,
        ttl_minutes: u64,
    ) -> Result<BriefingResponse, BriefError> {
        if contexts.is_empty() {
            return Ok(BriefingResponse::empty());
        }
        if !self.configured {
            return Err(BriefError::classification_error(NOT_CONFIGURED));
        }

        let key = contexts_key(&contexts);
        let ttl = Duration::from_secs(ttl_minutes.saturating_mul(60));

        if !force {
            if let Some((cached, age)) = self.cache.get(&key, ttl) {
                info!(chats = contexts.len(), age_secs = age.as_secs(), "returning cached classification");
                return Ok(BriefingResponse {
                    cached: true,
                    cache_age: Some(format_cache_age(age)),
                    ..cached
                });
            }
        }

        info!(chats = contexts.len(), force, ttl_minutes, "classifying chats");
        let cancel = self.current_token();

        let jobs = contexts
            .iter()
            .enumerate()
            .map(|(idx, context)| self.classify_chat(idx as u32 + 1, context, &cancel));
        let verdicts = match try_join_all(jobs).await {
            Ok(verdicts) => verdicts,
            Err(_) if cancel.is_cancelled() => {
                info!("classification cancelled");
                return Ok(cancelled_response());
            }
            Err(err) => return Err(err),
        };
        if cancel.is_cancelled() {
            info!("classification cancelled");
            return Ok(cancelled_response());
        }

        let mut needs_response = Vec::new();
        let mut fyi_summaries = Vec::new();
        for verdict in verdicts {
            match verdict {
                Verdict::Needs(item) => needs_response.push(item),
                Verdict::Fyi(item) => fyi_summaries.push(item),
            }
        }
        needs_response.sort_by_key(|item| item.priority.rank());

        let response = BriefingResponse {
            generated_at: Utc::now(),
            ..BriefingResponse::from_items(needs_response, fyi_summaries)
        };
        self.cache.insert(key, response.clone());
        Ok(response)
    }

    fn cancel(&self) {
        let mut token = match self.cancel.lock() {
            Ok(token) => token,
            Err(poisoned) => poisoned.into_inner(),
        };
        token.cancel();
        *token = CancellationToken::new();
        debug!("in-flight classification cancelled");
    }
}
