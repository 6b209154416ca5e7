// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in a config file
//! is an error at startup rather than a silently ignored key.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Inbrief configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InbriefConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Briefing cache and presentation settings.
    #[serde(default)]
    pub briefing: BriefingConfig,

    /// Zero-cost pre-classification thresholds.
    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    /// Chat source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// AI classifier settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Process identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "inbrief".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Briefing cache and presentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BriefingConfig {
    /// Minutes before a cached briefing is considered stale.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,

    /// Maximum number of chats listed per briefing.
    #[serde(default = "default_chat_limit")]
    pub chat_limit: usize,

    /// Characters kept from a chat's last message on briefing items.
    #[serde(default = "default_last_message_max_chars")]
    pub last_message_max_chars: usize,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            chat_limit: default_chat_limit(),
            last_message_max_chars: default_last_message_max_chars(),
        }
    }
}

fn default_ttl_minutes() -> u64 {
    5
}

fn default_chat_limit() -> usize {
    100
}

fn default_last_message_max_chars() -> usize {
    300
}

/// Zero-cost pre-classification thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeuristicsConfig {
    /// Member count at which a group or channel is auto-labeled FYI.
    #[serde(default = "default_large_group_threshold")]
    pub large_group_threshold: u32,

    /// Lower bound on messages fetched per chat.
    #[serde(default = "default_min_batch")]
    pub min_batch: u32,

    /// Upper bound on messages fetched per chat.
    #[serde(default = "default_max_batch")]
    pub max_batch: u32,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            large_group_threshold: default_large_group_threshold(),
            min_batch: default_min_batch(),
            max_batch: default_max_batch(),
        }
    }
}

fn default_large_group_threshold() -> u32 {
    500
}

fn default_min_batch() -> u32 {
    5
}

fn default_max_batch() -> u32 {
    30
}

/// Chat source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Seconds a fetched chat list is reused before going back to the transport.
    #[serde(default = "default_chat_cache_ttl_secs")]
    pub chat_cache_ttl_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            chat_cache_ttl_secs: default_chat_cache_ttl_secs(),
        }
    }
}

fn default_chat_cache_ttl_secs() -> u64 {
    30
}

/// Which OpenAI-compatible backend to talk to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Ollama,
}

/// AI classifier settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// Base URL without the `/v1/chat/completions` path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Required for `openai`, ignored by `ollama`.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per completion, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Concurrent completions allowed against an `ollama` backend.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl LlmConfig {
    /// Whether requests can be made: `ollama` always, `openai` with a non-empty key.
    pub fn is_configured(&self) -> bool {
        match self.provider {
            LlmProvider::Ollama => true,
            LlmProvider::OpenAi => self.api_key.as_deref().is_some_and(|k| !k.is_empty()),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_concurrency() -> usize {
    2
}
