// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{InbriefConfig, LlmProvider};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates a deserialized configuration, collecting every failure.
pub fn validate_config(config: &InbriefConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.app.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "app.log_level `{}` must be one of {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.briefing.ttl_minutes == 0 {
        fail("briefing.ttl_minutes must be at least 1".to_string());
    }
    if config.briefing.chat_limit == 0 {
        fail("briefing.chat_limit must be at least 1".to_string());
    }
    if config.briefing.last_message_max_chars == 0 {
        fail("briefing.last_message_max_chars must be at least 1".to_string());
    }

    let h = &config.heuristics;
    if h.min_batch == 0 {
        fail("heuristics.min_batch must be at least 1".to_string());
    }
    if h.min_batch > h.max_batch {
        fail(format!(
            "heuristics.min_batch ({}) must not exceed heuristics.max_batch ({})",
            h.min_batch, h.max_batch
        ));
    }
    if h.large_group_threshold == 0 {
        fail("heuristics.large_group_threshold must be at least 1".to_string());
    }

    let llm = &config.llm;
    if llm.base_url.trim().is_empty() {
        fail("llm.base_url must not be empty".to_string());
    } else if !(llm.base_url.starts_with("http://") || llm.base_url.starts_with("https://")) {
        fail(format!(
            "llm.base_url `{}` must start with http:// or https://",
            llm.base_url
        ));
    }
    if llm.model.trim().is_empty() {
        fail("llm.model must not be empty".to_string());
    }
    if !(0.0..=2.0).contains(&llm.temperature) {
        fail(format!(
            "llm.temperature must be between 0.0 and 2.0, got {}",
            llm.temperature
        ));
    }
    if llm.max_tokens == 0 {
        fail("llm.max_tokens must be at least 1".to_string());
    }
    if llm.timeout_secs == 0 {
        fail("llm.timeout_secs must be at least 1".to_string());
    }
    if llm.max_retries == 0 {
        fail("llm.max_retries must be at least 1".to_string());
    }
    if llm.provider == LlmProvider::Ollama && llm.max_concurrency == 0 {
        fail("llm.max_concurrency must be at least 1 for the ollama provider".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
