// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use std::io::Write;

use inbrief_config::diagnostic::ConfigError;
use inbrief_config::model::{InbriefConfig, LlmProvider};
use inbrief_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Every section parses with all known keys.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[app]
name = "morning"
log_level = "debug"

[briefing]
ttl_minutes = 10
chat_limit = 50
last_message_max_chars = 120

[heuristics]
large_group_threshold = 1000
min_batch = 3
max_batch = 20

[source]
chat_cache_ttl_secs = 60

[llm]
provider = "ollama"
base_url = "http://localhost:11434"
model = "llama3.2"
temperature = 0.5
max_tokens = 400
timeout_secs = 120
max_retries = 2
max_concurrency = 1
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "morning");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.briefing.ttl_minutes, 10);
    assert_eq!(config.briefing.chat_limit, 50);
    assert_eq!(config.briefing.last_message_max_chars, 120);
    assert_eq!(config.heuristics.large_group_threshold, 1000);
    assert_eq!(config.heuristics.min_batch, 3);
    assert_eq!(config.heuristics.max_batch, 20);
    assert_eq!(config.source.chat_cache_ttl_secs, 60);
    assert_eq!(config.llm.provider, LlmProvider::Ollama);
    assert_eq!(config.llm.base_url, "http://localhost:11434");
    assert_eq!(config.llm.model, "llama3.2");
    assert_eq!(config.llm.max_tokens, 400);
    assert_eq!(config.llm.timeout_secs, 120);
    assert_eq!(config.llm.max_retries, 2);
    assert_eq!(config.llm.max_concurrency, 1);
}

/// Empty input yields the compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "inbrief");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.briefing.ttl_minutes, 5);
    assert_eq!(config.briefing.chat_limit, 100);
    assert_eq!(config.briefing.last_message_max_chars, 300);
    assert_eq!(config.heuristics.large_group_threshold, 500);
    assert_eq!(config.heuristics.min_batch, 5);
    assert_eq!(config.heuristics.max_batch, 30);
    assert_eq!(config.source.chat_cache_ttl_secs, 30);
    assert_eq!(config.llm.provider, LlmProvider::OpenAi);
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.llm.max_retries, 3);
    assert_eq!(config.llm.max_concurrency, 2);
}

/// An unknown key inside a section is rejected with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[briefing]
ttl_minuts = 3
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key should be rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "ttl_minuts");
            assert_eq!(suggestion.as_deref(), Some("ttl_minutes"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// An unknown top-level section is rejected.
#[test]
fn unknown_top_level_section_rejected() {
    let toml = r#"
[telegram]
bot_token = "x"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("telegram"),
        "error should mention the unknown section, got: {err_str}"
    );
}

/// Values of the wrong type surface as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[briefing]
ttl_minutes = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("string ttl should be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected InvalidType, got {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_after_parse() {
    let toml = r#"
[heuristics]
min_batch = 50
max_batch = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("inverted bounds should fail");
    assert!(errors[0].to_string().contains("min_batch"));
}

/// An explicit config file path is honored.
#[test]
#[serial_test::serial]
fn load_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[briefing]\nttl_minutes = 15").expect("write temp file");

    let config: InbriefConfig =
        load_and_validate_path(file.path()).expect("file config should load");
    assert_eq!(config.briefing.ttl_minutes, 15);
}
