// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end briefing tests: coordinator, heuristics, and the OpenAI
//! classifier against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use inbrief_config::{InbriefConfig, LlmConfig};
use inbrief_core::{ChatSource, ClassifierAdapter, Priority};
use inbrief_engine::{BriefingCoordinator, LoadOutcome, LoadRequest};
use inbrief_openai::{OpenAiClassifier, NOT_CONFIGURED};
use inbrief_test_utils::fixtures::{group_chat, private_chat, text_message};
use inbrief_test_utils::MockChatSource;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const T0: i64 = 1_700_000_000;

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

async fn reply_for(server: &MockServer, title: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(format!("Chat: {title}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

async fn source() -> Arc<MockChatSource> {
    let source = Arc::new(MockChatSource::with_chats(vec![
        private_chat(1, "Ana", 2),
        private_chat(2, "Bo", 1),
        group_chat(3, "Neighborhood", 40, 1200),
    ]));
    source
        .set_messages(1, vec![text_message(1, 10, "Ana", "can you review my PR?", T0)])
        .await;
    source
        .set_messages(2, vec![text_message(2, 20, "Bo", "pushed the fix", T0)])
        .await;
    source
}

fn briefing_stack(
    source: Arc<MockChatSource>,
    llm: LlmConfig,
) -> (BriefingCoordinator, InbriefConfig) {
    let config = InbriefConfig {
        llm,
        ..InbriefConfig::default()
    };
    let classifier = OpenAiClassifier::new(&config.llm)
        .expect("classifier should build")
        .with_retry_delay(Duration::from_millis(10));
    let coordinator = BriefingCoordinator::new(
        source as Arc<dyn ChatSource>,
        Arc::new(classifier) as Arc<dyn ClassifierAdapter>,
        &config,
    );
    (coordinator, config)
}

fn llm_for(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: server.uri(),
        api_key: Some("sk-test".into()),
        ..LlmConfig::default()
    }
}

#[tokio::test]
async fn full_briefing_merges_ai_and_heuristics() {
    let server = MockServer::start().await;
    reply_for(
        &server,
        "Ana",
        r#"{"priority":"needs_reply","summary":"Wants a PR review","suggested_reply":"Looking now"}"#,
    )
    .await;
    reply_for(&server, "Bo", r#"{"priority":"fyi","summary":"Fix is pushed"}"#).await;

    let (coordinator, config) = briefing_stack(source().await, llm_for(&server));
    let outcome = coordinator
        .load_briefing(LoadRequest::from_config(&config))
        .await;
    assert_eq!(outcome, LoadOutcome::Loaded);

    let data = coordinator.data().expect("briefing cached");
    assert_eq!(data.needs_response.len(), 1);
    assert_eq!(data.needs_response[0].chat_id, 1);
    assert_eq!(data.needs_response[0].priority, Priority::NeedsReply);
    assert_eq!(
        data.needs_response[0].suggested_reply.as_deref(),
        Some("Looking now")
    );

    let fyi: Vec<(i64, u32)> = data.fyi_summaries.iter().map(|i| (i.chat_id, i.id)).collect();
    assert_eq!(fyi, vec![(2, 2), (3, 3)]);
    assert_eq!(data.fyi_summaries[1].summary, "40 new messages in large group");
    assert_eq!(data.stats.total_unread, 43);
    assert!(data.stats_consistent());

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| !String::from_utf8_lossy(&r.body).contains("Neighborhood")));
}

#[tokio::test]
async fn missing_api_key_fails_without_touching_the_cache() {
    let (coordinator, config) = briefing_stack(source().await, LlmConfig::default());

    let outcome = coordinator
        .load_briefing(LoadRequest::from_config(&config))
        .await;

    assert!(matches!(outcome, LoadOutcome::Failed(ref m) if m.contains(NOT_CONFIGURED)));
    assert_eq!(coordinator.data(), None);
    assert!(coordinator
        .error()
        .is_some_and(|e| e.contains(NOT_CONFIGURED)));
}

#[tokio::test]
async fn heuristic_only_briefing_needs_no_api_key() {
    let source = Arc::new(MockChatSource::with_chats(vec![group_chat(
        3,
        "Neighborhood",
        40,
        1200,
    )]));
    let (coordinator, config) = briefing_stack(source, LlmConfig::default());

    let outcome = coordinator
        .load_briefing(LoadRequest::from_config(&config))
        .await;

    assert_eq!(outcome, LoadOutcome::Loaded);
    let data = coordinator.data().expect("briefing cached");
    assert_eq!(data.fyi_summaries.len(), 1);
    assert!(data.needs_response.is_empty());
}

#[tokio::test]
async fn classifier_cache_survives_a_coordinator_clear() {
    let server = MockServer::start().await;
    reply_for(&server, "Ana", r#"{"priority":"urgent","summary":"Blocking release"}"#).await;
    reply_for(&server, "Bo", r#"{"priority":"fyi","summary":"Fix is pushed"}"#).await;

    let (coordinator, config) = briefing_stack(source().await, llm_for(&server));
    coordinator
        .load_briefing(LoadRequest::from_config(&config))
        .await;
    coordinator.clear();

    let outcome = coordinator
        .load_briefing(LoadRequest::from_config(&config))
        .await;
    assert_eq!(outcome, LoadOutcome::Loaded);

    let data = coordinator.data().expect("briefing cached");
    assert!(data.cached);
    assert!(data.cache_age.is_some());
    assert_eq!(data.needs_response[0].priority, Priority::Urgent);
    assert_eq!(server.received_requests().await.expect("recording").len(), 2);

    coordinator
        .load_briefing(LoadRequest::from_config(&config).forced())
        .await;
    let forced = coordinator.data().expect("briefing cached");
    assert!(!forced.cached);
    assert_eq!(server.received_requests().await.expect("recording").len(), 4);
}

#[tokio::test]
async fn http_failure_keeps_the_previous_briefing() {
    let server = MockServer::start().await;
    reply_for(&server, "Ana", r#"{"priority":"needs_reply","summary":"Review"}"#).await;
    reply_for(&server, "Bo", r#"{"priority":"fyi","summary":"Fix"}"#).await;

    let (coordinator, config) = briefing_stack(source().await, llm_for(&server));
    coordinator
        .load_briefing(LoadRequest::from_config(&config))
        .await;
    let before = coordinator.data().expect("first briefing");

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let outcome = coordinator
        .load_briefing(LoadRequest::from_config(&config).forced())
        .await;
    assert!(matches!(outcome, LoadOutcome::Failed(ref m) if m.contains("Incorrect API key")));
    assert_eq!(coordinator.data(), Some(before));
}
