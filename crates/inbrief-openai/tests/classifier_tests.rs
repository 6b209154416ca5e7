// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the OpenAI classifier against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use inbrief_config::LlmConfig;
use inbrief_core::{ChatContext, ClassifierAdapter, ContextMessage, ItemChatType, Priority};
use inbrief_openai::{OpenAiClassifier, FALLBACK_SUMMARY, NOT_CONFIGURED};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context(chat_id: i64, title: &str, private: bool) -> ChatContext {
    ChatContext {
        chat_id,
        chat_title: title.to_string(),
        chat_type: if private {
            ItemChatType::Dm
        } else {
            ItemChatType::Group
        },
        messages: vec![ContextMessage {
            id: 1,
            sender_name: title.to_string(),
            text: "can you send the report?".into(),
            date: 1_700_000_000,
            is_outgoing: false,
            is_mentioned: false,
        }],
        unread_count: 3,
        last_message_is_outgoing: false,
        has_unanswered_question: true,
        hours_since_last_activity: 2.0,
        is_private_chat: private,
        last_message: Some("can you send the report?".into()),
        last_message_date: Some("2023-11-14T22:13:20+00:00".into()),
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn classifier(server: &MockServer) -> OpenAiClassifier {
    OpenAiClassifier::new(&LlmConfig {
        base_url: server.uri(),
        api_key: Some("sk-test".into()),
        ..LlmConfig::default()
    })
    .expect("classifier should build")
    .with_retry_delay(Duration::from_millis(10))
}

async fn reply_for(server: &MockServer, title: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(format!("Chat: {title}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn partitions_and_orders_urgent_first() {
    let server = MockServer::start().await;
    reply_for(&server, "Ana", r#"{"priority":"needs_reply","summary":"Wants the report","suggested_reply":"Sending now"}"#).await;
    reply_for(&server, "Boss", r#"{"priority":"URGENT","summary":"Deadline today","suggested_reply":null}"#).await;
    reply_for(&server, "News", r#"{"priority":"fyi","summary":"Daily digest"}"#).await;

    let response = classifier(&server)
        .classify(
            vec![
                context(1, "Ana", true),
                context(2, "Boss", true),
                context(3, "News", false),
            ],
            false,
            5,
        )
        .await
        .expect("classification should succeed");

    assert_eq!(response.needs_response.len(), 2);
    assert_eq!(response.needs_response[0].chat_id, 2);
    assert_eq!(response.needs_response[0].priority, Priority::Urgent);
    assert_eq!(response.needs_response[1].priority, Priority::NeedsReply);
    assert_eq!(
        response.needs_response[1].suggested_reply.as_deref(),
        Some("Sending now")
    );
    assert_eq!(response.fyi_summaries.len(), 1);
    assert_eq!(response.fyi_summaries[0].summary, "Daily digest");
    assert_eq!(response.stats.total_unread, 9);
    assert!(response.stats_consistent());
    assert!(!response.cached);
}

#[tokio::test]
async fn fenced_reply_is_extracted_and_garbage_falls_back() {
    let server = MockServer::start().await;
    reply_for(&server, "Ana", "```json\n{\"priority\":\"needs_reply\",\"summary\":\"q\"}\n```").await;
    reply_for(&server, "Team", "I could not decide, sorry.").await;

    let response = classifier(&server)
        .classify(vec![context(1, "Ana", true), context(2, "Team", false)], false, 5)
        .await
        .expect("classification should succeed");

    assert_eq!(response.needs_response.len(), 1);
    assert_eq!(response.fyi_summaries.len(), 1);
    assert_eq!(response.fyi_summaries[0].summary, FALLBACK_SUMMARY);
    assert_eq!(response.fyi_summaries[0].priority, Priority::Fyi);
}

#[tokio::test]
async fn empty_reply_falls_back_for_that_chat_only() {
    let server = MockServer::start().await;
    reply_for(&server, "Ana", r#"{"priority":"needs_reply","summary":"Wants the report"}"#).await;
    reply_for(&server, "Bo", "").await;

    let response = classifier(&server)
        .classify(vec![context(1, "Ana", true), context(2, "Bo", true)], false, 5)
        .await
        .expect("an empty reply must not fail the briefing");

    assert_eq!(response.needs_response.len(), 1);
    assert_eq!(response.needs_response[0].chat_id, 1);
    assert_eq!(response.fyi_summaries.len(), 1);
    assert_eq!(response.fyi_summaries[0].chat_id, 2);
    assert_eq!(response.fyi_summaries[0].summary, FALLBACK_SUMMARY);
    assert!(response.stats_consistent());
}

#[tokio::test]
async fn missing_key_is_a_classification_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let classifier = OpenAiClassifier::new(&LlmConfig {
        base_url: server.uri(),
        api_key: None,
        ..LlmConfig::default()
    })
    .expect("classifier should build");

    let err = classifier
        .classify(vec![context(1, "Ana", true)], false, 5)
        .await
        .expect_err("should require a key");
    assert!(err.is_classification());
    assert!(err.to_string().contains(NOT_CONFIGURED));
}

#[tokio::test]
async fn unauthorized_fails_whole_classification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .mount(&server)
        .await;

    let err = classifier(&server)
        .classify(vec![context(1, "Ana", true), context(2, "Bo", true)], false, 5)
        .await
        .expect_err("401 should fail");
    assert!(err.is_classification());
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn repeated_request_hits_server_cache_unless_forced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"priority":"fyi","summary":"s"}"#)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let classifier = classifier(&server);
    let first = classifier
        .classify(vec![context(1, "Ana", true)], false, 5)
        .await
        .expect("first call");
    assert!(!first.cached);

    let second = classifier
        .classify(vec![context(1, "Ana", true)], false, 5)
        .await
        .expect("cached call");
    assert!(second.cached);
    assert_eq!(second.cache_age.as_deref(), Some("just now"));
    assert_eq!(second.fyi_summaries, first.fyi_summaries);

    let forced = classifier
        .classify(vec![context(1, "Ana", true)], true, 5)
        .await
        .expect("forced call");
    assert!(!forced.cached);
}

#[tokio::test]
async fn new_messages_miss_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("URGENT server down"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"priority":"urgent","summary":"Production outage"}"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"priority":"fyi","summary":"s"}"#)),
        )
        .mount(&server)
        .await;

    let classifier = classifier(&server);
    let first = classifier
        .classify(vec![context(1, "Ana", true)], false, 5)
        .await
        .expect("first call");
    assert_eq!(first.fyi_summaries.len(), 1);

    let mut updated = context(1, "Ana", true);
    updated.unread_count = 9;
    updated.messages.push(ContextMessage {
        id: 2,
        sender_name: "Ana".into(),
        text: "URGENT server down, call me".into(),
        date: 1_700_000_600,
        is_outgoing: false,
        is_mentioned: false,
    });

    let second = classifier
        .classify(vec![updated], false, 5)
        .await
        .expect("second call");
    assert!(!second.cached);
    assert_eq!(second.needs_response.len(), 1);
    assert_eq!(second.needs_response[0].priority, Priority::Urgent);
    assert_eq!(second.needs_response[0].unread_count, 9);
    assert_eq!(second.stats.total_unread, 9);
}

#[tokio::test]
async fn cancel_interrupts_and_later_calls_work() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Chat: Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"priority":"fyi","summary":"s"}"#))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    reply_for(&server, "Fast", r#"{"priority":"fyi","summary":"quick"}"#).await;

    let classifier = Arc::new(classifier(&server));
    let running = {
        let classifier = classifier.clone();
        tokio::spawn(async move {
            classifier
                .classify(vec![context(1, "Slow", true)], true, 5)
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    classifier.cancel();

    let interrupted = running
        .await
        .expect("task should not panic")
        .expect("cancellation is not an error");
    assert!(interrupted.cancelled);
    assert!(interrupted.is_empty());

    let after = classifier
        .classify(vec![context(2, "Fast", true)], true, 5)
        .await
        .expect("fresh token should allow new work");
    assert!(!after.cancelled);
    assert_eq!(after.fyi_summaries[0].summary, "quick");
}

#[tokio::test]
async fn empty_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let response = classifier(&server)
        .classify(Vec::new(), false, 5)
        .await
        .expect("empty input succeeds");
    assert!(response.is_empty());
}
