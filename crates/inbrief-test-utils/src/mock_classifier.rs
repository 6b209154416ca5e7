// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classifier adapter for deterministic testing.
//!
//! `MockClassifier` pops scripted replies from a FIFO queue. When the queue
//! is empty it answers with a simple rule: private chats whose last incoming
//! message is a question need a reply, everything else is FYI.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use inbrief_core::{
    AdapterType, BriefError, BriefingResponse, ChatContext, ClassifierAdapter, FyiItem,
    NeedsResponseItem, PluginAdapter, Priority,
};

enum Reply {
    Respond(BriefingResponse),
    Fail(String),
    Panic(String),
}

struct Scripted {
    reply: Reply,
    delay: Duration,
}

/// A scripted [`ClassifierAdapter`].
///
/// Delayed replies end early with a cancelled response when
/// [`ClassifierAdapter::cancel`] is called.
pub struct MockClassifier {
    script: Mutex<VecDeque<Scripted>>,
    received: Mutex<Vec<Vec<ChatContext>>>,
    calls: AtomicUsize,
    cancels: AtomicUsize,
    call_started: Notify,
    cancelled: Notify,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
            call_started: Notify::new(),
            cancelled: Notify::new(),
        }
    }

    /// Create a mock classifier pre-loaded with immediate replies.
    pub fn with_replies(replies: Vec<BriefingResponse>) -> Self {
        let script = replies
            .into_iter()
            .map(|response| Scripted {
                reply: Reply::Respond(response),
                delay: Duration::ZERO,
            })
            .collect();
        Self {
            script: Mutex::new(script),
            ..Self::new()
        }
    }

    pub async fn push_reply(&self, response: BriefingResponse) {
        self.push_reply_after(response, Duration::ZERO).await;
    }

    pub async fn push_reply_after(&self, response: BriefingResponse, delay: Duration) {
        self.push(Reply::Respond(response), delay).await;
    }

    /// Queue a classification error, as from a rejected API key or an HTTP failure.
    pub async fn push_error(&self, message: &str) {
        self.push_error_after(message, Duration::ZERO).await;
    }

    pub async fn push_error_after(&self, message: &str, delay: Duration) {
        self.push(Reply::Fail(message.to_string()), delay).await;
    }

    /// Queue a reply that panics inside the classifier.
    pub async fn push_panic(&self, message: &str) {
        self.push(Reply::Panic(message.to_string()), Duration::ZERO)
            .await;
    }

    async fn push(&self, reply: Reply, delay: Duration) {
        self.script.lock().await.push_back(Scripted { reply, delay });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Contexts received by each call, in call order.
    pub async fn received(&self) -> Vec<Vec<ChatContext>> {
        self.received.lock().await.clone()
    }

    /// Sorted chat ids submitted across every call.
    pub async fn submitted_chat_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .received
            .lock()
            .await
            .iter()
            .flatten()
            .map(|context| context.chat_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Waits until at least `count` classify calls have started.
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let started = self.call_started.notified();
            if self.calls() >= count {
                return;
            }
            started.await;
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Default rule used when no reply is scripted.
pub fn rule_based_reply(contexts: &[ChatContext]) -> BriefingResponse {
    let mut needs = Vec::new();
    let mut fyi = Vec::new();
    for (idx, context) in contexts.iter().enumerate() {
        let id = idx as u32 + 1;
        if context.is_private_chat && context.has_unanswered_question {
            needs.push(NeedsResponseItem {
                id,
                chat_id: context.chat_id,
                chat_name: context.chat_title.clone(),
                chat_type: context.chat_type,
                unread_count: context.unread_count,
                last_message: context.last_message.clone(),
                last_message_date: context.last_message_date.clone(),
                priority: Priority::NeedsReply,
                summary: "Unanswered question".to_string(),
                suggested_reply: None,
            });
        } else {
            fyi.push(FyiItem {
                id,
                chat_id: context.chat_id,
                chat_name: context.chat_title.clone(),
                chat_type: context.chat_type,
                unread_count: context.unread_count,
                last_message: context.last_message.clone(),
                last_message_date: context.last_message_date.clone(),
                priority: Priority::Fyi,
                summary: "No reply needed".to_string(),
            });
        }
    }
    BriefingResponse::from_items(needs, fyi)
}

#[async_trait]
impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }
}

#[async_trait]
impl ClassifierAdapter for MockClassifier {
    async fn classify(
        &self,
        contexts: Vec<ChatContext>,
        _force: bool,
        _ttl_minutes: u64,
    ) -> Result<BriefingResponse, BriefError> {
        self.received.lock().await.push(contexts.clone());
        let scripted = self.script.lock().await.pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_started.notify_waiters();

        let Some(Scripted { reply, delay }) = scripted else {
            return Ok(rule_based_reply(&contexts));
        };

        if !delay.is_zero() {
            let cancelled = self.cancelled.notified();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancelled => {
                    let mut response = BriefingResponse::empty();
                    response.cancelled = true;
                    return Ok(response);
                }
            }
        }

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(BriefError::classification_error(message)),
            Reply::Panic(message) => panic!("{message}"),
        }
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.cancelled.notify_waiters();
    }
}
