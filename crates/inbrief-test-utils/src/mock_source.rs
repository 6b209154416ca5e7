// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat source for deterministic testing.
//!
//! `MockChatSource` serves an in-memory chat list and per-chat message
//! windows, and counts every call so tests can assert what was fetched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use inbrief_core::{
    AdapterType, BriefError, Chat, ChatFilters, ChatSource, Message, MessageBatch, MessageFetch,
    PluginAdapter,
};

/// An in-memory [`ChatSource`].
///
/// Chats without configured messages return an empty window.
pub struct MockChatSource {
    chats: Mutex<Vec<Chat>>,
    messages: Mutex<HashMap<i64, Result<Vec<Message>, String>>>,
    chat_list_error: Mutex<Option<String>>,
    delay: Mutex<Duration>,
    batch_requests: Mutex<Vec<Vec<MessageFetch>>>,
    chat_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl MockChatSource {
    pub fn new() -> Self {
        Self::with_chats(Vec::new())
    }

    pub fn with_chats(chats: Vec<Chat>) -> Self {
        Self {
            chats: Mutex::new(chats),
            messages: Mutex::new(HashMap::new()),
            chat_list_error: Mutex::new(None),
            delay: Mutex::new(Duration::ZERO),
            batch_requests: Mutex::new(Vec::new()),
            chat_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// Replace the chat list.
    pub async fn set_chats(&self, chats: Vec<Chat>) {
        *self.chats.lock().await = chats;
    }

    /// Set the message window for a chat, oldest first.
    pub async fn set_messages(&self, chat_id: i64, messages: Vec<Message>) {
        self.messages.lock().await.insert(chat_id, Ok(messages));
    }

    /// Make the message fetch for one chat fail.
    pub async fn fail_messages(&self, chat_id: i64, error: &str) {
        self.messages
            .lock()
            .await
            .insert(chat_id, Err(error.to_string()));
    }

    /// Make `fetch_chats` fail (`Some`) or succeed again (`None`).
    pub async fn fail_chat_list(&self, error: Option<&str>) {
        *self.chat_list_error.lock().await = error.map(str::to_string);
    }

    /// Delay applied to every `fetch_chats` call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = delay;
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Every batch request received, in call order.
    pub async fn batch_requests(&self) -> Vec<Vec<MessageFetch>> {
        self.batch_requests.lock().await.clone()
    }
}

impl Default for MockChatSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChatSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }
}

#[async_trait]
impl ChatSource for MockChatSource {
    async fn fetch_chats(
        &self,
        limit: usize,
        filters: &ChatFilters,
        _force: bool,
    ) -> Result<Vec<Chat>, BriefError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.chat_list_error.lock().await.clone() {
            return Err(BriefError::source_error(error));
        }

        Ok(self
            .chats
            .lock()
            .await
            .iter()
            .filter(|chat| filters.matches(chat))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn batch_fetch_messages(
        &self,
        requests: &[MessageFetch],
    ) -> Result<MessageBatch, BriefError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batch_requests.lock().await.push(requests.to_vec());

        let messages = self.messages.lock().await;
        let batch = requests
            .iter()
            .map(|request| {
                let window = match messages.get(&request.chat_id) {
                    Some(Ok(all)) => {
                        let skip = all.len().saturating_sub(request.limit as usize);
                        Ok(all[skip..].to_vec())
                    }
                    Some(Err(error)) => Err(error.clone()),
                    None => Ok(Vec::new()),
                };
                (request.chat_id, window)
            })
            .collect();
        Ok(batch)
    }
}
