// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end briefing tests.
//!
//! `TestHarness` wires a [`MockChatSource`] and a [`MockClassifier`] into a
//! [`BriefingCoordinator`] so tests can drive full loads and inspect both
//! the cached briefing and what each mock saw.

use std::sync::Arc;

use inbrief_config::InbriefConfig;
use inbrief_core::{BriefingResponse, Chat, ChatSource, ClassifierAdapter, Message};
use inbrief_engine::{BriefingCoordinator, LoadOutcome, LoadRequest};

use crate::mock_classifier::MockClassifier;
use crate::mock_source::MockChatSource;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    chats: Vec<Chat>,
    messages: Vec<(i64, Vec<Message>)>,
    replies: Vec<BriefingResponse>,
    config: InbriefConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            chats: Vec::new(),
            messages: Vec::new(),
            replies: Vec::new(),
            config: InbriefConfig::default(),
        }
    }

    /// Set the chat list served by the mock source.
    pub fn with_chats(mut self, chats: Vec<Chat>) -> Self {
        self.chats = chats;
        self
    }

    /// Set the message window for one chat, oldest first.
    pub fn with_messages(mut self, chat_id: i64, messages: Vec<Message>) -> Self {
        self.messages.push((chat_id, messages));
        self
    }

    /// Queue immediate classifier replies.
    pub fn with_classifier_replies(mut self, replies: Vec<BriefingResponse>) -> Self {
        self.replies = replies;
        self
    }

    /// Override the configuration handed to the coordinator.
    pub fn with_config(mut self, config: InbriefConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> TestHarness {
        let source = Arc::new(MockChatSource::with_chats(self.chats));
        for (chat_id, messages) in self.messages {
            source.set_messages(chat_id, messages).await;
        }
        let classifier = Arc::new(MockClassifier::with_replies(self.replies));

        let coordinator = BriefingCoordinator::new(
            Arc::clone(&source) as Arc<dyn ChatSource>,
            Arc::clone(&classifier) as Arc<dyn ClassifierAdapter>,
            &self.config,
        );

        TestHarness {
            source,
            classifier,
            coordinator,
            config: self.config,
        }
    }
}

/// A coordinator over mock adapters.
pub struct TestHarness {
    pub source: Arc<MockChatSource>,
    pub classifier: Arc<MockClassifier>,
    pub coordinator: BriefingCoordinator,
    pub config: InbriefConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Default filters with the configured TTL.
    pub fn request(&self) -> LoadRequest {
        LoadRequest::from_config(&self.config)
    }

    /// A non-forced load with [`TestHarness::request`].
    pub async fn load(&self) -> LoadOutcome {
        self.coordinator.load_briefing(self.request()).await
    }

    /// A forced load with [`TestHarness::request`].
    pub async fn force_load(&self) -> LoadOutcome {
        self.coordinator.load_briefing(self.request().forced()).await
    }

    /// The cached briefing. Panics when nothing is cached.
    pub fn briefing(&self) -> BriefingResponse {
        self.coordinator
            .data()
            .expect("coordinator should hold a briefing")
    }
}
