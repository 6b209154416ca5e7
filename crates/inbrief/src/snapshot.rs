// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat source backed by a JSON export of chats and recent messages.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use inbrief_core::{
    AdapterType, BriefError, Chat, ChatFilters, ChatSource, Message, MessageBatch, MessageFetch,
    PluginAdapter,
};

/// On-disk layout: `{"chats": [...], "messages": {"<chat id>": [...]}}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    chats: Vec<Chat>,
    #[serde(default)]
    messages: HashMap<i64, Vec<Message>>,
}

/// Read-only [`ChatSource`] over a snapshot file.
pub struct SnapshotSource {
    chats: Vec<Chat>,
    messages: HashMap<i64, Vec<Message>>,
}

impl SnapshotSource {
    pub fn from_json(json: &str) -> Result<Self, BriefError> {
        let file: SnapshotFile = serde_json::from_str(json).map_err(|e| BriefError::Source {
            message: format!("invalid chat snapshot: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut messages = file.messages;
        for window in messages.values_mut() {
            window.sort_by_key(|m| (m.date, m.id));
        }
        Ok(Self {
            chats: file.chats,
            messages,
        })
    }

    pub fn load(path: &Path) -> Result<Self, BriefError> {
        let json = std::fs::read_to_string(path).map_err(|e| BriefError::Source {
            message: format!("failed to read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;
        Self::from_json(&json)
    }

    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }
}

#[async_trait]
impl PluginAdapter for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }
}

#[async_trait]
impl ChatSource for SnapshotSource {
    async fn fetch_chats(
        &self,
        limit: usize,
        filters: &ChatFilters,
        _force: bool,
    ) -> Result<Vec<Chat>, BriefError> {
        Ok(self
            .chats
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
        Ok(requests
            .iter()
            .map(|request| {
                let window = self
                    .messages
                    .get(&request.chat_id)
                    .map(|all| {
                        let skip = all.len().saturating_sub(request.limit as usize);
                        all[skip..].to_vec()
                    })
                    .unwrap_or_default();
                (request.chat_id, Ok(window))
            })
            .collect())
    }
}
