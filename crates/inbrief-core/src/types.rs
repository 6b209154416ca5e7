// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat, message, and filter types consumed by the briefing engine.
//!
//! These mirror what a chat transport hands back. The engine treats them as
//! read-only input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Source,
    Classifier,
}

/// Kind of chat as reported by the transport.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Normalizes the transport kind into the briefing item vocabulary.
    pub fn item_type(self) -> ItemChatType {
        match self {
            ChatKind::Private => ItemChatType::Dm,
            ChatKind::Group | ChatKind::Supergroup => ItemChatType::Group,
            ChatKind::Channel => ItemChatType::Channel,
        }
    }
}

/// Chat type as shown on briefing items.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemChatType {
    Dm,
    Group,
    Channel,
}

/// Message payload. Only the `Text` variant counts as text for question detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text {
        text: String,
    },
    Photo {
        caption: Option<String>,
    },
    Video {
        caption: Option<String>,
    },
    Document {
        #[serde(rename = "fileName")]
        file_name: String,
    },
    Voice {
        duration: i32,
    },
    Sticker {
        emoji: Option<String>,
    },
    Unknown,
}

impl MessageContent {
    /// Returns the text if this is a plain text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Renders the content as a single line suitable for previews and prompts.
    pub fn render(&self) -> String {
        match self {
            MessageContent::Text { text } => text.clone(),
            MessageContent::Photo { caption } => with_caption("[Photo]", caption.as_deref()),
            MessageContent::Video { caption } => with_caption("[Video]", caption.as_deref()),
            MessageContent::Document { file_name } => format!("[Document] {file_name}"),
            MessageContent::Voice { duration } => format!("[Voice message, {duration}s]"),
            MessageContent::Sticker { emoji } => match emoji {
                Some(e) => format!("[Sticker] {e}"),
                None => "[Sticker]".to_string(),
            },
            MessageContent::Unknown => "[Unsupported message]".to_string(),
        }
    }
}

fn with_caption(label: &str, caption: Option<&str>) -> String {
    match caption {
        Some(c) if !c.trim().is_empty() => format!("{label} {c}"),
        _ => label.to_string(),
    }
}

/// A single chat message. Messages are ordered oldest first within a fetch window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: MessageContent,
    /// Epoch seconds.
    pub date: i64,
    pub is_outgoing: bool,
    pub is_read: bool,
    #[serde(default)]
    pub is_mentioned: bool,
}

/// Preview of the most recent message in a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: MessageContent,
    /// Epoch seconds.
    pub date: i64,
}

/// A chat with its unread counters, as listed by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub title: String,
    pub unread_count: u32,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
}

/// Chat list filters. The stable serialization is the cache-invalidation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFilters {
    pub include_private: bool,
    pub include_groups: bool,
    pub include_supergroups: bool,
    pub include_channels: bool,
    /// Inclusive lower bound on member count for group-like chats.
    #[serde(default)]
    pub min_members: Option<u32>,
    /// Inclusive upper bound on member count for group-like chats.
    #[serde(default)]
    pub max_members: Option<u32>,
    /// Selected folder ids. Empty means every folder.
    #[serde(default)]
    pub folder_ids: Vec<i32>,
}

impl Default for ChatFilters {
    fn default() -> Self {
        Self {
            include_private: true,
            include_groups: true,
            include_supergroups: true,
            include_channels: true,
            min_members: None,
            max_members: None,
            folder_ids: Vec::new(),
        }
    }
}

impl ChatFilters {
    /// Stable serialization used as the filters fingerprint.
    ///
    /// Folder ids are sorted and deduplicated first so equivalent selections
    /// produce the same string.
    pub fn fingerprint(&self) -> String {
        let mut normalized = self.clone();
        normalized.folder_ids.sort_unstable();
        normalized.folder_ids.dedup();
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string(&normalized).unwrap_or_default()
    }

    /// Whether a chat passes the kind flags and member-count range.
    ///
    /// Folder membership is not visible on [`Chat`]; sources apply
    /// `folder_ids` themselves.
    pub fn matches(&self, chat: &Chat) -> bool {
        let kind_allowed = match chat.kind {
            ChatKind::Private => self.include_private,
            ChatKind::Group => self.include_groups,
            ChatKind::Supergroup => self.include_supergroups,
            ChatKind::Channel => self.include_channels,
        };
        if !kind_allowed {
            return false;
        }
        if chat.kind == ChatKind::Private {
            return true;
        }
        let members = chat.member_count.unwrap_or(0);
        if let Some(min) = self.min_members {
            if members < min {
                return false;
            }
        }
        if let Some(max) = self.max_members {
            if members > max {
                return false;
            }
        }
        true
    }
}

/// One entry of a batch message fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFetch {
    pub chat_id: i64,
    pub limit: u32,
}

/// Result of a batch message fetch. A failed chat carries its error text
/// without failing the rest of the batch.
pub type MessageBatch = HashMap<i64, Result<Vec<Message>, String>>;
