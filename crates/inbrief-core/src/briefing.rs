// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Briefing types: classifier input contexts and the `BriefingResponse` artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::ItemChatType;

/// Priority of a briefing item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Urgent,
    NeedsReply,
    Fyi,
}

impl Priority {
    /// Sort key: urgent first, then needs_reply, then fyi.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::NeedsReply => 1,
            Priority::Fyi => 2,
        }
    }
}

/// A chat judged to require the user's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsResponseItem {
    pub id: u32,
    pub chat_id: i64,
    pub chat_name: String,
    pub chat_type: ItemChatType,
    pub unread_count: u32,
    pub last_message: Option<String>,
    pub last_message_date: Option<String>,
    /// `Urgent` or `NeedsReply`.
    pub priority: Priority,
    pub summary: String,
    pub suggested_reply: Option<String>,
}

/// An informational chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FyiItem {
    pub id: u32,
    pub chat_id: i64,
    pub chat_name: String,
    pub chat_type: ItemChatType,
    pub unread_count: u32,
    pub last_message: Option<String>,
    pub last_message_date: Option<String>,
    /// Always `Fyi`.
    pub priority: Priority,
    pub summary: String,
}

/// Aggregate counters for a briefing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingStats {
    pub needs_response_count: u32,
    pub fyi_count: u32,
    pub total_unread: u32,
}

/// The classified digest of unread chats.
///
/// Invariant: `stats` always agrees with the two lists (see [`BriefingResponse::stats_consistent`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingResponse {
    pub needs_response: Vec<NeedsResponseItem>,
    pub fyi_summaries: Vec<FyiItem>,
    pub stats: BriefingStats,
    pub generated_at: DateTime<Utc>,
    pub cached: bool,
    #[serde(default)]
    pub cache_age: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
}

impl BriefingResponse {
    /// The "all caught up" response: empty lists, zero stats, not cached.
    pub fn empty() -> Self {
        Self {
            needs_response: Vec::new(),
            fyi_summaries: Vec::new(),
            stats: BriefingStats::default(),
            generated_at: Utc::now(),
            cached: false,
            cache_age: None,
            cancelled: false,
        }
    }

    /// Builds a response from item lists, deriving the stats.
    pub fn from_items(
        needs_response: Vec<NeedsResponseItem>,
        fyi_summaries: Vec<FyiItem>,
    ) -> Self {
        let mut response = Self {
            needs_response,
            fyi_summaries,
            ..Self::empty()
        };
        response.stats = response.computed_stats();
        response
    }

    /// Stats derived from the current lists.
    pub fn computed_stats(&self) -> BriefingStats {
        let needs_unread = self.needs_response.iter().map(|i| i.unread_count);
        let fyi_unread = self.fyi_summaries.iter().map(|i| i.unread_count);
        BriefingStats {
            needs_response_count: self.needs_response.len() as u32,
            fyi_count: self.fyi_summaries.len() as u32,
            total_unread: needs_unread.chain(fyi_unread).fold(0, u32::saturating_add),
        }
    }

    /// Whether `stats` agrees with the lists.
    pub fn stats_consistent(&self) -> bool {
        self.stats == self.computed_stats()
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.needs_response.is_empty() && self.fyi_summaries.is_empty()
    }

    /// Largest item id across both lists, or 0 when empty.
    pub fn max_item_id(&self) -> u32 {
        let needs = self.needs_response.iter().map(|i| i.id);
        let fyi = self.fyi_summaries.iter().map(|i| i.id);
        needs.chain(fyi).max().unwrap_or(0)
    }
}

/// A message as submitted to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub id: i64,
    pub sender_name: String,
    pub text: String,
    pub date: i64,
    pub is_outgoing: bool,
    pub is_mentioned: bool,
}

/// One ambiguous chat submitted to the classifier, with its precomputed signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub chat_id: i64,
    pub chat_title: String,
    pub chat_type: ItemChatType,
    pub messages: Vec<ContextMessage>,
    pub unread_count: u32,
    pub last_message_is_outgoing: bool,
    pub has_unanswered_question: bool,
    pub hours_since_last_activity: f64,
    pub is_private_chat: bool,
    /// Preview shown on the resulting item (already truncated).
    #[serde(default)]
    pub last_message: Option<String>,
    /// RFC 3339 date of the last message.
    #[serde(default)]
    pub last_message_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fyi(id: u32, unread: u32) -> FyiItem {
        FyiItem {
            id,
            chat_id: id as i64,
            chat_name: format!("chat {id}"),
            chat_type: ItemChatType::Group,
            unread_count: unread,
            last_message: None,
            last_message_date: None,
            priority: Priority::Fyi,
            summary: "s".into(),
        }
    }

    #[test]
    fn empty_response_is_all_caught_up() {
        let r = BriefingResponse::empty();
        assert!(r.is_empty());
        assert_eq!(r.stats, BriefingStats::default());
        assert!(!r.cached);
        assert!(!r.cancelled);
    }

    #[test]
    fn from_items_derives_stats() {
        let r = BriefingResponse::from_items(vec![], vec![fyi(1, 4), fyi(2, 6)]);
        assert_eq!(r.stats.fyi_count, 2);
        assert_eq!(r.stats.total_unread, 10);
        assert!(r.stats_consistent());
        assert_eq!(r.max_item_id(), 2);
    }

    #[test]
    fn total_unread_saturates() {
        let r = BriefingResponse::from_items(vec![], vec![fyi(1, u32::MAX), fyi(2, 10)]);
        assert_eq!(r.stats.total_unread, u32::MAX);
        assert!(r.stats_consistent());
    }

    #[test]
    fn priority_serializes_snake_case() {
        let json = serde_json::to_string(&Priority::NeedsReply).expect("serialize");
        assert_eq!(json, "\"needs_reply\"");
        assert!(Priority::Urgent.rank() < Priority::NeedsReply.rank());
    }
}
