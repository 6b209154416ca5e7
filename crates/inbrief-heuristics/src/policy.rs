// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thresholds and item builders for heuristic auto-classification.
//!
//! Large groups and channels are labeled FYI without fetching messages or
//! consulting the AI classifier.

use inbrief_config::InbriefConfig;
use inbrief_core::{Chat, ChatKind, FyiItem, Message, Priority};

use crate::preview::last_message_preview;

/// Thresholds for the zero-cost classification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicPolicy {
    /// Member count at which a group or channel is auto-labeled FYI.
    pub large_group_threshold: u32,
    /// Lower bound on messages fetched per chat.
    pub min_batch: u32,
    /// Upper bound on messages fetched per chat.
    pub max_batch: u32,
    /// Characters kept in item previews.
    pub last_message_max_chars: usize,
}

impl HeuristicPolicy {
    /// Policy with the stock thresholds (500 members, 5..=30 messages).
    pub fn new() -> Self {
        Self {
            large_group_threshold: 500,
            min_batch: 5,
            max_batch: 30,
            last_message_max_chars: 300,
        }
    }

    /// Policy with a custom large-group threshold.
    pub fn with_threshold(large_group_threshold: u32) -> Self {
        Self {
            large_group_threshold,
            ..Self::new()
        }
    }

    /// Policy built from the `[heuristics]` and `[briefing]` sections.
    pub fn from_config(config: &InbriefConfig) -> Self {
        Self {
            large_group_threshold: config.heuristics.large_group_threshold,
            min_batch: config.heuristics.min_batch,
            max_batch: config.heuristics.max_batch,
            last_message_max_chars: config.briefing.last_message_max_chars,
        }
    }

    /// True iff the chat is a basic group or a channel at or above the threshold.
    ///
    /// Supergroups never match.
    pub fn is_large_group(&self, chat: &Chat) -> bool {
        matches!(chat.kind, ChatKind::Group | ChatKind::Channel)
            && chat
                .member_count
                .is_some_and(|members| members >= self.large_group_threshold)
    }

    /// Messages to fetch for a chat: its unread count clamped to the batch bounds.
    pub fn batch_size(&self, unread_count: u32) -> u32 {
        unread_count.clamp(self.min_batch, self.max_batch.max(self.min_batch))
    }

    /// FYI item for a large group. The id is assigned during aggregation.
    pub fn large_group_fyi(&self, chat: &Chat) -> FyiItem {
        self.heuristic_fyi(chat, &[], large_group_summary(chat.unread_count))
    }

    /// FYI item for a chat the user is not involved in.
    pub fn uninvolved_fyi(&self, chat: &Chat, window: &[Message]) -> FyiItem {
        self.heuristic_fyi(chat, window, uninvolved_summary(chat.unread_count))
    }

    fn heuristic_fyi(&self, chat: &Chat, window: &[Message], summary: String) -> FyiItem {
        let (last_message, last_message_date) =
            last_message_preview(chat, window, self.last_message_max_chars);
        FyiItem {
            id: 0,
            chat_id: chat.id,
            chat_name: chat.title.clone(),
            chat_type: chat.kind.item_type(),
            unread_count: chat.unread_count,
            last_message,
            last_message_date,
            priority: Priority::Fyi,
            summary,
        }
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary for a large-group FYI item.
pub fn large_group_summary(unread_count: u32) -> String {
    format!("{unread_count} new messages in large group")
}

/// Summary for an uninvolved-chat FYI item.
pub fn uninvolved_summary(unread_count: u32) -> String {
    format!("{unread_count} new messages (no mentions of you)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbrief_core::ItemChatType;
    use proptest::prelude::*;

    fn chat(kind: ChatKind, members: Option<u32>, unread: u32) -> Chat {
        Chat {
            id: 42,
            kind,
            title: "Rust Meetup".into(),
            unread_count: unread,
            member_count: members,
            last_message: None,
        }
    }

    #[test]
    fn group_at_threshold_is_large() {
        let policy = HeuristicPolicy::new();
        assert!(policy.is_large_group(&chat(ChatKind::Group, Some(500), 1)));
        assert!(policy.is_large_group(&chat(ChatKind::Channel, Some(600), 1)));
    }

    #[test]
    fn group_below_threshold_is_not_large() {
        let policy = HeuristicPolicy::new();
        assert!(!policy.is_large_group(&chat(ChatKind::Group, Some(499), 1)));
    }

    #[test]
    fn supergroup_and_private_are_never_large() {
        let policy = HeuristicPolicy::new();
        assert!(!policy.is_large_group(&chat(ChatKind::Supergroup, Some(10_000), 1)));
        assert!(!policy.is_large_group(&chat(ChatKind::Private, Some(10_000), 1)));
    }

    #[test]
    fn unknown_member_count_is_not_large() {
        let policy = HeuristicPolicy::new();
        assert!(!policy.is_large_group(&chat(ChatKind::Channel, None, 1)));
    }

    #[test]
    fn custom_threshold() {
        let policy = HeuristicPolicy::with_threshold(50);
        assert!(policy.is_large_group(&chat(ChatKind::Group, Some(50), 1)));
    }

    #[test]
    fn batch_size_clamps() {
        let policy = HeuristicPolicy::new();
        assert_eq!(policy.batch_size(0), 5);
        assert_eq!(policy.batch_size(2), 5);
        assert_eq!(policy.batch_size(12), 12);
        assert_eq!(policy.batch_size(300), 30);
    }

    #[test]
    fn large_group_item_summary() {
        let policy = HeuristicPolicy::new();
        let item = policy.large_group_fyi(&chat(ChatKind::Group, Some(600), 40));
        assert_eq!(item.summary, "40 new messages in large group");
        assert_eq!(item.priority, Priority::Fyi);
        assert_eq!(item.unread_count, 40);
        assert_eq!(item.chat_type, ItemChatType::Group);
    }

    #[test]
    fn uninvolved_item_summary() {
        let policy = HeuristicPolicy::new();
        let item = policy.uninvolved_fyi(&chat(ChatKind::Supergroup, Some(80), 7), &[]);
        assert_eq!(item.summary, "7 new messages (no mentions of you)");
        assert_eq!(item.chat_id, 42);
    }

    #[test]
    fn from_config_reads_sections() {
        let mut config = InbriefConfig::default();
        config.heuristics.large_group_threshold = 42;
        config.briefing.last_message_max_chars = 80;
        let policy = HeuristicPolicy::from_config(&config);
        assert_eq!(policy.large_group_threshold, 42);
        assert_eq!(policy.last_message_max_chars, 80);
    }

    proptest! {
        #[test]
        fn batch_size_always_within_bounds(unread in any::<u32>()) {
            let size = HeuristicPolicy::new().batch_size(unread);
            prop_assert!((5..=30).contains(&size));
        }
    }
}
