// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier-side result cache keyed by the content of the submitted chats.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::Duration;

use inbrief_core::{BriefingResponse, ChatContext};
use tokio::time::Instant;

/// Cache key for a set of chat contexts; independent of submission order.
///
/// Covers each chat's id and unread count plus the id, date and text of every
/// message in its window, so new or edited messages miss the cache.
pub fn contexts_key(contexts: &[ChatContext]) -> String {
    let mut sorted: Vec<&ChatContext> = contexts.iter().collect();
    sorted.sort_unstable_by_key(|context| context.chat_id);
    let mut hasher = DefaultHasher::new();
    for context in sorted {
        context.chat_id.hash(&mut hasher);
        context.unread_count.hash(&mut hasher);
        context.messages.len().hash(&mut hasher);
        for message in &context.messages {
            message.id.hash(&mut hasher);
            message.date.hash(&mut hasher);
            message.text.hash(&mut hasher);
        }
    }
    format!("chats:{:x}", hasher.finish())
}

/// Human rendering of a cache entry's age.
pub fn format_cache_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

struct Entry {
    response: BriefingResponse,
    stored_at: Instant,
}

/// In-memory TTL cache of classification results.
#[derive(Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the entry and its age if younger than `ttl`.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<(BriefingResponse, Duration)> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        let age = entry.stored_at.elapsed();
        (age < ttl).then(|| (entry.response.clone(), age))
    }

    pub fn insert(&self, key: String, response: BriefingResponse) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key,
                Entry {
                    response,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use inbrief_core::{ContextMessage, ItemChatType};

    fn context(chat_id: i64, unread_count: u32, texts: &[&str]) -> ChatContext {
        ChatContext {
            chat_id,
            chat_title: format!("chat {chat_id}"),
            chat_type: ItemChatType::Dm,
            messages: texts
                .iter()
                .enumerate()
                .map(|(idx, text)| ContextMessage {
                    id: idx as i64 + 1,
                    sender_name: "Ana".into(),
                    text: text.to_string(),
                    date: 1_700_000_000 + idx as i64,
                    is_outgoing: false,
                    is_mentioned: false,
                })
                .collect(),
            unread_count,
            last_message_is_outgoing: false,
            has_unanswered_question: false,
            hours_since_last_activity: 1.0,
            is_private_chat: true,
            last_message: None,
            last_message_date: None,
        }
    }

    #[test]
    fn key_ignores_order() {
        let a = context(1, 2, &["hi"]);
        let b = context(2, 1, &["yo"]);
        assert_eq!(
            contexts_key(&[a.clone(), b.clone()]),
            contexts_key(&[b.clone(), a.clone()])
        );
        assert_ne!(contexts_key(&[a.clone()]), contexts_key(&[a, b]));
    }

    #[test]
    fn key_changes_with_content() {
        let base = contexts_key(&[context(1, 2, &["hi", "there"])]);
        assert!(base.starts_with("chats:"));
        assert_ne!(base, contexts_key(&[context(1, 3, &["hi", "there"])]));
        assert_ne!(base, contexts_key(&[context(1, 2, &["hi", "there", "new"])]));
        assert_ne!(base, contexts_key(&[context(1, 2, &["hi", "edited"])]));
        assert_eq!(base, contexts_key(&[context(1, 2, &["hi", "there"])]));
    }

    #[test]
    fn cache_age_buckets() {
        assert_eq!(format_cache_age(Duration::from_secs(5)), "just now");
        assert_eq!(format_cache_age(Duration::from_secs(125)), "2m ago");
        assert_eq!(format_cache_age(Duration::from_secs(7200)), "2h ago");
        assert_eq!(format_cache_age(Duration::from_secs(3 * 86_400)), "3d ago");
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = ResultCache::new();
        cache.insert("k".into(), BriefingResponse::empty());
        let ttl = Duration::from_secs(300);

        assert!(cache.get("k", ttl).is_some());
        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(cache.get("k", ttl).is_none());
    }
}
