// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-chat signals computed from a fetched message window.
//!
//! Windows are ordered oldest first, so "most recent" is the last element.

use inbrief_core::{Chat, ChatKind, Message};

/// Hours reported for a chat with no messages in its window.
pub const IDLE_SENTINEL_HOURS: f64 = 999.0;

/// True iff the chat is not private and the window has neither an outgoing
/// message nor a mention of the user.
pub fn is_uninvolved(chat: &Chat, messages: &[Message]) -> bool {
    chat.kind != ChatKind::Private
        && !messages.iter().any(|m| m.is_outgoing)
        && !messages.iter().any(|m| m.is_mentioned)
}

/// Whether the newest incoming message is a text question.
///
/// Only the first non-outgoing message scanning backward is considered; media
/// never counts as a question, even with a caption.
pub fn detect_question(messages: &[Message]) -> bool {
    messages
        .iter()
        .rev()
        .find(|m| !m.is_outgoing)
        .and_then(|m| m.content.as_text())
        .is_some_and(|text| text.trim().ends_with('?'))
}

/// Hours between the last message in the window and `now` (epoch seconds).
///
/// Returns [`IDLE_SENTINEL_HOURS`] for an empty window.
pub fn compute_hours_since(messages: &[Message], now: i64) -> f64 {
    match messages.last() {
        Some(last) => (now - last.date) as f64 / 3600.0,
        None => IDLE_SENTINEL_HOURS,
    }
}
