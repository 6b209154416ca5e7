// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Last-message previews shown on briefing items.

use chrono::DateTime;
use inbrief_core::{Chat, Message};

/// Truncates `text` to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// RFC 3339 rendering of an epoch-seconds timestamp.
pub fn format_message_date(epoch_secs: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_secs, 0).map(|dt| dt.to_rfc3339())
}

/// Preview text and date for a chat, preferring the chat's own last message
/// and falling back to the newest message of a fetched window.
pub fn last_message_preview(
    chat: &Chat,
    window: &[Message],
    max_chars: usize,
) -> (Option<String>, Option<String>) {
    let latest = chat
        .last_message
        .as_ref()
        .map(|m| (m.content.render(), m.date))
        .or_else(|| window.last().map(|m| (m.content.render(), m.date)));

    match latest {
        Some((text, date)) => (
            Some(truncate_preview(&text, max_chars)),
            format_message_date(date),
        ),
        None => (None, None),
    }
}
