// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text for per-chat priority classification.

use std::fmt::Write;

use inbrief_core::ChatContext;

use crate::sanitize::sanitize_user_content;

/// Messages per chat included in a prompt, newest kept.
pub const MAX_PROMPT_MESSAGES: usize = 30;

/// Appended to the system prompt for backends without a JSON response mode.
pub const JSON_ONLY_SUFFIX: &str = "\n\nOutput only the raw JSON object. No code fences, no text before or after it.";

/// System prompt describing the three priorities and the reply format.
pub const CLASSIFY_SYSTEM_PROMPT: &str = r#"You triage one chat from the user's messenger and decide how much attention it needs.

Each request contains the most recent messages (sender and text) and a SIGNALS block computed from the chat.

Priorities:

urgent: something is due soon or has gone wrong. Look for words such as "urgent", "asap", "deadline", "today", explicit times, or several rapid messages from the same person.

needs_reply: somebody is waiting on the user. Typical cases are a direct message whose last message is incoming, an open question (has_unanswered_question=true), or a direct request ("can you", "please", "let me know").

fyi: nothing is expected from the user. The user already answered (last_message_is_outgoing=true), the chat is a broadcast channel, a group discussion that does not address the user, or an automated notification.

A chat whose last message is outgoing is almost always fyi. A private chat whose last message is incoming is almost always needs_reply.

Reply with a JSON object:
{"priority": "urgent" | "needs_reply" | "fyi", "summary": "one or two sentences", "suggested_reply": "a short natural reply, or null for fyi"}"#;

/// Renders the user prompt for one chat: header, signals, and the last
/// [`MAX_PROMPT_MESSAGES`] messages, all user content sanitized.
pub fn format_chat_prompt(context: &ChatContext) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Chat: {} ({})",
        sanitize_user_content(&context.chat_title),
        context.chat_type
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "SIGNALS:");
    let _ = writeln!(prompt, "- unread_count: {}", context.unread_count);
    let _ = writeln!(
        prompt,
        "- last_message_is_outgoing: {}",
        context.last_message_is_outgoing
    );
    let _ = writeln!(
        prompt,
        "- has_unanswered_question: {}",
        context.has_unanswered_question
    );
    let _ = writeln!(
        prompt,
        "- hours_since_last_activity: {:.1}",
        context.hours_since_last_activity
    );
    let _ = writeln!(prompt, "- is_private_chat: {}", context.is_private_chat);
    let _ = writeln!(prompt);
    let _ = write!(prompt, "MESSAGES:");

    let skip = context.messages.len().saturating_sub(MAX_PROMPT_MESSAGES);
    for message in &context.messages[skip..] {
        let sender = if message.is_outgoing {
            "You".to_string()
        } else {
            sanitize_user_content(&message.sender_name)
        };
        let mention = if message.is_mentioned { " (mentions you)" } else { "" };
        let _ = write!(
            prompt,
            "\n[{sender}]{mention}: {}",
            sanitize_user_content(&message.text)
        );
    }
    prompt
}
