// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scrubs chat content before it is placed in a prompt.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum bytes of user content kept per field.
pub const MAX_CONTENT_BYTES: usize = 10_000;

/// Instruction-like phrases that try to steer the model.
static INJECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(ignore|disregard|forget)\s+(previous|above|all)")
        .expect("injection pattern is a valid regex")
});

/// Filters injection phrases, defuses code fences, and caps the length.
pub fn sanitize_user_content(text: &str) -> String {
    let filtered = INJECTION_PATTERN.replace_all(text, "[filtered]");
    let escaped = filtered.replace("```", "'''");

    if escaped.len() > MAX_CONTENT_BYTES {
        let mut cut = MAX_CONTENT_BYTES;
        while !escaped.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...[truncated]", &escaped[..cut])
    } else {
        escaped
    }
}
