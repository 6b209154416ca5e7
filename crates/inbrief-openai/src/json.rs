// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant JSON parsing for model output that wraps the object in prose or fences.

use serde::de::DeserializeOwned;
use tracing::debug;

/// Locates a JSON object inside `content`.
///
/// Tries, in order: the content itself when it starts with `{`, the body of
/// the first fenced code block, then the span from the first `{` to the last `}`.
pub fn extract_json(content: &str) -> Option<&str> {
    if content.trim_start().starts_with('{') {
        return Some(content);
    }

    if let Some(start) = content.find("```") {
        let after_fence = &content[start + 3..];
        let inner = match after_fence.find('\n') {
            Some(nl) => &after_fence[nl + 1..],
            None => after_fence,
        };
        if let Some(end) = inner.find("```") {
            let extracted = inner[..end].trim();
            if extracted.starts_with('{') {
                return Some(extracted);
            }
        }
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

/// Parses `content` as `T`, falling back to [`extract_json`].
pub fn parse_lenient<T: DeserializeOwned>(content: &str) -> Option<T> {
    if let Ok(parsed) = serde_json::from_str(content) {
        return Some(parsed);
    }
    let extracted = extract_json(content)?;
    let parsed = serde_json::from_str(extracted).ok()?;
    debug!("extracted JSON from wrapped model output");
    Some(parsed)
}
