// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge & stats aggregation, plus boundary validation of classifier output.

use std::collections::HashSet;

use inbrief_core::{BriefingResponse, FyiItem, Priority};
use tracing::warn;

/// Repairs a classifier partition before it is merged.
///
/// Drops items for chats that were not submitted (and duplicates), forces FYI
/// priority on the FYI list, moves needs-response items marked `fyi` to the
/// FYI list, and recomputes stats that disagree with the lists.
pub fn validate_partition(
    mut response: BriefingResponse,
    submitted: &HashSet<i64>,
) -> BriefingResponse {
    let mut seen = HashSet::new();
    let mut dropped = 0usize;

    let mut needs_response = Vec::with_capacity(response.needs_response.len());
    let mut fyi_summaries = Vec::with_capacity(response.fyi_summaries.len());

    for item in response.needs_response.drain(..) {
        if !submitted.contains(&item.chat_id) || !seen.insert(item.chat_id) {
            dropped += 1;
            continue;
        }
        if item.priority == Priority::Fyi {
            fyi_summaries.push(FyiItem {
                id: item.id,
                chat_id: item.chat_id,
                chat_name: item.chat_name,
                chat_type: item.chat_type,
                unread_count: item.unread_count,
                last_message: item.last_message,
                last_message_date: item.last_message_date,
                priority: Priority::Fyi,
                summary: item.summary,
            });
        } else {
            needs_response.push(item);
        }
    }

    for mut item in response.fyi_summaries.drain(..) {
        if !submitted.contains(&item.chat_id) || !seen.insert(item.chat_id) {
            dropped += 1;
            continue;
        }
        item.priority = Priority::Fyi;
        fyi_summaries.push(item);
    }

    if dropped > 0 {
        warn!(dropped, "classifier returned items for chats that were not submitted");
    }

    response.needs_response = needs_response;
    response.fyi_summaries = fyi_summaries;

    if !response.stats_consistent() {
        warn!(
            reported = ?response.stats,
            "classifier stats disagree with its items, recomputing"
        );
        response.stats = response.computed_stats();
    }
    response
}

/// Combines the classifier partition with heuristic FYI items.
///
/// `ai` is `None` when every unread chat was resolved by heuristics. Heuristic
/// items get ids continuing after the largest id in the partition.
pub fn merge(ai: Option<BriefingResponse>, heuristic: Vec<FyiItem>) -> BriefingResponse {
    let mut response = ai.unwrap_or_else(BriefingResponse::empty);

    let ai_fyi_count = response.fyi_summaries.len() as u32;
    let heuristic_count = heuristic.len() as u32;
    let heuristic_unread = heuristic
        .iter()
        .map(|item| item.unread_count)
        .fold(0u32, u32::saturating_add);

    let mut next_id = response.max_item_id();
    for mut item in heuristic {
        next_id += 1;
        item.id = next_id;
        item.priority = Priority::Fyi;
        response.fyi_summaries.push(item);
    }

    response.stats.fyi_count = ai_fyi_count + heuristic_count;
    response.stats.total_unread = response.stats.total_unread.saturating_add(heuristic_unread);
    response
}
