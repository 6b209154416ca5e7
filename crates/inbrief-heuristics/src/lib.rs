// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic pre-classification for the briefing pipeline.
//!
//! Decides, without any network call, which unread chats can be labeled FYI
//! outright and computes the signals handed to the AI classifier for the rest.

pub mod policy;
pub mod preview;
pub mod signals;

pub use policy::{large_group_summary, uninvolved_summary, HeuristicPolicy};
pub use preview::{format_message_date, last_message_preview, truncate_preview};
pub use signals::{compute_hours_since, detect_question, is_uninvolved, IDLE_SENTINEL_HOURS};
