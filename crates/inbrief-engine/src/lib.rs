// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Briefing engine for Inbrief.
//!
//! Turns the user's unread chats into a [`BriefingResponse`](inbrief_core::BriefingResponse):
//! zero-cost heuristics pre-classify what they can, the classifier handles
//! the rest, and the [`BriefingCoordinator`] caches the merged result with
//! TTL, filter-change invalidation, in-flight deduplication, and
//! generation-based supersession.

pub mod aggregate;
pub mod chat_cache;
pub mod coordinator;
mod pipeline;
mod state;

pub use aggregate::{merge, validate_partition};
pub use chat_cache::CachedChatSource;
pub use coordinator::{BriefingCoordinator, BriefingSnapshot};
pub use state::{LoadOutcome, LoadRequest};
