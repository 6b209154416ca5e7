// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier adapter: turns ambiguous chat contexts into a briefing partition.

use async_trait::async_trait;

use crate::briefing::{BriefingResponse, ChatContext};
use crate::error::BriefError;
use crate::traits::adapter::PluginAdapter;

/// An AI-backed partitioner for chats the heuristics could not decide.
#[async_trait]
pub trait ClassifierAdapter: PluginAdapter {
    /// Partitions `contexts` into needs-response and FYI items.
    ///
    /// `force` bypasses any server-side result cache; `ttl_minutes` bounds it.
    async fn classify(
        &self,
        contexts: Vec<ChatContext>,
        force: bool,
        ttl_minutes: u64,
    ) -> Result<BriefingResponse, BriefError>;

    /// Aborts an in-flight classification. The aborted call returns a
    /// response with `cancelled` set.
    fn cancel(&self) {}
}
