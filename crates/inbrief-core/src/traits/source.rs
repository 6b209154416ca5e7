// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat source adapter: lists chats and fetches recent message windows.

use async_trait::async_trait;

use crate::error::BriefError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Chat, ChatFilters, MessageBatch, MessageFetch};

/// Read-only access to the user's chats.
///
/// Implementations must not mark anything as read.
#[async_trait]
pub trait ChatSource: PluginAdapter {
    /// Lists up to `limit` chats passing `filters`.
    ///
    /// `force` asks any caching layer to go to the underlying transport.
    async fn fetch_chats(
        &self,
        limit: usize,
        filters: &ChatFilters,
        force: bool,
    ) -> Result<Vec<Chat>, BriefError>;

    /// Fetches the most recent messages for each requested chat, oldest first.
    ///
    /// A failure for one chat is reported in its entry and does not fail the batch.
    async fn batch_fetch_messages(
        &self,
        requests: &[MessageFetch],
    ) -> Result<MessageBatch, BriefError>;
}
