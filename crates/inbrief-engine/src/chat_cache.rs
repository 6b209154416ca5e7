// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived chat-list cache in front of a [`ChatSource`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use inbrief_core::{
    AdapterType, BriefError, Chat, ChatFilters, ChatSource, HealthStatus, MessageBatch,
    MessageFetch, PluginAdapter,
};
use tokio::time::Instant;
use tracing::debug;

type CacheKey = (usize, String);

/// Reuses chat lists for `ttl`, keyed by limit and filters fingerprint.
///
/// Message fetches always pass through. A forced fetch bypasses and refreshes
/// the entry.
pub struct CachedChatSource {
    inner: Arc<dyn ChatSource>,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, Vec<Chat>)>>,
}

impl CachedChatSource {
    pub fn new(inner: Arc<dyn ChatSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every cached chat list.
    pub fn invalidate(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lookup(&self, key: &CacheKey) -> Option<Vec<Chat>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, chats)| chats.clone())
    }
}

#[async_trait]
impl PluginAdapter for CachedChatSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn version(&self) -> semver::Version {
        self.inner.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, BriefError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), BriefError> {
        self.invalidate();
        self.inner.shutdown().await
    }
}

#[async_trait]
impl ChatSource for CachedChatSource {
    async fn fetch_chats(
        &self,
        limit: usize,
        filters: &ChatFilters,
        force: bool,
    ) -> Result<Vec<Chat>, BriefError> {
        let key = (limit, filters.fingerprint());
        if !force {
            if let Some(chats) = self.lookup(&key) {
                debug!(limit, count = chats.len(), "chat list cache hit");
                return Ok(chats);
            }
        }

        let chats = self.inner.fetch_chats(limit, filters, force).await?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, (Instant::now(), chats.clone()));
        Ok(chats)
    }

    async fn batch_fetch_messages(
        &self,
        requests: &[MessageFetch],
    ) -> Result<MessageBatch, BriefError> {
        self.inner.batch_fetch_messages(requests).await
    }
}
