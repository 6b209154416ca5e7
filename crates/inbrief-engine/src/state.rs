// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache state, load requests and outcomes, and the generation guard.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use inbrief_config::InbriefConfig;
use inbrief_core::{BriefingResponse, ChatFilters};
use tokio::time::Instant;

/// Parameters of one briefing load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub filters: ChatFilters,
    /// Bypass the briefing TTL, in-flight deduplication, and every cache layer.
    pub force: bool,
    pub ttl_minutes: u64,
}

impl LoadRequest {
    pub fn new(filters: ChatFilters, ttl_minutes: u64) -> Self {
        Self {
            filters,
            force: false,
            ttl_minutes,
        }
    }

    /// Default filters with the configured TTL.
    pub fn from_config(config: &InbriefConfig) -> Self {
        Self::new(ChatFilters::default(), config.briefing.ttl_minutes)
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// How a `load_briefing` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fresh briefing was committed.
    Loaded,
    /// The cached briefing was still fresh; nothing was fetched.
    CacheHit,
    /// A newer load (or a clear) replaced this one; its result was discarded.
    Superseded,
    /// The classifier call was cancelled; the previous briefing is kept.
    Cancelled,
    /// The load failed; the message is also stored as the coordinator error.
    Failed(String),
}

pub(crate) type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

pub(crate) struct InFlight {
    pub(crate) generation: u64,
    pub(crate) handle: SharedLoad,
}

pub(crate) struct CacheState {
    pub(crate) data: Option<BriefingResponse>,
    pub(crate) last_loaded_at: Option<Instant>,
    pub(crate) last_filters_hash: Option<String>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) generation: u64,
    /// Bumped by every reset so loads started before a clear can never commit,
    /// even after `generation` restarts from zero.
    pub(crate) lineage: u64,
    pub(crate) in_flight: Option<InFlight>,
    /// Chats removed while a load was running; re-applied to its result.
    pub(crate) pending_removals: HashSet<i64>,
}

impl CacheState {
    pub(crate) fn new() -> Self {
        Self {
            data: None,
            last_loaded_at: None,
            last_filters_hash: None,
            is_loading: false,
            error: None,
            generation: 0,
            lineage: 0,
            in_flight: None,
            pending_removals: HashSet::new(),
        }
    }

    pub(crate) fn should_refresh(&self, ttl_minutes: u64, filters_hash: Option<&str>) -> bool {
        let Some(loaded_at) = self.last_loaded_at else {
            return true;
        };
        if self.data.is_none() {
            return true;
        }
        if let Some(hash) = filters_hash {
            if self.last_filters_hash.as_deref() != Some(hash) {
                return true;
            }
        }
        loaded_at.elapsed() >= Duration::from_secs(ttl_minutes.saturating_mul(60))
    }

    /// Removes `chat_id` from the needs-response list, keeping stats consistent.
    pub(crate) fn remove_item(&mut self, chat_id: i64) -> bool {
        if self.is_loading {
            self.pending_removals.insert(chat_id);
        }
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        remove_needs_item(data, chat_id)
    }

    pub(crate) fn apply_pending_removals(&mut self, response: &mut BriefingResponse) {
        for chat_id in self.pending_removals.drain() {
            remove_needs_item(response, chat_id);
        }
    }

    pub(crate) fn finish_load(&mut self) {
        self.is_loading = false;
        self.in_flight = None;
        self.pending_removals.clear();
    }

    pub(crate) fn reset(&mut self) {
        let lineage = self.lineage.wrapping_add(1);
        *self = Self::new();
        self.lineage = lineage;
    }
}

fn remove_needs_item(response: &mut BriefingResponse, chat_id: i64) -> bool {
    let before = response.needs_response.len();
    response.needs_response.retain(|item| item.chat_id != chat_id);
    let removed = response.needs_response.len() != before;
    if removed {
        response.stats = response.computed_stats();
    }
    removed
}

pub(crate) fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identity of one load. Stale epochs never write to the cache state.
#[derive(Clone)]
pub(crate) struct LoadEpoch {
    lineage: u64,
    generation: u64,
    state: Arc<Mutex<CacheState>>,
}

impl LoadEpoch {
    pub(crate) fn new(lineage: u64, generation: u64, state: Arc<Mutex<CacheState>>) -> Self {
        Self {
            lineage,
            generation,
            state,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn is_current(&self) -> bool {
        let state = lock(&self.state);
        self.matches(&state)
    }

    /// Applies `f` if this load is still current. Returns `None` when stale.
    pub(crate) fn commit<R>(&self, f: impl FnOnce(&mut CacheState) -> R) -> Option<R> {
        let mut state = lock(&self.state);
        if self.matches(&state) {
            Some(f(&mut state))
        } else {
            None
        }
    }

    fn matches(&self, state: &CacheState) -> bool {
        state.lineage == self.lineage && state.generation == self.generation
    }
}
