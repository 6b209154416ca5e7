// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The briefing cache coordinator.
//!
//! Owns the cached [`BriefingResponse`] and serializes loads against it:
//! concurrent non-forced loads share one in-flight task, forced loads
//! supersede older ones, and only the newest load may commit.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant as StdInstant};

use futures::FutureExt;
use inbrief_config::InbriefConfig;
use inbrief_core::{BriefError, BriefingResponse, ChatSource, ClassifierAdapter, PluginAdapter};
use inbrief_heuristics::HeuristicPolicy;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::chat_cache::CachedChatSource;
use crate::pipeline::{BriefingPipeline, PipelineOutcome};
use crate::state::{lock, CacheState, InFlight, LoadEpoch, LoadOutcome, LoadRequest, SharedLoad};

/// Point-in-time view of the coordinator state.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefingSnapshot {
    pub data: Option<BriefingResponse>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    pub last_filters_hash: Option<String>,
    /// Time since the cached briefing was committed.
    pub age: Option<Duration>,
}

struct Inner {
    state: Arc<Mutex<CacheState>>,
    pipeline: BriefingPipeline,
    chat_cache: Arc<CachedChatSource>,
    classifier: Arc<dyn ClassifierAdapter>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        lock(&self.state)
    }
}

/// Cheaply cloneable handle to the shared briefing cache.
#[derive(Clone)]
pub struct BriefingCoordinator {
    inner: Arc<Inner>,
}

impl BriefingCoordinator {
    /// Builds a coordinator over `source` and `classifier` using the
    /// heuristics, briefing, and source settings from `config`.
    pub fn new(
        source: Arc<dyn ChatSource>,
        classifier: Arc<dyn ClassifierAdapter>,
        config: &InbriefConfig,
    ) -> Self {
        let chat_cache = Arc::new(CachedChatSource::new(
            source,
            Duration::from_secs(config.source.chat_cache_ttl_secs),
        ));
        let pipeline = BriefingPipeline::new(
            Arc::clone(&chat_cache) as Arc<dyn ChatSource>,
            Arc::clone(&classifier),
            HeuristicPolicy::from_config(config),
            config.briefing.chat_limit,
        );
        Self {
            inner: Arc::new(Inner {
                state: Arc::new(Mutex::new(CacheState::new())),
                pipeline,
                chat_cache,
                classifier,
            }),
        }
    }

    /// Loads the briefing, honoring the TTL and in-flight deduplication
    /// unless `request.force` is set.
    ///
    /// Never returns an error: failures are stored on the coordinator and
    /// reported as [`LoadOutcome::Failed`].
    pub async fn load_briefing(&self, request: LoadRequest) -> LoadOutcome {
        let filters_hash = request.filters.fingerprint();
        let handle = {
            let mut state = self.inner.lock_state();
            let joinable = state
                .in_flight
                .as_ref()
                .filter(|_| !request.force)
                .map(|in_flight| (in_flight.generation, in_flight.handle.clone()));

            match joinable {
                Some((generation, handle)) => {
                    debug!(generation, "joining in-flight briefing load");
                    handle
                }
                None if !request.force
                    && !state.should_refresh(request.ttl_minutes, Some(&filters_hash)) =>
                {
                    debug!(generation = state.generation, "briefing cache is fresh");
                    return LoadOutcome::CacheHit;
                }
                None => self.start_load(&mut state, request, filters_hash),
            }
        };
        handle.await
    }

    /// Starts a load in the background and logs how it ended.
    pub fn prefetch(&self, request: LoadRequest) -> JoinHandle<LoadOutcome> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let outcome = coordinator.load_briefing(request).await;
            match &outcome {
                LoadOutcome::Failed(error) => {
                    warn!(%error, "background briefing prefetch failed");
                }
                other => debug!(outcome = ?other, "background briefing prefetch finished"),
            }
            outcome
        })
    }

    /// Whether a load should go past the cache.
    ///
    /// True when nothing is cached, `filters_hash` differs from the cached
    /// one, or the cached briefing is at least `ttl_minutes` old.
    pub fn should_refresh(&self, ttl_minutes: u64, filters_hash: Option<&str>) -> bool {
        self.inner
            .lock_state()
            .should_refresh(ttl_minutes, filters_hash)
    }

    /// Removes a chat from the needs-response list. Returns whether the
    /// cached briefing changed.
    ///
    /// A removal made while a load is running is re-applied to that load's
    /// result.
    pub fn remove_item(&self, chat_id: i64) -> bool {
        let removed = self.inner.lock_state().remove_item(chat_id);
        debug!(chat_id, removed, "removed briefing item");
        removed
    }

    /// Resets all state and cancels any in-flight classification.
    ///
    /// Loads already running finish as [`LoadOutcome::Superseded`].
    pub fn clear(&self) {
        self.inner.lock_state().reset();
        self.inner.chat_cache.invalidate();
        self.inner.classifier.cancel();
        info!("briefing cache cleared");
    }

    /// Cancels the in-flight classification, keeping the previous briefing.
    pub fn cancel(&self) {
        self.inner.classifier.cancel();
    }

    /// Clears state and shuts down the adapters.
    pub async fn shutdown(&self) -> Result<(), BriefError> {
        self.clear();
        self.inner.classifier.shutdown().await?;
        self.inner.chat_cache.shutdown().await
    }

    pub fn data(&self) -> Option<BriefingResponse> {
        self.inner.lock_state().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock_state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.lock_state().error.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock_state().generation
    }

    pub fn snapshot(&self) -> BriefingSnapshot {
        let state = self.inner.lock_state();
        BriefingSnapshot {
            data: state.data.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            generation: state.generation,
            last_filters_hash: state.last_filters_hash.clone(),
            age: state.last_loaded_at.map(|at| at.elapsed()),
        }
    }

    fn start_load(
        &self,
        state: &mut CacheState,
        request: LoadRequest,
        filters_hash: String,
    ) -> SharedLoad {
        state.generation += 1;
        state.is_loading = true;
        let generation = state.generation;
        let epoch = LoadEpoch::new(state.lineage, generation, Arc::clone(&self.inner.state));
        info!(generation, force = request.force, "starting briefing load");

        let task = tokio::spawn(run_load(
            Arc::clone(&self.inner),
            request,
            filters_hash,
            epoch,
        ));
        let handle = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(error) => LoadOutcome::Failed(format!("briefing task aborted: {error}")),
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some(InFlight {
            generation,
            handle: handle.clone(),
        });
        handle
    }
}

async fn run_load(
    inner: Arc<Inner>,
    request: LoadRequest,
    filters_hash: String,
    epoch: LoadEpoch,
) -> LoadOutcome {
    let generation = epoch.generation();
    let started = StdInstant::now();
    let result = AssertUnwindSafe(inner.pipeline.run(&request, &epoch))
        .catch_unwind()
        .await;

    let committed = match result {
        Ok(Ok(PipelineOutcome::Completed(response))) => epoch
            .commit(move |state| {
                let mut response = response;
                state.apply_pending_removals(&mut response);
                state.data = Some(response);
                state.last_loaded_at = Some(Instant::now());
                state.last_filters_hash = Some(filters_hash);
                state.error = None;
                state.finish_load();
            })
            .map(|()| LoadOutcome::Loaded),
        Ok(Ok(PipelineOutcome::Cancelled)) => epoch
            .commit(CacheState::finish_load)
            .map(|()| LoadOutcome::Cancelled),
        Ok(Ok(PipelineOutcome::Superseded)) => None,
        Ok(Err(error)) => record_failure(&epoch, error.to_string()),
        Err(payload) => record_failure(
            &epoch,
            format!("briefing load panicked: {}", panic_message(&*payload)),
        ),
    };
    let outcome = committed.unwrap_or(LoadOutcome::Superseded);

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        LoadOutcome::Failed(message) => {
            error!(generation, elapsed_ms, error = %message, "briefing load failed")
        }
        other => info!(generation, elapsed_ms, outcome = ?other, "briefing load finished"),
    }
    outcome
}

fn record_failure(epoch: &LoadEpoch, message: String) -> Option<LoadOutcome> {
    epoch.commit(|state| {
        state.error = Some(message.clone());
        state.finish_load();
        LoadOutcome::Failed(message)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
