// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inbrief brief`: build and print a briefing from a chat snapshot.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use inbrief_config::InbriefConfig;
use inbrief_core::{
    BriefError, BriefingResponse, ChatFilters, ChatSource, ClassifierAdapter, Priority,
};
use inbrief_engine::{BriefingCoordinator, LoadOutcome, LoadRequest};
use inbrief_openai::OpenAiClassifier;

use crate::snapshot::SnapshotSource;

/// Arguments of the `brief` subcommand.
#[derive(Args, Debug)]
pub struct BriefArgs {
    /// JSON snapshot with `chats` and per-chat `messages`.
    #[arg(long)]
    pub chats: PathBuf,

    /// Bypass every cache layer.
    #[arg(long)]
    pub force: bool,

    /// Override `briefing.ttl_minutes`.
    #[arg(long)]
    pub ttl_minutes: Option<u64>,

    /// Print the briefing as JSON.
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub no_private: bool,

    #[arg(long)]
    pub no_groups: bool,

    #[arg(long)]
    pub no_supergroups: bool,

    #[arg(long)]
    pub no_channels: bool,

    #[arg(long)]
    pub min_members: Option<u32>,

    #[arg(long)]
    pub max_members: Option<u32>,

    /// Restrict to a folder id. Repeatable.
    #[arg(long = "folder")]
    pub folders: Vec<i32>,
}

impl BriefArgs {
    fn filters(&self) -> ChatFilters {
        ChatFilters {
            include_private: !self.no_private,
            include_groups: !self.no_groups,
            include_supergroups: !self.no_supergroups,
            include_channels: !self.no_channels,
            min_members: self.min_members,
            max_members: self.max_members,
            folder_ids: self.folders.clone(),
        }
    }
}

/// Runs one briefing load and prints the result to stdout.
pub async fn run_brief(config: &InbriefConfig, args: &BriefArgs) -> Result<(), BriefError> {
    let source = SnapshotSource::load(&args.chats)?;
    info!(chats = source.chat_count(), path = %args.chats.display(), "snapshot loaded");
    let classifier = OpenAiClassifier::new(&config.llm)?;

    let coordinator = BriefingCoordinator::new(
        Arc::new(source) as Arc<dyn ChatSource>,
        Arc::new(classifier) as Arc<dyn ClassifierAdapter>,
        config,
    );

    let mut request = LoadRequest::new(
        args.filters(),
        args.ttl_minutes.unwrap_or(config.briefing.ttl_minutes),
    );
    request.force = args.force;

    let outcome = coordinator.load_briefing(request).await;
    let result = loaded_briefing(&coordinator, outcome).and_then(|briefing| {
        if args.json {
            let json = serde_json::to_string_pretty(&briefing)
                .map_err(|e| BriefError::Internal(format!("failed to serialize briefing: {e}")))?;
            println!("{json}");
        } else {
            print!("{}", render_briefing(&briefing));
        }
        Ok(())
    });

    if let Err(e) = coordinator.shutdown().await {
        warn!(error = %e, "adapter shutdown failed");
    }
    result
}

/// The coordinator's briefing after `outcome`, or why there is none.
fn loaded_briefing(
    coordinator: &BriefingCoordinator,
    outcome: LoadOutcome,
) -> Result<BriefingResponse, BriefError> {
    match outcome {
        LoadOutcome::Loaded | LoadOutcome::CacheHit => coordinator
            .data()
            .ok_or_else(|| BriefError::Load("load produced no data".to_string())),
        LoadOutcome::Cancelled => Err(BriefError::Load("cancelled".to_string())),
        LoadOutcome::Superseded => Err(BriefError::Load("superseded by another load".to_string())),
        LoadOutcome::Failed(message) => Err(BriefError::Load(format!("failed: {message}"))),
    }
}

/// Plain-text rendering of a briefing.
pub fn render_briefing(briefing: &BriefingResponse) -> String {
    let mut out = String::new();
    if briefing.is_empty() {
        out.push_str("All caught up.\n");
        return out;
    }

    if !briefing.needs_response.is_empty() {
        let _ = writeln!(out, "Needs response ({})", briefing.needs_response.len());
        for item in &briefing.needs_response {
            let tag = match item.priority {
                Priority::Urgent => "URGENT",
                _ => "reply",
            };
            let _ = writeln!(
                out,
                "  [{tag}] {} ({} unread): {}",
                item.chat_name, item.unread_count, item.summary
            );
            if let Some(reply) = &item.suggested_reply {
                let _ = writeln!(out, "      suggested: {reply}");
            }
        }
    }

    if !briefing.fyi_summaries.is_empty() {
        let _ = writeln!(out, "FYI ({})", briefing.fyi_summaries.len());
        for item in &briefing.fyi_summaries {
            let _ = writeln!(
                out,
                "  {} ({} unread): {}",
                item.chat_name, item.unread_count, item.summary
            );
        }
    }

    let _ = write!(out, "{} unread total", briefing.stats.total_unread);
    if let Some(age) = &briefing.cache_age {
        let _ = write!(out, ", cached {age}");
    }
    out.push('\n');
    out
}
