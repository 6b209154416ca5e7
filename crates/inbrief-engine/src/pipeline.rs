// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The briefing pipeline: fetch, pre-classify, classify, validate, merge.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use inbrief_core::{
    BriefError, BriefingResponse, Chat, ChatContext, ChatKind, ChatSource, ClassifierAdapter,
    ContextMessage, Message, MessageFetch,
};
use inbrief_heuristics::{
    compute_hours_since, detect_question, is_uninvolved, last_message_preview, HeuristicPolicy,
};
use tracing::{debug, info, warn};

use crate::aggregate::{merge, validate_partition};
use crate::state::{LoadEpoch, LoadRequest};

pub(crate) enum PipelineOutcome {
    Completed(BriefingResponse),
    Superseded,
    Cancelled,
}

pub(crate) struct BriefingPipeline {
    source: Arc<dyn ChatSource>,
    classifier: Arc<dyn ClassifierAdapter>,
    policy: HeuristicPolicy,
    chat_limit: usize,
}

impl BriefingPipeline {
    pub(crate) fn new(
        source: Arc<dyn ChatSource>,
        classifier: Arc<dyn ClassifierAdapter>,
        policy: HeuristicPolicy,
        chat_limit: usize,
    ) -> Self {
        Self {
            source,
            classifier,
            policy,
            chat_limit,
        }
    }

    pub(crate) async fn run(
        &self,
        request: &LoadRequest,
        epoch: &LoadEpoch,
    ) -> Result<PipelineOutcome, BriefError> {
        let generation = epoch.generation();
        let chats = self
            .source
            .fetch_chats(self.chat_limit, &request.filters, request.force)
            .await?;
        if !epoch.is_current() {
            return Ok(PipelineOutcome::Superseded);
        }

        let unread: Vec<Chat> = chats.into_iter().filter(|c| c.unread_count > 0).collect();
        if unread.is_empty() {
            info!(generation, "no unread chats");
            return Ok(PipelineOutcome::Completed(BriefingResponse::empty()));
        }

        let (large, remaining): (Vec<Chat>, Vec<Chat>) = unread
            .into_iter()
            .partition(|chat| self.policy.is_large_group(chat));
        let mut heuristic: Vec<_> = large
            .iter()
            .map(|chat| self.policy.large_group_fyi(chat))
            .collect();
        debug!(
            generation,
            large_groups = large.len(),
            remaining = remaining.len(),
            "pre-classified large groups"
        );

        if remaining.is_empty() {
            return Ok(PipelineOutcome::Completed(merge(None, heuristic)));
        }

        let requests: Vec<MessageFetch> = remaining
            .iter()
            .map(|chat| MessageFetch {
                chat_id: chat.id,
                limit: self.policy.batch_size(chat.unread_count),
            })
            .collect();
        let mut batch = self.source.batch_fetch_messages(&requests).await?;
        if !epoch.is_current() {
            return Ok(PipelineOutcome::Superseded);
        }

        let now = Utc::now().timestamp();
        let mut contexts = Vec::with_capacity(remaining.len());
        let mut uninvolved = 0usize;
        for chat in &remaining {
            let window = match batch.remove(&chat.id) {
                Some(Ok(messages)) => messages,
                Some(Err(error)) => {
                    warn!(chat_id = chat.id, %error, "message fetch failed, classifying without history");
                    contexts.push(self.build_context(chat, &[], now));
                    continue;
                }
                None => {
                    warn!(chat_id = chat.id, "no messages returned, classifying without history");
                    contexts.push(self.build_context(chat, &[], now));
                    continue;
                }
            };

            if is_uninvolved(chat, &window) {
                uninvolved += 1;
                heuristic.push(self.policy.uninvolved_fyi(chat, &window));
            } else {
                contexts.push(self.build_context(chat, &window, now));
            }
        }
        debug!(
            generation,
            uninvolved,
            ambiguous = contexts.len(),
            "pre-classified uninvolved chats"
        );

        if contexts.is_empty() {
            return Ok(PipelineOutcome::Completed(merge(None, heuristic)));
        }

        let submitted: HashSet<i64> = contexts.iter().map(|c| c.chat_id).collect();
        let response = self
            .classifier
            .classify(contexts, request.force, request.ttl_minutes)
            .await?;
        if !epoch.is_current() {
            return Ok(PipelineOutcome::Superseded);
        }
        if response.cancelled {
            info!(generation, "classification cancelled");
            return Ok(PipelineOutcome::Cancelled);
        }

        let validated = validate_partition(response, &submitted);
        Ok(PipelineOutcome::Completed(merge(Some(validated), heuristic)))
    }

    fn build_context(&self, chat: &Chat, window: &[Message], now: i64) -> ChatContext {
        let (last_message, last_message_date) =
            last_message_preview(chat, window, self.policy.last_message_max_chars);
        ChatContext {
            chat_id: chat.id,
            chat_title: chat.title.clone(),
            chat_type: chat.kind.item_type(),
            messages: window.iter().map(context_message).collect(),
            unread_count: chat.unread_count,
            last_message_is_outgoing: window.last().is_some_and(|m| m.is_outgoing),
            has_unanswered_question: detect_question(window),
            hours_since_last_activity: compute_hours_since(window, now),
            is_private_chat: chat.kind == ChatKind::Private,
            last_message,
            last_message_date,
        }
    }
}

fn context_message(message: &Message) -> ContextMessage {
    ContextMessage {
        id: message.id,
        sender_name: message.sender_name.clone(),
        text: message.content.render(),
        date: message.date,
        is_outgoing: message.is_outgoing,
        is_mentioned: message.is_mentioned,
    }
}
