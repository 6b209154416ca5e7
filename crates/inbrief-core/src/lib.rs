// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Inbrief briefing engine.
//!
//! Holds the chat and briefing data model, the shared error type, and the
//! adapter traits implemented by chat sources and classifiers.

pub mod briefing;
pub mod error;
pub mod traits;
pub mod types;

pub use briefing::{
    BriefingResponse, BriefingStats, ChatContext, ContextMessage, FyiItem, NeedsResponseItem,
    Priority,
};
pub use error::BriefError;
pub use types::{
    AdapterType, Chat, ChatFilters, ChatKind, HealthStatus, ItemChatType, LastMessage, Message,
    MessageBatch, MessageContent, MessageFetch,
};

pub use traits::{ChatSource, ClassifierAdapter, PluginAdapter};
