// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the briefing engine.
//!
//! Both adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can sit behind `Arc<dyn _>`.

pub mod adapter;
pub mod classifier;
pub mod source;

pub use adapter::PluginAdapter;
pub use classifier::ClassifierAdapter;
pub use source::ChatSource;
