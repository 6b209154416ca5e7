// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Inbrief integration tests.
//!
//! Provides mock adapters, fixture builders, and a harness that wires them
//! into a [`BriefingCoordinator`](inbrief_engine::BriefingCoordinator) for
//! fast, deterministic tests without a chat transport or an LLM.
//!
//! # Components
//!
//! - [`MockChatSource`] - In-memory chat list and message windows with call counters
//! - [`MockClassifier`] - Scripted classifier replies with delays, errors, and panics
//! - [`TestHarness`] - Coordinator assembled over both mocks

pub mod fixtures;
pub mod harness;
pub mod mock_classifier;
pub mod mock_source;

pub use harness::TestHarness;
pub use mock_classifier::MockClassifier;
pub use mock_source::MockChatSource;
