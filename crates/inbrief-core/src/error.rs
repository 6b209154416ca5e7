// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Inbrief briefing engine.

use thiserror::Error;

/// The primary error type used across adapter traits and the briefing pipeline.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Configuration errors (invalid TOML, missing credentials, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat or message source errors (disconnected client, fetch failure).
    #[error("source error: {message}")]
    Source {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// AI classifier errors (invalid credential, HTTP failure, network error).
    #[error("classification error: {message}")]
    Classification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Classifier output that boundary validation could not repair.
    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),

    /// A briefing load that ended without data (failed, cancelled, or superseded).
    #[error("briefing {0}")]
    Load(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BriefError {
    /// Builds a [`BriefError::Source`] without an underlying cause.
    pub fn source_error(message: impl Into<String>) -> Self {
        BriefError::Source {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`BriefError::Classification`] without an underlying cause.
    pub fn classification_error(message: impl Into<String>) -> Self {
        BriefError::Classification {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error came from the AI classifier.
    pub fn is_classification(&self) -> bool {
        matches!(self, BriefError::Classification { .. })
    }
}
