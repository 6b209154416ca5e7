// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by chat sources and classifiers.

use async_trait::async_trait;

use crate::error::BriefError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health, and lifecycle common to every adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Which seam this adapter plugs into.
    fn adapter_type(&self) -> AdapterType;

    /// Reports the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, BriefError> {
        Ok(HealthStatus::Healthy)
    }

    /// Releases any held resources.
    async fn shutdown(&self) -> Result<(), BriefError> {
        Ok(())
    }
}
