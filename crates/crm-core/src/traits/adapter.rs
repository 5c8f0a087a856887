// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all plugin adapters must implement.

use async_trait::async_trait;

use crate::error::CrmError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all adapters (embedding, provider, storage).
///
/// Provides identity, lifecycle, and health check capabilities. The
/// adapter name doubles as the provider identifier used in cache keys.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the identifier of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, CrmError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), CrmError>;
}
