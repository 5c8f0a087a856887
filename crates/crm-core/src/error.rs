// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the CRM agent.

use thiserror::Error;

/// The primary error type used across all adapter traits and memory operations.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Configuration errors (invalid TOML, unknown provider, bad thresholds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Embedding backend errors (authentication, network, malformed response).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text-generation provider errors (API failure, empty response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The summary-then-delete archive sequence could not complete.
    ///
    /// Raised before any interaction is deleted.
    #[error("archive error: {message}")]
    Archive {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Requested adapter was not found in the registry.
    #[error("adapter not found: {adapter_type}/{name}")]
    AdapterNotFound { adapter_type: String, name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CrmError {
    /// Wraps any error as an embedding failure.
    pub fn embedding<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CrmError::Embedding {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CrmError::Storage {
            source: Box::new(source),
        }
    }

    /// True for failures of the embedding backend ("embeddings unavailable").
    pub fn is_embedding(&self) -> bool {
        matches!(self, CrmError::Embedding { .. })
    }

    /// True for failures of the text-generation provider.
    pub fn is_provider(&self) -> bool {
        matches!(self, CrmError::Provider { .. })
    }

    /// True when the archive sequence aborted without deleting anything.
    pub fn is_archive(&self) -> bool {
        matches!(self, CrmError::Archive { .. })
    }
}
