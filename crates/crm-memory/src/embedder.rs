// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding service: a configured backend behind the exact-match cache.

use std::collections::BTreeMap;
use std::sync::Arc;

use crm_config::model::EmbeddingConfig;
use crm_core::types::EmbeddingInput;
use crm_core::{CrmError, EmbeddingAdapter};
use tracing::{debug, warn};

use crate::cache::EmbeddingCache;

/// Builds a backend from config. `Ok(None)` means the backend is not usable
/// (typically no API key) and embedding is disabled.
pub type EmbedderFactory = Box<
    dyn Fn(&EmbeddingConfig) -> Result<Option<Arc<dyn EmbeddingAdapter>>, CrmError> + Send + Sync,
>;

/// Maps provider identifiers to backend factories.
#[derive(Default)]
pub struct EmbeddingRegistry {
    factories: BTreeMap<String, EmbedderFactory>,
}

impl EmbeddingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `id`, replacing any previous one.
    pub fn register<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&EmbeddingConfig) -> Result<Option<Arc<dyn EmbeddingAdapter>>, CrmError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
        self
    }

    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Resolves `config.provider` into a service.
    ///
    /// An unknown identifier is a configuration error and no factory runs.
    pub fn build(&self, config: &EmbeddingConfig) -> Result<EmbeddingService, CrmError> {
        let factory = self.factories.get(&config.provider).ok_or_else(|| {
            CrmError::Config(format!(
                "unknown embedding provider `{}` (known: {})",
                config.provider,
                self.provider_ids().collect::<Vec<_>>().join(", ")
            ))
        })?;

        match factory(config)? {
            Some(backend) => Ok(EmbeddingService::new(config.provider.clone(), backend)),
            None => {
                warn!(
                    provider = %config.provider,
                    "embedding provider has no API key; knowledge features disabled"
                );
                Ok(EmbeddingService::disabled(config.provider.clone()))
            }
        }
    }
}

/// Text-to-vector conversion with process-lifetime memoization.
pub struct EmbeddingService {
    provider_id: String,
    backend: Option<Arc<dyn EmbeddingAdapter>>,
    cache: EmbeddingCache,
}

impl EmbeddingService {
    pub fn new(provider_id: impl Into<String>, backend: Arc<dyn EmbeddingAdapter>) -> Self {
        Self {
            provider_id: provider_id.into(),
            backend: Some(backend),
            cache: EmbeddingCache::new(),
        }
    }

    /// A service with no backend: every `embed` yields no vector.
    pub fn disabled(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            backend: None,
            cache: EmbeddingCache::new(),
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Embeds `text`.
    ///
    /// Empty text or an unavailable backend yields `Ok(None)`. Backend
    /// failures surface as [`CrmError::Embedding`]. A cache hit never calls
    /// the backend.
    pub async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, CrmError> {
        if text.is_empty() {
            return Ok(None);
        }
        let Some(backend) = &self.backend else {
            debug!(provider = %self.provider_id, "embedding skipped: provider unavailable");
            return Ok(None);
        };

        if let Some(hit) = self.cache.get(&self.provider_id, text) {
            return Ok(Some(hit));
        }

        let output = backend
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await
            .map_err(|e| match e {
                err @ CrmError::Embedding { .. } => err,
                other => CrmError::embedding(
                    format!("{} embedding failed", self.provider_id),
                    other,
                ),
            })?;

        let vector = output.embeddings.into_iter().next().ok_or_else(|| CrmError::Embedding {
            message: format!("{} returned no embedding", self.provider_id),
            source: None,
        })?;

        self.cache.put(&self.provider_id, text, vector.clone());
        Ok(Some(vector))
    }
}
