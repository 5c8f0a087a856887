// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crm_core::traits::{EmbeddingAdapter, PluginAdapter};
use crm_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use crm_core::CrmError;

const DEFAULT_VOCABULARY: &[&str] = &[
    "billing", "contract", "demo", "discount", "hours", "invoice", "meeting", "onboarding",
    "plan", "plans", "pricing", "refund", "renewal", "support", "trial",
];

/// Embeds text as word counts over a fixed vocabulary, one dimension per
/// word. Matching is case-insensitive; other words are ignored.
pub struct MockEmbedder {
    index: HashMap<String, usize>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::with_vocabulary(DEFAULT_VOCABULARY)
    }

    pub fn with_vocabulary(words: &[&str]) -> Self {
        let mut index = HashMap::new();
        for word in words {
            let next = index.len();
            index.entry(word.to_lowercase()).or_insert(next);
        }
        Self {
            index,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Number of `embed` calls that reached this backend.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes subsequent calls fail with an embedding error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn dimensions(&self) -> usize {
        self.index.len()
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.index.len()];
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            if let Some(&i) = self.index.get(&word.to_lowercase()) {
                v[i] += 1.0;
            }
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, CrmError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CrmError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CrmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CrmError::Embedding {
                message: "mock embedder unavailable".into(),
                source: None,
            });
        }
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| self.vectorize(t)).collect(),
            dimensions: self.dimensions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_known_words_case_insensitively() {
        let embedder = MockEmbedder::with_vocabulary(&["pricing", "demo"]);
        assert_eq!(embedder.vectorize("Pricing? pricing and a DEMO"), vec![2.0, 1.0]);
        assert_eq!(embedder.vectorize("nothing relevant"), vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn failing_switch_and_call_count() {
        let embedder = MockEmbedder::new();
        embedder.set_failing(true);
        let err = embedder
            .embed(EmbeddingInput {
                texts: vec!["demo".into()],
            })
            .await
            .unwrap_err();
        assert!(err.is_embedding());
        assert_eq!(embedder.calls(), 1);
    }
}
