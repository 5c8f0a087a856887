// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-lifetime embedding cache.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Memoizes embedding output keyed by `(provider id, verbatim text)`.
///
/// No normalization, no expiry, no eviction: `"hello"` and `"hello "` are
/// distinct keys and entries live as long as the cache.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<(String, String), Vec<f32>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, provider: &str, text: &str) -> Option<Vec<f32>> {
        let found = self
            .entries
            .read()
            .ok()
            .and_then(|map| map.get(&(provider.to_string(), text.to_string())).cloned());
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn put(&self, provider: &str, text: &str, embedding: Vec<f32>) {
        if let Ok(mut map) = self.entries.write() {
            map.insert((provider.to_string(), text.to_string()), embedding);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
