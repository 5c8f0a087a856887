// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge store with exact linear-scan cosine search.
//!
//! Every query embeds the text once and scores it against every stored
//! vector: O(n) per query, no index.

use std::sync::Arc;

use crm_core::types::KnowledgeDocument;
use crm_core::{CrmError, Metadata, StorageAdapter};
use tracing::debug;

use crate::embedder::EmbeddingService;
use crate::types::{ScoredDocument, cosine_similarity};

pub struct KnowledgeStore {
    storage: Arc<dyn StorageAdapter>,
    embeddings: Arc<EmbeddingService>,
}

impl KnowledgeStore {
    pub fn new(storage: Arc<dyn StorageAdapter>, embeddings: Arc<EmbeddingService>) -> Self {
        Self {
            storage,
            embeddings,
        }
    }

    /// Embeds and persists a document.
    ///
    /// Returns `Ok(None)` and writes nothing when no vector is produced.
    /// Embedding failures propagate and also write nothing.
    pub async fn add(&self, content: &str, metadata: Metadata) -> Result<Option<i64>, CrmError> {
        let Some(embedding) = self.embeddings.embed(content).await? else {
            debug!("knowledge document not stored: no embedding available");
            return Ok(None);
        };
        let id = self
            .storage
            .insert_document(content, &embedding, &metadata)
            .await?;
        debug!(id, dimensions = embedding.len(), "knowledge document stored");
        Ok(Some(id))
    }

    /// Returns at most `limit` documents with similarity >= `threshold`,
    /// best first. Equal scores keep storage order.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<ScoredDocument>, CrmError> {
        let Some(query_embedding) = self.embeddings.embed(query).await? else {
            return Ok(Vec::new());
        };

        let documents = self.storage.list_documents().await?;
        let scanned = documents.len();

        let mut results: Vec<ScoredDocument> = documents
            .into_iter()
            .filter_map(|doc| {
                let similarity = cosine_similarity(&query_embedding, &doc.embedding);
                (similarity >= threshold).then(|| ScoredDocument {
                    id: doc.id,
                    content: doc.content,
                    metadata: doc.metadata,
                    similarity,
                })
            })
            .collect();

        // `sort_by` is stable, so ties stay in storage order.
        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(limit);

        debug!(scanned, matched = results.len(), threshold, "knowledge search");
        Ok(results)
    }

    pub async fn get(&self, id: i64) -> Result<Option<KnowledgeDocument>, CrmError> {
        self.storage.get_document(id).await
    }

    /// True iff a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, CrmError> {
        self.storage.delete_document(id).await
    }

    pub async fn count(&self) -> Result<usize, CrmError> {
        self.storage.count_documents().await
    }
}
