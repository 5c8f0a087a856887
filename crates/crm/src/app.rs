// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide wiring: one store handle, one embedding service, and the
//! optional generation provider, opened at startup and closed at exit.

use std::sync::Arc;

use crm_agent::ConversationAgent;
use crm_config::CrmConfig;
use crm_core::{CrmError, EmbeddingAdapter, ProviderAdapter, StorageAdapter};
use crm_gemini::GeminiEmbedder;
use crm_memory::{EmbeddingRegistry, EmbeddingService, KnowledgeStore, LongTermMemory};
use crm_openai::{OpenAiEmbedder, OpenAiProvider};
use crm_storage::SqliteStorage;
use tracing::info;

pub struct App {
    pub config: CrmConfig,
    pub storage: Arc<dyn StorageAdapter>,
    pub embeddings: Arc<EmbeddingService>,
    pub provider: Option<Arc<dyn ProviderAdapter>>,
}

impl App {
    pub async fn open(config: CrmConfig) -> Result<Self, CrmError> {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        info!(path = %storage.path(), "storage opened");

        let embeddings = Arc::new(embedding_registry().build(&config.embedding)?);
        let provider = OpenAiProvider::from_config(&config.generation)?
            .map(|p| Arc::new(p) as Arc<dyn ProviderAdapter>);

        Ok(Self {
            config,
            storage: Arc::new(storage),
            embeddings,
            provider,
        })
    }

    pub fn agent(&self) -> ConversationAgent {
        ConversationAgent::new(
            &self.config,
            Arc::clone(&self.storage),
            Arc::clone(&self.embeddings),
            self.provider.clone(),
        )
    }

    pub fn knowledge(&self) -> KnowledgeStore {
        KnowledgeStore::new(Arc::clone(&self.storage), Arc::clone(&self.embeddings))
    }

    pub fn long_term(&self) -> LongTermMemory {
        LongTermMemory::new(Arc::clone(&self.storage), &self.config.memory)
    }

    pub async fn close(&self) -> Result<(), CrmError> {
        let (hits, misses) = self.embeddings.cache().stats();
        info!(hits, misses, "embedding cache");
        self.storage.close().await
    }
}

/// Every embedding backend this binary can construct.
pub fn embedding_registry() -> EmbeddingRegistry {
    EmbeddingRegistry::new()
        .register("openai", |config| {
            Ok(OpenAiEmbedder::from_config(config)?
                .map(|e| Arc::new(e) as Arc<dyn EmbeddingAdapter>))
        })
        .register("gemini", |config| {
            Ok(GeminiEmbedder::from_config(config)?
                .map(|e| Arc::new(e) as Arc<dyn EmbeddingAdapter>))
        })
}
