// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end test harness.
//!
//! `TestHarness` wires a temp SQLite database (behind [`FaultyStorage`]),
//! the mock embedder and provider, and a [`ConversationAgent`] with a
//! session already started for one contact.

use std::sync::Arc;

use crm_agent::{ConversationAgent, ProcessOutcome};
use crm_config::CrmConfig;
use crm_config::model::{MemoryConfig, StorageConfig};
use crm_core::types::NewContact;
use crm_core::{CrmError, ProviderAdapter, StorageAdapter};
use crm_memory::EmbeddingService;
use crm_storage::SqliteStorage;

use crate::faulty_storage::FaultyStorage;
use crate::mock_embedder::MockEmbedder;
use crate::mock_provider::MockProvider;

pub struct TestHarnessBuilder {
    responses: Vec<String>,
    with_provider: bool,
    memory: MemoryConfig,
    system_prompt: Option<String>,
    embedder: Option<MockEmbedder>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            with_provider: true,
            memory: MemoryConfig::default(),
            system_prompt: None,
            embedder: None,
        }
    }

    /// Queues replies for the mock provider.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Builds the agent with no generation provider.
    pub fn without_provider(mut self) -> Self {
        self.with_provider = false;
        self
    }

    pub fn with_memory(mut self, memory: MemoryConfig) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_embedder(mut self, embedder: MockEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub async fn build(self) -> Result<TestHarness, CrmError> {
        let temp_dir = tempfile::TempDir::new().map_err(CrmError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let sqlite = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        sqlite.initialize().await?;
        let storage = Arc::new(FaultyStorage::new(Arc::new(sqlite)));

        let contact_id = storage
            .create_contact(&NewContact {
                company: Some("Acme Corp".into()),
                email: Some("jordan@acme.test".into()),
                ..NewContact::named("Jordan Reyes")
            })
            .await?;

        let embedder = Arc::new(self.embedder.unwrap_or_default());
        let embeddings = Arc::new(EmbeddingService::new("mock", embedder.clone()));

        let provider = self
            .with_provider
            .then(|| Arc::new(MockProvider::with_responses(self.responses)));

        let mut config = CrmConfig {
            memory: self.memory,
            ..CrmConfig::default()
        };
        config.storage.database_path = db_path.to_string_lossy().into_owned();
        if let Some(prompt) = self.system_prompt {
            config.agent.system_prompt = prompt;
        }

        let mut agent = ConversationAgent::new(
            &config,
            storage.clone() as Arc<dyn StorageAdapter>,
            Arc::clone(&embeddings),
            provider.clone().map(|p| p as Arc<dyn ProviderAdapter>),
        );
        agent.start(contact_id).await?;

        Ok(TestHarness {
            agent,
            storage,
            embedder,
            embeddings,
            provider,
            contact_id,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A started agent over a temp database, with handles to every double.
pub struct TestHarness {
    pub agent: ConversationAgent,
    pub storage: Arc<FaultyStorage>,
    pub embedder: Arc<MockEmbedder>,
    pub embeddings: Arc<EmbeddingService>,
    /// `None` when built with [`TestHarnessBuilder::without_provider`].
    pub provider: Option<Arc<MockProvider>>,
    pub contact_id: i64,
    pub config: CrmConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Runs one turn for the harness contact.
    pub async fn send(&mut self, message: &str) -> Result<ProcessOutcome, CrmError> {
        self.agent.process(message).await
    }

    /// Creates another contact in the same database.
    pub async fn add_contact(&self, name: &str) -> Result<i64, CrmError> {
        self.storage.create_contact(&NewContact::named(name)).await
    }

    /// A second agent over the same store (e.g. a restarted process).
    pub fn new_agent(&self) -> ConversationAgent {
        ConversationAgent::new(
            &self.config,
            self.storage.clone() as Arc<dyn StorageAdapter>,
            Arc::clone(&self.embeddings),
            self.provider.clone().map(|p| p as Arc<dyn ProviderAdapter>),
        )
    }
}
