// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crm_config::model::StorageConfig;
use crm_core::types::{
    Contact, ContextSummary, Interaction, KnowledgeDocument, Metadata, NewContact, NewInteraction,
};
use crm_core::{AdapterType, CrmError, HealthStatus, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;
use crate::record;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened by [`StorageAdapter::initialize`] and checkpointed
/// and released by [`StorageAdapter::close`]. Every query after `close`
/// fails with a storage error.
pub struct SqliteStorage {
    config: StorageConfig,
    state: Mutex<DbState>,
}

enum DbState {
    Unopened,
    Open(Database),
    Closed,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            state: Mutex::new(DbState::Unopened),
        }
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &str {
        &self.config.database_path
    }

    async fn db(&self) -> Result<Database, CrmError> {
        match &*self.state.lock().await {
            DbState::Open(db) => Ok(db.clone()),
            DbState::Unopened => Err(CrmError::Storage {
                source: "storage not initialized -- call initialize() first".into(),
            }),
            DbState::Closed => Err(CrmError::Storage {
                source: "storage closed".into(),
            }),
        }
    }

    async fn checkpoint(&self) -> Result<(), CrmError> {
        self.db()
            .await?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CrmError> {
        if matches!(*self.state.lock().await, DbState::Closed) {
            return Ok(HealthStatus::Unhealthy("storage closed".into()));
        }
        self.db()
            .await?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CrmError> {
        if matches!(*self.state.lock().await, DbState::Open(_)) {
            self.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), CrmError> {
        let mut state = self.state.lock().await;
        if !matches!(*state, DbState::Unopened) {
            return Err(CrmError::Storage {
                source: "storage already initialized".into(),
            });
        }
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        *state = DbState::Open(db);
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CrmError> {
        let previous = std::mem::replace(&mut *self.state.lock().await, DbState::Closed);
        if let DbState::Open(db) = previous {
            db.close().await?;
            debug!(path = %self.config.database_path, "storage closed");
        }
        Ok(())
    }

    // --- Contacts ---

    async fn create_contact(&self, contact: &NewContact) -> Result<i64, CrmError> {
        queries::contacts::create_contact(&self.db().await?, contact).await
    }

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, CrmError> {
        record::find(&self.db().await?, id).await
    }

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<Contact>, CrmError> {
        queries::contacts::find_by_email(&self.db().await?, email).await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, CrmError> {
        record::all(&self.db().await?).await
    }

    async fn update_contact(&self, contact: &Contact) -> Result<bool, CrmError> {
        queries::contacts::update_contact(&self.db().await?, contact).await
    }

    async fn touch_contact(&self, id: i64) -> Result<bool, CrmError> {
        queries::contacts::touch_contact(&self.db().await?, id).await
    }

    // --- Interactions ---

    async fn insert_interaction(&self, interaction: &NewInteraction) -> Result<i64, CrmError> {
        queries::interactions::insert_interaction(&self.db().await?, interaction).await
    }

    async fn update_interaction(&self, interaction: &Interaction) -> Result<bool, CrmError> {
        queries::interactions::update_interaction(&self.db().await?, interaction).await
    }

    async fn get_interaction(&self, id: i64) -> Result<Option<Interaction>, CrmError> {
        record::find(&self.db().await?, id).await
    }

    async fn list_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError> {
        queries::interactions::newest_for_contact(&self.db().await?, contact_id, limit).await
    }

    async fn list_all_interactions(&self, limit: usize) -> Result<Vec<Interaction>, CrmError> {
        queries::interactions::newest_overall(&self.db().await?, limit).await
    }

    async fn oldest_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError> {
        queries::interactions::oldest_for_contact(&self.db().await?, contact_id, limit).await
    }

    async fn count_interactions(&self, contact_id: i64) -> Result<usize, CrmError> {
        queries::interactions::count_for_contact(&self.db().await?, contact_id).await
    }

    async fn count_interactions_since(
        &self,
        contact_id: i64,
        since: &str,
    ) -> Result<usize, CrmError> {
        queries::interactions::count_since(&self.db().await?, contact_id, since).await
    }

    async fn delete_interactions(&self, ids: &[i64]) -> Result<usize, CrmError> {
        queries::interactions::delete_batch(&self.db().await?, ids).await
    }

    // --- Context summaries ---

    async fn insert_summary(&self, contact_id: i64, summary: &str) -> Result<i64, CrmError> {
        queries::summaries::insert_summary(&self.db().await?, contact_id, summary).await
    }

    async fn list_summaries(
        &self,
        contact_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<ContextSummary>, CrmError> {
        queries::summaries::summaries_for_contact(&self.db().await?, contact_id, limit).await
    }

    // --- Knowledge documents ---

    async fn insert_document(
        &self,
        content: &str,
        embedding: &[f32],
        metadata: &Metadata,
    ) -> Result<i64, CrmError> {
        queries::knowledge::insert_document(&self.db().await?, content, embedding, metadata).await
    }

    async fn get_document(&self, id: i64) -> Result<Option<KnowledgeDocument>, CrmError> {
        record::find(&self.db().await?, id).await
    }

    async fn list_documents(&self) -> Result<Vec<KnowledgeDocument>, CrmError> {
        record::all(&self.db().await?).await
    }

    async fn delete_document(&self, id: i64) -> Result<bool, CrmError> {
        record::delete::<KnowledgeDocument>(&self.db().await?, id).await
    }

    async fn count_documents(&self) -> Result<usize, CrmError> {
        record::count::<KnowledgeDocument>(&self.db().await?).await
    }
}
