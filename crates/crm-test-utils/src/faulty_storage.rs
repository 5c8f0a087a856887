// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage wrapper with switchable write failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crm_core::types::{
    AdapterType, Contact, ContextSummary, HealthStatus, Interaction, KnowledgeDocument, Metadata,
    NewContact, NewInteraction,
};
use crm_core::{CrmError, PluginAdapter, StorageAdapter};

/// Delegates to an inner store; summary writes or interaction deletes can
/// be made to fail. Delete attempts are counted whether or not they fail.
pub struct FaultyStorage {
    inner: Arc<dyn StorageAdapter>,
    fail_summaries: AtomicBool,
    fail_deletes: AtomicBool,
    delete_attempts: AtomicUsize,
}

impl FaultyStorage {
    pub fn new(inner: Arc<dyn StorageAdapter>) -> Self {
        Self {
            inner,
            fail_summaries: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            delete_attempts: AtomicUsize::new(0),
        }
    }

    pub fn fail_summary_writes(&self, fail: bool) {
        self.fail_summaries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }

    fn injected(what: &str) -> CrmError {
        CrmError::Storage {
            source: format!("injected failure: {what}").into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for FaultyStorage {
    fn name(&self) -> &str {
        "faulty"
    }

    fn version(&self) -> semver::Version {
        self.inner.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CrmError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), CrmError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl StorageAdapter for FaultyStorage {
    async fn initialize(&self) -> Result<(), CrmError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), CrmError> {
        self.inner.close().await
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<i64, CrmError> {
        self.inner.create_contact(contact).await
    }

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, CrmError> {
        self.inner.get_contact(id).await
    }

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<Contact>, CrmError> {
        self.inner.find_contact_by_email(email).await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, CrmError> {
        self.inner.list_contacts().await
    }

    async fn update_contact(&self, contact: &Contact) -> Result<bool, CrmError> {
        self.inner.update_contact(contact).await
    }

    async fn touch_contact(&self, id: i64) -> Result<bool, CrmError> {
        self.inner.touch_contact(id).await
    }

    async fn insert_interaction(&self, interaction: &NewInteraction) -> Result<i64, CrmError> {
        self.inner.insert_interaction(interaction).await
    }

    async fn update_interaction(&self, interaction: &Interaction) -> Result<bool, CrmError> {
        self.inner.update_interaction(interaction).await
    }

    async fn get_interaction(&self, id: i64) -> Result<Option<Interaction>, CrmError> {
        self.inner.get_interaction(id).await
    }

    async fn list_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError> {
        self.inner.list_interactions(contact_id, limit).await
    }

    async fn list_all_interactions(&self, limit: usize) -> Result<Vec<Interaction>, CrmError> {
        self.inner.list_all_interactions(limit).await
    }

    async fn oldest_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError> {
        self.inner.oldest_interactions(contact_id, limit).await
    }

    async fn count_interactions(&self, contact_id: i64) -> Result<usize, CrmError> {
        self.inner.count_interactions(contact_id).await
    }

    async fn count_interactions_since(
        &self,
        contact_id: i64,
        since: &str,
    ) -> Result<usize, CrmError> {
        self.inner.count_interactions_since(contact_id, since).await
    }

    async fn delete_interactions(&self, ids: &[i64]) -> Result<usize, CrmError> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::injected("delete_interactions"));
        }
        self.inner.delete_interactions(ids).await
    }

    async fn insert_summary(&self, contact_id: i64, summary: &str) -> Result<i64, CrmError> {
        if self.fail_summaries.load(Ordering::SeqCst) {
            return Err(Self::injected("insert_summary"));
        }
        self.inner.insert_summary(contact_id, summary).await
    }

    async fn list_summaries(
        &self,
        contact_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<ContextSummary>, CrmError> {
        self.inner.list_summaries(contact_id, limit).await
    }

    async fn insert_document(
        &self,
        content: &str,
        embedding: &[f32],
        metadata: &Metadata,
    ) -> Result<i64, CrmError> {
        self.inner.insert_document(content, embedding, metadata).await
    }

    async fn get_document(&self, id: i64) -> Result<Option<KnowledgeDocument>, CrmError> {
        self.inner.get_document(id).await
    }

    async fn list_documents(&self) -> Result<Vec<KnowledgeDocument>, CrmError> {
        self.inner.list_documents().await
    }

    async fn delete_document(&self, id: i64) -> Result<bool, CrmError> {
        self.inner.delete_document(id).await
    }

    async fn count_documents(&self) -> Result<usize, CrmError> {
        self.inner.count_documents().await
    }
}
