// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the persistent store.

use async_trait::async_trait;

use crate::error::CrmError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Contact, ContextSummary, Interaction, KnowledgeDocument, Metadata, NewContact, NewInteraction,
};

/// Adapter for the relational store holding contacts, interactions,
/// context summaries, and knowledge documents.
///
/// Identities are autoincrement integers and `created_at` is assigned by the
/// store at insert time. "Creation order" means `(created_at, id)` ascending.
/// Only `LongTermMemory` and `KnowledgeStore` should mutate through this trait.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), CrmError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), CrmError>;

    // --- Contacts ---

    async fn create_contact(&self, contact: &NewContact) -> Result<i64, CrmError>;

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, CrmError>;

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<Contact>, CrmError>;

    /// All contacts, newest first.
    async fn list_contacts(&self) -> Result<Vec<Contact>, CrmError>;

    /// Overwrites name, email, company, status, and last-contact time.
    async fn update_contact(&self, contact: &Contact) -> Result<bool, CrmError>;

    /// Stamps `last_contact_at` with the current time.
    async fn touch_contact(&self, id: i64) -> Result<bool, CrmError>;

    // --- Interactions ---

    async fn insert_interaction(&self, interaction: &NewInteraction) -> Result<i64, CrmError>;

    /// Updates message, response, and summary snapshot in place.
    async fn update_interaction(&self, interaction: &Interaction) -> Result<bool, CrmError>;

    async fn get_interaction(&self, id: i64) -> Result<Option<Interaction>, CrmError>;

    /// Interactions of one contact, newest first.
    async fn list_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError>;

    /// Interactions across all contacts, newest first.
    async fn list_all_interactions(&self, limit: usize) -> Result<Vec<Interaction>, CrmError>;

    /// Interactions of one contact, oldest first.
    async fn oldest_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError>;

    async fn count_interactions(&self, contact_id: i64) -> Result<usize, CrmError>;

    /// Counts interactions created strictly after `since` (ISO-8601 UTC).
    async fn count_interactions_since(
        &self,
        contact_id: i64,
        since: &str,
    ) -> Result<usize, CrmError>;

    /// Deletes the given interactions as one batch. Returns the rows removed.
    async fn delete_interactions(&self, ids: &[i64]) -> Result<usize, CrmError>;

    // --- Context summaries ---

    async fn insert_summary(&self, contact_id: i64, summary: &str) -> Result<i64, CrmError>;

    /// Summaries of one contact, newest first. `None` returns all of them.
    async fn list_summaries(
        &self,
        contact_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<ContextSummary>, CrmError>;

    // --- Knowledge documents ---

    /// Persists content and vector in one row.
    async fn insert_document(
        &self,
        content: &str,
        embedding: &[f32],
        metadata: &Metadata,
    ) -> Result<i64, CrmError>;

    async fn get_document(&self, id: i64) -> Result<Option<KnowledgeDocument>, CrmError>;

    /// Every document, in storage (id) order.
    async fn list_documents(&self) -> Result<Vec<KnowledgeDocument>, CrmError>;

    async fn delete_document(&self, id: i64) -> Result<bool, CrmError>;

    async fn count_documents(&self) -> Result<usize, CrmError>;
}
