// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory: persistent interactions, summaries, and archiving.
//!
//! Archiving turns the oldest interactions of a contact into one context
//! summary and then deletes them. The summary write always happens first;
//! if it fails nothing is deleted.
//!
//! The count read and the archive run are separate store calls, so two
//! writers on the same contact could both decide to archive. One writer per
//! contact is assumed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use crm_config::model::MemoryConfig;
use crm_core::types::{ContextSummary, Interaction, NewInteraction};
use crm_core::{CrmError, StorageAdapter};
use tracing::{debug, info, warn};

use crate::types::ContactHistory;

/// Characters of each message kept in a fallback archive summary.
const FALLBACK_MESSAGE_CHARS: usize = 100;

/// Produces one summary text for a span of archived interactions.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, interactions: &[Interaction]) -> Result<String, CrmError>;
}

/// When to archive and how much to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivePolicy {
    /// Archive once a contact has more than this many interactions.
    pub threshold: usize,
    /// Most recent interactions left in place.
    pub keep: usize,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self {
            threshold: 20,
            keep: 10,
        }
    }
}

impl ArchivePolicy {
    /// How many of `total` interactions to archive; 0 at or below threshold.
    pub fn excess(&self, total: usize) -> usize {
        if total <= self.threshold {
            0
        } else {
            total.saturating_sub(self.keep)
        }
    }
}

pub struct LongTermMemory {
    storage: Arc<dyn StorageAdapter>,
    policy: ArchivePolicy,
    summarizer: Option<Arc<dyn Summarizer>>,
    history_interactions: usize,
    history_summaries: usize,
    recent_contact_hours: u32,
}

impl LongTermMemory {
    pub fn new(storage: Arc<dyn StorageAdapter>, config: &MemoryConfig) -> Self {
        Self {
            storage,
            policy: ArchivePolicy {
                threshold: config.archive_threshold,
                keep: config.archive_keep,
            },
            summarizer: None,
            history_interactions: config.history_interactions,
            history_summaries: config.history_summaries,
            recent_contact_hours: config.recent_contact_hours,
        }
    }

    /// Delegates archive summaries to `summarizer` instead of the fallback.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn policy(&self) -> ArchivePolicy {
        self.policy
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    // --- Interactions ---

    /// Persists an interaction and stamps the contact's last-contact time.
    pub async fn save_interaction(&self, interaction: &NewInteraction) -> Result<i64, CrmError> {
        let id = self.storage.insert_interaction(interaction).await?;
        self.storage.touch_contact(interaction.contact_id).await?;
        debug!(id, contact_id = interaction.contact_id, "interaction saved");
        Ok(id)
    }

    /// Updates an interaction that has not been archived. False if it no longer exists.
    pub async fn update_interaction(&self, interaction: &Interaction) -> Result<bool, CrmError> {
        self.storage.update_interaction(interaction).await
    }

    /// Newest first.
    pub async fn contact_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError> {
        self.storage.list_interactions(contact_id, limit).await
    }

    /// Newest first, across every contact.
    pub async fn recent_interactions(&self, limit: usize) -> Result<Vec<Interaction>, CrmError> {
        self.storage.list_all_interactions(limit).await
    }

    /// Oldest first.
    pub async fn old_interactions(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<Interaction>, CrmError> {
        self.storage.oldest_interactions(contact_id, limit).await
    }

    pub async fn count_contact_interactions(&self, contact_id: i64) -> Result<usize, CrmError> {
        self.storage.count_interactions(contact_id).await
    }

    /// True if the contact has an interaction newer than `hours` ago.
    ///
    /// A window reaching past the earliest representable time covers every
    /// interaction.
    pub async fn has_recent_interaction(&self, contact_id: i64, hours: u32) -> Result<bool, CrmError> {
        let Some(since) = Utc::now().checked_sub_signed(Duration::hours(i64::from(hours))) else {
            return Ok(self.storage.count_interactions(contact_id).await? > 0);
        };
        let since = since.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        Ok(self.storage.count_interactions_since(contact_id, &since).await? > 0)
    }

    // --- Summaries ---

    pub async fn save_context_summary(&self, contact_id: i64, summary: &str) -> Result<i64, CrmError> {
        self.storage.insert_summary(contact_id, summary).await
    }

    /// Newest first.
    pub async fn context_summaries(
        &self,
        contact_id: i64,
        limit: usize,
    ) -> Result<Vec<ContextSummary>, CrmError> {
        self.storage.list_summaries(contact_id, Some(limit)).await
    }

    pub async fn all_context_summaries(&self, contact_id: i64) -> Result<Vec<ContextSummary>, CrmError> {
        self.storage.list_summaries(contact_id, None).await
    }

    pub async fn latest_summary(&self, contact_id: i64) -> Result<Option<ContextSummary>, CrmError> {
        Ok(self
            .storage
            .list_summaries(contact_id, Some(1))
            .await?
            .into_iter()
            .next())
    }

    /// Contact record, recent interactions, summaries, and the recency flag.
    /// `None` if the contact does not exist.
    pub async fn history(&self, contact_id: i64) -> Result<Option<ContactHistory>, CrmError> {
        let Some(contact) = self.storage.get_contact(contact_id).await? else {
            return Ok(None);
        };
        Ok(Some(ContactHistory {
            contact,
            interactions: self
                .contact_interactions(contact_id, self.history_interactions)
                .await?,
            summaries: self
                .context_summaries(contact_id, self.history_summaries)
                .await?,
            recently_contacted: self
                .has_recent_interaction(contact_id, self.recent_contact_hours)
                .await?,
        }))
    }

    // --- Archiving ---

    /// Summarizes and deletes the oldest interactions once the contact is
    /// over the threshold. Returns how many were deleted (0 if none).
    ///
    /// A failed summary write returns [`CrmError::Archive`] with every
    /// interaction still in place.
    pub async fn archive_old_interactions(&self, contact_id: i64) -> Result<usize, CrmError> {
        let total = self.storage.count_interactions(contact_id).await?;
        let excess = self.policy.excess(total);
        if excess == 0 {
            return Ok(0);
        }

        let archive_set = self.storage.oldest_interactions(contact_id, excess).await?;
        if archive_set.is_empty() {
            return Ok(0);
        }

        let summary = self.summarize(&archive_set).await;
        let summary_id = self
            .storage
            .insert_summary(contact_id, &summary)
            .await
            .map_err(|e| CrmError::Archive {
                message: format!(
                    "summary write failed for contact {contact_id}; {} interactions not deleted",
                    archive_set.len()
                ),
                source: Some(Box::new(e)),
            })?;

        let ids: Vec<i64> = archive_set.iter().map(|i| i.id).collect();
        let deleted = self
            .storage
            .delete_interactions(&ids)
            .await
            .map_err(|e| CrmError::Archive {
                message: format!(
                    "summary {summary_id} saved but deleting archived interactions of contact {contact_id} failed"
                ),
                source: Some(Box::new(e)),
            })?;

        info!(contact_id, summary_id, archived = deleted, kept = total.saturating_sub(deleted), "archived old interactions");
        Ok(deleted)
    }

    async fn summarize(&self, interactions: &[Interaction]) -> String {
        if let Some(summarizer) = &self.summarizer {
            match summarizer.summarize(interactions).await {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => warn!("summarizer returned empty text, using fallback"),
                Err(e) => warn!(error = %e, "summarizer failed, using fallback"),
            }
        }
        fallback_summary(interactions)
    }
}

/// Deterministic summary: every message, truncated, joined in order.
pub fn fallback_summary(interactions: &[Interaction]) -> String {
    let parts: Vec<String> = interactions
        .iter()
        .map(|i| truncate_chars(&i.message, FALLBACK_MESSAGE_CHARS))
        .collect();
    format!(
        "Archived {} interactions: {}",
        interactions.len(),
        parts.join("; ")
    )
}

/// First `max` characters of `text`, with `...` appended when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::open_storage_at;
    use crm_core::types::NewContact;

    struct Fixture {
        memory: LongTermMemory,
        contact: i64,
        db_path: std::path::PathBuf,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let (storage, db_path, dir) = open_storage_at().await;
        let contact = storage
            .create_contact(&NewContact::named("Clinica Boa Vista"))
            .await
            .unwrap();
        Fixture {
            memory: LongTermMemory::new(storage, &MemoryConfig::default()),
            contact,
            db_path,
            _dir: dir,
        }
    }

    async fn seed(memory: &LongTermMemory, contact: i64, n: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(n);
        for i in 0..n {
            ids.push(
                memory
                    .save_interaction(&NewInteraction {
                        contact_id: contact,
                        message: format!("message {i}"),
                        response: Some(format!("response {i}")),
                        context_summary: None,
                    })
                    .await
                    .unwrap(),
            );
        }
        ids
    }

    struct FixedSummarizer(Result<String, String>);

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        async fn summarize(&self, _interactions: &[Interaction]) -> Result<String, CrmError> {
            self.0.clone().map_err(CrmError::Internal)
        }
    }

    #[test]
    fn policy_excess() {
        let policy = ArchivePolicy::default();
        assert_eq!(policy.excess(0), 0);
        assert_eq!(policy.excess(20), 0);
        assert_eq!(policy.excess(21), 11);
        assert_eq!(policy.excess(35), 25);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("ééééé", 3), "ééé...");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[tokio::test]
    async fn save_interaction_touches_contact() {
        let f = fixture().await;
        seed(&f.memory, f.contact, 1).await;
        let contact = f.memory.storage().get_contact(f.contact).await.unwrap().unwrap();
        assert!(contact.last_contact_at.is_some());
        assert!(f.memory.has_recent_interaction(f.contact, 24).await.unwrap());
    }

    #[tokio::test]
    async fn no_archiving_at_threshold() {
        let f = fixture().await;
        seed(&f.memory, f.contact, 20).await;
        assert_eq!(f.memory.archive_old_interactions(f.contact).await.unwrap(), 0);
        assert_eq!(f.memory.count_contact_interactions(f.contact).await.unwrap(), 20);
        assert!(f.memory.all_context_summaries(f.contact).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn archiving_21_deletes_oldest_11_and_writes_one_summary() {
        let f = fixture().await;
        let ids = seed(&f.memory, f.contact, 21).await;

        assert_eq!(f.memory.archive_old_interactions(f.contact).await.unwrap(), 11);

        let remaining = f.memory.old_interactions(f.contact, 100).await.unwrap();
        let remaining_ids: Vec<i64> = remaining.iter().map(|i| i.id).collect();
        assert_eq!(remaining_ids, ids[11..].to_vec());

        let summaries = f.memory.all_context_summaries(f.contact).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].contact_id, f.contact);
        assert!(summaries[0].summary.starts_with("Archived 11 interactions: message 0; message 1"));
        assert!(summaries[0].summary.ends_with("message 10"));
    }

    #[tokio::test]
    async fn summarizer_output_is_used_when_available() {
        let (storage, _path, _dir) = open_storage_at().await;
        let contact = storage.create_contact(&NewContact::named("A")).await.unwrap();
        let memory = LongTermMemory::new(storage, &MemoryConfig::default())
            .with_summarizer(Arc::new(FixedSummarizer(Ok("Discussed pricing".into()))));
        seed(&memory, contact, 22).await;

        assert_eq!(memory.archive_old_interactions(contact).await.unwrap(), 12);
        let latest = memory.latest_summary(contact).await.unwrap().unwrap();
        assert_eq!(latest.summary, "Discussed pricing");
    }

    #[tokio::test]
    async fn failing_summarizer_falls_back() {
        let (storage, _path, _dir) = open_storage_at().await;
        let contact = storage.create_contact(&NewContact::named("A")).await.unwrap();
        let memory = LongTermMemory::new(storage, &MemoryConfig::default())
            .with_summarizer(Arc::new(FixedSummarizer(Err("rate limited".into()))));
        seed(&memory, contact, 21).await;

        assert_eq!(memory.archive_old_interactions(contact).await.unwrap(), 11);
        let latest = memory.latest_summary(contact).await.unwrap().unwrap();
        assert!(latest.summary.starts_with("Archived 11 interactions"));
    }

    #[tokio::test]
    async fn summary_write_failure_deletes_nothing() {
        let f = fixture().await;
        seed(&f.memory, f.contact, 21).await;

        // Make every summary insert abort at the SQLite level.
        let conn = rusqlite::Connection::open(&f.db_path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_summaries BEFORE INSERT ON context_summaries
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();
        drop(conn);

        let err = f.memory.archive_old_interactions(f.contact).await.unwrap_err();
        assert!(err.is_archive(), "expected archive error, got {err}");
        assert_eq!(f.memory.count_contact_interactions(f.contact).await.unwrap(), 21);
        assert!(f.memory.all_context_summaries(f.contact).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_aggregates_contact_records() {
        let f = fixture().await;
        seed(&f.memory, f.contact, 12).await;
        f.memory.save_context_summary(f.contact, "earlier").await.unwrap();

        let history = f.memory.history(f.contact).await.unwrap().unwrap();
        assert_eq!(history.contact.name, "Clinica Boa Vista");
        assert_eq!(history.interactions.len(), 10);
        assert_eq!(history.interactions[0].message, "message 11");
        assert_eq!(history.summaries.len(), 1);
        assert!(history.recently_contacted);

        assert!(f.memory.history(f.contact + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unbounded_recent_window_covers_all_interactions() {
        let (storage, _dir) = crate::testing::open_storage().await;
        let contact = storage
            .create_contact(&NewContact::named("Ferreira Logistics"))
            .await
            .unwrap();
        let memory = LongTermMemory::new(
            storage,
            &MemoryConfig {
                recent_contact_hours: u32::MAX,
                ..MemoryConfig::default()
            },
        );

        let history = memory.history(contact).await.unwrap().unwrap();
        assert!(!history.recently_contacted);

        seed(&memory, contact, 1).await;
        let history = memory.history(contact).await.unwrap().unwrap();
        assert!(history.recently_contacted);
        assert!(memory.has_recent_interaction(contact, u32::MAX).await.unwrap());
        assert!(memory.has_recent_interaction(contact, 0).await.is_ok());
    }

    #[tokio::test]
    async fn orphan_summary_is_a_storage_error() {
        let f = fixture().await;
        let err = f.memory.save_context_summary(9999, "nobody").await.unwrap_err();
        assert!(matches!(err, CrmError::Storage { .. }));
    }

    #[tokio::test]
    async fn update_interaction_only_while_active() {
        let f = fixture().await;
        let ids = seed(&f.memory, f.contact, 21).await;
        let mut first = f.memory.storage().get_interaction(ids[0]).await.unwrap().unwrap();
        first.response = Some("edited".into());
        assert!(f.memory.update_interaction(&first).await.unwrap());

        f.memory.archive_old_interactions(f.contact).await.unwrap();
        assert!(!f.memory.update_interaction(&first).await.unwrap());
    }
}
