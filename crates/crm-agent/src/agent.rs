// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-contact conversation loop.
//!
//! A session binds one contact to the agent's short-term memory. Each
//! `process` call runs: assemble context, generate, persist, then the two
//! upkeep steps (rolling summary when the window fills, archive when the
//! contact is over threshold).
//!
//! The archive trigger reads the interaction count and then acts on it;
//! this is only safe with a single writer per contact.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crm_config::CrmConfig;
use crm_config::model::{GenerationConfig, MemoryConfig};
use crm_core::types::{Contact, Interaction, NewInteraction, ProviderRequest};
use crm_core::{CrmError, Metadata, ProviderAdapter, StorageAdapter};
use crm_memory::{
    ContactHistory, ContextSnapshot, EmbeddingService, KnowledgeStore, LongTermMemory,
    ScoredDocument, ShortTermMemory, Turn,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::context::AssembledContext;
use crate::summary::{ProviderSummarizer, rolling_summary};

/// Reply used when no text-generation provider is configured.
pub const NO_PROVIDER_RESPONSE: &str =
    "I'm sorry, but I cannot generate responses without a configured language model.";

/// Reply used when the provider answers with no text.
pub const EMPTY_RESPONSE: &str = "I apologize, but I could not generate a response.";

/// What happened to the archive step of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The contact was at or below the archive threshold.
    NotNeeded,
    /// This many interactions were summarized and deleted.
    Archived(usize),
    /// The summary could not be written; nothing was deleted.
    Failed(String),
}

impl ArchiveOutcome {
    pub fn archived(&self) -> usize {
        match self {
            ArchiveOutcome::Archived(n) => *n,
            _ => 0,
        }
    }
}

/// Result of one conversation turn.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub response: String,
    pub interaction_id: i64,
    /// Knowledge documents included in the context.
    pub knowledge_sources: usize,
    pub knowledge_found: bool,
    /// Persisted interactions for the contact after this turn's archiving.
    pub total_interactions: usize,
    pub archive: ArchiveOutcome,
}

/// Orchestrates memory, retrieval, and generation for one contact at a time.
pub struct ConversationAgent {
    system_prompt: String,
    generation: GenerationConfig,
    memory: MemoryConfig,
    provider: Option<Arc<dyn ProviderAdapter>>,
    long_term: LongTermMemory,
    knowledge: KnowledgeStore,
    short_term: ShortTermMemory,
    contact: Option<Contact>,
}

impl ConversationAgent {
    /// Builds an agent over an initialized store.
    ///
    /// Without a provider the agent still runs: replies are the fixed
    /// [`NO_PROVIDER_RESPONSE`] and archive summaries use the fallback text.
    pub fn new(
        config: &CrmConfig,
        storage: Arc<dyn StorageAdapter>,
        embeddings: Arc<EmbeddingService>,
        provider: Option<Arc<dyn ProviderAdapter>>,
    ) -> Self {
        let mut long_term = LongTermMemory::new(Arc::clone(&storage), &config.memory);
        if let Some(provider) = &provider {
            long_term = long_term.with_summarizer(Arc::new(ProviderSummarizer::new(
                Arc::clone(provider),
                config.generation.model.clone(),
            )));
        } else {
            warn!("no generation provider configured, replies will be fixed text");
        }

        Self {
            system_prompt: config.agent.system_prompt.clone(),
            generation: config.generation.clone(),
            memory: config.memory.clone(),
            provider,
            long_term,
            knowledge: KnowledgeStore::new(storage, embeddings),
            short_term: ShortTermMemory::new(config.memory.short_term_window),
            contact: None,
        }
    }

    /// The contact of the active session.
    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    pub fn long_term(&self) -> &LongTermMemory {
        &self.long_term
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn short_term(&self) -> &ShortTermMemory {
        &self.short_term
    }

    /// Starts a session for `contact_id`.
    ///
    /// Resets short-term memory and replays the most recent persisted
    /// interactions (oldest first) and the latest summary. Returns `None`
    /// and leaves the current session untouched if the contact does not
    /// exist.
    pub async fn start(&mut self, contact_id: i64) -> Result<Option<Contact>, CrmError> {
        let Some(contact) = self.long_term.storage().get_contact(contact_id).await? else {
            debug!(contact_id, "contact not found, no session started");
            return Ok(None);
        };

        self.short_term.clear();

        let mut seed = self
            .long_term
            .contact_interactions(contact_id, self.memory.seed_interactions)
            .await?;
        seed.reverse();
        let seeded = seed.len();
        for interaction in seed {
            self.short_term.push(replayed_turn(interaction));
        }

        if let Some(summary) = self.long_term.latest_summary(contact_id).await? {
            self.short_term.set_summary(summary.summary);
        }

        self.bind_contact_context(&contact);
        info!(contact_id, name = %contact.name, seeded, "session started");
        self.contact = Some(contact.clone());
        Ok(Some(contact))
    }

    /// Runs one turn for the active session.
    ///
    /// Generation and embedding failures degrade the reply instead of
    /// failing. A failed archive is reported in [`ProcessOutcome::archive`].
    /// Storage errors propagate.
    pub async fn process(&mut self, message: &str) -> Result<ProcessOutcome, CrmError> {
        let contact = self
            .contact
            .clone()
            .ok_or_else(|| CrmError::Internal("no contact selected".into()))?;
        let contact_id = contact.id;

        let context = self.assemble_context(&contact, message).await?;
        let response = self.generate(&context, message).await;

        let interaction_id = self
            .long_term
            .save_interaction(&NewInteraction {
                contact_id,
                message: message.to_string(),
                response: Some(response.clone()),
                context_summary: context.summary.clone(),
            })
            .await?;

        let mut metadata = Metadata::new();
        metadata.insert("interaction_id".into(), Value::from(interaction_id));
        self.short_term.add(message, response.clone(), metadata);

        if self.short_term.is_full() {
            self.roll_up_short_term(&contact).await?;
        }

        let archive = self.archive_if_needed(contact_id).await?;
        let total_interactions = self.long_term.count_contact_interactions(contact_id).await?;

        debug!(
            contact_id,
            interaction_id,
            knowledge_sources = context.knowledge.len(),
            total_interactions,
            "turn processed"
        );

        Ok(ProcessOutcome {
            response,
            interaction_id,
            knowledge_sources: context.knowledge.len(),
            knowledge_found: !context.knowledge.is_empty(),
            total_interactions,
            archive,
        })
    }

    /// Like [`process`](Self::process), starting a session for `contact_id`
    /// first when it is not the active one. `None` if the contact does not
    /// exist.
    pub async fn process_for(
        &mut self,
        contact_id: i64,
        message: &str,
    ) -> Result<Option<ProcessOutcome>, CrmError> {
        if self.contact.as_ref().map(|c| c.id) != Some(contact_id)
            && self.start(contact_id).await?.is_none()
        {
            return Ok(None);
        }
        self.process(message).await.map(Some)
    }

    /// Adds a knowledge document. `None` when no embedding could be produced.
    pub async fn add_knowledge(
        &self,
        content: &str,
        metadata: Metadata,
    ) -> Result<Option<i64>, CrmError> {
        self.knowledge.add(content, metadata).await
    }

    /// Searches the knowledge base with the configured similarity threshold.
    pub async fn search_knowledge(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, CrmError> {
        self.knowledge
            .search(query, limit, self.memory.similarity_threshold)
            .await
    }

    pub fn current_context(&self) -> ContextSnapshot {
        self.short_term.full_context()
    }

    pub async fn history(&self, contact_id: i64) -> Result<Option<ContactHistory>, CrmError> {
        self.long_term.history(contact_id).await
    }

    async fn assemble_context(
        &self,
        contact: &Contact,
        message: &str,
    ) -> Result<AssembledContext, CrmError> {
        let turns = self.short_term.recent(self.memory.recent_context_turns);
        let summary = self
            .long_term
            .latest_summary(contact.id)
            .await?
            .map(|s| s.summary);

        let knowledge = match self
            .knowledge
            .search(
                message,
                self.memory.max_knowledge_results,
                self.memory.similarity_threshold,
            )
            .await
        {
            Ok(docs) => docs,
            Err(e) if e.is_embedding() => {
                warn!(error = %e, "knowledge search unavailable, continuing without it");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(AssembledContext::new(contact, &turns, summary, knowledge))
    }

    async fn generate(&self, context: &AssembledContext, message: &str) -> String {
        let Some(provider) = &self.provider else {
            return NO_PROVIDER_RESPONSE.to_string();
        };

        let request = ProviderRequest {
            temperature: Some(self.generation.temperature),
            ..ProviderRequest::single_turn(
                self.generation.model.clone(),
                self.system_prompt.clone(),
                context.prompt(message),
                self.generation.max_tokens,
            )
        };

        match provider.complete(request).await {
            Ok(response) if response.content.trim().is_empty() => {
                warn!(model = %response.model, "provider returned an empty reply");
                EMPTY_RESPONSE.to_string()
            }
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "generation failed, replying with the error");
                format!("I encountered an error: {e}")
            }
        }
    }

    /// Persists a rolling summary of the full window, then empties it.
    async fn roll_up_short_term(&mut self, contact: &Contact) -> Result<(), CrmError> {
        let summary = rolling_summary(self.short_term.turns());
        let summary_id = self
            .long_term
            .save_context_summary(contact.id, &summary)
            .await?;
        let turns = self.short_term.size();
        self.short_term.clear();
        self.bind_contact_context(contact);
        info!(contact_id = contact.id, summary_id, turns, "short-term window summarized");
        Ok(())
    }

    async fn archive_if_needed(&self, contact_id: i64) -> Result<ArchiveOutcome, CrmError> {
        let total = self.long_term.count_contact_interactions(contact_id).await?;
        if self.long_term.policy().excess(total) == 0 {
            return Ok(ArchiveOutcome::NotNeeded);
        }

        match self.long_term.archive_old_interactions(contact_id).await {
            Ok(0) => Ok(ArchiveOutcome::NotNeeded),
            Ok(n) => Ok(ArchiveOutcome::Archived(n)),
            Err(e) if e.is_archive() => {
                warn!(contact_id, error = %e, "archiving aborted");
                Ok(ArchiveOutcome::Failed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    fn bind_contact_context(&mut self, contact: &Contact) {
        self.short_term
            .set_current_context("contact_id", Value::from(contact.id));
        self.short_term
            .set_current_context("contact_name", Value::from(contact.name.clone()));
    }
}

/// A persisted interaction as a short-term turn.
fn replayed_turn(interaction: Interaction) -> Turn {
    let timestamp = DateTime::parse_from_rfc3339(&interaction.created_at)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    let mut metadata = Metadata::new();
    metadata.insert("interaction_id".into(), Value::from(interaction.id));
    Turn {
        message: interaction.message,
        response: interaction.response.unwrap_or_default(),
        timestamp,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(id: i64, created_at: &str) -> Interaction {
        Interaction {
            id,
            contact_id: 1,
            message: format!("m{id}"),
            response: None,
            context_summary: None,
            created_at: created_at.into(),
        }
    }

    #[test]
    fn replayed_turn_keeps_stored_timestamp() {
        let turn = replayed_turn(interaction(3, "2026-03-04T05:06:07.890Z"));
        assert_eq!(turn.timestamp.to_rfc3339(), "2026-03-04T05:06:07.890+00:00");
        assert_eq!(turn.response, "");
        assert_eq!(turn.metadata["interaction_id"], 3);
    }

    #[test]
    fn replayed_turn_tolerates_bad_timestamp() {
        let turn = replayed_turn(interaction(4, "yesterday"));
        assert!(turn.timestamp <= Utc::now());
    }

    #[test]
    fn archive_outcome_count() {
        assert_eq!(ArchiveOutcome::Archived(11).archived(), 11);
        assert_eq!(ArchiveOutcome::NotNeeded.archived(), 0);
        assert_eq!(ArchiveOutcome::Failed("x".into()).archived(), 0);
    }
}
