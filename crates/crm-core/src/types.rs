// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records and adapter payload types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque key/value metadata attached to knowledge documents.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Embedding,
}

// --- Persistent records ---

/// A customer relationship; the conversation identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub last_contact_at: Option<String>,
    pub created_at: String,
}

impl Contact {
    /// Header line placed first in every assembled context.
    pub fn header(&self) -> String {
        let mut line = format!("Contact: {}", self.name);
        if let Some(company) = &self.company {
            line.push_str(&format!(" ({company})"));
        }
        line.push_str(&format!(" - Status: {}", self.status));
        line
    }
}

/// Fields for inserting a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: String,
}

impl NewContact {
    /// A contact with status `new` and no email or company.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            company: None,
            status: "new".to_string(),
        }
    }
}

/// One persisted message/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub contact_id: i64,
    pub message: String,
    pub response: Option<String>,
    /// Summary that was in context when this interaction was produced.
    pub context_summary: Option<String>,
    pub created_at: String,
}

/// Fields for inserting an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInteraction {
    pub contact_id: i64,
    pub message: String,
    pub response: Option<String>,
    pub context_summary: Option<String>,
}

/// Append-only summary of a span of a contact's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub id: i64,
    pub contact_id: i64,
    pub summary: String,
    pub created_at: String,
}

/// A knowledge snippet with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: i64,
    pub content: String,
    #[serde(skip)]
    pub embedding: Vec<f32>,
    pub metadata: Metadata,
    pub created_at: String,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

// --- Provider types ---

/// A single chat message sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: String,
    pub content: String,
}

/// A request to a text-generation provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// A single-turn request: one system prompt and one user prompt.
    pub fn single_turn(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: Some(system_prompt.into()),
            messages: vec![ProviderMessage {
                role: "user".to_string(),
                content: user_prompt.into(),
            }],
            max_tokens,
            temperature: None,
        }
    }
}

/// Token usage reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A response from a text-generation provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}
