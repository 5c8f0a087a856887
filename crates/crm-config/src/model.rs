// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the CRM agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Embedding backends the registry knows how to construct.
pub const KNOWN_EMBEDDING_PROVIDERS: &[&str] = &["openai", "gemini"];

/// Top-level CRM agent configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CrmConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding backend settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Text-generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Short-term, long-term, and knowledge retrieval tuning.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// System prompt sent with every generation request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_agent_name() -> String {
    "crm".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful CRM assistant. You help manage customer relationships and \
     follow-ups. Be professional, concise, and avoid repeating information that \
     was already mentioned."
        .to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("crm").join("agent.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("agent.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Embedding backend configuration.
///
/// A backend with no API key is treated as unavailable: embedding calls
/// yield no vector instead of failing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Active backend identifier (`openai` or `gemini`).
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_embedding_model")]
    pub openai_model: String,

    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_embedding_model")]
    pub gemini_model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            openai_api_key: None,
            openai_model: default_openai_embedding_model(),
            gemini_api_key: None,
            gemini_model: default_gemini_embedding_model(),
        }
    }
}

fn default_embedding_provider() -> String {
    "openai".to_string()
}

fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_gemini_embedding_model() -> String {
    "text-embedding-004".to_string()
}

/// Text-generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// API key. `None` puts the agent in fixed-response mode.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_generation_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

/// Memory and retrieval tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Turns held by short-term memory before a rolling summary is written.
    #[serde(default = "default_short_term_window")]
    pub short_term_window: usize,

    /// Interaction count above which archiving runs.
    #[serde(default = "default_archive_threshold")]
    pub archive_threshold: usize,

    /// Most recent interactions kept after archiving.
    #[serde(default = "default_archive_keep")]
    pub archive_keep: usize,

    /// Minimum cosine similarity for a knowledge match.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    #[serde(default = "default_max_knowledge_results")]
    pub max_knowledge_results: usize,

    /// Short-term turns rendered into each prompt context.
    #[serde(default = "default_recent_context_turns")]
    pub recent_context_turns: usize,

    /// Persisted interactions replayed into short-term memory on start.
    #[serde(default = "default_seed_interactions")]
    pub seed_interactions: usize,

    #[serde(default = "default_recent_contact_hours")]
    pub recent_contact_hours: u32,

    #[serde(default = "default_history_interactions")]
    pub history_interactions: usize,

    #[serde(default = "default_history_summaries")]
    pub history_summaries: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_window: default_short_term_window(),
            archive_threshold: default_archive_threshold(),
            archive_keep: default_archive_keep(),
            similarity_threshold: default_similarity_threshold(),
            max_knowledge_results: default_max_knowledge_results(),
            recent_context_turns: default_recent_context_turns(),
            seed_interactions: default_seed_interactions(),
            recent_contact_hours: default_recent_contact_hours(),
            history_interactions: default_history_interactions(),
            history_summaries: default_history_summaries(),
        }
    }
}

fn default_short_term_window() -> usize {
    10
}

fn default_archive_threshold() -> usize {
    20
}

fn default_archive_keep() -> usize {
    10
}

fn default_similarity_threshold() -> f64 {
    0.5
}

fn default_max_knowledge_results() -> usize {
    3
}

fn default_recent_context_turns() -> usize {
    3
}

fn default_seed_interactions() -> usize {
    5
}

fn default_recent_contact_hours() -> u32 {
    24
}

fn default_history_interactions() -> usize {
    10
}

fn default_history_summaries() -> usize {
    5
}
