// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory and retrieval for the CRM agent.
//!
//! - **EmbeddingService**: one embedding backend behind an exact-match cache
//! - **EmbeddingRegistry**: provider id to backend factory, resolved from config
//! - **KnowledgeStore**: documents with vectors, exact linear-scan cosine search
//! - **ShortTermMemory**: bounded FIFO of recent turns plus a summary slot
//! - **LongTermMemory**: persistent interactions and the archive policy

pub mod cache;
pub mod embedder;
pub mod knowledge;
pub mod long_term;
pub mod short_term;
pub mod types;

#[cfg(test)]
mod testing;

pub use cache::EmbeddingCache;
pub use embedder::{EmbeddingRegistry, EmbeddingService};
pub use knowledge::KnowledgeStore;
pub use long_term::{ArchivePolicy, LongTermMemory, Summarizer};
pub use short_term::{ContextSnapshot, ShortTermMemory, Turn};
pub use types::*;
