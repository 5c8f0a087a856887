// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation agent for the CRM assistant.
//!
//! [`ConversationAgent`] owns one contact session at a time. Each turn it
//! assembles context from short-term turns, the latest long-term summary,
//! and matching knowledge documents, asks the text-generation provider for
//! a reply, persists the interaction, and keeps both memory tiers within
//! their bounds.

pub mod agent;
pub mod context;
pub mod summary;

pub use agent::{ArchiveOutcome, ConversationAgent, ProcessOutcome};
pub use context::AssembledContext;
pub use summary::{ProviderSummarizer, rolling_summary};
