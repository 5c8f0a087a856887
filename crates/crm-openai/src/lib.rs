// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI backends for the CRM agent.
//!
//! [`OpenAiProvider`] generates replies through chat completions and
//! [`OpenAiEmbedder`] produces vectors for the knowledge base. Both share
//! [`OpenAiClient`] for authentication and retry handling.

pub mod client;
pub mod embedding;
pub mod provider;
pub mod types;

pub use client::{ErrorSurface, OpenAiClient};
pub use embedding::OpenAiEmbedder;
pub use provider::OpenAiProvider;
