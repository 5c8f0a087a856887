// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini embedding backend.

pub mod client;
pub mod embedding;
pub mod types;

pub use client::GeminiClient;
pub use embedding::GeminiEmbedder;
