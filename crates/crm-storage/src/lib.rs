// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the CRM agent.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, generic record mapping, and typed
//! queries for contacts, interactions, context summaries, and knowledge
//! documents.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod record;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use record::{Record, blob_to_vec, vec_to_blob};
