// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the CRM agent.
//!
//! - [`MockProvider`]: queued replies and scripted failures
//! - [`MockEmbedder`]: deterministic bag-of-words vectors with a call counter
//! - [`FaultyStorage`]: SQLite store that can be told to fail summary writes or deletes
//! - [`TestHarness`]: temp database, one contact, and a started agent

pub mod faulty_storage;
pub mod harness;
pub mod mock_embedder;
pub mod mock_provider;

pub use faulty_storage::FaultyStorage;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
