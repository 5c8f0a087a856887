// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures shared by this crate's unit tests.

use std::sync::Arc;

use crm_config::model::StorageConfig;
use crm_core::StorageAdapter;
use crm_storage::SqliteStorage;
use crm_test_utils::MockEmbedder;

const VOCABULARY: &[&str] = &[
    "alpha", "and", "anything", "beta", "delta", "discounts", "entry", "faq", "for", "gamma",
    "hours", "legacy", "office", "opening", "plans", "policy", "pricing", "refund", "temporary",
    "vector", "visits",
];

/// The shared mock embedder over the words these tests use.
pub fn keyword_embedder() -> Arc<MockEmbedder> {
    Arc::new(MockEmbedder::with_vocabulary(VOCABULARY))
}

/// A fresh SQLite store in a temporary directory.
pub async fn open_storage() -> (Arc<dyn StorageAdapter>, tempfile::TempDir) {
    let (storage, _path, dir) = open_storage_at().await;
    (storage, dir)
}

/// Like [`open_storage`], also returning the database file path.
pub async fn open_storage_at() -> (Arc<dyn StorageAdapter>, std::path::PathBuf, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.db");
    let storage = SqliteStorage::new(StorageConfig {
        database_path: path.to_string_lossy().into_owned(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    (Arc::new(storage), path, dir)
}
