// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge document persistence.

use crm_core::CrmError;
use crm_core::types::Metadata;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::record::vec_to_blob;

/// Insert content, vector, and metadata as one row.
pub async fn insert_document(
    db: &Database,
    content: &str,
    embedding: &[f32],
    metadata: &Metadata,
) -> Result<i64, CrmError> {
    let content = content.to_string();
    let blob = vec_to_blob(embedding);
    let metadata = serde_json::to_string(metadata).map_err(CrmError::storage)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO knowledge_documents (content, embedding, metadata) VALUES (?1, ?2, ?3)",
                params![content, blob, metadata],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}
