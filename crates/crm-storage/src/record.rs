// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic record mapping shared by every persisted kind.
//!
//! Each record kind names its table, its explicit column list, and how to
//! build itself from a row. `find`, `all`, `count`, and `delete` are written
//! once against that mapping.

use crm_core::CrmError;
use crm_core::types::{Contact, ContextSummary, Interaction, KnowledgeDocument, Metadata};
use rusqlite::OptionalExtension;
use rusqlite::types::Type;

use crate::database::{Database, map_tr_err};

/// Column mapping for one table.
pub trait Record: Sized + Send + 'static {
    const TABLE: &'static str;

    /// Selected columns, in the order `from_row` reads them.
    const COLUMNS: &'static [&'static str];

    /// Ordering used by [`all`].
    const ORDER_BY: &'static str = "created_at ASC, id ASC";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;

    /// `SELECT <columns> FROM <table>` prefix for ad-hoc queries.
    fn select_sql() -> String {
        format!("SELECT {} FROM {}", Self::COLUMNS.join(", "), Self::TABLE)
    }
}

impl Record for Contact {
    const TABLE: &'static str = "contacts";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "company",
        "status",
        "last_contact_at",
        "created_at",
    ];
    const ORDER_BY: &'static str = "created_at DESC, id DESC";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            company: row.get(3)?,
            status: row.get(4)?,
            last_contact_at: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl Record for Interaction {
    const TABLE: &'static str = "interactions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "contact_id",
        "message",
        "response",
        "context_summary",
        "created_at",
    ];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Interaction {
            id: row.get(0)?,
            contact_id: row.get(1)?,
            message: row.get(2)?,
            response: row.get(3)?,
            context_summary: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl Record for ContextSummary {
    const TABLE: &'static str = "context_summaries";
    const COLUMNS: &'static [&'static str] = &["id", "contact_id", "summary", "created_at"];

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(ContextSummary {
            id: row.get(0)?,
            contact_id: row.get(1)?,
            summary: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl Record for KnowledgeDocument {
    const TABLE: &'static str = "knowledge_documents";
    const COLUMNS: &'static [&'static str] =
        &["id", "content", "embedding", "metadata", "created_at"];
    // Storage order: search ties fall back to this.
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let blob: Vec<u8> = row.get(2)?;
        let metadata_json: String = row.get(3)?;
        let metadata: Metadata = serde_json::from_str(&metadata_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        Ok(KnowledgeDocument {
            id: row.get(0)?,
            content: row.get(1)?,
            embedding: blob_to_vec(&blob),
            metadata,
            created_at: row.get(4)?,
        })
    }
}

/// Fetch one record by primary key.
pub async fn find<R: Record>(db: &Database, id: i64) -> Result<Option<R>, CrmError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("{} WHERE id = ?1", R::select_sql());
            conn.query_row(&sql, [id], R::from_row).optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch every record in the kind's default order.
pub async fn all<R: Record>(db: &Database) -> Result<Vec<R>, CrmError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("{} ORDER BY {}", R::select_sql(), R::ORDER_BY);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], R::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count<R: Record>(db: &Database) -> Result<usize, CrmError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
            conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
        })
        .await
        .map(|n| n as usize)
        .map_err(map_tr_err)
}

/// Delete one record by primary key. True iff a row was removed.
pub async fn delete<R: Record>(db: &Database, id: i64) -> Result<bool, CrmError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
            conn.execute(&sql, [id])
        })
        .await
        .map(|n| n > 0)
        .map_err(map_tr_err)
}

/// Convert an f32 vector to a little-endian BLOB.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a BLOB back to an f32 vector. Trailing partial chunks are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
