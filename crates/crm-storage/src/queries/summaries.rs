// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context summary operations. Summaries are append-only.

use crm_core::CrmError;
use crm_core::types::ContextSummary;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::record::Record;

/// Append a summary. Fails with a constraint error if the contact is unknown.
pub async fn insert_summary(db: &Database, contact_id: i64, summary: &str) -> Result<i64, CrmError> {
    let summary = summary.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO context_summaries (contact_id, summary) VALUES (?1, ?2)",
                params![contact_id, summary],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Summaries for a contact, newest first, optionally limited.
pub async fn summaries_for_contact(
    db: &Database,
    contact_id: i64,
    limit: Option<usize>,
) -> Result<Vec<ContextSummary>, CrmError> {
    // SQLite treats a negative LIMIT as unbounded.
    let limit = limit.map_or(-1, |l| l as i64);
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "{} WHERE contact_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
                ContextSummary::select_sql()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![contact_id, limit], ContextSummary::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::contacts::create_contact;
    use crm_core::types::NewContact;
    use tempfile::tempdir;

    #[tokio::test]
    async fn summaries_are_newest_first_and_limited() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("summaries.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        let contact = create_contact(&db, &NewContact::named("Ana")).await.unwrap();

        insert_summary(&db, contact, "first").await.unwrap();
        insert_summary(&db, contact, "second").await.unwrap();
        insert_summary(&db, contact, "third").await.unwrap();

        let latest = summaries_for_contact(&db, contact, Some(1)).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].summary, "third");

        let all = summaries_for_contact(&db, contact, None).await.unwrap();
        let texts: Vec<&str> = all.iter().map(|s| s.summary.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn orphan_summary_is_rejected() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("orphan.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let err = insert_summary(&db, 77, "nobody").await.unwrap_err();
        assert!(matches!(err, CrmError::Storage { .. }));
    }
}
