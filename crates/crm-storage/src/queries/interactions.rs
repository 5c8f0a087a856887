// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction queries: ordered reads, counts, and batch deletion.

use crm_core::CrmError;
use crm_core::types::{Interaction, NewInteraction};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::record::Record;

/// Insert an interaction and return its identity.
pub async fn insert_interaction(
    db: &Database,
    interaction: &NewInteraction,
) -> Result<i64, CrmError> {
    let interaction = interaction.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO interactions (contact_id, message, response, context_summary)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    interaction.contact_id,
                    interaction.message,
                    interaction.response,
                    interaction.context_summary,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Update message, response, and summary snapshot in place.
pub async fn update_interaction(
    db: &Database,
    interaction: &Interaction,
) -> Result<bool, CrmError> {
    let interaction = interaction.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE interactions SET message = ?1, response = ?2, context_summary = ?3
                 WHERE id = ?4",
                params![
                    interaction.message,
                    interaction.response,
                    interaction.context_summary,
                    interaction.id,
                ],
            )
        })
        .await
        .map(|n| n > 0)
        .map_err(map_tr_err)
}

/// Interactions of one contact, newest first.
pub async fn newest_for_contact(
    db: &Database,
    contact_id: i64,
    limit: usize,
) -> Result<Vec<Interaction>, CrmError> {
    query_interactions(
        db,
        "WHERE contact_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        contact_id,
        limit,
    )
    .await
}

/// Interactions of one contact, oldest first.
pub async fn oldest_for_contact(
    db: &Database,
    contact_id: i64,
    limit: usize,
) -> Result<Vec<Interaction>, CrmError> {
    query_interactions(
        db,
        "WHERE contact_id = ?1 ORDER BY created_at ASC, id ASC LIMIT ?2",
        contact_id,
        limit,
    )
    .await
}

/// Interactions across all contacts, newest first.
pub async fn newest_overall(db: &Database, limit: usize) -> Result<Vec<Interaction>, CrmError> {
    let limit = limit as i64;
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "{} ORDER BY created_at DESC, id DESC LIMIT ?1",
                Interaction::select_sql()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([limit], Interaction::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

async fn query_interactions(
    db: &Database,
    clause: &'static str,
    contact_id: i64,
    limit: usize,
) -> Result<Vec<Interaction>, CrmError> {
    let limit = limit as i64;
    db.connection()
        .call(move |conn| {
            let sql = format!("{} {clause}", Interaction::select_sql());
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![contact_id, limit], Interaction::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_for_contact(db: &Database, contact_id: i64) -> Result<usize, CrmError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM interactions WHERE contact_id = ?1",
                [contact_id],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|n| n as usize)
        .map_err(map_tr_err)
}

/// Count a contact's interactions created strictly after `since`.
pub async fn count_since(db: &Database, contact_id: i64, since: &str) -> Result<usize, CrmError> {
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM interactions WHERE contact_id = ?1 AND created_at > ?2",
                params![contact_id, since],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|n| n as usize)
        .map_err(map_tr_err)
}

/// Delete the given interactions in one transaction. Returns rows removed.
pub async fn delete_batch(db: &Database, ids: &[i64]) -> Result<usize, CrmError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!("DELETE FROM interactions WHERE id IN ({placeholders})");
            let removed = tx.execute(&sql, rusqlite::params_from_iter(ids.iter()))?;
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}
