// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact CRUD operations.

use crm_core::CrmError;
use crm_core::types::{Contact, NewContact};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::queries::NOW;
use crate::record::Record;

/// Insert a contact and return its identity.
pub async fn create_contact(db: &Database, contact: &NewContact) -> Result<i64, CrmError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO contacts (name, email, company, status) VALUES (?1, ?2, ?3, ?4)",
                params![contact.name, contact.email, contact.company, contact.status],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_by_email(db: &Database, email: &str) -> Result<Option<Contact>, CrmError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let sql = format!("{} WHERE email = ?1", Contact::select_sql());
            conn.query_row(&sql, [email], Contact::from_row).optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the mutable fields of an existing contact.
pub async fn update_contact(db: &Database, contact: &Contact) -> Result<bool, CrmError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contacts
                 SET name = ?1, email = ?2, company = ?3, status = ?4, last_contact_at = ?5
                 WHERE id = ?6",
                params![
                    contact.name,
                    contact.email,
                    contact.company,
                    contact.status,
                    contact.last_contact_at,
                    contact.id,
                ],
            )
        })
        .await
        .map(|n| n > 0)
        .map_err(map_tr_err)
}

/// Stamp `last_contact_at` with the current time.
pub async fn touch_contact(db: &Database, id: i64) -> Result<bool, CrmError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("UPDATE contacts SET last_contact_at = {NOW} WHERE id = ?1");
            conn.execute(&sql, [id])
        })
        .await
        .map(|n| n > 0)
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("contacts.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_find_contact() {
        let (db, _dir) = setup_db().await;
        let mut new = NewContact::named("Maria Santos");
        new.email = Some("maria@clinic.example".into());
        new.company = Some("Santos Clinic".into());

        let id = create_contact(&db, &new).await.unwrap();
        let found: Contact = record::find(&db, id).await.unwrap().unwrap();
        assert_eq!(found.name, "Maria Santos");
        assert_eq!(found.status, "new");
        assert!(found.last_contact_at.is_none());

        let by_email = find_by_email(&db, "maria@clinic.example").await.unwrap();
        assert_eq!(by_email.map(|c| c.id), Some(id));
        assert!(find_by_email(&db, "nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (db, _dir) = setup_db().await;
        let mut new = NewContact::named("A");
        new.email = Some("dup@example.com".into());
        create_contact(&db, &new).await.unwrap();
        assert!(create_contact(&db, &new).await.is_err());
    }

    #[tokio::test]
    async fn update_and_touch_contact() {
        let (db, _dir) = setup_db().await;
        let id = create_contact(&db, &NewContact::named("Joao")).await.unwrap();

        let mut contact: Contact = record::find(&db, id).await.unwrap().unwrap();
        contact.status = "customer".into();
        assert!(update_contact(&db, &contact).await.unwrap());

        assert!(touch_contact(&db, id).await.unwrap());
        let reloaded: Contact = record::find(&db, id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, "customer");
        assert!(reloaded.last_contact_at.is_some());

        assert!(!touch_contact(&db, id + 100).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (db, _dir) = setup_db().await;
        let first = create_contact(&db, &NewContact::named("first")).await.unwrap();
        let second = create_contact(&db, &NewContact::named("second")).await.unwrap();

        let all: Vec<Contact> = record::all(&db).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second, first]);
    }
}
