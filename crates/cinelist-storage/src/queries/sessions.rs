// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session aggregate reads and writes.

use cinelist_core::CinelistError;
use rusqlite::{params, OptionalExtension, Transaction};

use crate::database::{map_tr_err, Database};
use crate::models::{
    AdminRow, CollectionDetailRow, FeedbackRow, FilmDetailRow, ListRow, ProfileRow,
    SessionRecord, SessionRow,
};

/// Loads every row belonging to `external_id`, or `None` if the session
/// was never saved.
pub async fn load_session(
    db: &Database,
    external_id: &str,
) -> Result<Option<SessionRecord>, CinelistError> {
    let id = external_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<SessionRecord>, rusqlite::Error> {
            let root = conn
                .query_row(
                    "SELECT external_id, display_name, locale, role, is_banned,
                            access_token, refresh_token, user_json, state, context
                     FROM sessions WHERE external_id = ?1",
                    params![id],
                    |row| {
                        Ok(SessionRow {
                            external_id: row.get(0)?,
                            display_name: row.get(1)?,
                            locale: row.get(2)?,
                            role: row.get(3)?,
                            is_banned: row.get(4)?,
                            access_token: row.get(5)?,
                            refresh_token: row.get(6)?,
                            user_json: row.get(7)?,
                            state: row.get(8)?,
                            context: row.get(9)?,
                        })
                    },
                )
                .optional()?;
            let Some(root) = root else {
                return Ok(None);
            };

            let profile = conn
                .query_row(
                    "SELECT username, email FROM profile_drafts WHERE session_id = ?1",
                    params![id],
                    |row| {
                        Ok(ProfileRow {
                            username: row.get(0)?,
                            email: row.get(1)?,
                        })
                    },
                )
                .optional()?;

            let feedback = conn
                .query_row(
                    "SELECT category, text FROM feedback_drafts WHERE session_id = ?1",
                    params![id],
                    |row| {
                        Ok(FeedbackRow {
                            category: row.get(0)?,
                            text: row.get(1)?,
                        })
                    },
                )
                .optional()?;

            let mut stmt = conn.prepare(
                "SELECT list_kind, current_page, page_size, last_page, total_records,
                        filters_json, sort_token, items_json
                 FROM list_states WHERE session_id = ?1",
            )?;
            let lists = stmt
                .query_map(params![id], |row| {
                    Ok(ListRow {
                        list_kind: row.get(0)?,
                        current_page: row.get(1)?,
                        page_size: row.get(2)?,
                        last_page: row.get(3)?,
                        total_records: row.get(4)?,
                        filters_json: row.get(5)?,
                        sort_token: row.get(6)?,
                        items_json: row.get(7)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let film_detail = conn
                .query_row(
                    "SELECT film_json, item_index, draft_json, is_edit_viewed
                     FROM film_details WHERE session_id = ?1",
                    params![id],
                    |row| {
                        Ok(FilmDetailRow {
                            film_json: row.get(0)?,
                            item_index: row.get(1)?,
                            draft_json: row.get(2)?,
                            is_edit_viewed: row.get(3)?,
                        })
                    },
                )
                .optional()?;

            let collection_detail = conn
                .query_row(
                    "SELECT collection_json, item_index, draft_json
                     FROM collection_details WHERE session_id = ?1",
                    params![id],
                    |row| {
                        Ok(CollectionDetailRow {
                            collection_json: row.get(0)?,
                            item_index: row.get(1)?,
                            draft_json: row.get(2)?,
                        })
                    },
                )
                .optional()?;

            let admin = conn
                .query_row(
                    "SELECT selected_user_json FROM admin_states WHERE session_id = ?1",
                    params![id],
                    |row| {
                        Ok(AdminRow {
                            selected_user_json: row.get(0)?,
                        })
                    },
                )
                .optional()?;

            Ok(Some(SessionRecord {
                root,
                profile,
                feedback,
                lists,
                film_detail,
                collection_detail,
                admin,
            }))
        })
        .await
        .map_err(map_tr_err)
}

/// Writes the root row and every sub-state row in one transaction.
pub async fn save_session(db: &Database, record: SessionRecord) -> Result<(), CinelistError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            write_record(&tx, &record)?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

fn write_record(tx: &Transaction<'_>, record: &SessionRecord) -> Result<(), rusqlite::Error> {
    let root = &record.root;
    let id = &root.external_id;

    // Upsert rather than REPLACE: a REPLACE would cascade-delete the sub-states.
    tx.execute(
        "INSERT INTO sessions (external_id, display_name, locale, role, is_banned,
                               access_token, refresh_token, user_json, state, context)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(external_id) DO UPDATE SET
             display_name = excluded.display_name,
             locale = excluded.locale,
             role = excluded.role,
             is_banned = excluded.is_banned,
             access_token = excluded.access_token,
             refresh_token = excluded.refresh_token,
             user_json = excluded.user_json,
             state = excluded.state,
             context = excluded.context,
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![
            id,
            root.display_name,
            root.locale,
            root.role,
            root.is_banned,
            root.access_token,
            root.refresh_token,
            root.user_json,
            root.state,
            root.context,
        ],
    )?;

    if let Some(profile) = &record.profile {
        tx.execute(
            "INSERT OR REPLACE INTO profile_drafts (session_id, username, email)
             VALUES (?1, ?2, ?3)",
            params![id, profile.username, profile.email],
        )?;
    }

    if let Some(feedback) = &record.feedback {
        tx.execute(
            "INSERT OR REPLACE INTO feedback_drafts (session_id, category, text)
             VALUES (?1, ?2, ?3)",
            params![id, feedback.category, feedback.text],
        )?;
    }

    for list in &record.lists {
        tx.execute(
            "INSERT OR REPLACE INTO list_states (session_id, list_kind, current_page, page_size,
                                                 last_page, total_records, filters_json,
                                                 sort_token, items_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                list.list_kind,
                list.current_page,
                list.page_size,
                list.last_page,
                list.total_records,
                list.filters_json,
                list.sort_token,
                list.items_json,
            ],
        )?;
    }

    if let Some(detail) = &record.film_detail {
        tx.execute(
            "INSERT OR REPLACE INTO film_details (session_id, film_json, item_index, draft_json,
                                                  is_edit_viewed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                detail.film_json,
                detail.item_index,
                detail.draft_json,
                detail.is_edit_viewed,
            ],
        )?;
    }

    if let Some(detail) = &record.collection_detail {
        tx.execute(
            "INSERT OR REPLACE INTO collection_details (session_id, collection_json, item_index,
                                                        draft_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, detail.collection_json, detail.item_index, detail.draft_json],
        )?;
    }

    if let Some(admin) = &record.admin {
        tx.execute(
            "INSERT OR REPLACE INTO admin_states (session_id, selected_user_json)
             VALUES (?1, ?2)",
            params![id, admin.selected_user_json],
        )?;
    }

    Ok(())
}

/// Removes a session and, through the foreign keys, all of its sub-states.
pub async fn delete_session(db: &Database, external_id: &str) -> Result<bool, CinelistError> {
    let id = external_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute("DELETE FROM sessions WHERE external_id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::Session;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("sessions.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    async fn count(db: &Database, table: &'static str) -> i64 {
        db.connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_session_loads_as_none() {
        let (db, _dir) = setup_db().await;
        assert!(load_session(&db, "nobody").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn save_writes_every_sub_state() {
        let (db, _dir) = setup_db().await;
        let session = Session::new("11", "en", 5);
        save_session(&db, SessionRecord::from_session(&session).unwrap())
            .await
            .unwrap();

        assert_eq!(count(&db, "sessions").await, 1);
        assert_eq!(count(&db, "profile_drafts").await, 1);
        assert_eq!(count(&db, "feedback_drafts").await, 1);
        assert_eq!(count(&db, "list_states").await, 5);
        assert_eq!(count(&db, "film_details").await, 1);
        assert_eq!(count(&db, "collection_details").await, 1);
        assert_eq!(count(&db, "admin_states").await, 1);

        // Saving again updates in place.
        save_session(&db, SessionRecord::from_session(&session).unwrap())
            .await
            .unwrap();
        assert_eq!(count(&db, "list_states").await, 5);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_cascades_to_sub_states() {
        let (db, _dir) = setup_db().await;
        let session = Session::new("12", "en", 5);
        save_session(&db, SessionRecord::from_session(&session).unwrap())
            .await
            .unwrap();

        assert!(delete_session(&db, "12").await.unwrap());
        assert_eq!(count(&db, "list_states").await, 0);
        assert_eq!(count(&db, "film_details").await, 0);
        assert!(!delete_session(&db, "12").await.unwrap());
        db.close().await.unwrap();
    }
}
