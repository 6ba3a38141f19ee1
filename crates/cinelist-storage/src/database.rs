// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle: PRAGMA setup, migrations, WAL checkpoint on close.
//!
//! All statements run on tokio-rusqlite's single background thread. Do not
//! open a second connection for writes.

use std::path::Path;

use cinelist_core::CinelistError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Handle to the session database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and brings the
    /// schema up to date.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, CinelistError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CinelistError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| CinelistError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "session database ready");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Truncates the WAL so the main file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), CinelistError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoints and closes the connection.
    pub async fn close(self) -> Result<(), CinelistError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Maps a tokio-rusqlite failure (closed connection or inner error) to
/// [`CinelistError::Storage`].
pub fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> CinelistError
where
    E: std::error::Error + Send + Sync + 'static,
{
    CinelistError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/sessions.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();

        for table in [
            "sessions",
            "profile_drafts",
            "feedback_drafts",
            "list_states",
            "film_details",
            "collection_details",
            "admin_states",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_skips_applied_migrations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.db");
        let path = path.to_str().unwrap();
        Database::open(path, false).await.unwrap().close().await.unwrap();
        let db = Database::open(path, false).await.unwrap();
        db.close().await.unwrap();
    }
}
