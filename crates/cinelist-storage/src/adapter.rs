// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`SessionStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use cinelist_config::model::StorageConfig;
use cinelist_core::list::DEFAULT_PAGE_SIZE;
use cinelist_core::{AdapterType, CinelistError, HealthStatus, PluginAdapter, Session, SessionStore};

use crate::database::{map_tr_err, Database};
use crate::models::SessionRecord;
use crate::queries;

/// Values a brand-new session starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub locale: String,
    pub page_size: u32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// SQLite-backed session store.
///
/// The database is opened by [`SessionStore::initialize`]; every other call
/// fails until then.
pub struct SqliteSessionStore {
    config: StorageConfig,
    defaults: SessionDefaults,
    db: OnceCell<Database>,
}

impl SqliteSessionStore {
    pub fn new(config: StorageConfig, defaults: SessionDefaults) -> Self {
        Self {
            config,
            defaults,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, CinelistError> {
        self.db.get().ok_or_else(|| CinelistError::Storage {
            source: "session store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteSessionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CinelistError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CinelistError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn initialize(&self) -> Result<(), CinelistError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| CinelistError::Storage {
            source: "session store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "session store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CinelistError> {
        self.db()?.checkpoint().await
    }

    async fn load_or_create(&self, external_id: &str) -> Result<Session, CinelistError> {
        let db = self.db()?;
        if let Some(record) = queries::sessions::load_session(db, external_id).await? {
            return Ok(record.into_session(self.defaults.page_size));
        }

        let session = Session::new(
            external_id,
            self.defaults.locale.clone(),
            self.defaults.page_size,
        );
        queries::sessions::save_session(db, SessionRecord::from_session(&session)?).await?;
        debug!(external_id, "created session");
        Ok(session)
    }

    async fn save_all(&self, session: &Session) -> Result<(), CinelistError> {
        let record = SessionRecord::from_session(session)?;
        queries::sessions::save_session(self.db()?, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::list::{Direction, FilterKey};
    use cinelist_core::session::FilmDraft;
    use cinelist_core::token::{Field, StateToken, Workflow};
    use cinelist_core::types::{Credentials, Film, Page, Role, User};
    use cinelist_core::Context;
    use tempfile::tempdir;

    fn store_at(dir: &tempfile::TempDir) -> SqliteSessionStore {
        let path = dir.path().join("sessions.db");
        SqliteSessionStore::new(
            StorageConfig {
                database_path: path.to_string_lossy().into_owned(),
                wal_mode: true,
            },
            SessionDefaults {
                locale: "en".into(),
                page_size: 5,
            },
        )
    }

    #[tokio::test]
    async fn adapter_identity() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.adapter_type(), AdapterType::Storage);
        assert!(store.health_check().await.is_err(), "not initialized yet");

        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
        assert!(store.initialize().await.is_err(), "second initialize must fail");
    }

    #[tokio::test]
    async fn first_load_creates_default_session() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        store.initialize().await.unwrap();

        let session = store.load_or_create("100").await.unwrap();
        assert_eq!(session.external_id, "100");
        assert!(session.is_idle());
        assert_eq!(session.films.page_size(), 5);
        assert_eq!(session.admin.users.page_size(), 5);
        assert!(session.film_detail.draft.is_empty());

        // Persisted immediately.
        let again = store.load_or_create("100").await.unwrap();
        assert_eq!(again, session);
    }

    #[tokio::test]
    async fn save_then_load_round_trips_dialog_state() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        store.initialize().await.unwrap();

        let mut session = store.load_or_create("200").await.unwrap();
        session.state = Some(StateToken::new(Workflow::UpdateFilm, Field::UserRating));
        session.context = Context::Collection;
        session.credentials = Credentials {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
        };
        session.set_user(User {
            id: 5,
            username: "kim".into(),
            role: Role::Admin,
            ..User::default()
        });
        session.film_detail.draft = FilmDraft {
            title: Some("Solaris".into()),
            is_viewed: Some(true),
            user_rating: Some(0.0),
            ..FilmDraft::default()
        };
        session.film_detail.is_edit_viewed = true;
        session.film_detail.index = 2;
        session.films.filters.apply_switch(FilterKey::IsViewed, false);
        session.films.sort.set("rating", Direction::Desc);
        session.films.apply_page(Page {
            items: vec![Film {
                id: 1,
                title: "Stalker".into(),
                ..Film::default()
            }],
            page: 1,
            page_size: 5,
            total_records: 11,
        });
        session.films.go_to(3);

        store.save_all(&session).await.unwrap();
        let loaded = store.load_or_create("200").await.unwrap();
        assert_eq!(loaded, session);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn logout_keeps_identity_and_preferences() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        store.initialize().await.unwrap();

        let mut session = store.load_or_create("300").await.unwrap();
        session.display_name = "Ari".into();
        session.credentials.access_token = Some("t".into());
        session.collections.set_page_size(12);
        session.state = Some(StateToken::new(Workflow::NewCollection, Field::Name));
        session.collection_detail.draft.name = Some("Favs".into());
        store.save_all(&session).await.unwrap();

        store.logout("300").await.unwrap();

        let loaded = store.load_or_create("300").await.unwrap();
        assert_eq!(loaded.display_name, "Ari");
        assert_eq!(loaded.collections.page_size(), 12);
        assert!(!loaded.credentials.is_authenticated());
        assert!(loaded.state.is_none());
        assert!(loaded.collection_detail.draft.name.is_none());
    }
}
