// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dialog testing.
//!
//! `TestHarness` assembles a complete dialog stack: a temp SQLite session
//! store, the in-memory backend, a recording renderer and the real
//! [`Dispatcher`]. Helpers drive it the way a transport would.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use cinelist_config::model::{DialogConfig, StorageConfig};
use cinelist_core::types::{Collection, EventKind, Film, InboundEvent, MediaRef};
use cinelist_core::{Action, CinelistError, Role, Session, SessionStore, View};
use cinelist_dialog::Dispatcher;
use cinelist_storage::{SessionDefaults, SqliteSessionStore};

use crate::mock_backend::MockBackend;
use crate::mock_channel;
use crate::mock_renderer::MockRenderer;

/// External id every harness event is sent from.
pub const TEST_USER: &str = "4242";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    films: Vec<Film>,
    collections: Vec<(Collection, Vec<i64>)>,
    default_role: Role,
    page_size: u32,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            films: Vec::new(),
            collections: Vec::new(),
            default_role: Role::User,
            page_size: DialogConfig::default().default_page_size,
        }
    }

    /// Seed the backend with films.
    pub fn with_films(mut self, films: Vec<Film>) -> Self {
        self.films = films;
        self
    }

    /// Seed the backend with a collection holding the given film ids.
    pub fn with_collection(mut self, collection: Collection, film_ids: &[i64]) -> Self {
        self.collections.push((collection, film_ids.to_vec()));
        self
    }

    /// Role given to accounts the backend registers on first contact.
    pub fn with_role(mut self, role: Role) -> Self {
        self.default_role = role;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, CinelistError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| CinelistError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("sessions.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let defaults = SessionDefaults {
            page_size: self.page_size,
            ..SessionDefaults::default()
        };
        let store = SqliteSessionStore::new(storage_config, defaults);
        store.initialize().await?;
        let store = Arc::new(store);

        let backend = Arc::new(MockBackend::new());
        backend.add_films(self.films).await;
        for (collection, film_ids) in self.collections {
            backend.add_collection(collection, &film_ids).await;
        }
        backend.set_default_role(self.default_role).await;

        let renderer = Arc::new(MockRenderer::new());
        let config = DialogConfig {
            default_page_size: self.page_size,
            ..DialogConfig::default()
        };
        let dispatcher = Dispatcher::new(
            store.clone(),
            backend.clone(),
            renderer.clone(),
            config,
        );

        Ok(TestHarness {
            dispatcher,
            store,
            backend,
            renderer,
            next_update: AtomicI64::new(1),
            _temp_dir: temp_dir,
        })
    }
}

/// A complete dialog stack with mock collaborators and temp storage.
pub struct TestHarness {
    pub dispatcher: Dispatcher,
    /// SQLite session store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteSessionStore>,
    pub backend: Arc<MockBackend>,
    pub renderer: Arc<MockRenderer>,
    next_update: AtomicI64,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Dispatches one event of `kind` from [`TEST_USER`] and returns the
    /// views it produced.
    pub async fn send(&self, kind: EventKind) -> Result<Vec<View>, CinelistError> {
        let update_id = self.next_update.fetch_add(1, Ordering::Relaxed);
        self.dispatch(mock_channel::event(update_id, TEST_USER, kind))
            .await
    }

    /// Dispatches a prepared event and returns the views it produced.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<Vec<View>, CinelistError> {
        self.renderer.take_views().await;
        self.dispatcher.dispatch(event).await?;
        Ok(self.renderer.take_views().await)
    }

    /// Sends `/name`.
    pub async fn command(&self, name: &str) -> Result<Vec<View>, CinelistError> {
        self.send(EventKind::Command {
            name: name.to_string(),
        })
        .await
    }

    /// Presses a button carrying `action`.
    pub async fn press(&self, action: Action) -> Result<Vec<View>, CinelistError> {
        self.press_token(&action.token()).await
    }

    /// Presses a button carrying a raw token, grammar or not.
    pub async fn press_token(&self, token: &str) -> Result<Vec<View>, CinelistError> {
        self.send(EventKind::Callback {
            token: token.to_string(),
        })
        .await
    }

    pub async fn text(&self, body: &str) -> Result<Vec<View>, CinelistError> {
        self.send(EventKind::Text(body.to_string())).await
    }

    pub async fn media(&self, file_id: &str) -> Result<Vec<View>, CinelistError> {
        self.send(EventKind::Media(MediaRef {
            file_id: file_id.to_string(),
            url: None,
        }))
        .await
    }

    /// The persisted session of [`TEST_USER`].
    pub async fn session(&self) -> Result<Session, CinelistError> {
        self.store.load_or_create(TEST_USER).await
    }
}

/// A film with only the fields tests usually care about.
pub fn film(id: i64, title: &str, year: i32, rating: f32) -> Film {
    Film {
        id,
        title: title.to_string(),
        year: Some(year),
        rating: Some(rating),
        ..Film::default()
    }
}

/// `count` films with ids `1..=count` and ratings cycling through 1..=10.
pub fn films(count: i64) -> Vec<Film> {
    (1..=count)
        .map(|id| film(id, &format!("Film {id}"), 1990 + id as i32, ((id - 1) % 10 + 1) as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_and_answers_start() {
        let harness = TestHarness::builder().build().await.unwrap();
        let views = harness.command("start").await.unwrap();
        assert!(
            views.iter().any(|v| matches!(v, View::MainMenu { .. })),
            "got {views:?}"
        );

        let session = harness.session().await.unwrap();
        assert!(session.credentials.is_authenticated());
        assert_eq!(harness.backend.call_count("authenticate").await, 1);
    }

    #[test]
    fn seeded_films_cycle_ratings() {
        let seeded = films(12);
        assert_eq!(seeded[0].rating, Some(1.0));
        assert_eq!(seeded[9].rating, Some(10.0));
        assert_eq!(seeded[10].rating, Some(1.0));
    }
}
