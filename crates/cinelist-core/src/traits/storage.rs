// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::CinelistError;
use crate::session::Session;
use crate::traits::adapter::PluginAdapter;

/// Persists one [`Session`] aggregate per external user identity.
#[async_trait]
pub trait SessionStore: PluginAdapter {
    /// Initializes the backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), CinelistError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), CinelistError>;

    /// Loads the session for `external_id`, creating a default one if none
    /// exists. Every nested sub-state is populated.
    async fn load_or_create(&self, external_id: &str) -> Result<Session, CinelistError>;

    /// Persists the aggregate and every nested sub-state as one unit.
    async fn save_all(&self, session: &Session) -> Result<(), CinelistError>;

    /// Clears credentials and drafts of the stored session, keeping identity
    /// and list-size preferences.
    async fn logout(&self, external_id: &str) -> Result<(), CinelistError> {
        let mut session = self.load_or_create(external_id).await?;
        session.logout();
        self.save_all(&session).await
    }
}
