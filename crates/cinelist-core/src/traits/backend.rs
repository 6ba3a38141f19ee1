// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend adapter trait for the film/collection/user REST service.
//!
//! Every authenticated call takes the session's [`Credentials`] mutably: an
//! implementation that refreshes an expired access token writes the new pair
//! back so the caller's session picks it up on the next save.

use async_trait::async_trait;

use crate::error::CinelistError;
use crate::list::ListState;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    AuthGrant, Collection, Credentials, ExternalIdentity, Feedback, Film, MediaRef, Page, Role,
    User,
};

/// Page, filter and sort parameters for a list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: Vec<(String, String)>,
    /// Combined sort token (`"-field"` for descending).
    pub sort: Option<String>,
}

impl ListQuery {
    /// Query for the page the list cursor currently points at.
    pub fn for_list<T>(list: &ListState<T>) -> Self {
        Self {
            page: list.current_page(),
            page_size: list.page_size(),
            filters: list.filters.query_params(),
            sort: list.sort.token(),
        }
    }

    /// Flattens into URL query pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.filters.iter().cloned());
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }
}

/// Authenticated CRUD against the backend REST service.
#[async_trait]
pub trait BackendAdapter: PluginAdapter {
    /// Logs in (registering on first contact) with the transport identity.
    async fn authenticate(&self, identity: &ExternalIdentity) -> Result<AuthGrant, CinelistError>;

    async fn current_user(&self, creds: &mut Credentials) -> Result<User, CinelistError>;

    async fn update_user(&self, creds: &mut Credentials, user: &User)
    -> Result<User, CinelistError>;

    // --- Films ---

    async fn list_films(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError>;

    async fn create_film(&self, creds: &mut Credentials, film: &Film)
    -> Result<Film, CinelistError>;

    async fn update_film(&self, creds: &mut Credentials, film: &Film)
    -> Result<Film, CinelistError>;

    async fn delete_film(&self, creds: &mut Credentials, film_id: i64) -> Result<(), CinelistError>;

    /// Stores an uploaded image and returns its public URL.
    async fn upload_image(
        &self,
        creds: &mut Credentials,
        media: &MediaRef,
    ) -> Result<String, CinelistError>;

    // --- Collections ---

    async fn list_collections(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Collection>, CinelistError>;

    async fn create_collection(
        &self,
        creds: &mut Credentials,
        collection: &Collection,
    ) -> Result<Collection, CinelistError>;

    async fn update_collection(
        &self,
        creds: &mut Credentials,
        collection: &Collection,
    ) -> Result<Collection, CinelistError>;

    async fn delete_collection(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
    ) -> Result<(), CinelistError>;

    // --- Collection films ---

    async fn list_collection_films(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError>;

    /// Creates a film and attaches it to the collection.
    async fn create_collection_film(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        film: &Film,
    ) -> Result<Film, CinelistError>;

    async fn remove_collection_film(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        film_id: i64,
    ) -> Result<(), CinelistError>;

    // --- Feedback & moderation ---

    async fn send_feedback(
        &self,
        creds: &mut Credentials,
        feedback: &Feedback,
    ) -> Result<(), CinelistError>;

    async fn list_feedbacks(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Feedback>, CinelistError>;

    async fn list_users(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<User>, CinelistError>;

    async fn set_user_role(
        &self,
        creds: &mut Credentials,
        user_id: i64,
        role: Role,
    ) -> Result<User, CinelistError>;

    async fn set_user_banned(
        &self,
        creds: &mut Credentials,
        user_id: i64,
        banned: bool,
    ) -> Result<User, CinelistError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{Direction, FilterKey};

    #[test]
    fn query_follows_list_cursor() {
        let mut list = ListState::<Film>::with_page_size(4);
        list.filters.apply_switch(FilterKey::IsViewed, true);
        list.sort.set("year", Direction::Desc);
        let query = ListQuery::for_list(&list);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 4);
        assert_eq!(query.sort.as_deref(), Some("-year"));

        let pairs = query.to_pairs();
        assert_eq!(pairs[0], ("page".into(), "1".into()));
        assert_eq!(pairs[1], ("page_size".into(), "4".into()));
        assert!(pairs.contains(&("is_viewed".into(), "true".into())));
        assert!(pairs.contains(&("sort".into(), "-year".into())));
    }
}
