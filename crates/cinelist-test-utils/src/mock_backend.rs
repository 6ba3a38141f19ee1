// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory backend for deterministic dialog tests.
//!
//! `MockBackend` implements `BackendAdapter` over plain vectors. It honours
//! paging, the film filters and sorts, records every call by name, and can
//! be told to fail a call or to reject every issued token.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use cinelist_core::traits::backend::ListQuery;
use cinelist_core::types::{
    AuthGrant, Collection, Credentials, ExternalIdentity, Feedback, Film, MediaRef, Page, User,
};
use cinelist_core::{
    AdapterType, BackendAdapter, CinelistError, HealthStatus, PluginAdapter, Role,
};

#[derive(Default)]
struct State {
    films: Vec<Film>,
    collections: Vec<Collection>,
    /// (collection id, film id)
    members: Vec<(i64, i64)>,
    accounts: HashMap<String, User>,
    feedbacks: Vec<Feedback>,
    tokens: HashSet<String>,
    failures: HashMap<&'static str, u16>,
    calls: Vec<&'static str>,
    next_id: i64,
    default_role: Role,
}

impl State {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Records the call, then applies token checks and injected failures.
    fn enter(&mut self, call: &'static str, creds: &Credentials) -> Result<(), CinelistError> {
        self.calls.push(call);
        match creds.access_token.as_ref() {
            Some(token) if self.tokens.contains(token) => {}
            _ => return Err(CinelistError::Unauthorized),
        }
        if let Some(status) = self.failures.remove(call) {
            return Err(CinelistError::Backend {
                message: format!("{call} failed"),
                status: Some(status),
                source: None,
            });
        }
        Ok(())
    }
}

/// A scriptable in-memory backend.
pub struct MockBackend {
    state: Mutex<State>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..State::default()
            }),
        }
    }

    /// Seeds films owned directly by the user.
    pub async fn add_films(&self, films: Vec<Film>) {
        self.state.lock().await.films.extend(films);
    }

    pub async fn add_collection(&self, collection: Collection, film_ids: &[i64]) {
        let mut state = self.state.lock().await;
        for film_id in film_ids {
            state.members.push((collection.id, *film_id));
        }
        state.collections.push(collection);
    }

    pub async fn add_user(&self, external_id: &str, user: User) {
        self.state
            .lock()
            .await
            .accounts
            .insert(external_id.to_string(), user);
    }

    /// Role given to accounts registered on first contact.
    pub async fn set_default_role(&self, role: Role) {
        self.state.lock().await.default_role = role;
    }

    /// Makes the next call named `call` fail with `status`.
    pub async fn fail_next(&self, call: &'static str, status: u16) {
        self.state.lock().await.failures.insert(call, status);
    }

    /// Invalidates every issued token, as if refresh had failed too.
    pub async fn revoke_tokens(&self) {
        self.state.lock().await.tokens.clear();
    }

    pub async fn films(&self) -> Vec<Film> {
        self.state.lock().await.films.clone()
    }

    pub async fn collections(&self) -> Vec<Collection> {
        self.state.lock().await.collections.clone()
    }

    pub async fn feedbacks(&self) -> Vec<Feedback> {
        self.state.lock().await.feedbacks.clone()
    }

    pub async fn user(&self, external_id: &str) -> Option<User> {
        self.state.lock().await.accounts.get(external_id).cloned()
    }

    pub async fn collection_film_ids(&self, collection_id: i64) -> Vec<i64> {
        let state = self.state.lock().await;
        state
            .members
            .iter()
            .filter(|(c, _)| *c == collection_id)
            .map(|(_, f)| *f)
            .collect()
    }

    /// Names of the calls made so far, in order.
    pub async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self, call: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| **c == call)
            .count()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate<T>(items: Vec<T>, query: &ListQuery) -> Page<T> {
    let page_size = query.page_size.max(1);
    let page = query.page.max(1);
    let total_records = items.len() as u32;
    let start = ((page - 1) * page_size) as usize;
    Page {
        items: items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect(),
        page,
        page_size,
        total_records,
    }
}

fn param<'q>(query: &'q ListQuery, name: &str) -> Option<&'q str> {
    query
        .filters
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn in_range(value: Option<f64>, query: &ListQuery, name: &str) -> bool {
    let min = param(query, &format!("min_{name}")).and_then(|v| v.parse::<f64>().ok());
    let max = param(query, &format!("max_{name}")).and_then(|v| v.parse::<f64>().ok());
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

fn switch(value: bool, query: &ListQuery, name: &str) -> bool {
    param(query, name).is_none_or(|v| v == value.to_string())
}

fn film_matches(film: &Film, query: &ListQuery) -> bool {
    switch(film.is_viewed, query, "is_viewed")
        && switch(film.is_favorite, query, "is_favorite")
        && in_range(film.year.map(f64::from), query, "year")
        && in_range(film.rating.map(f64::from), query, "rating")
        && in_range(film.user_rating.map(f64::from), query, "user_rating")
}

fn sort_films(films: &mut [Film], sort: Option<&str>) {
    let Some(sort) = sort else {
        return;
    };
    let (field, descending) = match sort.strip_prefix('-') {
        Some(field) => (field, true),
        None => (sort, false),
    };
    films.sort_by(|a, b| {
        let ordering = match field {
            "title" => a.title.cmp(&b.title),
            "year" => a.year.cmp(&b.year),
            "rating" => a.rating.partial_cmp(&b.rating).unwrap_or(std::cmp::Ordering::Equal),
            "user_rating" => a
                .user_rating
                .partial_cmp(&b.user_rating)
                .unwrap_or(std::cmp::Ordering::Equal),
            _ => a.id.cmp(&b.id),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn select_films(films: Vec<Film>, query: &ListQuery) -> Page<Film> {
    let mut films: Vec<Film> = films.into_iter().filter(|f| film_matches(f, query)).collect();
    sort_films(&mut films, query.sort.as_deref());
    paginate(films, query)
}

fn not_found(entity: &str, id: i64) -> CinelistError {
    CinelistError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, CinelistError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CinelistError> {
        Ok(())
    }
}

#[async_trait]
impl BackendAdapter for MockBackend {
    async fn authenticate(&self, identity: &ExternalIdentity) -> Result<AuthGrant, CinelistError> {
        let mut state = self.state.lock().await;
        state.calls.push("authenticate");
        if let Some(status) = state.failures.remove("authenticate") {
            return Err(CinelistError::Backend {
                message: "authenticate failed".into(),
                status: Some(status),
                source: None,
            });
        }
        let user = match state.accounts.get(&identity.external_id) {
            Some(user) => user.clone(),
            None => {
                let user = User {
                    id: state.id(),
                    username: identity.display_name.clone(),
                    role: state.default_role,
                    ..User::default()
                };
                state
                    .accounts
                    .insert(identity.external_id.clone(), user.clone());
                user
            }
        };
        let access = format!("access-{}", state.id());
        state.tokens.insert(access.clone());
        Ok(AuthGrant {
            credentials: Credentials {
                access_token: Some(access),
                refresh_token: Some(format!("refresh-{}", user.id)),
            },
            user,
        })
    }

    async fn current_user(&self, creds: &mut Credentials) -> Result<User, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("current_user", creds)?;
        let refresh = creds.refresh_token.clone().unwrap_or_default();
        state
            .accounts
            .values()
            .find(|u| refresh == format!("refresh-{}", u.id))
            .cloned()
            .ok_or(CinelistError::Unauthorized)
    }

    async fn update_user(&self, creds: &mut Credentials, user: &User) -> Result<User, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("update_user", creds)?;
        let account = state
            .accounts
            .values_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| not_found("user", user.id))?;
        account.username = user.username.clone();
        account.email = user.email.clone();
        Ok(account.clone())
    }

    async fn list_films(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("list_films", creds)?;
        Ok(select_films(state.films.clone(), query))
    }

    async fn create_film(&self, creds: &mut Credentials, film: &Film) -> Result<Film, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("create_film", creds)?;
        let film = Film {
            id: state.id(),
            ..film.clone()
        };
        state.films.push(film.clone());
        Ok(film)
    }

    async fn update_film(&self, creds: &mut Credentials, film: &Film) -> Result<Film, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("update_film", creds)?;
        let slot = state
            .films
            .iter_mut()
            .find(|f| f.id == film.id)
            .ok_or_else(|| not_found("film", film.id))?;
        *slot = film.clone();
        Ok(film.clone())
    }

    async fn delete_film(&self, creds: &mut Credentials, film_id: i64) -> Result<(), CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("delete_film", creds)?;
        let before = state.films.len();
        state.films.retain(|f| f.id != film_id);
        if state.films.len() == before {
            return Err(not_found("film", film_id));
        }
        state.members.retain(|(_, f)| *f != film_id);
        Ok(())
    }

    async fn upload_image(
        &self,
        creds: &mut Credentials,
        media: &MediaRef,
    ) -> Result<String, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("upload_image", creds)?;
        Ok(format!("https://images.test/{}.jpg", media.file_id))
    }

    async fn list_collections(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Collection>, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("list_collections", creds)?;
        let collections = state
            .collections
            .iter()
            .filter(|c| switch(c.is_favorite, query, "is_favorite"))
            .cloned()
            .collect();
        Ok(paginate(collections, query))
    }

    async fn create_collection(
        &self,
        creds: &mut Credentials,
        collection: &Collection,
    ) -> Result<Collection, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("create_collection", creds)?;
        let collection = Collection {
            id: state.id(),
            ..collection.clone()
        };
        state.collections.push(collection.clone());
        Ok(collection)
    }

    async fn update_collection(
        &self,
        creds: &mut Credentials,
        collection: &Collection,
    ) -> Result<Collection, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("update_collection", creds)?;
        let slot = state
            .collections
            .iter_mut()
            .find(|c| c.id == collection.id)
            .ok_or_else(|| not_found("collection", collection.id))?;
        *slot = collection.clone();
        Ok(collection.clone())
    }

    async fn delete_collection(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
    ) -> Result<(), CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("delete_collection", creds)?;
        state.collections.retain(|c| c.id != collection_id);
        state.members.retain(|(c, _)| *c != collection_id);
        Ok(())
    }

    async fn list_collection_films(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("list_collection_films", creds)?;
        let ids: HashSet<i64> = state
            .members
            .iter()
            .filter(|(c, _)| *c == collection_id)
            .map(|(_, f)| *f)
            .collect();
        let films = state
            .films
            .iter()
            .filter(|f| ids.contains(&f.id))
            .cloned()
            .collect();
        Ok(select_films(films, query))
    }

    async fn create_collection_film(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        film: &Film,
    ) -> Result<Film, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("create_collection_film", creds)?;
        let film = Film {
            id: state.id(),
            ..film.clone()
        };
        state.films.push(film.clone());
        state.members.push((collection_id, film.id));
        if let Some(c) = state.collections.iter_mut().find(|c| c.id == collection_id) {
            c.total_films += 1;
        }
        Ok(film)
    }

    async fn remove_collection_film(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        film_id: i64,
    ) -> Result<(), CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("remove_collection_film", creds)?;
        state
            .members
            .retain(|(c, f)| !(*c == collection_id && *f == film_id));
        if let Some(c) = state.collections.iter_mut().find(|c| c.id == collection_id) {
            c.total_films = c.total_films.saturating_sub(1);
        }
        Ok(())
    }

    async fn send_feedback(
        &self,
        creds: &mut Credentials,
        feedback: &Feedback,
    ) -> Result<(), CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("send_feedback", creds)?;
        let feedback = Feedback {
            id: state.id(),
            ..feedback.clone()
        };
        state.feedbacks.push(feedback);
        Ok(())
    }

    async fn list_feedbacks(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Feedback>, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("list_feedbacks", creds)?;
        Ok(paginate(state.feedbacks.clone(), query))
    }

    async fn list_users(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<User>, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("list_users", creds)?;
        let mut users: Vec<User> = state
            .accounts
            .values()
            .filter(|u| switch(u.is_banned, query, "is_banned"))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(paginate(users, query))
    }

    async fn set_user_role(
        &self,
        creds: &mut Credentials,
        user_id: i64,
        role: Role,
    ) -> Result<User, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("set_user_role", creds)?;
        let user = state
            .accounts
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| not_found("user", user_id))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn set_user_banned(
        &self,
        creds: &mut Credentials,
        user_id: i64,
        banned: bool,
    ) -> Result<User, CinelistError> {
        let mut state = self.state.lock().await;
        state.enter("set_user_banned", creds)?;
        let user = state
            .accounts
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| not_found("user", user_id))?;
        user.is_banned = banned;
        Ok(user.clone())
    }
}
