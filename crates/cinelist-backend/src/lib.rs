// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST backend adapter for the cinelist bot.
//!
//! Implements [`BackendAdapter`] over the film backend's JSON API:
//! bearer-token auth with one transparent refresh, and list endpoints that
//! take `page`, `page_size`, filter and `sort` query parameters.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use cinelist_config::model::BackendConfig;
use cinelist_core::traits::{BackendAdapter, ListQuery, PluginAdapter};
use cinelist_core::types::{
    AdapterType, AuthGrant, Collection, Credentials, ExternalIdentity, Feedback, Film,
    HealthStatus, MediaRef, Page, Role, User,
};
use cinelist_core::CinelistError;
use tracing::info;

use crate::client::{ApiRequest, BackendClient};
use crate::types::{
    AuthRequest, AuthResponse, BanUpdate, ImageUploadRequest, ImageUploadResponse, RoleUpdate,
};

/// Backend adapter talking to the film REST service.
pub struct RestBackend {
    client: BackendClient,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, CinelistError> {
        let client = BackendClient::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(base_url = %config.base_url, "REST backend configured");
        Ok(Self { client })
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        creds: &mut Credentials,
        path: String,
        query: &ListQuery,
    ) -> Result<Page<T>, CinelistError> {
        let request = ApiRequest::get(path).query(query.to_pairs());
        self.client.authorized(creds, &request).await
    }
}

#[async_trait]
impl PluginAdapter for RestBackend {
    fn name(&self) -> &str {
        "rest"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, CinelistError> {
        let request = ApiRequest::get("/health");
        match self.client.public::<serde_json::Value>(&request).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), CinelistError> {
        Ok(())
    }
}

#[async_trait]
impl BackendAdapter for RestBackend {
    async fn authenticate(&self, identity: &ExternalIdentity) -> Result<AuthGrant, CinelistError> {
        let request = ApiRequest::post("/auth/telegram").json(&AuthRequest {
            external_id: &identity.external_id,
            display_name: &identity.display_name,
            locale: identity.locale.as_deref(),
        })?;
        let response: AuthResponse = self.client.public(&request).await?;
        Ok(AuthGrant {
            credentials: Credentials {
                access_token: Some(response.tokens.access_token),
                refresh_token: response.tokens.refresh_token,
            },
            user: response.user,
        })
    }

    async fn current_user(&self, creds: &mut Credentials) -> Result<User, CinelistError> {
        self.client
            .authorized(creds, &ApiRequest::get("/users/me"))
            .await
    }

    async fn update_user(
        &self,
        creds: &mut Credentials,
        user: &User,
    ) -> Result<User, CinelistError> {
        let request = ApiRequest::put("/users/me").json(user)?;
        self.client.authorized(creds, &request).await
    }

    async fn list_films(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError> {
        self.list(creds, "/films".to_string(), query).await
    }

    async fn create_film(
        &self,
        creds: &mut Credentials,
        film: &Film,
    ) -> Result<Film, CinelistError> {
        let request = ApiRequest::post("/films").json(film)?;
        self.client.authorized(creds, &request).await
    }

    async fn update_film(
        &self,
        creds: &mut Credentials,
        film: &Film,
    ) -> Result<Film, CinelistError> {
        let request = ApiRequest::put(format!("/films/{}", film.id)).json(film)?;
        self.client.authorized(creds, &request).await
    }

    async fn delete_film(&self, creds: &mut Credentials, film_id: i64) -> Result<(), CinelistError> {
        self.client
            .authorized_empty(creds, &ApiRequest::delete(format!("/films/{film_id}")))
            .await
    }

    async fn upload_image(
        &self,
        creds: &mut Credentials,
        media: &MediaRef,
    ) -> Result<String, CinelistError> {
        let request = ApiRequest::post("/images").json(&ImageUploadRequest {
            file_id: &media.file_id,
            source_url: media.url.as_deref(),
        })?;
        let response: ImageUploadResponse = self.client.authorized(creds, &request).await?;
        Ok(response.url)
    }

    async fn list_collections(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Collection>, CinelistError> {
        self.list(creds, "/collections".to_string(), query).await
    }

    async fn create_collection(
        &self,
        creds: &mut Credentials,
        collection: &Collection,
    ) -> Result<Collection, CinelistError> {
        let request = ApiRequest::post("/collections").json(collection)?;
        self.client.authorized(creds, &request).await
    }

    async fn update_collection(
        &self,
        creds: &mut Credentials,
        collection: &Collection,
    ) -> Result<Collection, CinelistError> {
        let request =
            ApiRequest::put(format!("/collections/{}", collection.id)).json(collection)?;
        self.client.authorized(creds, &request).await
    }

    async fn delete_collection(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
    ) -> Result<(), CinelistError> {
        let request = ApiRequest::delete(format!("/collections/{collection_id}"));
        self.client.authorized_empty(creds, &request).await
    }

    async fn list_collection_films(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError> {
        self.list(creds, format!("/collections/{collection_id}/films"), query)
            .await
    }

    async fn create_collection_film(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        film: &Film,
    ) -> Result<Film, CinelistError> {
        let request =
            ApiRequest::post(format!("/collections/{collection_id}/films")).json(film)?;
        self.client.authorized(creds, &request).await
    }

    async fn remove_collection_film(
        &self,
        creds: &mut Credentials,
        collection_id: i64,
        film_id: i64,
    ) -> Result<(), CinelistError> {
        let request = ApiRequest::delete(format!("/collections/{collection_id}/films/{film_id}"));
        self.client.authorized_empty(creds, &request).await
    }

    async fn send_feedback(
        &self,
        creds: &mut Credentials,
        feedback: &Feedback,
    ) -> Result<(), CinelistError> {
        let request = ApiRequest::post("/feedbacks").json(feedback)?;
        self.client.authorized_empty(creds, &request).await
    }

    async fn list_feedbacks(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<Feedback>, CinelistError> {
        self.list(creds, "/feedbacks".to_string(), query).await
    }

    async fn list_users(
        &self,
        creds: &mut Credentials,
        query: &ListQuery,
    ) -> Result<Page<User>, CinelistError> {
        self.list(creds, "/users".to_string(), query).await
    }

    async fn set_user_role(
        &self,
        creds: &mut Credentials,
        user_id: i64,
        role: Role,
    ) -> Result<User, CinelistError> {
        let request = ApiRequest::put(format!("/users/{user_id}/role")).json(&RoleUpdate { role })?;
        self.client.authorized(creds, &request).await
    }

    async fn set_user_banned(
        &self,
        creds: &mut Credentials,
        user_id: i64,
        banned: bool,
    ) -> Result<User, CinelistError> {
        let request = ApiRequest::put(format!("/users/{user_id}/ban"))
            .json(&BanUpdate { is_banned: banned })?;
        self.client.authorized(creds, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::list::{Direction, FilterKey, ListState};
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> RestBackend {
        RestBackend::new(&BackendConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn creds() -> Credentials {
        Credentials {
            access_token: Some("t".into()),
            refresh_token: Some("r".into()),
        }
    }

    #[tokio::test]
    async fn authenticate_returns_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/telegram"))
            .and(body_partial_json(serde_json::json!({"external_id": "42"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "a",
                "refresh_token": "r",
                "user": {"id": 8, "username": "ann"}
            })))
            .mount(&server)
            .await;

        let grant = backend(&server)
            .authenticate(&ExternalIdentity {
                external_id: "42".into(),
                display_name: "Ann".into(),
                locale: Some("en".into()),
            })
            .await
            .unwrap();
        assert!(grant.credentials.is_authenticated());
        assert_eq!(grant.user.id, 8);
        assert_eq!(grant.user.role, Role::User);
    }

    #[tokio::test]
    async fn list_films_sends_filters_and_sort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films"))
            .and(query_param("page", "1"))
            .and(query_param("page_size", "5"))
            .and(query_param("min_rating", "7"))
            .and(query_param("max_rating", "10"))
            .and(query_param("sort", "-year"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": 1, "title": "Heat", "rating": 8.3}],
                "page": 1,
                "page_size": 5,
                "total_records": 11
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut list = ListState::<Film>::with_page_size(5);
        list.filters.apply_range(FilterKey::Rating, Some(7.0), Some(10.0));
        list.sort.set("year", Direction::Desc);

        let page = backend(&server)
            .list_films(&mut creds(), &ListQuery::for_list(&list))
            .await
            .unwrap();
        assert_eq!(page.items[0].title, "Heat");
        assert_eq!(page.last_page(), 3);
    }

    #[tokio::test]
    async fn collection_film_routes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/3/films"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"id": 9, "title": "Dune"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/collections/3/films/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend(&server);
        let mut creds = creds();
        let film = Film {
            title: "Dune".into(),
            ..Film::default()
        };
        let created = backend.create_collection_film(&mut creds, 3, &film).await.unwrap();
        assert_eq!(created.id, 9);
        backend.remove_collection_film(&mut creds, 3, 9).await.unwrap();
    }

    #[tokio::test]
    async fn moderation_calls() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/5/role"))
            .and(body_partial_json(serde_json::json!({"role": "admin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5, "username": "bo", "role": "admin"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/users/5/ban"))
            .and(body_partial_json(serde_json::json!({"is_banned": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5, "username": "bo", "is_banned": true
            })))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let mut creds = creds();
        let user = backend.set_user_role(&mut creds, 5, Role::Admin).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        let user = backend.set_user_banned(&mut creds, 5, true).await.unwrap();
        assert!(user.is_banned);
    }

    #[tokio::test]
    async fn health_check_reports_unreachable_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let status = backend(&server).health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Unhealthy(_)));
    }
}
