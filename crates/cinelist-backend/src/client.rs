// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the backend REST API.
//!
//! [`BackendClient`] builds requests, attaches the bearer token, and on a
//! 401 refreshes the token pair once and replays the request. A second 401,
//! or a failed refresh, surfaces as [`CinelistError::Unauthorized`].

use std::time::Duration;

use cinelist_core::types::Credentials;
use cinelist_core::CinelistError;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{ApiErrorBody, RefreshRequest, TokenPair};

/// One REST call, replayable after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, CinelistError> {
        let value = serde_json::to_value(body).map_err(|e| CinelistError::Backend {
            message: format!("failed to encode request body: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;
        self.body = Some(value);
        Ok(self)
    }
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CinelistError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CinelistError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, CinelistError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| CinelistError::Backend {
            message: format!("HTTP request failed: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;
        debug!(method = %request.method, path = %request.path, status = %response.status(), "backend response");
        Ok(response)
    }

    /// Sends an unauthenticated request and decodes the JSON response.
    pub async fn public<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, CinelistError> {
        let response = self.send(request, None).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(CinelistError::Unauthorized);
        }
        decode(request, response).await
    }

    /// Sends an authenticated request and decodes the JSON response.
    pub async fn authorized<T: DeserializeOwned>(
        &self,
        creds: &mut Credentials,
        request: &ApiRequest,
    ) -> Result<T, CinelistError> {
        let response = self.send_authorized(creds, request).await?;
        decode(request, response).await
    }

    /// Sends an authenticated request whose response body is irrelevant.
    pub async fn authorized_empty(
        &self,
        creds: &mut Credentials,
        request: &ApiRequest,
    ) -> Result<(), CinelistError> {
        let response = self.send_authorized(creds, request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(error_for(request, status, response).await)
    }

    async fn send_authorized(
        &self,
        creds: &mut Credentials,
        request: &ApiRequest,
    ) -> Result<reqwest::Response, CinelistError> {
        let token = creds
            .access_token
            .clone()
            .ok_or(CinelistError::Unauthorized)?;
        let response = self.send(request, Some(&token)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path = %request.path, "access token rejected, refreshing");
        self.refresh(creds).await?;
        let token = creds
            .access_token
            .clone()
            .ok_or(CinelistError::Unauthorized)?;
        let response = self.send(request, Some(&token)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path, "refreshed token rejected");
            return Err(CinelistError::Unauthorized);
        }
        Ok(response)
    }

    /// Exchanges the refresh token for a new pair, writing it into `creds`.
    pub async fn refresh(&self, creds: &mut Credentials) -> Result<(), CinelistError> {
        let refresh_token = creds
            .refresh_token
            .clone()
            .ok_or(CinelistError::Unauthorized)?;
        let request = ApiRequest::post("/auth/refresh").json(&RefreshRequest {
            refresh_token: &refresh_token,
        })?;
        let pair: TokenPair = match self.public(&request).await {
            Ok(pair) => pair,
            // Any rejection of the refresh token means the user must log in again.
            Err(CinelistError::Backend {
                status: Some(400..=499),
                ..
            }) => return Err(CinelistError::Unauthorized),
            Err(e) => return Err(e),
        };
        creds.access_token = Some(pair.access_token);
        if pair.refresh_token.is_some() {
            creds.refresh_token = pair.refresh_token;
        }
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(
    request: &ApiRequest,
    response: reqwest::Response,
) -> Result<T, CinelistError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_for(request, status, response).await);
    }
    let body = response.text().await.map_err(|e| CinelistError::Backend {
        message: format!("failed to read response body: {e}"),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| CinelistError::Backend {
        message: format!("failed to parse {} response: {e}", request.path),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })
}

async fn error_for(
    request: &ApiRequest,
    status: StatusCode,
    response: reqwest::Response,
) -> CinelistError {
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return CinelistError::NotFound {
            entity: "resource".to_string(),
            id: request.path.clone(),
        };
    }
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) => format!("backend returned {status}: {}", err.message),
        Err(_) => format!("backend returned {status}: {body}"),
    };
    CinelistError::Backend {
        message,
        status: Some(status.as_u16()),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn creds() -> Credentials {
        Credentials {
            access_token: Some("old".into()),
            refresh_token: Some("refresh-1".into()),
        }
    }

    fn client(server: &MockServer) -> BackendClient {
        BackendClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_bearer_token_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films"))
            .and(header("authorization", "Bearer old"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let mut creds = creds();
        let request = ApiRequest::get("/films").query(vec![("page".into(), "2".into())]);
        let body: serde_json::Value = client(&server).authorized(&mut creds, &request).await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn refreshes_once_on_401_and_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(serde_json::json!({"refresh_token": "refresh-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new",
                "refresh_token": "refresh-2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let mut creds = creds();
        let body: serde_json::Value = client(&server)
            .authorized(&mut creds, &ApiRequest::get("/users/me"))
            .await
            .unwrap();
        assert_eq!(body["id"], 1);
        assert_eq!(creds.access_token.as_deref(), Some("new"));
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn failed_refresh_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let mut creds = creds();
        let err = client(&server)
            .authorized::<serde_json::Value>(&mut creds, &ApiRequest::get("/films"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized(), "got {err:?}");
    }

    #[tokio::test]
    async fn second_401_after_refresh_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/films/4"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "new"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut creds = creds();
        let err = client(&server)
            .authorized_empty(&mut creds, &ApiRequest::delete("/films/4"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        // The refresh token survives a pair without one.
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_without_a_request() {
        let server = MockServer::start().await;
        let mut creds = Credentials::default();
        let err = client(&server)
            .authorized::<serde_json::Value>(&mut creds, &ApiRequest::get("/films"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/films/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/films"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"detail": "title too long"})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let mut creds = creds();
        let err = client
            .authorized::<serde_json::Value>(&mut creds, &ApiRequest::get("/films/9"))
            .await
            .unwrap_err();
        assert!(matches!(err, CinelistError::NotFound { .. }));

        let request = ApiRequest::post("/films").json(&serde_json::json!({})).unwrap();
        let err = client
            .authorized::<serde_json::Value>(&mut creds, &request)
            .await
            .unwrap_err();
        match err {
            CinelistError::Backend { status, message, .. } => {
                assert_eq!(status, Some(422));
                assert!(message.contains("title too long"), "got {message}");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}
