// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types of the backend REST API that have no domain counterpart.

use serde::{Deserialize, Serialize};

use cinelist_core::types::{Role, User};

/// Body of `POST /auth/telegram`: log in, registering on first contact.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    pub external_id: &'a str,
    pub display_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<&'a str>,
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Token pair returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Response of `POST /auth/telegram`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: User,
}

/// Body of `POST /images`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUploadRequest<'a> {
    pub file_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUploadResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct BanUpdate {
    pub is_banned: bool,
}

/// Error envelope the backend returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(alias = "error", alias = "detail")]
    pub message: String,
}
