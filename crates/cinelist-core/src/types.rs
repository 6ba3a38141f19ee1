// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the dialog engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Backend,
    Renderer,
}

/// Privilege level of a user. Ordering follows privilege.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

/// Which film list the filter/sort/list operations currently target.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Context {
    /// Films owned directly by the user.
    #[default]
    Film,
    /// Films owned through the currently opened collection.
    Collection,
}

/// A film as exposed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_viewed: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub user_rating: Option<f32>,
    #[serde(default)]
    pub review: Option<String>,
}

/// A named collection of films.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub total_films: u32,
}

/// A backend user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_banned: bool,
}

/// Feedback topic picked from a fixed set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Suggestions,
    Bugs,
    Issues,
    Other,
}

/// A feedback message submitted by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub category: FeedbackCategory,
    pub text: String,
}

/// One page of a backend list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_records: u32,
}

impl<T> Page<T> {
    /// Number of the last page, never below 1.
    pub fn last_page(&self) -> u32 {
        if self.page_size == 0 || self.total_records == 0 {
            return 1;
        }
        self.total_records.div_ceil(self.page_size)
    }
}

/// Opaque access/refresh pair issued by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// True once the backend has issued an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Drops both tokens.
    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }
}

/// Result of authenticating an external identity against the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub credentials: Credentials,
    pub user: User,
}

/// Identity the transport knows about a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub external_id: String,
    pub display_name: String,
    pub locale: Option<String>,
}

/// Reference to an uploaded media object on the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// Transport file identifier.
    pub file_id: String,
    /// Direct download URL when the transport could resolve one.
    pub url: Option<String>,
}

/// What kind of update the transport delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A slash command such as `/films` (name without the slash).
    Command { name: String },
    /// A button press carrying a structured action token.
    Callback { token: String },
    /// Free text typed by the user.
    Text(String),
    /// A photo or document upload.
    Media(MediaRef),
}

/// Inbound update consumed by the dialog engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub update_id: i64,
    pub sender: ExternalIdentity,
    /// Where replies for this update should go.
    pub chat_id: String,
    pub kind: EventKind,
}

/// Destination for rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub chat_id: String,
    pub locale: String,
}
