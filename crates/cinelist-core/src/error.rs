// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the cinelist bot.

use thiserror::Error;

/// The primary error type used across all cinelist adapter traits and the dialog engine.
#[derive(Debug, Error)]
pub enum CinelistError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging transport errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Backend REST collaborator errors (HTTP failure, unexpected status, bad payload).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credentials were rejected and could not be refreshed.
    #[error("unauthorized: credentials rejected by backend")]
    Unauthorized,

    /// The backend reported that an entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    /// User input failed a bound or format check.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CinelistError {
    /// Shorthand for a backend failure without an underlying source.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// True when the error means the user must re-authenticate.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// True when the backend refused the call for lack of privilege.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Backend { status: Some(403), .. })
    }
}
