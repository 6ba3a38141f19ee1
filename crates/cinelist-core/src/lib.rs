// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the cinelist bot.
//!
//! This crate provides the session model, state tokens, the action grammar,
//! list/filter/sort data, the view model, the error type, and the adapter
//! traits implemented by the storage, backend, transport and renderer crates.

pub mod action;
pub mod error;
pub mod list;
pub mod session;
pub mod token;
pub mod traits;
pub mod types;
pub mod view;

// Re-export key items at crate root for ergonomic imports.
pub use action::{Action, CollectionAction, Command, FilmAction, ListAction};
pub use error::CinelistError;
pub use list::{Direction, FilterKey, FilterKind, FilterSet, FilterValue, ListKind, ListState, SortSpec};
pub use session::Session;
pub use token::{Field, StateToken, Workflow};
pub use types::{AdapterType, Context, HealthStatus, Page, Role};
pub use view::{Notice, Operation, Prompt, View};

// Re-export all adapter traits at crate root.
pub use traits::{BackendAdapter, ChannelAdapter, ListQuery, PluginAdapter, Renderer, SessionStore};
