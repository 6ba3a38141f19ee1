// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite session store for the cinelist bot.
//!
//! One `sessions` row per external identity plus one row per nested
//! sub-state, all written in a single transaction by
//! [`SessionStore::save_all`](cinelist_core::SessionStore::save_all).
//! Writes are serialized through tokio-rusqlite's background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::{SessionDefaults, SqliteSessionStore};
pub use database::Database;
