// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators around the dialog engine.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod backend;
pub mod channel;
pub mod renderer;
pub mod storage;

pub use adapter::PluginAdapter;
pub use backend::{BackendAdapter, ListQuery};
pub use channel::ChannelAdapter;
pub use renderer::Renderer;
pub use storage::SessionStore;
