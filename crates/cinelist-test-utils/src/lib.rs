// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for cinelist integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a backend or a bot token.
//!
//! # Components
//!
//! - [`MockBackend`] - In-memory REST backend with call recording and failure injection
//! - [`MockChannel`] - Mock messaging channel with event injection
//! - [`MockRenderer`] - Renderer that records views
//! - [`TestHarness`] - The real dispatcher wired to all of the above

pub mod harness;
pub mod mock_backend;
pub mod mock_channel;
pub mod mock_renderer;

pub use harness::{TEST_USER, TestHarness, film, films};
pub use mock_backend::MockBackend;
pub use mock_channel::MockChannel;
pub use mock_renderer::MockRenderer;
