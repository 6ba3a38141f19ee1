// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for the cinelist bot.
//!
//! The [`Dispatcher`] drives every inbound update through the
//! [`classifier`], the wizard engine ([`wizard`], [`steps`],
//! [`transitions`]), the list engine ([`lists`], [`filters`]) and the
//! per-domain [`workflows`]. Collaborators are reached only through the
//! adapter traits of `cinelist-core`.

pub mod classifier;
pub mod dispatcher;
pub mod filters;
pub mod lists;
pub mod steps;
pub mod transitions;
pub mod turn;
pub mod validate;
pub mod wizard;
pub mod workflows;

pub use classifier::{Route, Signal, classify};
pub use dispatcher::Dispatcher;
pub use turn::Turn;
