// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderer trait: turns views into user-facing output.

use async_trait::async_trait;

use crate::error::CinelistError;
use crate::traits::adapter::PluginAdapter;
use crate::types::RenderTarget;
use crate::view::View;

/// Produces display text and navigation controls for a [`View`] and
/// delivers them to the target chat.
#[async_trait]
pub trait Renderer: PluginAdapter {
    async fn render(&self, target: &RenderTarget, view: &View) -> Result<(), CinelistError>;
}
