// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderer that records views instead of drawing them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cinelist_core::types::RenderTarget;
use cinelist_core::{AdapterType, CinelistError, HealthStatus, PluginAdapter, Renderer, View};

/// Captures every rendered view together with its target.
pub struct MockRenderer {
    rendered: Arc<Mutex<Vec<(RenderTarget, View)>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            rendered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All views rendered so far.
    pub async fn views(&self) -> Vec<View> {
        self.rendered
            .lock()
            .await
            .iter()
            .map(|(_, view)| view.clone())
            .collect()
    }

    /// Returns the views rendered so far and forgets them.
    pub async fn take_views(&self) -> Vec<View> {
        self.rendered
            .lock()
            .await
            .drain(..)
            .map(|(_, view)| view)
            .collect()
    }

    pub async fn targets(&self) -> Vec<RenderTarget> {
        self.rendered
            .lock()
            .await
            .iter()
            .map(|(target, _)| target.clone())
            .collect()
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockRenderer {
    fn name(&self) -> &str {
        "mock-renderer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Renderer
    }

    async fn health_check(&self) -> Result<HealthStatus, CinelistError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CinelistError> {
        Ok(())
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, target: &RenderTarget, view: &View) -> Result<(), CinelistError> {
        self.rendered
            .lock()
            .await
            .push((target.clone(), view.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn take_views_drains_the_log() {
        let renderer = MockRenderer::new();
        let target = RenderTarget {
            chat_id: "1".into(),
            locale: "en".into(),
        };
        renderer.render(&target, &View::Help).await.unwrap();
        assert_eq!(renderer.targets().await, vec![target]);
        assert_eq!(renderer.take_views().await, vec![View::Help]);
        assert!(renderer.views().await.is_empty());
    }
}
