// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use cinelist_core::types::{EventKind, ExternalIdentity, InboundEvent};
use cinelist_core::{AdapterType, ChannelAdapter, CinelistError, HealthStatus, PluginAdapter};

/// A mock messaging channel: events injected with [`MockChannel::inject`]
/// come out of `receive()` in order.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    pub async fn inject(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    pub async fn pending(&self) -> usize {
        self.inbound.lock().await.len()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds an event from `external_id` in a private chat.
pub fn event(update_id: i64, external_id: &str, kind: EventKind) -> InboundEvent {
    InboundEvent {
        update_id,
        sender: ExternalIdentity {
            external_id: external_id.to_string(),
            display_name: format!("user-{external_id}"),
            locale: Some("en".to_string()),
        },
        chat_id: external_id.to_string(),
        kind,
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, CinelistError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CinelistError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), CinelistError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, CinelistError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            self.notify.notified().await;
        }
    }
}
