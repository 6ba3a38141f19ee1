// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform transports (Telegram, etc.).

use async_trait::async_trait;

use crate::error::CinelistError;
use crate::traits::adapter::PluginAdapter;
use crate::types::InboundEvent;

/// Adapter delivering inbound updates from a messaging platform.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), CinelistError>;

    /// Receives the next inbound update.
    async fn receive(&self) -> Result<InboundEvent, CinelistError>;
}
