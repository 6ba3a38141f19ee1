// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for the cinelist bot.
//!
//! [`TelegramChannel`] implements [`ChannelAdapter`] over teloxide long
//! polling: messages and button presses from private chats are converted to
//! [`InboundEvent`]s. [`TelegramRenderer`] turns views into plain-text
//! messages with inline keyboards.

pub mod handler;
pub mod media;
pub mod renderer;
pub mod screen;

use std::sync::Arc;

use async_trait::async_trait;
use cinelist_config::model::TelegramConfig;
use cinelist_core::error::CinelistError;
use cinelist_core::traits::{ChannelAdapter, PluginAdapter};
use cinelist_core::types::{AdapterType, HealthStatus, InboundEvent};
use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub use renderer::TelegramRenderer;

type Allowed = Arc<Vec<String>>;

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, CinelistError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            CinelistError::Config("telegram.bot_token is required for the Telegram transport".into())
        })?;

        if token.is_empty() {
            return Err(CinelistError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// A renderer sending through the same bot.
    pub fn renderer(&self) -> TelegramRenderer {
        TelegramRenderer::new(self.bot.clone())
    }
}

async fn on_message(
    bot: Bot,
    update: Update,
    msg: Message,
    tx: mpsc::Sender<InboundEvent>,
    allowed: Allowed,
) -> ResponseResult<()> {
    if !handler::is_dm(&msg) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
        return Ok(());
    }
    if !handler::is_authorized(msg.from.as_ref(), &allowed) {
        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
        return Ok(());
    }

    let kind = match handler::message_kind(&bot, &msg).await {
        Ok(Some(kind)) => kind,
        Ok(None) => return Ok(()),
        Err(e) => {
            error!(error = %e, "failed to read message content");
            return Ok(());
        }
    };
    if let Some(event) = handler::message_event(i64::from(update.id.0), &msg, kind)
        && tx.send(event).await.is_err()
    {
        warn!("inbound channel closed, dropping message");
    }
    Ok(())
}

async fn on_callback(
    bot: Bot,
    update: Update,
    query: CallbackQuery,
    tx: mpsc::Sender<InboundEvent>,
    allowed: Allowed,
) -> ResponseResult<()> {
    // Stop the client-side spinner right away; the reply comes as a message.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "failed to answer callback query");
    }
    if !handler::is_authorized(Some(&query.from), &allowed) {
        debug!(user_id = query.from.id.0, "ignoring unauthorized user");
        return Ok(());
    }
    if let Some(event) = handler::callback_event(i64::from(update.id.0), &query)
        && tx.send(event).await.is_err()
    {
        warn!("inbound channel closed, dropping button press");
    }
    Ok(())
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, CinelistError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), CinelistError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), CinelistError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let allowed: Allowed = Arc::new(self.config.allowed_users.clone());

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(on_message))
                .branch(Update::filter_callback_query().endpoint(on_callback));

            Dispatcher::builder(bot, handler)
                .dependencies(dptree::deps![tx, allowed])
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, CinelistError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| CinelistError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}
