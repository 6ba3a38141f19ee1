// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sends composed screens as Telegram messages with inline keyboards.

use async_trait::async_trait;
use cinelist_core::error::CinelistError;
use cinelist_core::traits::{PluginAdapter, Renderer};
use cinelist_core::types::{AdapterType, HealthStatus, RenderTarget};
use cinelist_core::View;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::debug;

use crate::screen::{self, Screen};

pub struct TelegramRenderer {
    bot: Bot,
}

impl TelegramRenderer {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Inline keyboard for `screen`, or `None` when it has no buttons.
pub fn keyboard(screen: &Screen) -> Option<InlineKeyboardMarkup> {
    if screen.keyboard.is_empty() {
        return None;
    }
    let rows = screen.keyboard.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.token.clone()))
            .collect::<Vec<_>>()
    });
    Some(InlineKeyboardMarkup::new(rows))
}

fn parse_chat_id(chat_id: &str) -> Result<ChatId, CinelistError> {
    chat_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| CinelistError::Channel {
            message: format!("invalid chat_id: {e}"),
            source: None,
        })
}

#[async_trait]
impl PluginAdapter for TelegramRenderer {
    fn name(&self) -> &str {
        "telegram-renderer"
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
impl Renderer for TelegramRenderer {
    async fn render(&self, target: &RenderTarget, view: &View) -> Result<(), CinelistError> {
        let chat_id = parse_chat_id(&target.chat_id)?;
        let screen = screen::compose(view);

        let request = self.bot.send_message(chat_id, screen.text.clone());
        let result = match keyboard(&screen) {
            Some(markup) => request.reply_markup(markup).await,
            None => request.await,
        };
        let sent = result.map_err(|e| CinelistError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(chat_id = chat_id.0, message_id = sent.id.0, "view rendered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::Notice;

    #[test]
    fn notices_have_no_keyboard() {
        let screen = screen::compose(&View::Notice(Notice::Cancelled));
        assert!(keyboard(&screen).is_none());
    }

    #[test]
    fn keyboard_keeps_row_layout() {
        let screen = screen::compose(&View::AdminMenu);
        let markup = keyboard(&screen).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 3);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));
    }

    #[test]
    fn chat_ids_must_be_numeric() {
        assert_eq!(parse_chat_id("-100123").unwrap(), ChatId(-100123));
        assert!(parse_chat_id("abc").is_err());
    }
}
