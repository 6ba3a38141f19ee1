// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and conversion.
//!
//! Decides whether an incoming Telegram update should reach the dialog
//! engine and converts it into a transport-agnostic [`InboundEvent`].

use cinelist_core::error::CinelistError;
use cinelist_core::types::{EventKind, ExternalIdentity, InboundEvent};
use teloxide::prelude::*;
use teloxide::types::{ChatKind, User};
use tracing::debug;

use crate::media;

/// Checks whether `user` may talk to the bot.
///
/// Passes when the user ID (as string) or the username matches any entry
/// of `allowed_users`. An empty list lets everyone in. Updates without a
/// sender never pass.
pub fn is_authorized(user: Option<&User>, allowed_users: &[String]) -> bool {
    let Some(user) = user else {
        return false;
    };
    if allowed_users.is_empty() {
        return true;
    }

    let user_id_str = user.id.0.to_string();
    allowed_users.iter().any(|allowed| {
        if *allowed == user_id_str {
            return true;
        }
        // Match by username (with or without @ prefix)
        user.username.as_ref().is_some_and(|username| {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            username.eq_ignore_ascii_case(allowed_clean)
        })
    })
}

/// Checks whether the message is from a private (DM) chat.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Splits `/name@bot args` into `name`. Plain text returns `None`.
pub fn parse_command(text: &str) -> Option<String> {
    let rest = text.trim().strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    (!name.is_empty()).then(|| name.to_ascii_lowercase())
}

/// Identity of a Telegram user as the dialog engine sees it.
pub fn identity(user: &User) -> ExternalIdentity {
    let display_name = match &user.username {
        Some(username) => username.clone(),
        None => user.full_name(),
    };
    ExternalIdentity {
        external_id: user.id.0.to_string(),
        display_name,
        locale: user.language_code.clone(),
    }
}

/// Classifies the payload of a message.
///
/// Returns `None` for unsupported message types (stickers, locations, etc.).
pub async fn message_kind(bot: &Bot, msg: &Message) -> Result<Option<EventKind>, CinelistError> {
    if let Some(text) = msg.text() {
        let kind = match parse_command(text) {
            Some(name) => EventKind::Command { name },
            None => EventKind::Text(text.to_string()),
        };
        return Ok(Some(kind));
    }

    if let Some(photos) = msg.photo() {
        return Ok(Some(EventKind::Media(media::photo_ref(bot, photos).await?)));
    }

    if let Some(doc) = msg.document() {
        return Ok(media::document_ref(bot, doc).await?.map(EventKind::Media));
    }

    debug!(msg_id = msg.id.0, "ignoring unsupported message type");
    Ok(None)
}

/// Builds the event for a message whose payload was already classified.
pub fn message_event(update_id: i64, msg: &Message, kind: EventKind) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;
    Some(InboundEvent {
        update_id,
        sender: identity(user),
        chat_id: msg.chat.id.0.to_string(),
        kind,
    })
}

/// Builds the event for a button press. Presses without data are dropped.
pub fn callback_event(update_id: i64, query: &CallbackQuery) -> Option<InboundEvent> {
    let token = query.data.clone()?;
    // Buttons on inaccessible messages still come from a private chat
    // whose id equals the user id.
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id.0)
        .unwrap_or(query.from.id.0 as i64);
    Some(InboundEvent {
        update_id,
        sender: identity(&query.from),
        chat_id: chat_id.to_string(),
        kind: EventKind::Callback { token },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_json(user_id: u64, username: Option<&str>) -> serde_json::Value {
        let mut user = serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
            "last_name": "User",
            "language_code": "de",
        });
        if let Some(username) = username {
            user["username"] = serde_json::json!(username);
        }
        user
    }

    /// Build a private chat message from JSON, matching Telegram Bot API structure.
    fn make_private_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": user_json(user_id, username),
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": user_json(user_id, None),
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize group message")
    }

    fn make_callback(user_id: u64, data: Option<&str>) -> CallbackQuery {
        let mut json = serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": user_json(user_id, Some("cinephile")),
            "chat_instance": "-1234",
            "message": {
                "message_id": 7,
                "date": 1700000000i64,
                "chat": {
                    "id": user_id as i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "text": "menu",
            },
        });
        if let Some(data) = data {
            json["data"] = serde_json::json!(data);
        }
        serde_json::from_value(json).expect("failed to deserialize callback query")
    }

    #[test]
    fn authorized_by_user_id() {
        let msg = make_private_message(12345, None, "hello");
        assert!(is_authorized(msg.from.as_ref(), &["12345".into()]));
    }

    #[test]
    fn authorized_by_username_with_at_any_case() {
        let msg = make_private_message(12345, Some("TestUser"), "hello");
        assert!(is_authorized(msg.from.as_ref(), &["@testuser".into()]));
    }

    #[test]
    fn not_authorized_wrong_user() {
        let msg = make_private_message(12345, Some("testuser"), "hello");
        assert!(!is_authorized(msg.from.as_ref(), &["99999".into()]));
    }

    #[test]
    fn empty_allow_list_admits_everyone() {
        let msg = make_private_message(12345, None, "hello");
        assert!(is_authorized(msg.from.as_ref(), &[]));
        assert!(!is_authorized(None, &[]));
    }

    #[test]
    fn is_dm_distinguishes_private_chats() {
        assert!(is_dm(&make_private_message(12345, None, "hello")));
        assert!(!is_dm(&make_group_message(12345, "hello")));
    }

    #[test]
    fn commands_are_split_from_text() {
        assert_eq!(parse_command("/films"), Some("films".into()));
        assert_eq!(parse_command("/Films@cinelist_bot now"), Some("films".into()));
        assert_eq!(parse_command("films"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/@bot"), None);
    }

    #[test]
    fn identity_prefers_username() {
        let msg = make_private_message(12345, Some("cinephile"), "hi");
        let id = identity(msg.from.as_ref().unwrap());
        assert_eq!(id.external_id, "12345");
        assert_eq!(id.display_name, "cinephile");
        assert_eq!(id.locale.as_deref(), Some("de"));

        let msg = make_private_message(12345, None, "hi");
        assert_eq!(identity(msg.from.as_ref().unwrap()).display_name, "Test User");
    }

    #[tokio::test]
    async fn text_and_commands_become_events() {
        let bot = Bot::new("test:token");

        let msg = make_private_message(12345, None, "Blade Runner");
        let kind = message_kind(&bot, &msg).await.unwrap().unwrap();
        assert_eq!(kind, EventKind::Text("Blade Runner".into()));

        let msg = make_private_message(12345, None, "/start");
        let kind = message_kind(&bot, &msg).await.unwrap().unwrap();
        let event = message_event(3, &msg, kind).unwrap();
        assert_eq!(event.update_id, 3);
        assert_eq!(event.chat_id, "12345");
        assert_eq!(event.kind, EventKind::Command { name: "start".into() });
    }

    #[test]
    fn callbacks_carry_their_token() {
        let query = make_callback(12345, Some("films_next_page"));
        let event = callback_event(9, &query).unwrap();
        assert_eq!(event.chat_id, "12345");
        assert_eq!(event.sender.display_name, "cinephile");
        assert_eq!(
            event.kind,
            EventKind::Callback {
                token: "films_next_page".into()
            }
        );

        assert!(callback_event(9, &make_callback(12345, None)).is_none());
    }
}
