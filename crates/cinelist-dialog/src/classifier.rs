// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input classification.
//!
//! Decides, from the inbound event and the session's awaited input, whether
//! an update is a structured action, a slash command, or input for the
//! running wizard. Pure: no I/O and no session mutation.

use std::str::FromStr;

use cinelist_core::action::{Action, Command};
use cinelist_core::types::{EventKind, MediaRef};
use cinelist_core::StateToken;

/// Input handed to the wizard step named by the state token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Text(String),
    Media(MediaRef),
    Skip,
    Cancel,
    Yes,
    No,
}

/// Where an update goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A structured token outside of wizard control input.
    Action(Action),
    Command(Command),
    /// Input for the awaited step.
    Wizard(StateToken, Signal),
    /// Nothing matched; the current state is left untouched.
    Unrecognized,
}

/// Classifies one inbound update against the awaited input, if any.
///
/// Structured tokens are matched first. Free text and media only mean
/// something while a wizard is waiting.
pub fn classify(kind: &EventKind, state: Option<StateToken>) -> Route {
    match kind {
        EventKind::Callback { token } => match Action::from_str(token) {
            Ok(action) => classify_action(action, state),
            Err(_) => Route::Unrecognized,
        },
        EventKind::Command { name } => match Command::from_str(name.trim_start_matches('/')) {
            Ok(Command::Cancel) => match state {
                Some(token) => Route::Wizard(token, Signal::Cancel),
                None => Route::Command(Command::Cancel),
            },
            Ok(command) => Route::Command(command),
            Err(_) => Route::Unrecognized,
        },
        EventKind::Text(text) => match state {
            Some(token) => Route::Wizard(token, Signal::Text(text.trim().to_string())),
            None => Route::Unrecognized,
        },
        EventKind::Media(media) => match state {
            Some(token) => Route::Wizard(token, Signal::Media(media.clone())),
            None => Route::Unrecognized,
        },
    }
}

fn classify_action(action: Action, state: Option<StateToken>) -> Route {
    if !action.is_dialog_control() {
        return Route::Action(action);
    }
    match (state, action) {
        (Some(token), Action::Cancel) => Route::Wizard(token, Signal::Cancel),
        (Some(token), Action::Skip) => Route::Wizard(token, Signal::Skip),
        (Some(token), Action::Yes) => Route::Wizard(token, Signal::Yes),
        (Some(token), Action::No) => Route::Wizard(token, Signal::No),
        // A stale cancel button still takes the user home.
        (None, Action::Cancel) => Route::Action(Action::Cancel),
        _ => Route::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::action::{FilmAction, ListAction};
    use cinelist_core::{Field, ListKind, Workflow};

    const AWAITING_YEAR: StateToken = StateToken::new(Workflow::NewFilm, Field::Year);

    fn callback(token: &str) -> EventKind {
        EventKind::Callback {
            token: token.into(),
        }
    }

    #[test]
    fn text_goes_to_awaited_step() {
        assert_eq!(
            classify(&EventKind::Text("  1999 ".into()), Some(AWAITING_YEAR)),
            Route::Wizard(AWAITING_YEAR, Signal::Text("1999".into()))
        );
        assert_eq!(
            classify(&EventKind::Text("hello".into()), None),
            Route::Unrecognized
        );
    }

    #[test]
    fn control_tokens_feed_the_wizard() {
        assert_eq!(
            classify(&callback("process_skip"), Some(AWAITING_YEAR)),
            Route::Wizard(AWAITING_YEAR, Signal::Skip)
        );
        assert_eq!(
            classify(&callback("process_cancel"), Some(AWAITING_YEAR)),
            Route::Wizard(AWAITING_YEAR, Signal::Cancel)
        );
        assert_eq!(classify(&callback("process_skip"), None), Route::Unrecognized);
        assert_eq!(
            classify(&callback("process_cancel"), None),
            Route::Action(Action::Cancel)
        );
    }

    #[test]
    fn navigation_tokens_win_over_awaited_input() {
        assert_eq!(
            classify(&callback("films_next_page"), Some(AWAITING_YEAR)),
            Route::Action(Action::List(ListKind::Films, ListAction::NextPage))
        );
        assert_eq!(
            classify(&callback("film_new"), None),
            Route::Action(Action::Film(FilmAction::New))
        );
        assert_eq!(classify(&callback("films_teleport"), None), Route::Unrecognized);
    }

    #[test]
    fn cancel_command_targets_the_wizard() {
        let cancel = EventKind::Command {
            name: "cancel".into(),
        };
        assert_eq!(
            classify(&cancel, Some(AWAITING_YEAR)),
            Route::Wizard(AWAITING_YEAR, Signal::Cancel)
        );
        assert_eq!(classify(&cancel, None), Route::Command(Command::Cancel));
        assert_eq!(
            classify(
                &EventKind::Command {
                    name: "/films".into()
                },
                Some(AWAITING_YEAR)
            ),
            Route::Command(Command::Films)
        );
        assert_eq!(
            classify(&EventKind::Command { name: "dance".into() }, None),
            Route::Unrecognized
        );
    }

    #[test]
    fn media_outside_a_wizard_is_unrecognized() {
        let media = EventKind::Media(MediaRef {
            file_id: "f1".into(),
            url: None,
        });
        assert_eq!(classify(&media, None), Route::Unrecognized);
        let image = StateToken::new(Workflow::NewFilm, Field::Image);
        assert!(matches!(
            classify(&media, Some(image)),
            Route::Wizard(_, Signal::Media(_))
        ));
    }
}
