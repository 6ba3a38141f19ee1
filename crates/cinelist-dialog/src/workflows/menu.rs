// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands.

use cinelist_core::{CinelistError, Command, Context, Notice, View};
use tracing::info;

use super::{admin, feedback, profile};
use crate::lists::{self, CollectionsContext, FilmsContext};
use crate::turn::Turn;

pub async fn command(turn: &mut Turn<'_>, command: Command) -> Result<(), CinelistError> {
    match command {
        Command::Start | Command::Menu | Command::Cancel => {
            turn.session.context = Context::Film;
            turn.main_menu();
            Ok(())
        }
        Command::Help => {
            turn.show(View::Help);
            Ok(())
        }
        Command::Films => {
            turn.session.context = Context::Film;
            lists::show(&FilmsContext, turn).await
        }
        Command::Collections => {
            turn.session.context = Context::Film;
            lists::show(&CollectionsContext, turn).await
        }
        Command::Profile => profile::show(turn).await,
        Command::Feedback => {
            feedback::start(turn);
            Ok(())
        }
        Command::Admin => {
            admin::menu(turn);
            Ok(())
        }
        Command::Logout => {
            logout(turn);
            Ok(())
        }
    }
}

/// Forgets credentials and everything in progress. The next update signs
/// in again.
pub fn logout(turn: &mut Turn<'_>) {
    turn.session.logout();
    info!(parent: &turn.span, "logged out");
    turn.notice(Notice::LoggedOut);
}
