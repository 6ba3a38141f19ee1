// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile view and the username/email wizard.

use cinelist_core::session::ProfileDraft;
use cinelist_core::types::User;
use cinelist_core::{CinelistError, Field, Notice, Operation, StateToken, View, Workflow};
use tracing::{info, warn};

use crate::turn::Turn;

/// Shows the profile, refreshing the user from the backend first. A failed
/// refresh falls back to the cached user.
pub async fn show(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    match turn
        .backend
        .current_user(&mut turn.session.credentials)
        .await
    {
        Ok(user) => turn.session.set_user(user),
        Err(err) if err.is_unauthorized() => return Err(err),
        Err(err) => warn!(parent: &turn.span, error = %err, "profile refresh failed"),
    }
    show_cached(turn);
    Ok(())
}

pub fn show_cached(turn: &mut Turn<'_>) {
    match turn.session.user.clone() {
        Some(user) => turn.show(View::Profile { user }),
        None => turn.main_menu(),
    }
}

pub fn start(turn: &mut Turn<'_>, field: Field) {
    turn.session.profile = ProfileDraft::default();
    turn.ask(StateToken::new(Workflow::Profile, field));
}

/// Applies the draft on top of the current user.
fn merged(user: &User, draft: &ProfileDraft) -> User {
    let mut user = user.clone();
    if let Some(username) = &draft.username {
        user.username = username.clone();
    }
    if draft.email.is_some() {
        user.email = draft.email.clone();
    }
    user
}

pub async fn save(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(user) = turn.session.user.as_ref() else {
        turn.session.end_dialog();
        turn.notice(Notice::Failed(Operation::UpdateProfile));
        turn.main_menu();
        return Ok(());
    };
    let user = merged(user, &turn.session.profile);
    match turn
        .backend
        .update_user(&mut turn.session.credentials, &user)
        .await
    {
        Ok(saved) => {
            info!(parent: &turn.span, user_id = saved.id, "profile updated");
            turn.session.end_dialog();
            turn.session.set_user(saved);
            turn.notice(Notice::Succeeded(Operation::UpdateProfile));
            show_cached(turn);
            Ok(())
        }
        Err(err) => super::abort(turn, Operation::UpdateProfile, Workflow::Profile, err),
    }
}
