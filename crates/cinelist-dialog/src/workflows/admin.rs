// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moderation: admin menu, user detail, ban/unban and role changes.
//!
//! An actor may only act on users ranked below them, and may only grant
//! roles below their own.

use cinelist_core::types::User;
use cinelist_core::{CinelistError, Notice, Operation, Role, Session, View};
use tracing::info;

use crate::lists::{self, UsersContext};
use crate::turn::Turn;

fn is_admin(session: &Session) -> bool {
    session.role >= Role::Admin
}

/// Whether `actor` may moderate `target`, optionally granting `role`.
pub fn may_moderate(actor: Role, target: &User, role: Option<Role>) -> bool {
    actor >= Role::Admin && target.role < actor && role.is_none_or(|r| r < actor)
}

fn forbid(turn: &mut Turn<'_>) {
    turn.notice(Notice::Forbidden);
    turn.main_menu();
}

pub fn menu(turn: &mut Turn<'_>) {
    if is_admin(&turn.session) {
        turn.show(View::AdminMenu);
    } else {
        forbid(turn);
    }
}

pub fn show_user(turn: &mut Turn<'_>) {
    match turn.session.admin.selected_user.clone() {
        Some(user) => {
            let actor_role = turn.session.role;
            turn.show(View::UserDetail { user, actor_role });
        }
        None => lists::present(&UsersContext, turn),
    }
}

/// Opens the user at `index` of the cached users page.
pub fn open_user(turn: &mut Turn<'_>, index: usize) {
    match turn.session.admin.users.items.get(index).cloned() {
        Some(user) => {
            turn.session.admin.selected_user = Some(user);
            show_user(turn);
        }
        None => {
            turn.notice(Notice::Unrecognized);
            lists::present(&UsersContext, turn);
        }
    }
}

/// The selected user, if the actor may touch them.
fn target(turn: &mut Turn<'_>, role: Option<Role>) -> Option<User> {
    if !is_admin(&turn.session) {
        forbid(turn);
        return None;
    }
    let Some(user) = turn.session.admin.selected_user.clone() else {
        turn.notice(Notice::Unrecognized);
        lists::present(&UsersContext, turn);
        return None;
    };
    if !may_moderate(turn.session.role, &user, role) {
        turn.notice(Notice::Forbidden);
        show_user(turn);
        return None;
    }
    Some(user)
}

fn store(session: &mut Session, user: User) {
    if let Some(slot) = session
        .admin
        .users
        .items
        .iter_mut()
        .find(|u| u.id == user.id)
    {
        *slot = user.clone();
    }
    session.admin.selected_user = Some(user);
}

pub async fn set_banned(turn: &mut Turn<'_>, banned: bool) -> Result<(), CinelistError> {
    let Some(user) = target(turn, None) else {
        return Ok(());
    };
    let op = if banned {
        Operation::Ban
    } else {
        Operation::Unban
    };
    match turn
        .backend
        .set_user_banned(&mut turn.session.credentials, user.id, banned)
        .await
    {
        Ok(saved) => {
            info!(parent: &turn.span, user_id = saved.id, banned, "ban flag changed");
            store(&mut turn.session, saved);
            turn.notice(Notice::Succeeded(op));
        }
        Err(err) => turn.recover(op, err)?,
    }
    show_user(turn);
    Ok(())
}

pub async fn change_role(turn: &mut Turn<'_>, role: Role) -> Result<(), CinelistError> {
    let Some(user) = target(turn, Some(role)) else {
        return Ok(());
    };
    match turn
        .backend
        .set_user_role(&mut turn.session.credentials, user.id, role)
        .await
    {
        Ok(saved) => {
            info!(parent: &turn.span, user_id = saved.id, %role, "role changed");
            store(&mut turn.session, saved);
            turn.notice(Notice::Succeeded(Operation::ChangeRole));
        }
        Err(err) => turn.recover(Operation::ChangeRole, err)?,
    }
    show_user(turn);
    Ok(())
}
