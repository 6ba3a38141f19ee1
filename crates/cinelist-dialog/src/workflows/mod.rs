// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow handlers and the wizard signal engine.
//!
//! [`route`] takes a classified update and runs it against the turn. Wizard
//! input goes through [`handle_signal`], which checks cancel first, then
//! lets the step for the awaited token accept, skip or reject the input,
//! and finally advances along the transition table.

pub mod admin;
pub mod browse;
pub mod collection;
pub mod feedback;
pub mod film;
pub mod menu;
pub mod profile;

use cinelist_core::{
    Action, CinelistError, Context, Field, ListKind, Notice, Operation, StateToken, View, Workflow,
};
use tracing::{debug, warn};

use crate::classifier::{Route, Signal};
use crate::filters;
use crate::lists::{self, with_list_context};
use crate::steps;
use crate::transitions::{self, Next};
use crate::turn::Turn;
use crate::wizard::{Answer, WizardStep};

/// Runs one classified update.
pub async fn route(turn: &mut Turn<'_>, route: Route) -> Result<(), CinelistError> {
    match route {
        Route::Wizard(token, signal) => handle_signal(turn, token, signal).await,
        Route::Action(action) => {
            if !action.is_dialog_control() {
                abandon(turn);
            }
            handle_action(turn, action).await
        }
        Route::Command(command) => {
            abandon(turn);
            menu::command(turn, command).await
        }
        Route::Unrecognized => {
            turn.notice(Notice::Unrecognized);
            if let Some(token) = turn.session.state {
                turn.reprompt(token);
            }
            Ok(())
        }
    }
}

/// Drops the running wizard when the user navigates elsewhere.
fn abandon(turn: &mut Turn<'_>) {
    if let Some(workflow) = turn.session.end_dialog() {
        debug!(parent: &turn.span, %workflow, "wizard abandoned");
    }
}

async fn handle_action(turn: &mut Turn<'_>, action: Action) -> Result<(), CinelistError> {
    match action {
        Action::MainMenu => {
            turn.session.context = Context::Film;
            turn.main_menu();
            Ok(())
        }
        // Only reached while idle: a stale cancel button.
        Action::Cancel => {
            turn.main_menu();
            Ok(())
        }
        Action::Skip | Action::Yes | Action::No => {
            turn.notice(Notice::Unrecognized);
            Ok(())
        }
        Action::Profile => profile::show(turn).await,
        Action::ProfileUpdate(field) => {
            profile::start(turn, field);
            Ok(())
        }
        Action::FeedbackNew => {
            feedback::start(turn);
            Ok(())
        }
        Action::FeedbackCategory(category) => {
            feedback::choose_category(turn, category);
            Ok(())
        }
        Action::AdminMenu => {
            admin::menu(turn);
            Ok(())
        }
        Action::UserBan => admin::set_banned(turn, true).await,
        Action::UserUnban => admin::set_banned(turn, false).await,
        Action::UserRole(role) => admin::change_role(turn, role).await,
        Action::List(kind, action) => browse::handle(turn, kind, action).await,
        Action::Film(action) => film::handle(turn, action).await,
        Action::Collection(action) => collection::handle(turn, action).await,
    }
}

/// Feeds wizard input to the step awaiting it.
pub async fn handle_signal(
    turn: &mut Turn<'_>,
    token: StateToken,
    signal: Signal,
) -> Result<(), CinelistError> {
    if signal == Signal::Cancel {
        cancel(turn, token);
        return Ok(());
    }

    if let Some(step) = steps::step_for(token, turn.config) {
        return run_step(turn, token, step.as_ref(), signal).await;
    }

    match (token.workflow, token.field, signal) {
        (Workflow::DeleteFilm, Field::Confirm, Signal::Yes) => film::confirm_delete(turn).await,
        (Workflow::DeleteFilm, Field::Confirm, Signal::No) => {
            turn.session.end_dialog();
            film::show_detail(turn);
            Ok(())
        }
        (Workflow::DeleteCollection, Field::Confirm, Signal::Yes) => {
            collection::confirm_delete(turn).await
        }
        (Workflow::DeleteCollection, Field::Confirm, Signal::No) => {
            turn.session.end_dialog();
            collection::show_detail(turn);
            Ok(())
        }
        (Workflow::DeleteFilm | Workflow::DeleteCollection, Field::Confirm, _)
        | (Workflow::Feedback, Field::Category, _) => {
            reject(turn, token, Notice::Unrecognized);
            Ok(())
        }
        _ => {
            warn!(parent: &turn.span, state = %token, "no step is registered for the awaited input");
            turn.session.end_dialog();
            turn.notice(Notice::Unrecognized);
            Ok(())
        }
    }
}

async fn run_step(
    turn: &mut Turn<'_>,
    token: StateToken,
    step: &dyn WizardStep,
    signal: Signal,
) -> Result<(), CinelistError> {
    let field = step.field();
    let outcome = match signal {
        Signal::Skip if step.skippable() => Ok(Answer::Skipped),
        Signal::Skip => Err(Notice::NotSkippable { field }),
        Signal::Yes if step.is_choice() => step.accept(&mut turn.session, "yes"),
        Signal::No if step.is_choice() => step.accept(&mut turn.session, "no"),
        Signal::Yes | Signal::No => Err(Notice::Unrecognized),
        Signal::Media(media) if field == Field::Image => {
            return film::attach_image(turn, token, &media).await;
        }
        Signal::Media(_) => Err(Notice::InvalidFormat { field }),
        Signal::Text(text) => step.accept(&mut turn.session, &text),
        Signal::Cancel => {
            cancel(turn, token);
            return Ok(());
        }
    };

    match outcome {
        Ok(answer) => advance(turn, token, answer).await,
        Err(notice) => {
            debug!(parent: &turn.span, state = %token, ?notice, "wizard input rejected");
            reject(turn, token, notice);
            Ok(())
        }
    }
}

/// Warns and asks for the same field again. The session is untouched.
fn reject(turn: &mut Turn<'_>, token: StateToken, notice: Notice) {
    turn.notice(notice);
    turn.reprompt(token);
}

/// Moves past an accepted step: asks the next field or finalizes.
pub async fn advance(
    turn: &mut Turn<'_>,
    token: StateToken,
    answer: Answer,
) -> Result<(), CinelistError> {
    match transitions::next(token, answer) {
        Next::Ask(field) => {
            turn.ask(StateToken::new(token.workflow, field));
            Ok(())
        }
        Next::Finalize => finalize(turn, token.workflow).await,
    }
}

async fn finalize(turn: &mut Turn<'_>, workflow: Workflow) -> Result<(), CinelistError> {
    match workflow {
        Workflow::NewFilm => film::create(turn).await,
        Workflow::UpdateFilm => film::update(turn).await,
        Workflow::NewCollection => collection::create(turn).await,
        Workflow::UpdateCollection => collection::update(turn).await,
        Workflow::Profile => profile::save(turn).await,
        Workflow::Feedback => feedback::send(turn).await,
        // Confirmations finish through their buttons.
        Workflow::DeleteFilm | Workflow::DeleteCollection => {
            turn.session.end_dialog();
            turn.notice(Notice::Unrecognized);
            Ok(())
        }
        Workflow::FilmsList
        | Workflow::CollectionsList
        | Workflow::UsersList
        | Workflow::FeedbacksList => {
            let Some(kind) = list_kind(workflow) else {
                return Ok(());
            };
            with_list_context!(kind, turn.session.context, |ctx| filters::finish(ctx, turn)
                .await)
        }
    }
}

/// Leaves the wizard, clears its draft and returns to where it started.
pub fn cancel(turn: &mut Turn<'_>, token: StateToken) {
    turn.session.end_dialog();
    debug!(parent: &turn.span, state = %token, "wizard cancelled");
    turn.notice(Notice::Cancelled);
    show_parent(turn, token.workflow);
}

/// Reports a failed finalize or upload and falls back to the workflow's
/// parent view. Credential failures go back to the dispatcher.
pub(crate) fn abort(
    turn: &mut Turn<'_>,
    op: Operation,
    workflow: Workflow,
    err: CinelistError,
) -> Result<(), CinelistError> {
    turn.recover(op, err)?;
    show_parent(turn, workflow);
    Ok(())
}

/// Shows the view a workflow was started from, using cached data only.
pub fn show_parent(turn: &mut Turn<'_>, workflow: Workflow) {
    match workflow {
        Workflow::UpdateFilm | Workflow::DeleteFilm => film::show_detail(turn),
        Workflow::UpdateCollection | Workflow::DeleteCollection => collection::show_detail(turn),
        Workflow::Profile => profile::show_cached(turn),
        Workflow::Feedback => turn.main_menu(),
        Workflow::NewFilm => {
            with_list_context!(ListKind::Films, turn.session.context, |ctx| lists::present(
                ctx, turn
            ))
        }
        Workflow::NewCollection => {
            with_list_context!(ListKind::Collections, turn.session.context, |ctx| {
                lists::present(ctx, turn)
            })
        }
        Workflow::FilmsList
        | Workflow::CollectionsList
        | Workflow::UsersList
        | Workflow::FeedbacksList => {
            if let Some(kind) = list_kind(workflow) {
                with_list_context!(kind, turn.session.context, |ctx| lists::present(ctx, turn))
            }
        }
    }
}

/// The list a settings workflow belongs to.
pub fn list_kind(workflow: Workflow) -> Option<ListKind> {
    match workflow {
        Workflow::FilmsList => Some(ListKind::Films),
        Workflow::CollectionsList => Some(ListKind::Collections),
        Workflow::UsersList => Some(ListKind::Users),
        Workflow::FeedbacksList => Some(ListKind::Feedbacks),
        _ => None,
    }
}

/// Prompts for fields answered with buttons. A token with nothing to ask
/// about is dropped.
pub fn show_button_prompt(turn: &mut Turn<'_>, token: StateToken) {
    let view = match (token.workflow, token.field) {
        (Workflow::DeleteFilm, Field::Confirm) => film::confirm_view(&turn.session),
        (Workflow::DeleteCollection, Field::Confirm) => collection::confirm_view(&turn.session),
        (Workflow::Feedback, Field::Category) => Some(View::FeedbackCategories),
        _ => None,
    };
    match view {
        Some(view) => turn.show(view),
        None => {
            warn!(parent: &turn.span, state = %token, "nothing to prompt for");
            turn.session.end_dialog();
            turn.notice(Notice::Unrecognized);
        }
    }
}
