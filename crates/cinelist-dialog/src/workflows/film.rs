// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Film detail view, create/update/delete wizards and the favorite toggle.
//!
//! Everything here works on the film list selected by the session context,
//! so the same handlers serve "my films" and "films of a collection".

use cinelist_core::action::FilmAction;
use cinelist_core::types::{Film, MediaRef};
use cinelist_core::view::EntityKind;
use cinelist_core::{
    CinelistError, Context, Field, ListKind, Notice, Operation, Session, StateToken, View,
    Workflow,
};
use tracing::info;

use super::collection;
use crate::lists::{self, with_list_context};
use crate::transitions::first_field;
use crate::turn::Turn;
use crate::wizard::Answer;

pub async fn handle(turn: &mut Turn<'_>, action: FilmAction) -> Result<(), CinelistError> {
    match action {
        FilmAction::New => {
            start_new(turn);
            Ok(())
        }
        FilmAction::Update => {
            update_menu(turn);
            Ok(())
        }
        FilmAction::UpdateField(field) => {
            start_update(turn, field);
            Ok(())
        }
        FilmAction::Delete => {
            start_delete(turn);
            Ok(())
        }
        FilmAction::Next => step(turn, true).await,
        FilmAction::Prev => step(turn, false).await,
        FilmAction::Back => {
            with_list_context!(ListKind::Films, turn.session.context, |ctx| lists::show(
                ctx, turn
            )
            .await)
        }
        FilmAction::Favorite => toggle_favorite(turn).await,
    }
}

/// Detail view of the open film with neighbour availability across pages.
pub fn detail_view(session: &Session) -> Option<View> {
    let film = session.film_detail.film.clone()?;
    let list = session.film_list();
    let index = session.film_detail.index;
    Some(View::FilmDetail {
        context: session.context,
        film,
        has_prev: index > 0 || !list.is_first_page(),
        has_next: index + 1 < list.items.len() || !list.is_last_page(),
    })
}

/// Shows the open film, or the cached list when none is open.
pub fn show_detail(turn: &mut Turn<'_>) {
    match detail_view(&turn.session) {
        Some(view) => turn.show(view),
        None => with_list_context!(ListKind::Films, turn.session.context, |ctx| lists::present(
            ctx, turn
        )),
    }
}

/// Opens the film at `index` of the cached page.
pub fn open(turn: &mut Turn<'_>, index: usize) {
    match turn.session.film_list().items.get(index).cloned() {
        Some(film) => {
            turn.session.film_detail.film = Some(film);
            turn.session.film_detail.index = index;
            show_detail(turn);
        }
        None => {
            turn.notice(Notice::Unrecognized);
            show_detail(turn);
        }
    }
}

fn current(turn: &mut Turn<'_>) -> Option<Film> {
    let film = turn.session.film_detail.film.clone();
    if film.is_none() {
        turn.notice(Notice::Unrecognized);
        show_detail(turn);
    }
    film
}

fn start_new(turn: &mut Turn<'_>) {
    turn.session.film_detail.clear_draft();
    turn.ask(StateToken::new(
        Workflow::NewFilm,
        first_field(Workflow::NewFilm),
    ));
}

fn update_menu(turn: &mut Turn<'_>) {
    if let Some(film) = current(turn) {
        turn.show(View::FilmUpdateMenu { film });
    }
}

fn start_update(turn: &mut Turn<'_>, field: Field) {
    if current(turn).is_none() {
        return;
    }
    let detail = &mut turn.session.film_detail;
    detail.clear_draft();
    // Viewed drags user rating and review along with it.
    detail.is_edit_viewed = field == Field::Viewed;
    turn.ask(StateToken::new(Workflow::UpdateFilm, field));
}

fn start_delete(turn: &mut Turn<'_>) {
    if current(turn).is_some() {
        turn.ask(StateToken::new(Workflow::DeleteFilm, Field::Confirm));
    }
}

/// Confirmation prompt for deleting the open film.
pub fn confirm_view(session: &Session) -> Option<View> {
    let film = session.film_detail.film.as_ref()?;
    let kind = match session.context {
        Context::Film => EntityKind::Film,
        Context::Collection => EntityKind::CollectionFilm,
    };
    Some(View::ConfirmDelete {
        kind,
        title: film.title.clone(),
    })
}

/// Deletes the open film, or detaches it when browsing a collection.
pub async fn confirm_delete(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(film) = turn.session.film_detail.film.clone() else {
        turn.session.end_dialog();
        turn.notice(Notice::Unrecognized);
        return Ok(());
    };

    let (op, result) = match turn.session.context {
        Context::Film => (
            Operation::DeleteFilm,
            turn.backend
                .delete_film(&mut turn.session.credentials, film.id)
                .await,
        ),
        Context::Collection => {
            let result = match collection::open_id(&turn.session) {
                Some(collection_id) => {
                    turn.backend
                        .remove_collection_film(
                            &mut turn.session.credentials,
                            collection_id,
                            film.id,
                        )
                        .await
                }
                None => Err(CinelistError::Internal("no collection is open".into())),
            };
            (Operation::RemoveFromCollection, result)
        }
    };

    match result {
        Ok(()) => {
            info!(parent: &turn.span, film_id = film.id, operation = %op, "film removed");
            turn.session.end_dialog();
            turn.session.film_detail.film = None;
            turn.notice(Notice::Succeeded(op));
            with_list_context!(ListKind::Films, turn.session.context, |ctx| lists::show(
                ctx, turn
            )
            .await)
        }
        Err(err) => {
            turn.recover(op, err)?;
            show_detail(turn);
            Ok(())
        }
    }
}

/// Walks to the neighbouring film, fetching the adjacent page when the
/// cached one runs out.
async fn step(turn: &mut Turn<'_>, forward: bool) -> Result<(), CinelistError> {
    if current(turn).is_none() {
        return Ok(());
    }
    let index = turn.session.film_detail.index;
    let next = with_list_context!(ListKind::Films, turn.session.context, |ctx| {
        if forward {
            lists::next_item(ctx, turn, index).await
        } else {
            lists::prev_item(ctx, turn, index).await
        }
    })?;
    match next {
        Some(index) => open(turn, index),
        None => show_detail(turn),
    }
    Ok(())
}

/// Replaces the cached copy of `film` in the context's list.
fn store(session: &mut Session, film: Film) {
    if let Some(slot) = session
        .film_list_mut()
        .items
        .iter_mut()
        .find(|f| f.id == film.id)
    {
        *slot = film.clone();
    }
    session.film_detail.film = Some(film);
}

async fn toggle_favorite(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(mut film) = current(turn) else {
        return Ok(());
    };
    film.is_favorite = !film.is_favorite;
    match turn
        .backend
        .update_film(&mut turn.session.credentials, &film)
        .await
    {
        Ok(saved) => store(&mut turn.session, saved),
        Err(err) => turn.recover(Operation::ToggleFavorite, err)?,
    }
    show_detail(turn);
    Ok(())
}

/// Receives an uploaded photo for the image step.
pub async fn attach_image(
    turn: &mut Turn<'_>,
    token: StateToken,
    media: &MediaRef,
) -> Result<(), CinelistError> {
    match turn
        .backend
        .upload_image(&mut turn.session.credentials, media)
        .await
    {
        Ok(url) => {
            turn.session.film_detail.draft.image_url = Some(url);
            super::advance(turn, token, Answer::Value).await
        }
        Err(err) => super::abort(turn, Operation::UploadImage, token.workflow, err),
    }
}

/// Finishes the create wizard. In a collection the film is created inside it.
pub async fn create(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let film = turn.session.film_detail.draft.to_new_film();
    let result = match turn.session.context {
        Context::Film => {
            turn.backend
                .create_film(&mut turn.session.credentials, &film)
                .await
        }
        Context::Collection => match collection::open_id(&turn.session) {
            Some(collection_id) => {
                turn.backend
                    .create_collection_film(&mut turn.session.credentials, collection_id, &film)
                    .await
            }
            None => Err(CinelistError::Internal("no collection is open".into())),
        },
    };

    match result {
        Ok(created) => {
            info!(parent: &turn.span, film_id = created.id, title = %created.title, "film created");
            turn.session.end_dialog();
            turn.notice(Notice::Succeeded(Operation::CreateFilm));
            with_list_context!(ListKind::Films, turn.session.context, |ctx| lists::show(
                ctx, turn
            )
            .await)
        }
        Err(err) => super::abort(turn, Operation::CreateFilm, Workflow::NewFilm, err),
    }
}

/// Finishes the update wizard: unset draft fields keep their value.
pub async fn update(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(existing) = turn.session.film_detail.film.clone() else {
        turn.session.end_dialog();
        turn.notice(Notice::Unrecognized);
        return Ok(());
    };
    let detail = &turn.session.film_detail;
    let film = detail.draft.merge_into(&existing, detail.is_edit_viewed);

    let saved = match turn
        .backend
        .update_film(&mut turn.session.credentials, &film)
        .await
    {
        Ok(saved) => saved,
        Err(err) => return super::abort(turn, Operation::UpdateFilm, Workflow::UpdateFilm, err),
    };
    info!(parent: &turn.span, film_id = saved.id, "film updated");
    turn.session.end_dialog();
    turn.notice(Notice::Succeeded(Operation::UpdateFilm));

    let refreshed = with_list_context!(ListKind::Films, turn.session.context, |ctx| {
        lists::refresh(ctx, turn).await
    });
    if let Err(err) = refreshed {
        turn.recover(Operation::LoadList, err)?;
    }
    if let Some(index) = turn
        .session
        .film_list()
        .items
        .iter()
        .position(|f| f.id == saved.id)
    {
        turn.session.film_detail.index = index;
    }
    store(&mut turn.session, saved);
    show_detail(turn);
    Ok(())
}
