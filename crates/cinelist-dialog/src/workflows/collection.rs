// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collection detail view, its wizards, and the switch into the films of a
//! collection.

use cinelist_core::action::CollectionAction;
use cinelist_core::types::Collection;
use cinelist_core::view::EntityKind;
use cinelist_core::{
    CinelistError, Context, Field, Notice, Operation, Session, StateToken, View, Workflow,
};
use tracing::info;

use crate::lists::{self, CollectionFilmsContext, CollectionsContext};
use crate::transitions::first_field;
use crate::turn::Turn;

pub async fn handle(turn: &mut Turn<'_>, action: CollectionAction) -> Result<(), CinelistError> {
    match action {
        CollectionAction::New => {
            turn.session.collection_detail.draft = Default::default();
            turn.ask(StateToken::new(
                Workflow::NewCollection,
                first_field(Workflow::NewCollection),
            ));
            Ok(())
        }
        CollectionAction::Update => {
            if let Some(collection) = current(turn) {
                turn.show(View::CollectionUpdateMenu { collection });
            }
            Ok(())
        }
        CollectionAction::UpdateField(field) => {
            if current(turn).is_some() {
                turn.session.collection_detail.draft = Default::default();
                turn.ask(StateToken::new(Workflow::UpdateCollection, field));
            }
            Ok(())
        }
        CollectionAction::Delete => {
            if current(turn).is_some() {
                turn.ask(StateToken::new(Workflow::DeleteCollection, Field::Confirm));
            }
            Ok(())
        }
        CollectionAction::Back => {
            turn.session.context = Context::Film;
            lists::show(&CollectionsContext, turn).await
        }
        CollectionAction::Favorite => toggle_favorite(turn).await,
        CollectionAction::Films => {
            if current(turn).is_none() {
                return Ok(());
            }
            turn.session.context = Context::Collection;
            lists::show(&CollectionFilmsContext, turn).await
        }
    }
}

/// Id of the collection open in the detail view.
pub fn open_id(session: &Session) -> Option<i64> {
    session.collection_detail.collection.as_ref().map(|c| c.id)
}

pub fn show_detail(turn: &mut Turn<'_>) {
    match turn.session.collection_detail.collection.clone() {
        Some(collection) => turn.show(View::CollectionDetail { collection }),
        None => lists::present(&CollectionsContext, turn),
    }
}

/// Opens the collection at `index` of the cached page. Opening a different
/// collection forgets the films browsed in the previous one.
pub fn open(turn: &mut Turn<'_>, index: usize) {
    let Some(collection) = turn.session.collections.items.get(index).cloned() else {
        turn.notice(Notice::Unrecognized);
        lists::present(&CollectionsContext, turn);
        return;
    };
    if open_id(&turn.session) != Some(collection.id) {
        turn.session.collection_films.reset_keep_preferences();
    }
    let detail = &mut turn.session.collection_detail;
    detail.collection = Some(collection);
    detail.index = index;
    show_detail(turn);
}

fn current(turn: &mut Turn<'_>) -> Option<Collection> {
    let collection = turn.session.collection_detail.collection.clone();
    if collection.is_none() {
        turn.notice(Notice::Unrecognized);
        lists::present(&CollectionsContext, turn);
    }
    collection
}

fn store(session: &mut Session, collection: Collection) {
    if let Some(slot) = session
        .collections
        .items
        .iter_mut()
        .find(|c| c.id == collection.id)
    {
        *slot = collection.clone();
    }
    session.collection_detail.collection = Some(collection);
}

pub fn confirm_view(session: &Session) -> Option<View> {
    let collection = session.collection_detail.collection.as_ref()?;
    Some(View::ConfirmDelete {
        kind: EntityKind::Collection,
        title: collection.name.clone(),
    })
}

pub async fn confirm_delete(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(collection_id) = open_id(&turn.session) else {
        turn.session.end_dialog();
        turn.notice(Notice::Unrecognized);
        return Ok(());
    };
    match turn
        .backend
        .delete_collection(&mut turn.session.credentials, collection_id)
        .await
    {
        Ok(()) => {
            info!(parent: &turn.span, collection_id, "collection deleted");
            turn.session.end_dialog();
            turn.session.collection_detail.collection = None;
            turn.session.collection_films.reset_keep_preferences();
            turn.session.context = Context::Film;
            turn.notice(Notice::Succeeded(Operation::DeleteCollection));
            lists::show(&CollectionsContext, turn).await
        }
        Err(err) => {
            turn.recover(Operation::DeleteCollection, err)?;
            show_detail(turn);
            Ok(())
        }
    }
}

async fn toggle_favorite(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(mut collection) = current(turn) else {
        return Ok(());
    };
    collection.is_favorite = !collection.is_favorite;
    match turn
        .backend
        .update_collection(&mut turn.session.credentials, &collection)
        .await
    {
        Ok(saved) => store(&mut turn.session, saved),
        Err(err) => turn.recover(Operation::ToggleFavorite, err)?,
    }
    show_detail(turn);
    Ok(())
}

pub async fn create(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let collection = turn.session.collection_detail.draft.to_new_collection();
    match turn
        .backend
        .create_collection(&mut turn.session.credentials, &collection)
        .await
    {
        Ok(created) => {
            info!(parent: &turn.span, collection_id = created.id, name = %created.name, "collection created");
            turn.session.end_dialog();
            turn.notice(Notice::Succeeded(Operation::CreateCollection));
            lists::show(&CollectionsContext, turn).await
        }
        Err(err) => super::abort(
            turn,
            Operation::CreateCollection,
            Workflow::NewCollection,
            err,
        ),
    }
}

pub async fn update(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let Some(existing) = turn.session.collection_detail.collection.clone() else {
        turn.session.end_dialog();
        turn.notice(Notice::Unrecognized);
        return Ok(());
    };
    let collection = turn
        .session
        .collection_detail
        .draft
        .merge_into(&existing);
    match turn
        .backend
        .update_collection(&mut turn.session.credentials, &collection)
        .await
    {
        Ok(saved) => {
            info!(parent: &turn.span, collection_id = saved.id, "collection updated");
            turn.session.end_dialog();
            store(&mut turn.session, saved);
            turn.notice(Notice::Succeeded(Operation::UpdateCollection));
            show_detail(turn);
            Ok(())
        }
        Err(err) => super::abort(
            turn,
            Operation::UpdateCollection,
            Workflow::UpdateCollection,
            err,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(id: i64, name: &str) -> Collection {
        Collection {
            id,
            name: name.into(),
            ..Collection::default()
        }
    }

    #[test]
    fn store_keeps_list_and_detail_in_step() {
        let mut session = Session::new("1", "en", 5);
        session.collections.items = vec![collection(1, "Noir"), collection(2, "Sci-fi")];
        let mut saved = collection(2, "Sci-fi");
        saved.is_favorite = true;
        store(&mut session, saved);
        assert!(session.collections.items[1].is_favorite);
        assert_eq!(open_id(&session), Some(2));
    }

    #[test]
    fn confirmation_uses_the_collection_name() {
        let mut session = Session::new("1", "en", 5);
        session.collection_detail.collection = Some(collection(4, "Westerns"));
        assert_eq!(
            confirm_view(&session),
            Some(View::ConfirmDelete {
                kind: EntityKind::Collection,
                title: "Westerns".into()
            })
        );
    }
}
