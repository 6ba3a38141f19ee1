// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List contexts and the pagination cursor manager.
//!
//! A [`ListContext`] knows which [`ListState`] of the session it owns, how
//! to fetch a page for it, and how to present it. The concrete context is
//! chosen once per update with [`with_list_context!`]; everything below it
//! is generic and never re-inspects the session context.

use async_trait::async_trait;
use cinelist_core::types::{Collection, Feedback, Film, User};
use cinelist_core::{
    CinelistError, Context, ListKind, ListQuery, ListState, Notice, Operation, Page, Role,
    Session, View, Workflow,
};
use tracing::debug;

use crate::turn::Turn;

#[async_trait]
pub trait ListContext: Send + Sync {
    type Item: Clone + Send + Sync;

    fn kind(&self) -> ListKind;

    /// Workflow that owns this list's page-size and range prompts.
    fn workflow(&self) -> Workflow;

    /// Minimum role allowed to browse the list.
    fn required_role(&self) -> Role {
        Role::User
    }

    fn list<'s>(&self, session: &'s Session) -> &'s ListState<Self::Item>;

    fn list_mut<'s>(&self, session: &'s mut Session) -> &'s mut ListState<Self::Item>;

    async fn fetch_page(
        &self,
        turn: &mut Turn<'_>,
        query: &ListQuery,
    ) -> Result<Page<Self::Item>, CinelistError>;

    fn view(&self, session: &Session) -> View;
}

/// Films owned directly by the user.
pub struct FilmsContext;

/// Films of the collection open in the collection detail view.
pub struct CollectionFilmsContext;

pub struct CollectionsContext;

pub struct UsersContext;

pub struct FeedbacksContext;

#[async_trait]
impl ListContext for FilmsContext {
    type Item = Film;

    fn kind(&self) -> ListKind {
        ListKind::Films
    }

    fn workflow(&self) -> Workflow {
        Workflow::FilmsList
    }

    fn list<'s>(&self, session: &'s Session) -> &'s ListState<Film> {
        &session.films
    }

    fn list_mut<'s>(&self, session: &'s mut Session) -> &'s mut ListState<Film> {
        &mut session.films
    }

    async fn fetch_page(
        &self,
        turn: &mut Turn<'_>,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError> {
        turn.backend
            .list_films(&mut turn.session.credentials, query)
            .await
    }

    fn view(&self, session: &Session) -> View {
        View::FilmsList {
            context: Context::Film,
            collection: None,
            list: session.films.clone(),
        }
    }
}

#[async_trait]
impl ListContext for CollectionFilmsContext {
    type Item = Film;

    fn kind(&self) -> ListKind {
        ListKind::Films
    }

    fn workflow(&self) -> Workflow {
        Workflow::FilmsList
    }

    fn list<'s>(&self, session: &'s Session) -> &'s ListState<Film> {
        &session.collection_films
    }

    fn list_mut<'s>(&self, session: &'s mut Session) -> &'s mut ListState<Film> {
        &mut session.collection_films
    }

    async fn fetch_page(
        &self,
        turn: &mut Turn<'_>,
        query: &ListQuery,
    ) -> Result<Page<Film>, CinelistError> {
        let collection_id = turn
            .session
            .collection_detail
            .collection
            .as_ref()
            .map(|c| c.id)
            .ok_or_else(|| CinelistError::Internal("no collection is open".into()))?;
        turn.backend
            .list_collection_films(&mut turn.session.credentials, collection_id, query)
            .await
    }

    fn view(&self, session: &Session) -> View {
        View::FilmsList {
            context: Context::Collection,
            collection: session.collection_detail.collection.clone(),
            list: session.collection_films.clone(),
        }
    }
}

#[async_trait]
impl ListContext for CollectionsContext {
    type Item = Collection;

    fn kind(&self) -> ListKind {
        ListKind::Collections
    }

    fn workflow(&self) -> Workflow {
        Workflow::CollectionsList
    }

    fn list<'s>(&self, session: &'s Session) -> &'s ListState<Collection> {
        &session.collections
    }

    fn list_mut<'s>(&self, session: &'s mut Session) -> &'s mut ListState<Collection> {
        &mut session.collections
    }

    async fn fetch_page(
        &self,
        turn: &mut Turn<'_>,
        query: &ListQuery,
    ) -> Result<Page<Collection>, CinelistError> {
        turn.backend
            .list_collections(&mut turn.session.credentials, query)
            .await
    }

    fn view(&self, session: &Session) -> View {
        View::CollectionsList {
            list: session.collections.clone(),
        }
    }
}

#[async_trait]
impl ListContext for UsersContext {
    type Item = User;

    fn kind(&self) -> ListKind {
        ListKind::Users
    }

    fn workflow(&self) -> Workflow {
        Workflow::UsersList
    }

    fn required_role(&self) -> Role {
        Role::Admin
    }

    fn list<'s>(&self, session: &'s Session) -> &'s ListState<User> {
        &session.admin.users
    }

    fn list_mut<'s>(&self, session: &'s mut Session) -> &'s mut ListState<User> {
        &mut session.admin.users
    }

    async fn fetch_page(
        &self,
        turn: &mut Turn<'_>,
        query: &ListQuery,
    ) -> Result<Page<User>, CinelistError> {
        turn.backend
            .list_users(&mut turn.session.credentials, query)
            .await
    }

    fn view(&self, session: &Session) -> View {
        View::UsersList {
            list: session.admin.users.clone(),
        }
    }
}

#[async_trait]
impl ListContext for FeedbacksContext {
    type Item = Feedback;

    fn kind(&self) -> ListKind {
        ListKind::Feedbacks
    }

    fn workflow(&self) -> Workflow {
        Workflow::FeedbacksList
    }

    fn required_role(&self) -> Role {
        Role::Admin
    }

    fn list<'s>(&self, session: &'s Session) -> &'s ListState<Feedback> {
        &session.admin.feedbacks
    }

    fn list_mut<'s>(&self, session: &'s mut Session) -> &'s mut ListState<Feedback> {
        &mut session.admin.feedbacks
    }

    async fn fetch_page(
        &self,
        turn: &mut Turn<'_>,
        query: &ListQuery,
    ) -> Result<Page<Feedback>, CinelistError> {
        turn.backend
            .list_feedbacks(&mut turn.session.credentials, query)
            .await
    }

    fn view(&self, session: &Session) -> View {
        View::FeedbacksList {
            list: session.admin.feedbacks.clone(),
        }
    }
}

/// Runs `$body` with `$ctx` bound to the context that owns `$kind` for the
/// session's current browsing context.
macro_rules! with_list_context {
    ($kind:expr, $context:expr, |$ctx:ident| $body:expr) => {{
        use $crate::lists::{
            CollectionFilmsContext, CollectionsContext, FeedbacksContext, FilmsContext,
            UsersContext,
        };
        match ($kind, $context) {
            (::cinelist_core::ListKind::Films, ::cinelist_core::Context::Film) => {
                let $ctx = &FilmsContext;
                $body
            }
            (::cinelist_core::ListKind::Films, ::cinelist_core::Context::Collection) => {
                let $ctx = &CollectionFilmsContext;
                $body
            }
            (::cinelist_core::ListKind::Collections, _) => {
                let $ctx = &CollectionsContext;
                $body
            }
            (::cinelist_core::ListKind::Users, _) => {
                let $ctx = &UsersContext;
                $body
            }
            (::cinelist_core::ListKind::Feedbacks, _) => {
                let $ctx = &FeedbacksContext;
                $body
            }
        }
    }};
}

pub(crate) use with_list_context;

/// Re-fetches the page under the cursor. When the list shrank below the
/// cursor, the cursor is pulled back and that page is fetched instead.
pub async fn refresh<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    for _ in 0..2 {
        let query = ListQuery::for_list(ctx.list(&turn.session));
        let page = ctx.fetch_page(turn, &query).await?;
        let span = &turn.span;
        let list = ctx.list_mut(&mut turn.session);
        if list.apply_page(page) {
            debug!(
                parent: span,
                list = %ctx.kind(),
                page = list.current_page(),
                last_page = list.last_page(),
                total = list.total_records(),
                "list refreshed"
            );
            return Ok(());
        }
    }
    Ok(())
}

/// Fetches and shows the list. On failure the cached page is shown after
/// the failure notice.
pub async fn show<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    if let Err(err) = refresh(ctx, turn).await {
        turn.recover(Operation::LoadList, err)?;
    }
    let view = ctx.view(&turn.session);
    turn.show(view);
    Ok(())
}

/// Shows the cached page without re-fetching.
pub fn present<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) {
    let view = ctx.view(&turn.session);
    turn.show(view);
}

/// Moves the cursor by one page. At a boundary only a notice is shown and
/// the cursor stays put.
pub async fn turn_page<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    forward: bool,
) -> Result<(), CinelistError> {
    let list = ctx.list_mut(&mut turn.session);
    let current = list.current_page();
    let moved = if forward {
        !list.is_last_page() && list.go_to(current + 1)
    } else {
        !list.is_first_page() && list.go_to(current - 1)
    };
    if !moved {
        turn.notice(if forward {
            Notice::LastPage
        } else {
            Notice::FirstPage
        });
        return Ok(());
    }

    if let Err(err) = refresh(ctx, turn).await {
        ctx.list_mut(&mut turn.session).go_to(current);
        turn.recover(Operation::LoadList, err)?;
    }
    let view = ctx.view(&turn.session);
    turn.show(view);
    Ok(())
}

/// Next item after `index` across page boundaries. Returns the new index
/// into the cached page, or `None` after emitting a boundary or failure
/// notice.
pub async fn next_item<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    index: usize,
) -> Result<Option<usize>, CinelistError> {
    let list = ctx.list(&turn.session);
    if index + 1 < list.items.len() {
        return Ok(Some(index + 1));
    }
    if list.is_last_page() {
        turn.notice(Notice::LastPage);
        return Ok(None);
    }
    let current = list.current_page();
    cross_page(ctx, turn, current, current + 1, Notice::LastPage, |_| 0).await
}

/// Previous item before `index`; see [`next_item`].
pub async fn prev_item<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    index: usize,
) -> Result<Option<usize>, CinelistError> {
    let list = ctx.list(&turn.session);
    let len = list.items.len();
    if index > 0 && len > 0 {
        return Ok(Some((index - 1).min(len - 1)));
    }
    if list.is_first_page() {
        turn.notice(Notice::FirstPage);
        return Ok(None);
    }
    let current = list.current_page();
    cross_page(ctx, turn, current, current - 1, Notice::FirstPage, |len| len - 1).await
}

async fn cross_page<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    from: u32,
    to: u32,
    boundary: Notice,
    pick: fn(usize) -> usize,
) -> Result<Option<usize>, CinelistError> {
    ctx.list_mut(&mut turn.session).go_to(to);
    if let Err(err) = refresh(ctx, turn).await {
        ctx.list_mut(&mut turn.session).go_to(from);
        turn.recover(Operation::LoadList, err)?;
        return Ok(None);
    }
    let len = ctx.list(&turn.session).items.len();
    if len == 0 {
        turn.notice(boundary);
        return Ok(None);
    }
    Ok(Some(pick(len).min(len - 1)))
}

/// Item at `index` of the cached page.
pub fn item_at<C: ListContext>(ctx: &C, session: &Session, index: usize) -> Option<C::Item> {
    ctx.list(session).items.get(index).cloned()
}
