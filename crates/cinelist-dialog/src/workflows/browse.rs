// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List actions: paging, selection, filters, sorting and page size.

use cinelist_core::action::ListAction;
use cinelist_core::{CinelistError, ListKind, Notice};

use super::{admin, collection, film};
use crate::filters;
use crate::lists::{self, ListContext, with_list_context};
use crate::turn::Turn;

pub async fn handle(
    turn: &mut Turn<'_>,
    kind: ListKind,
    action: ListAction,
) -> Result<(), CinelistError> {
    with_list_context!(kind, turn.session.context, |ctx| run(ctx, turn, action)
        .await)
}

async fn run<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    action: ListAction,
) -> Result<(), CinelistError> {
    if turn.session.role < ctx.required_role() {
        turn.notice(Notice::Forbidden);
        turn.main_menu();
        return Ok(());
    }

    match action {
        ListAction::Show => lists::show(ctx, turn).await,
        ListAction::NextPage => lists::turn_page(ctx, turn, true).await,
        ListAction::PrevPage => lists::turn_page(ctx, turn, false).await,
        ListAction::Select(index) => {
            select(turn, ctx.kind(), index);
            Ok(())
        }
        ListAction::PageSize => {
            filters::start_page_size(ctx, turn);
            Ok(())
        }
        ListAction::Filters => {
            filters::show_filters(ctx, turn);
            Ok(())
        }
        ListAction::Filter(key) => filters::filter(ctx, turn, key).await,
        ListAction::FilterSwitch(key, value) => filters::set_switch(ctx, turn, key, value).await,
        ListAction::FilterReset(key) => filters::reset(ctx, turn, key).await,
        ListAction::FiltersReset => filters::reset_all(ctx, turn).await,
        ListAction::Sorting => {
            filters::show_sorting(ctx, turn);
            Ok(())
        }
        ListAction::Sort(field, direction) => filters::sort(ctx, turn, field, direction).await,
        ListAction::SortReset => filters::reset_sort(ctx, turn).await,
    }
}

fn select(turn: &mut Turn<'_>, kind: ListKind, index: usize) {
    match kind {
        ListKind::Films => film::open(turn, index),
        ListKind::Collections => collection::open(turn, index),
        ListKind::Users => admin::open_user(turn, index),
        // Feedback entries are shown in full on the list itself.
        ListKind::Feedbacks => turn.notice(Notice::Unrecognized),
    }
}
