// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter and sort engine over any [`ListContext`].
//!
//! Every successful mutation restarts the list at page 1, drops whatever
//! wizard was running, and shows the re-fetched list.

use cinelist_core::{
    CinelistError, Direction, Field, FilterKey, FilterKind, FilterValue, ListState, Notice,
    StateToken, View,
};

use crate::lists::{self, ListContext};
use crate::turn::Turn;

/// Next value of a switch filter: unset, then on, then off, then unset.
pub fn cycle_switch(current: Option<&FilterValue>) -> Option<bool> {
    match current {
        None | Some(FilterValue::Range { .. }) => Some(true),
        Some(FilterValue::Switch { value: true }) => Some(false),
        Some(FilterValue::Switch { value: false }) => None,
    }
}

/// Applies `mutate` to the list, rewinds the cursor, leaves any dialog and
/// shows the list again.
async fn settle<C, F>(ctx: &C, turn: &mut Turn<'_>, mutate: F) -> Result<(), CinelistError>
where
    C: ListContext,
    F: FnOnce(&mut ListState<C::Item>) + Send,
{
    let list = ctx.list_mut(&mut turn.session);
    mutate(list);
    list.reset_cursor();
    turn.session.end_dialog();
    lists::show(ctx, turn).await
}

pub fn show_filters<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) {
    let filters = ctx.list(&turn.session).filters.clone();
    turn.show(View::Filters {
        list: ctx.kind(),
        filters,
    });
}

pub fn show_sorting<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) {
    let sort = ctx.list(&turn.session).sort.clone();
    turn.show(View::Sorting {
        list: ctx.kind(),
        sort,
    });
}

/// A filter button: switches advance their cycle, ranges ask for bounds.
pub async fn filter<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    key: FilterKey,
) -> Result<(), CinelistError> {
    match key.kind() {
        FilterKind::Switch => {
            let next = cycle_switch(ctx.list(&turn.session).filters.get(key));
            settle(ctx, turn, |list| match next {
                Some(value) => list.filters.apply_switch(key, value),
                None => list.filters.reset(key),
            })
            .await
        }
        FilterKind::Range { .. } => {
            start_range(ctx, turn, key);
            Ok(())
        }
    }
}

pub async fn set_switch<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    key: FilterKey,
    value: bool,
) -> Result<(), CinelistError> {
    settle(ctx, turn, |list| list.filters.apply_switch(key, value)).await
}

pub async fn reset<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    key: FilterKey,
) -> Result<(), CinelistError> {
    settle(ctx, turn, |list| list.filters.reset(key)).await
}

pub async fn reset_all<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    settle(ctx, turn, |list| list.filters.reset_all()).await
}

pub async fn sort<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
    field: &'static str,
    direction: Direction,
) -> Result<(), CinelistError> {
    settle(ctx, turn, |list| list.sort.set(field, direction)).await
}

pub async fn reset_sort<C: ListContext>(
    ctx: &C,
    turn: &mut Turn<'_>,
) -> Result<(), CinelistError> {
    settle(ctx, turn, |list| list.sort.reset()).await
}

/// Asks for the bounds of a range filter. The step writes the filter
/// itself; [`finish`] then shows the result.
pub fn start_range<C: ListContext>(ctx: &C, turn: &mut Turn<'_>, key: FilterKey) {
    turn.session.end_dialog();
    match key.range_field() {
        Some(field) => turn.ask(StateToken::new(ctx.workflow(), field)),
        None => turn.notice(Notice::Unrecognized),
    }
}

pub fn start_page_size<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) {
    turn.session.end_dialog();
    turn.ask(StateToken::new(ctx.workflow(), Field::PageSize));
}

/// Completes a list-setting prompt whose step already stored the value.
pub async fn finish<C: ListContext>(ctx: &C, turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    settle(ctx, turn, |_| {}).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::FilterSet;

    #[test]
    fn switch_cycles_through_three_states() {
        let mut set = FilterSet::default();
        let key = FilterKey::IsViewed;

        let first = cycle_switch(set.get(key));
        assert_eq!(first, Some(true));
        set.apply_switch(key, true);

        let second = cycle_switch(set.get(key));
        assert_eq!(second, Some(false));
        set.apply_switch(key, false);

        assert_eq!(cycle_switch(set.get(key)), None);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut list: ListState<u32> = ListState::with_page_size(5);
        list.filters.apply_switch(FilterKey::IsFavorite, true);
        list.filters.reset(FilterKey::IsFavorite);
        let once = list.filters.clone();
        list.filters.reset(FilterKey::IsFavorite);
        assert_eq!(list.filters, once);
        assert!(!list.filters.is_enabled(FilterKey::IsFavorite));
    }
}
