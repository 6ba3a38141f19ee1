// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List cursor, filter, and sort data shared by every paginated list.
//!
//! These are plain data with local invariants. Fetching, re-prompting and
//! page resets on mutation live in the dialog engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::token::Field;
use crate::types::Page;

/// Page size used when neither the user nor the config chose one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// The paginated lists a session can browse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ListKind {
    /// Films of the current context (direct or collection-scoped).
    Films,
    Collections,
    Users,
    Feedbacks,
}

impl ListKind {
    /// Sort fields the backend accepts for this list.
    pub fn sort_fields(self) -> &'static [&'static str] {
        match self {
            ListKind::Films => &["title", "year", "rating", "user_rating", "created_at"],
            ListKind::Collections => &["name", "total_films", "created_at"],
            ListKind::Users => &["username", "created_at"],
            ListKind::Feedbacks => &["created_at"],
        }
    }

    /// Filters offered for this list.
    pub fn filter_keys(self) -> &'static [FilterKey] {
        match self {
            ListKind::Films => &[
                FilterKey::IsViewed,
                FilterKey::IsFavorite,
                FilterKey::Year,
                FilterKey::Rating,
                FilterKey::UserRating,
            ],
            ListKind::Collections => &[FilterKey::IsFavorite],
            ListKind::Users => &[FilterKey::IsBanned],
            ListKind::Feedbacks => &[],
        }
    }
}

/// A filter identifier as used in tokens and query parameters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    IsViewed,
    IsFavorite,
    IsBanned,
    Year,
    Rating,
    UserRating,
}

/// Shape of a filter: an on/off switch or a numeric range with a fixed domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    Switch,
    Range { min: f64, max: f64 },
}

impl FilterKey {
    pub fn kind(self) -> FilterKind {
        match self {
            FilterKey::IsViewed | FilterKey::IsFavorite | FilterKey::IsBanned => {
                FilterKind::Switch
            }
            FilterKey::Year => FilterKind::Range {
                min: 1888.0,
                max: 2100.0,
            },
            FilterKey::Rating | FilterKey::UserRating => FilterKind::Range {
                min: 0.0,
                max: 10.0,
            },
        }
    }

    /// The wizard field that collects input for a range filter.
    pub fn range_field(self) -> Option<Field> {
        match self {
            FilterKey::Year => Some(Field::YearRange),
            FilterKey::Rating => Some(Field::RatingRange),
            FilterKey::UserRating => Some(Field::UserRatingRange),
            _ => None,
        }
    }

    /// Inverse of [`FilterKey::range_field`].
    pub fn from_range_field(field: Field) -> Option<Self> {
        match field {
            Field::YearRange => Some(FilterKey::Year),
            Field::RatingRange => Some(FilterKey::Rating),
            Field::UserRatingRange => Some(FilterKey::UserRating),
            _ => None,
        }
    }
}

/// Value of an enabled filter. A missing entry means "disabled".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterValue {
    Switch { value: bool },
    Range { min: Option<f64>, max: Option<f64> },
}

/// The enabled filters of one list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<FilterKey, FilterValue>);

impl FilterSet {
    pub fn apply_switch(&mut self, key: FilterKey, value: bool) {
        self.0.insert(key, FilterValue::Switch { value });
    }

    /// Enables a range filter. A `0` bound means "not set"; a range with no
    /// bound at all disables the filter.
    pub fn apply_range(&mut self, key: FilterKey, min: Option<f64>, max: Option<f64>) {
        let min = min.filter(|v| *v != 0.0);
        let max = max.filter(|v| *v != 0.0);
        if min.is_none() && max.is_none() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, FilterValue::Range { min, max });
        }
    }

    pub fn reset(&mut self, key: FilterKey) {
        self.0.remove(&key);
    }

    pub fn reset_all(&mut self) {
        self.0.clear();
    }

    pub fn is_enabled(&self, key: FilterKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.0.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FilterKey, &FilterValue)> {
        self.0.iter()
    }

    /// Query parameters understood by the backend list endpoints.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (key, value) in &self.0 {
            match value {
                FilterValue::Switch { value } => params.push((key.to_string(), value.to_string())),
                FilterValue::Range { min, max } => {
                    if let Some(min) = min {
                        params.push((format!("min_{key}"), format_bound(*min)));
                    }
                    if let Some(max) = max {
                        params.push((format!("max_{key}"), format_bound(*max)));
                    }
                }
            }
        }
        params
    }
}

fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Sort direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// At most one active sort field with a direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    field: Option<String>,
    direction: Direction,
}

impl SortSpec {
    /// Replaces any previous field.
    pub fn set(&mut self, field: impl Into<String>, direction: Direction) {
        self.field = Some(field.into());
        self.direction = direction;
    }

    pub fn reset(&mut self) {
        self.field = None;
        self.direction = Direction::Asc;
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Combined sort token: `"field"` ascending, `"-field"` descending.
    pub fn token(&self) -> Option<String> {
        self.field.as_ref().map(|f| match self.direction {
            Direction::Asc => f.clone(),
            Direction::Desc => format!("-{f}"),
        })
    }

    /// Inverse of [`SortSpec::token`].
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(t) = token else {
            return Self::default();
        };
        let (field, direction) = match t.strip_prefix('-') {
            Some(rest) => (rest, Direction::Desc),
            None => (t, Direction::Asc),
        };
        if field.is_empty() {
            return Self::default();
        }
        Self {
            field: Some(field.to_string()),
            direction,
        }
    }
}

/// Cursor, cache and query settings of one paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListState<T> {
    pub items: Vec<T>,
    current_page: u32,
    page_size: u32,
    last_page: u32,
    total_records: u32,
    pub filters: FilterSet,
    pub sort: SortSpec,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl<T> ListState<T> {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            page_size: page_size.max(1),
            last_page: 1,
            total_records: 0,
            filters: FilterSet::default(),
            sort: SortSpec::default(),
        }
    }

    /// Rebuilds a cursor from persisted values, clamping it back into range.
    pub fn restore(
        items: Vec<T>,
        current_page: u32,
        page_size: u32,
        last_page: u32,
        total_records: u32,
        filters: FilterSet,
        sort: SortSpec,
    ) -> Self {
        let last_page = last_page.max(1);
        Self {
            items,
            current_page: current_page.clamp(1, last_page),
            page_size: page_size.max(1),
            last_page,
            total_records,
            filters,
            sort,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn total_records(&self) -> u32 {
        self.total_records
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.last_page
    }

    /// Moves the cursor to `page`, clamped into `[1, last_page]`.
    /// Returns whether the cursor moved.
    pub fn go_to(&mut self, page: u32) -> bool {
        let target = page.clamp(1, self.last_page);
        let moved = target != self.current_page;
        self.current_page = target;
        moved
    }

    /// Back to the first page; used after every filter/sort mutation.
    pub fn reset_cursor(&mut self) {
        self.current_page = 1;
    }

    /// Changes the page size and restarts from page 1.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Stores a freshly fetched page and recomputes `last_page`.
    /// Returns `false` when the cursor had to be pulled back because the
    /// list shrank below it, meaning the cached items are for the wrong page.
    pub fn apply_page(&mut self, page: Page<T>) -> bool {
        self.last_page = page.last_page();
        self.total_records = page.total_records;
        self.items = page.items;
        if self.current_page > self.last_page {
            self.current_page = self.last_page;
            return false;
        }
        true
    }

    /// Drops cached items, cursor, filters and sort but keeps the page size.
    pub fn reset_keep_preferences(&mut self) {
        *self = Self::with_page_size(self.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, page: u32, page_size: u32, total: u32) -> Page<u32> {
        Page {
            items,
            page,
            page_size,
            total_records: total,
        }
    }

    #[test]
    fn sort_set_replaces_previous_field() {
        let mut sort = SortSpec::default();
        sort.set("title", Direction::Asc);
        sort.set("rating", Direction::Desc);
        assert_eq!(sort.field(), Some("rating"));
        assert_eq!(sort.token().as_deref(), Some("-rating"));
        sort.reset();
        assert_eq!(sort.token(), None);
    }

    #[test]
    fn sort_token_parses_back() {
        let mut sort = SortSpec::default();
        sort.set("user_rating", Direction::Desc);
        assert_eq!(SortSpec::from_token(sort.token().as_deref()), sort);
        assert_eq!(SortSpec::from_token(Some("-")), SortSpec::default());
        assert_eq!(SortSpec::from_token(Some("")), SortSpec::default());
        assert_eq!(SortSpec::from_token(None), SortSpec::default());
        let asc = SortSpec::from_token(Some("title"));
        assert_eq!(asc.field(), Some("title"));
        assert_eq!(asc.direction(), Direction::Asc);
    }

    #[test]
    fn reset_twice_matches_reset_once() {
        let mut filters = FilterSet::default();
        filters.apply_switch(FilterKey::IsViewed, true);
        filters.apply_range(FilterKey::Rating, Some(7.0), Some(10.0));
        filters.reset(FilterKey::Rating);
        let once = filters.clone();
        filters.reset(FilterKey::Rating);
        assert_eq!(filters, once);
        assert!(!filters.is_enabled(FilterKey::Rating));
        assert!(filters.is_enabled(FilterKey::IsViewed));
    }

    #[test]
    fn zero_bounds_mean_unset() {
        let mut filters = FilterSet::default();
        filters.apply_range(FilterKey::Rating, Some(0.0), Some(8.0));
        assert_eq!(
            filters.get(FilterKey::Rating),
            Some(&FilterValue::Range {
                min: None,
                max: Some(8.0)
            })
        );
        filters.apply_range(FilterKey::Rating, Some(0.0), None);
        assert!(!filters.is_enabled(FilterKey::Rating));
    }

    #[test]
    fn switch_is_tri_state() {
        let mut filters = FilterSet::default();
        assert!(filters.get(FilterKey::IsViewed).is_none());
        filters.apply_switch(FilterKey::IsViewed, false);
        assert_eq!(
            filters.get(FilterKey::IsViewed),
            Some(&FilterValue::Switch { value: false })
        );
    }

    #[test]
    fn query_params_render_bounds() {
        let mut filters = FilterSet::default();
        filters.apply_switch(FilterKey::IsViewed, false);
        filters.apply_range(FilterKey::Year, Some(1990.0), None);
        filters.apply_range(FilterKey::Rating, Some(7.5), Some(10.0));
        let params = filters.query_params();
        assert!(params.contains(&("is_viewed".into(), "false".into())));
        assert!(params.contains(&("min_year".into(), "1990".into())));
        assert!(params.contains(&("min_rating".into(), "7.5".into())));
        assert!(params.contains(&("max_rating".into(), "10".into())));
        assert!(!params.iter().any(|(k, _)| k == "max_year"));
    }

    #[test]
    fn apply_page_recomputes_last_page() {
        let mut list = ListState::with_page_size(2);
        assert!(list.apply_page(page(vec![1, 2], 1, 2, 5)));
        assert_eq!(list.last_page(), 3);
        assert_eq!(list.total_records(), 5);
        assert!(list.go_to(3));
        assert!(!list.go_to(9));
        assert_eq!(list.current_page(), 3);

        // The list shrank under the cursor.
        assert!(!list.apply_page(page(vec![], 3, 2, 2)));
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.last_page(), 1);
    }

    #[test]
    fn empty_list_still_has_one_page() {
        let mut list = ListState::<u32>::default();
        list.apply_page(page(vec![], 1, 5, 0));
        assert_eq!(list.last_page(), 1);
        assert_eq!(list.current_page(), 1);
        assert!(list.is_first_page() && list.is_last_page());
    }

    #[test]
    fn restore_clamps_cursor() {
        let list = ListState::<u32>::restore(
            vec![],
            7,
            0,
            3,
            12,
            FilterSet::default(),
            SortSpec::default(),
        );
        assert_eq!(list.current_page(), 3);
        assert_eq!(list.page_size(), 1);
    }

    #[test]
    fn reset_keep_preferences_keeps_page_size() {
        let mut list = ListState::with_page_size(8);
        list.filters.apply_switch(FilterKey::IsFavorite, true);
        list.apply_page(page(vec![1, 2, 3], 1, 8, 30));
        list.go_to(2);
        list.reset_keep_preferences();
        assert_eq!(list.page_size(), 8);
        assert_eq!(list.current_page(), 1);
        assert!(list.items.is_empty());
        assert!(list.filters.is_empty());
    }

    proptest::proptest! {
        #[test]
        fn cursor_stays_in_bounds(total in 0u32..500, size in 1u32..20, moves in proptest::collection::vec(0u32..40, 0..20)) {
            let mut list = ListState::<u32>::with_page_size(size);
            list.apply_page(page(vec![], 1, size, total));
            for m in moves {
                list.go_to(m);
                proptest::prop_assert!(list.current_page() >= 1);
                proptest::prop_assert!(list.current_page() <= list.last_page());
            }
        }
    }
}
