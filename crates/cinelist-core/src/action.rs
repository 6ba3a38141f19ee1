// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured action tokens carried by buttons, and slash commands.
//!
//! Tokens are parsed once at the transport boundary into [`Action`]; the
//! dialog engine never inspects raw strings. [`Action::token`] renders the
//! inverse so renderers can build buttons from the same grammar.
//!
//! List tokens share the `<list>_<operation>` shape, for example
//! `films_next_page`, `films_filter_year`, `films_filter_is_viewed_true`,
//! `collections_sort_name_desc` or `users_select_2`.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::list::{Direction, FilterKey, FilterKind, ListKind};
use crate::token::Field;
use crate::types::{FeedbackCategory, Role};

/// Film fields the update menu offers. `viewed` starts the linked
/// viewed/user-rating/review chain.
pub const FILM_UPDATE_FIELDS: &[Field] = &[
    Field::Title,
    Field::Year,
    Field::Genre,
    Field::Description,
    Field::Rating,
    Field::Image,
    Field::Comment,
    Field::Viewed,
];

pub const COLLECTION_UPDATE_FIELDS: &[Field] = &[Field::Name, Field::Description];

pub const PROFILE_UPDATE_FIELDS: &[Field] = &[Field::Username, Field::Email];

/// An operation on one of the paginated lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Show,
    NextPage,
    PrevPage,
    /// Open the item at this index of the cached page.
    Select(usize),
    PageSize,
    Filters,
    /// Switch keys cycle on/off/unset; range keys open the range prompt.
    Filter(FilterKey),
    FilterSwitch(FilterKey, bool),
    FilterReset(FilterKey),
    FiltersReset,
    Sorting,
    Sort(&'static str, Direction),
    SortReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmAction {
    New,
    Update,
    UpdateField(Field),
    Delete,
    Next,
    Prev,
    Back,
    Favorite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionAction {
    New,
    Update,
    UpdateField(Field),
    Delete,
    Back,
    Favorite,
    /// Open the films of the collection in the detail view.
    Films,
}

/// A parsed button token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    Cancel,
    Skip,
    Yes,
    No,
    Profile,
    ProfileUpdate(Field),
    FeedbackNew,
    FeedbackCategory(FeedbackCategory),
    AdminMenu,
    UserBan,
    UserUnban,
    UserRole(Role),
    List(ListKind, ListAction),
    Film(FilmAction),
    Collection(CollectionAction),
}

/// A token that does not belong to the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action token `{0}`")]
pub struct UnknownAction(pub String);

impl Action {
    /// True for the inputs a running wizard consumes itself.
    pub fn is_dialog_control(self) -> bool {
        matches!(self, Action::Cancel | Action::Skip | Action::Yes | Action::No)
    }

    /// Renders the token a button should carry.
    pub fn token(self) -> String {
        match self {
            Action::MainMenu => "main_menu".into(),
            Action::Cancel => "process_cancel".into(),
            Action::Skip => "process_skip".into(),
            Action::Yes => "yes".into(),
            Action::No => "no".into(),
            Action::Profile => "profile".into(),
            Action::ProfileUpdate(field) => format!("profile_update_{field}"),
            Action::FeedbackNew => "feedback_new".into(),
            Action::FeedbackCategory(category) => format!("feedback_category_{category}"),
            Action::AdminMenu => "admin_menu".into(),
            Action::UserBan => "user_ban".into(),
            Action::UserUnban => "user_unban".into(),
            Action::UserRole(role) => format!("user_role_{role}"),
            Action::List(kind, action) => list_token(kind, action),
            Action::Film(action) => match action {
                FilmAction::New => "film_new".into(),
                FilmAction::Update => "film_update".into(),
                FilmAction::UpdateField(field) => format!("film_update_{field}"),
                FilmAction::Delete => "film_delete".into(),
                FilmAction::Next => "film_next".into(),
                FilmAction::Prev => "film_prev".into(),
                FilmAction::Back => "film_back".into(),
                FilmAction::Favorite => "film_favorite".into(),
            },
            Action::Collection(action) => match action {
                CollectionAction::New => "collection_new".into(),
                CollectionAction::Update => "collection_update".into(),
                CollectionAction::UpdateField(field) => format!("collection_update_{field}"),
                CollectionAction::Delete => "collection_delete".into(),
                CollectionAction::Back => "collection_back".into(),
                CollectionAction::Favorite => "collection_favorite".into(),
                CollectionAction::Films => "collection_films".into(),
            },
        }
    }
}

fn list_token(kind: ListKind, action: ListAction) -> String {
    let suffix = match action {
        ListAction::Show => "list".to_string(),
        ListAction::NextPage => "next_page".to_string(),
        ListAction::PrevPage => "prev_page".to_string(),
        ListAction::Select(index) => format!("select_{index}"),
        ListAction::PageSize => "page_size".to_string(),
        ListAction::Filters => "filters".to_string(),
        ListAction::Filter(key) => format!("filter_{key}"),
        ListAction::FilterSwitch(key, value) => format!("filter_{key}_{value}"),
        ListAction::FilterReset(key) => format!("filter_{key}_reset"),
        ListAction::FiltersReset => "filters_reset".to_string(),
        ListAction::Sorting => "sorting".to_string(),
        ListAction::Sort(field, direction) => format!("sort_{field}_{direction}"),
        ListAction::SortReset => "sort_reset".to_string(),
    };
    format!("{kind}_{suffix}")
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).ok_or_else(|| UnknownAction(s.to_string()))
    }
}

fn parse(s: &str) -> Option<Action> {
    let fixed = match s {
        "main_menu" => Some(Action::MainMenu),
        "process_cancel" => Some(Action::Cancel),
        "process_skip" => Some(Action::Skip),
        "yes" => Some(Action::Yes),
        "no" => Some(Action::No),
        "profile" => Some(Action::Profile),
        "feedback_new" => Some(Action::FeedbackNew),
        "admin_menu" => Some(Action::AdminMenu),
        "user_ban" => Some(Action::UserBan),
        "user_unban" => Some(Action::UserUnban),
        "film_new" => Some(Action::Film(FilmAction::New)),
        "film_update" => Some(Action::Film(FilmAction::Update)),
        "film_delete" => Some(Action::Film(FilmAction::Delete)),
        "film_next" => Some(Action::Film(FilmAction::Next)),
        "film_prev" => Some(Action::Film(FilmAction::Prev)),
        "film_back" => Some(Action::Film(FilmAction::Back)),
        "film_favorite" => Some(Action::Film(FilmAction::Favorite)),
        "collection_new" => Some(Action::Collection(CollectionAction::New)),
        "collection_update" => Some(Action::Collection(CollectionAction::Update)),
        "collection_delete" => Some(Action::Collection(CollectionAction::Delete)),
        "collection_back" => Some(Action::Collection(CollectionAction::Back)),
        "collection_favorite" => Some(Action::Collection(CollectionAction::Favorite)),
        "collection_films" => Some(Action::Collection(CollectionAction::Films)),
        _ => None,
    };
    if fixed.is_some() {
        return fixed;
    }

    if let Some(field) = s.strip_prefix("film_update_") {
        return field_in(field, FILM_UPDATE_FIELDS).map(|f| Action::Film(FilmAction::UpdateField(f)));
    }
    if let Some(field) = s.strip_prefix("collection_update_") {
        return field_in(field, COLLECTION_UPDATE_FIELDS)
            .map(|f| Action::Collection(CollectionAction::UpdateField(f)));
    }
    if let Some(field) = s.strip_prefix("profile_update_") {
        return field_in(field, PROFILE_UPDATE_FIELDS).map(Action::ProfileUpdate);
    }
    if let Some(category) = s.strip_prefix("feedback_category_") {
        return FeedbackCategory::from_str(category).ok().map(Action::FeedbackCategory);
    }
    if let Some(role) = s.strip_prefix("user_role_") {
        return Role::from_str(role).ok().map(Action::UserRole);
    }

    ListKind::iter().find_map(|kind| {
        let rest = s.strip_prefix(<&'static str>::from(kind))?.strip_prefix('_')?;
        parse_list_action(kind, rest).map(|action| Action::List(kind, action))
    })
}

fn field_in(raw: &str, allowed: &[Field]) -> Option<Field> {
    let field = Field::from_str(raw).ok()?;
    allowed.contains(&field).then_some(field)
}

fn parse_list_action(kind: ListKind, rest: &str) -> Option<ListAction> {
    let fixed = match rest {
        "list" => Some(ListAction::Show),
        "next_page" => Some(ListAction::NextPage),
        "prev_page" => Some(ListAction::PrevPage),
        "page_size" => Some(ListAction::PageSize),
        "filters" => Some(ListAction::Filters),
        "filters_reset" => Some(ListAction::FiltersReset),
        "sorting" => Some(ListAction::Sorting),
        "sort_reset" => Some(ListAction::SortReset),
        _ => None,
    };
    if fixed.is_some() {
        return fixed;
    }

    if let Some(index) = rest.strip_prefix("select_") {
        return index.parse().ok().map(ListAction::Select);
    }

    if let Some(filter) = rest.strip_prefix("filter_") {
        let offered = |raw: &str| {
            FilterKey::from_str(raw)
                .ok()
                .filter(|key| kind.filter_keys().contains(key))
        };
        let switch = |raw: &str| {
            offered(raw).filter(|key| matches!(key.kind(), FilterKind::Switch))
        };
        // Suffixes first: `is_viewed_true` must not be read as a key.
        if let Some(key) = filter.strip_suffix("_true") {
            return switch(key).map(|k| ListAction::FilterSwitch(k, true));
        }
        if let Some(key) = filter.strip_suffix("_false") {
            return switch(key).map(|k| ListAction::FilterSwitch(k, false));
        }
        if let Some(key) = filter.strip_suffix("_reset") {
            return offered(key).map(ListAction::FilterReset);
        }
        return offered(filter).map(ListAction::Filter);
    }

    if let Some(sort) = rest.strip_prefix("sort_") {
        let (field, direction) = if let Some(field) = sort.strip_suffix("_asc") {
            (field, Direction::Asc)
        } else {
            (sort.strip_suffix("_desc")?, Direction::Desc)
        };
        let field = kind.sort_fields().iter().find(|f| **f == field)?;
        return Some(ListAction::Sort(field, direction));
    }

    None
}

/// Slash commands understood in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Start,
    Menu,
    Films,
    Collections,
    Profile,
    Feedback,
    Admin,
    Logout,
    Cancel,
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_tokens() {
        assert_eq!("main_menu".parse::<Action>(), Ok(Action::MainMenu));
        assert_eq!("process_skip".parse::<Action>(), Ok(Action::Skip));
        assert!("skip".parse::<Action>().is_err());
        assert_eq!(
            "collection_films".parse::<Action>(),
            Ok(Action::Collection(CollectionAction::Films))
        );
        assert_eq!("film_prev".parse::<Action>(), Ok(Action::Film(FilmAction::Prev)));
    }

    #[test]
    fn parses_list_operations() {
        assert_eq!(
            "films_next_page".parse::<Action>(),
            Ok(Action::List(ListKind::Films, ListAction::NextPage))
        );
        assert_eq!(
            "users_select_3".parse::<Action>(),
            Ok(Action::List(ListKind::Users, ListAction::Select(3)))
        );
        assert_eq!(
            "films_filter_user_rating".parse::<Action>(),
            Ok(Action::List(ListKind::Films, ListAction::Filter(FilterKey::UserRating)))
        );
        assert_eq!(
            "films_filter_is_viewed_false".parse::<Action>(),
            Ok(Action::List(
                ListKind::Films,
                ListAction::FilterSwitch(FilterKey::IsViewed, false)
            ))
        );
        assert_eq!(
            "films_filter_year_reset".parse::<Action>(),
            Ok(Action::List(ListKind::Films, ListAction::FilterReset(FilterKey::Year)))
        );
        assert_eq!(
            "films_sort_user_rating_desc".parse::<Action>(),
            Ok(Action::List(ListKind::Films, ListAction::Sort("user_rating", Direction::Desc)))
        );
        assert_eq!(
            "collections_sort_reset".parse::<Action>(),
            Ok(Action::List(ListKind::Collections, ListAction::SortReset))
        );
    }

    #[test]
    fn rejects_options_the_list_does_not_offer() {
        assert!("collections_filter_year".parse::<Action>().is_err());
        assert!("films_filter_year_true".parse::<Action>().is_err());
        assert!("films_filter_rating_false".parse::<Action>().is_err());
        assert!("users_sort_rating_asc".parse::<Action>().is_err());
        assert!("films_sort_title".parse::<Action>().is_err());
        assert!("films_select_x".parse::<Action>().is_err());
        assert!("film_update_username".parse::<Action>().is_err());
        assert!("user_role_owner".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn parameterized_tokens() {
        assert_eq!(
            "film_update_viewed".parse::<Action>(),
            Ok(Action::Film(FilmAction::UpdateField(Field::Viewed)))
        );
        assert_eq!(
            "feedback_category_bugs".parse::<Action>(),
            Ok(Action::FeedbackCategory(FeedbackCategory::Bugs))
        );
        assert_eq!(
            "user_role_admin".parse::<Action>(),
            Ok(Action::UserRole(Role::Admin))
        );
        assert_eq!(
            "profile_update_email".parse::<Action>(),
            Ok(Action::ProfileUpdate(Field::Email))
        );
    }

    #[test]
    fn rendered_tokens_parse_back() {
        let actions = [
            Action::List(ListKind::Films, ListAction::FilterSwitch(FilterKey::IsFavorite, true)),
            Action::List(ListKind::Feedbacks, ListAction::Sort("created_at", Direction::Asc)),
            Action::List(ListKind::Collections, ListAction::Select(0)),
            Action::Collection(CollectionAction::UpdateField(Field::Description)),
            Action::UserRole(Role::SuperAdmin),
        ];
        for action in actions {
            assert_eq!(action.token().parse::<Action>(), Ok(action), "{action}");
        }
    }

    #[test]
    fn commands_parse_by_name() {
        assert_eq!("films".parse::<Command>(), Ok(Command::Films));
        assert_eq!(Command::Logout.to_string(), "logout");
        assert!("films_list".parse::<Command>().is_err());
    }
}
