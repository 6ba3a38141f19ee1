// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! View model handed to the renderer.
//!
//! The dialog engine decides *what* to show; a [`Renderer`](crate::Renderer)
//! decides how it looks. No user-facing text is produced on this side.

use strum::Display;

use crate::list::{FilterSet, ListKind, ListState, SortSpec};
use crate::token::{Field, StateToken};
use crate::types::{Collection, Context, Feedback, Film, Role, User};

/// A mutation or fetch whose outcome is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Authenticate,
    LoadList,
    CreateFilm,
    UpdateFilm,
    DeleteFilm,
    RemoveFromCollection,
    CreateCollection,
    UpdateCollection,
    DeleteCollection,
    ToggleFavorite,
    UploadImage,
    UpdateProfile,
    SendFeedback,
    ChangeRole,
    Ban,
    Unban,
}

/// Short status messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Input that maps to nothing in the current state.
    Unrecognized,
    FirstPage,
    LastPage,
    /// A bound check failed; carries the bounds for the warning text.
    OutOfBounds { field: Field, min: f64, max: f64 },
    /// Input could not be parsed as the field's type.
    InvalidFormat { field: Field },
    /// Skip was sent for a required field.
    NotSkippable { field: Field },
    Failed(Operation),
    Succeeded(Operation),
    Cancelled,
    Banned,
    Forbidden,
    SessionExpired,
    LoggedOut,
}

/// Request for the single input described by `token`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub token: StateToken,
    pub skippable: bool,
    /// Inclusive bounds shown with the prompt, if the field has any.
    pub bounds: Option<(f64, f64)>,
}

/// What kind of entity a delete confirmation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Film,
    CollectionFilm,
    Collection,
}

/// Everything the renderer may be asked to display.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Notice(Notice),
    Prompt(Prompt),
    MainMenu {
        username: Option<String>,
        role: Role,
    },
    Help,
    FilmsList {
        context: Context,
        collection: Option<Collection>,
        list: ListState<Film>,
    },
    FilmDetail {
        context: Context,
        film: Film,
        has_prev: bool,
        has_next: bool,
    },
    FilmUpdateMenu {
        film: Film,
    },
    CollectionsList {
        list: ListState<Collection>,
    },
    CollectionDetail {
        collection: Collection,
    },
    CollectionUpdateMenu {
        collection: Collection,
    },
    ConfirmDelete {
        kind: EntityKind,
        title: String,
    },
    Filters {
        list: ListKind,
        filters: FilterSet,
    },
    Sorting {
        list: ListKind,
        sort: SortSpec,
    },
    Profile {
        user: User,
    },
    FeedbackCategories,
    AdminMenu,
    UsersList {
        list: ListState<User>,
    },
    UserDetail {
        user: User,
        actor_role: Role,
    },
    FeedbacksList {
        list: ListState<Feedback>,
    },
}

impl From<Notice> for View {
    fn from(notice: Notice) -> Self {
        View::Notice(notice)
    }
}

impl From<Prompt> for View {
    fn from(prompt: Prompt) -> Self {
        View::Prompt(prompt)
    }
}
