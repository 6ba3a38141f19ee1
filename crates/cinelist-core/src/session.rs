// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user Session aggregate and its independently clearable sub-states.
//!
//! Draft fields are `Option<T>`: `None` means "unset, keep the existing value
//! on finalize". A legitimately zero rating is `Some(0.0)`.

use serde::{Deserialize, Serialize};

use crate::list::ListState;
use crate::token::{StateToken, Workflow};
use crate::types::{
    Collection, Context, Credentials, ExternalIdentity, Feedback, FeedbackCategory, Film, Role,
    User,
};

/// In-progress film fields collected by the create/update wizards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilmDraft {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub image_url: Option<String>,
    pub comment: Option<String>,
    pub is_viewed: Option<bool>,
    pub user_rating: Option<f32>,
    pub review: Option<String>,
}

impl FilmDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the payload for a create call.
    pub fn to_new_film(&self) -> Film {
        Film {
            id: 0,
            title: self.title.clone().unwrap_or_default(),
            year: self.year,
            genre: self.genre.clone(),
            description: self.description.clone(),
            rating: self.rating,
            image_url: self.image_url.clone(),
            comment: self.comment.clone(),
            is_viewed: self.is_viewed.unwrap_or(false),
            is_favorite: false,
            user_rating: self.user_rating,
            review: self.review.clone(),
        }
    }

    /// Builds the payload for an update call: unset fields keep the existing
    /// value. With `is_edit_viewed` the linked viewed/user-rating/review trio
    /// is taken from the draft verbatim, so an unset rating clears it.
    pub fn merge_into(&self, existing: &Film, is_edit_viewed: bool) -> Film {
        let mut film = existing.clone();
        if let Some(title) = &self.title {
            film.title = title.clone();
        }
        if self.year.is_some() {
            film.year = self.year;
        }
        if self.genre.is_some() {
            film.genre = self.genre.clone();
        }
        if self.description.is_some() {
            film.description = self.description.clone();
        }
        if self.rating.is_some() {
            film.rating = self.rating;
        }
        if self.image_url.is_some() {
            film.image_url = self.image_url.clone();
        }
        if self.comment.is_some() {
            film.comment = self.comment.clone();
        }
        if is_edit_viewed {
            film.is_viewed = self.is_viewed.unwrap_or(false);
            film.user_rating = self.user_rating;
            film.review = self.review.clone();
        } else {
            if let Some(viewed) = self.is_viewed {
                film.is_viewed = viewed;
            }
            if self.user_rating.is_some() {
                film.user_rating = self.user_rating;
            }
            if self.review.is_some() {
                film.review = self.review.clone();
            }
        }
        film
    }
}

/// Film detail view and its in-progress draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilmDetailState {
    /// The film shown in the detail view, if any.
    pub film: Option<Film>,
    /// Index of `film` within the cached page of the context's film list.
    pub index: usize,
    pub draft: FilmDraft,
    /// Set when the user explicitly edits "viewed" in the update wizard.
    pub is_edit_viewed: bool,
}

impl FilmDetailState {
    pub fn clear_draft(&mut self) {
        self.draft = FilmDraft::default();
        self.is_edit_viewed = false;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDraft {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CollectionDraft {
    pub fn to_new_collection(&self) -> Collection {
        Collection {
            id: 0,
            name: self.name.clone().unwrap_or_default(),
            description: self.description.clone(),
            is_favorite: false,
            total_films: 0,
        }
    }

    pub fn merge_into(&self, existing: &Collection) -> Collection {
        let mut collection = existing.clone();
        if let Some(name) = &self.name {
            collection.name = name.clone();
        }
        if self.description.is_some() {
            collection.description = self.description.clone();
        }
        collection
    }
}

/// Collection detail view and its in-progress draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDetailState {
    pub collection: Option<Collection>,
    pub index: usize,
    pub draft: CollectionDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub category: Option<FeedbackCategory>,
    pub text: Option<String>,
}

/// Moderation lists and the user currently inspected by an admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminState {
    pub users: ListState<User>,
    pub feedbacks: ListState<Feedback>,
    pub selected_user: Option<User>,
}

/// Per-user aggregate: identity, auth, dialog control, and workflow sub-states.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub external_id: String,
    pub display_name: String,
    pub locale: String,
    pub role: Role,
    pub is_banned: bool,

    pub credentials: Credentials,
    /// The authenticated backend user.
    pub user: Option<User>,

    /// The single awaited input; `None` means idle.
    pub state: Option<StateToken>,
    pub context: Context,

    pub profile: ProfileDraft,
    pub feedback: FeedbackDraft,
    pub collections: CollectionsListState,
    pub collection_detail: CollectionDetailState,
    pub films: FilmsListState,
    pub film_detail: FilmDetailState,
    pub collection_films: FilmsListState,
    pub admin: AdminState,
}

pub type FilmsListState = ListState<Film>;
pub type CollectionsListState = ListState<Collection>;

impl Session {
    /// A fresh session with every sub-state at its default.
    pub fn new(external_id: impl Into<String>, locale: impl Into<String>, page_size: u32) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: String::new(),
            locale: locale.into(),
            role: Role::User,
            is_banned: false,
            credentials: Credentials::default(),
            user: None,
            state: None,
            context: Context::Film,
            profile: ProfileDraft::default(),
            feedback: FeedbackDraft::default(),
            collections: ListState::with_page_size(page_size),
            collection_detail: CollectionDetailState::default(),
            films: ListState::with_page_size(page_size),
            film_detail: FilmDetailState::default(),
            collection_films: ListState::with_page_size(page_size),
            admin: AdminState {
                users: ListState::with_page_size(page_size),
                feedbacks: ListState::with_page_size(page_size),
                selected_user: None,
            },
        }
    }

    /// Refreshes display name and locale from the transport.
    pub fn update_identity(&mut self, identity: &ExternalIdentity) {
        if !identity.display_name.is_empty() {
            self.display_name = identity.display_name.clone();
        }
        if let Some(locale) = identity.locale.as_deref().filter(|l| !l.is_empty()) {
            self.locale = locale.to_string();
        }
    }

    /// Stores the backend user and mirrors its role and ban flag.
    pub fn set_user(&mut self, user: User) {
        self.role = user.role;
        self.is_banned = user.is_banned;
        self.user = Some(user);
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_none()
    }

    /// Film list selected by the current context.
    pub fn film_list(&self) -> &FilmsListState {
        match self.context {
            Context::Film => &self.films,
            Context::Collection => &self.collection_films,
        }
    }

    pub fn film_list_mut(&mut self) -> &mut FilmsListState {
        match self.context {
            Context::Film => &mut self.films,
            Context::Collection => &mut self.collection_films,
        }
    }

    /// Resets the draft owned by `workflow` to its default.
    pub fn clear_draft(&mut self, workflow: Workflow) {
        match workflow {
            Workflow::NewFilm | Workflow::UpdateFilm | Workflow::DeleteFilm => {
                self.film_detail.clear_draft()
            }
            Workflow::NewCollection | Workflow::UpdateCollection | Workflow::DeleteCollection => {
                self.collection_detail.draft = CollectionDraft::default()
            }
            Workflow::Profile => self.profile = ProfileDraft::default(),
            Workflow::Feedback => self.feedback = FeedbackDraft::default(),
            Workflow::FilmsList
            | Workflow::CollectionsList
            | Workflow::UsersList
            | Workflow::FeedbacksList => {}
        }
    }

    /// Leaves the active wizard (if any): clears its draft and the state token.
    /// Returns the workflow that was abandoned.
    pub fn end_dialog(&mut self) -> Option<Workflow> {
        let token = self.state.take()?;
        self.clear_draft(token.workflow);
        Some(token.workflow)
    }

    /// Clears credentials, domain user and every draft; keeps identity and
    /// list-size preferences.
    pub fn logout(&mut self) {
        self.credentials.clear();
        self.user = None;
        self.role = Role::User;
        self.state = None;
        self.context = Context::Film;
        self.profile = ProfileDraft::default();
        self.feedback = FeedbackDraft::default();
        self.collections.reset_keep_preferences();
        self.collection_detail = CollectionDetailState::default();
        self.films.reset_keep_preferences();
        self.film_detail = FilmDetailState::default();
        self.collection_films.reset_keep_preferences();
        self.admin.users.reset_keep_preferences();
        self.admin.feedbacks.reset_keep_preferences();
        self.admin.selected_user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Field;
    use crate::types::Page;

    fn film() -> Film {
        Film {
            id: 7,
            title: "Alien".into(),
            year: Some(1979),
            rating: Some(8.5),
            is_viewed: true,
            user_rating: Some(9.0),
            review: Some("tense".into()),
            ..Film::default()
        }
    }

    #[test]
    fn unset_draft_fields_keep_existing_values() {
        let draft = FilmDraft {
            genre: Some("horror".into()),
            ..FilmDraft::default()
        };
        let merged = draft.merge_into(&film(), false);
        assert_eq!(merged.title, "Alien");
        assert_eq!(merged.year, Some(1979));
        assert_eq!(merged.genre.as_deref(), Some("horror"));
        assert_eq!(merged.user_rating, Some(9.0));
        assert!(merged.is_viewed);
    }

    #[test]
    fn zero_rating_is_distinct_from_unset() {
        let draft = FilmDraft {
            rating: Some(0.0),
            ..FilmDraft::default()
        };
        assert_eq!(draft.merge_into(&film(), false).rating, Some(0.0));
    }

    #[test]
    fn edit_viewed_overrides_linked_fields() {
        let draft = FilmDraft {
            is_viewed: Some(false),
            ..FilmDraft::default()
        };
        let merged = draft.merge_into(&film(), true);
        assert!(!merged.is_viewed);
        assert_eq!(merged.user_rating, None);
        assert_eq!(merged.review, None);
        assert_eq!(merged.rating, Some(8.5));
    }

    #[test]
    fn end_dialog_clears_owning_draft_only() {
        let mut session = Session::new("42", "en", 5);
        session.film_detail.draft.title = Some("Dune".into());
        session.profile.username = Some("keep".into());
        session.state = Some(StateToken::new(Workflow::NewFilm, Field::Year));

        assert_eq!(session.end_dialog(), Some(Workflow::NewFilm));
        assert!(session.is_idle());
        assert!(session.film_detail.draft.is_empty());
        assert_eq!(session.profile.username.as_deref(), Some("keep"));
        assert_eq!(session.end_dialog(), None);
    }

    #[test]
    fn logout_keeps_identity_and_page_size() {
        let mut session = Session::new("42", "en", 5);
        session.display_name = "Ann".into();
        session.films.set_page_size(9);
        session.films.apply_page(Page {
            items: vec![film()],
            page: 1,
            page_size: 9,
            total_records: 1,
        });
        session.credentials.access_token = Some("a".into());
        session.set_user(User {
            id: 1,
            username: "ann".into(),
            role: Role::Admin,
            ..User::default()
        });
        session.film_detail.draft.title = Some("x".into());
        session.state = Some(StateToken::new(Workflow::NewFilm, Field::Title));

        session.logout();

        assert_eq!(session.external_id, "42");
        assert_eq!(session.display_name, "Ann");
        assert_eq!(session.films.page_size(), 9);
        assert!(session.films.items.is_empty());
        assert!(!session.credentials.is_authenticated());
        assert!(session.user.is_none());
        assert_eq!(session.role, Role::User);
        assert!(session.state.is_none());
        assert!(session.film_detail.draft.is_empty());
    }

    #[test]
    fn context_selects_film_list() {
        let mut session = Session::new("1", "en", 5);
        session.collection_films.set_page_size(3);
        assert_eq!(session.film_list().page_size(), 5);
        session.context = Context::Collection;
        assert_eq!(session.film_list().page_size(), 3);
        session.film_list_mut().set_page_size(4);
        assert_eq!(session.collection_films.page_size(), 4);
        assert_eq!(session.films.page_size(), 5);
    }
}
