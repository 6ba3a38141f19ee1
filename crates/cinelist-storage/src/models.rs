// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row-shaped records for the session schema and their conversion to and
//! from the [`Session`] aggregate.
//!
//! Conversion (JSON encoding, enum parsing) happens here, outside the
//! database thread; the query layer only moves plain columns.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use cinelist_core::list::{FilterSet, SortSpec};
use cinelist_core::session::{
    AdminState, CollectionDetailState, CollectionDraft, FeedbackDraft, FilmDetailState, FilmDraft,
    ProfileDraft,
};
use cinelist_core::types::{Collection, Credentials, FeedbackCategory, Film, User};
use cinelist_core::{CinelistError, Context, ListState, Role, Session, StateToken};

/// Keys of the `list_states.list_kind` column.
pub const FILMS: &str = "films";
pub const COLLECTION_FILMS: &str = "collection_films";
pub const COLLECTIONS: &str = "collections";
pub const USERS: &str = "users";
pub const FEEDBACKS: &str = "feedbacks";

/// Everything stored for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub root: SessionRow,
    pub profile: Option<ProfileRow>,
    pub feedback: Option<FeedbackRow>,
    pub lists: Vec<ListRow>,
    pub film_detail: Option<FilmDetailRow>,
    pub collection_detail: Option<CollectionDetailRow>,
    pub admin: Option<AdminRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub external_id: String,
    pub display_name: String,
    pub locale: String,
    pub role: String,
    pub is_banned: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_json: Option<String>,
    pub state: Option<String>,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRow {
    pub category: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub list_kind: String,
    pub current_page: i64,
    pub page_size: i64,
    pub last_page: i64,
    pub total_records: i64,
    pub filters_json: String,
    pub sort_token: Option<String>,
    pub items_json: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilmDetailRow {
    pub film_json: Option<String>,
    pub item_index: i64,
    pub draft_json: String,
    pub is_edit_viewed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDetailRow {
    pub collection_json: Option<String>,
    pub item_index: i64,
    pub draft_json: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminRow {
    pub selected_user_json: Option<String>,
}

fn encode<T: Serialize>(value: &T) -> Result<String, CinelistError> {
    serde_json::to_string(value).map_err(|e| CinelistError::Storage {
        source: Box::new(e),
    })
}

fn encode_opt<T: Serialize>(value: Option<&T>) -> Result<Option<String>, CinelistError> {
    value.map(encode).transpose()
}

/// Decodes a stored sub-state, falling back to the default when the column
/// no longer matches the current shape.
fn decode_or_default<T: DeserializeOwned + Default>(json: &str, what: &str) -> T {
    serde_json::from_str(json).unwrap_or_else(|e| {
        warn!(what, error = %e, "discarding undecodable session sub-state");
        T::default()
    })
}

fn decode_opt<T: DeserializeOwned>(json: Option<&str>, what: &str) -> Option<T> {
    let json = json?;
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(what, error = %e, "discarding undecodable session sub-state");
            None
        }
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

impl ListRow {
    fn encode<T: Serialize>(kind: &str, list: &ListState<T>) -> Result<Self, CinelistError> {
        Ok(Self {
            list_kind: kind.to_string(),
            current_page: i64::from(list.current_page()),
            page_size: i64::from(list.page_size()),
            last_page: i64::from(list.last_page()),
            total_records: i64::from(list.total_records()),
            filters_json: encode(&list.filters)?,
            sort_token: list.sort.token(),
            items_json: encode(&list.items)?,
        })
    }

    fn decode<T: DeserializeOwned>(&self) -> ListState<T> {
        let items: Vec<T> = serde_json::from_str(&self.items_json).unwrap_or_else(|e| {
            warn!(list = %self.list_kind, error = %e, "dropping undecodable cached items");
            Vec::new()
        });
        ListState::restore(
            items,
            to_u32(self.current_page),
            to_u32(self.page_size),
            to_u32(self.last_page),
            to_u32(self.total_records),
            decode_or_default::<FilterSet>(&self.filters_json, "filters"),
            SortSpec::from_token(self.sort_token.as_deref()),
        )
    }
}

impl SessionRecord {
    /// Flattens a session into rows, one per sub-state.
    pub fn from_session(session: &Session) -> Result<Self, CinelistError> {
        let root = SessionRow {
            external_id: session.external_id.clone(),
            display_name: session.display_name.clone(),
            locale: session.locale.clone(),
            role: session.role.to_string(),
            is_banned: session.is_banned,
            access_token: session.credentials.access_token.clone(),
            refresh_token: session.credentials.refresh_token.clone(),
            user_json: encode_opt(session.user.as_ref())?,
            state: session.state.map(|t| t.to_string()),
            context: session.context.to_string(),
        };

        let lists = vec![
            ListRow::encode(FILMS, &session.films)?,
            ListRow::encode(COLLECTION_FILMS, &session.collection_films)?,
            ListRow::encode(COLLECTIONS, &session.collections)?,
            ListRow::encode(USERS, &session.admin.users)?,
            ListRow::encode(FEEDBACKS, &session.admin.feedbacks)?,
        ];

        let film_detail = &session.film_detail;
        let collection_detail = &session.collection_detail;

        Ok(Self {
            root,
            profile: Some(ProfileRow {
                username: session.profile.username.clone(),
                email: session.profile.email.clone(),
            }),
            feedback: Some(FeedbackRow {
                category: session.feedback.category.map(|c| c.to_string()),
                text: session.feedback.text.clone(),
            }),
            lists,
            film_detail: Some(FilmDetailRow {
                film_json: encode_opt(film_detail.film.as_ref())?,
                item_index: i64::try_from(film_detail.index).unwrap_or(0),
                draft_json: encode(&film_detail.draft)?,
                is_edit_viewed: film_detail.is_edit_viewed,
            }),
            collection_detail: Some(CollectionDetailRow {
                collection_json: encode_opt(collection_detail.collection.as_ref())?,
                item_index: i64::try_from(collection_detail.index).unwrap_or(0),
                draft_json: encode(&collection_detail.draft)?,
            }),
            admin: Some(AdminRow {
                selected_user_json: encode_opt(session.admin.selected_user.as_ref())?,
            }),
        })
    }

    /// Rebuilds the aggregate. Missing or undecodable sub-states come back
    /// at their defaults; an unknown state token leaves the session idle.
    pub fn into_session(self, default_page_size: u32) -> Session {
        let root = self.root;
        let mut session = Session::new(root.external_id, root.locale, default_page_size);
        session.display_name = root.display_name;
        session.role = Role::from_str(&root.role).unwrap_or_else(|_| {
            warn!(role = %root.role, "unknown stored role, using default");
            Role::default()
        });
        session.is_banned = root.is_banned;
        session.credentials = Credentials {
            access_token: root.access_token,
            refresh_token: root.refresh_token,
        };
        session.user = decode_opt::<User>(root.user_json.as_deref(), "user");
        session.state = root.state.and_then(|raw| match raw.parse::<StateToken>() {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "clearing unknown state token");
                None
            }
        });
        session.context = Context::from_str(&root.context).unwrap_or_default();

        if let Some(profile) = self.profile {
            session.profile = ProfileDraft {
                username: profile.username,
                email: profile.email,
            };
        }

        if let Some(feedback) = self.feedback {
            session.feedback = FeedbackDraft {
                category: feedback
                    .category
                    .and_then(|c| FeedbackCategory::from_str(&c).ok()),
                text: feedback.text,
            };
        }

        for row in &self.lists {
            match row.list_kind.as_str() {
                FILMS => session.films = row.decode::<Film>(),
                COLLECTION_FILMS => session.collection_films = row.decode::<Film>(),
                COLLECTIONS => session.collections = row.decode::<Collection>(),
                USERS => session.admin.users = row.decode(),
                FEEDBACKS => session.admin.feedbacks = row.decode(),
                other => warn!(list = other, "ignoring unknown stored list"),
            }
        }

        if let Some(detail) = self.film_detail {
            session.film_detail = FilmDetailState {
                film: decode_opt(detail.film_json.as_deref(), "film"),
                index: usize::try_from(detail.item_index).unwrap_or(0),
                draft: decode_or_default::<FilmDraft>(&detail.draft_json, "film draft"),
                is_edit_viewed: detail.is_edit_viewed,
            };
        }

        if let Some(detail) = self.collection_detail {
            session.collection_detail = CollectionDetailState {
                collection: decode_opt(detail.collection_json.as_deref(), "collection"),
                index: usize::try_from(detail.item_index).unwrap_or(0),
                draft: decode_or_default::<CollectionDraft>(&detail.draft_json, "collection draft"),
            };
        }

        if let Some(admin) = self.admin {
            session.admin = AdminState {
                users: std::mem::take(&mut session.admin.users),
                feedbacks: std::mem::take(&mut session.admin.feedbacks),
                selected_user: decode_opt(admin.selected_user_json.as_deref(), "selected user"),
            };
        }

        session
    }
}
