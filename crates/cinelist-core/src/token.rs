// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State tokens: the closed set of (workflow, field) pairs a session can await.
//!
//! A token persists as `"<workflow>_awaiting_<field>"`, for example
//! `new_film_awaiting_year`. It never travels through the transport.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

const SEPARATOR: &str = "_awaiting_";

/// A multi-step dialog a user can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Workflow {
    NewFilm,
    UpdateFilm,
    DeleteFilm,
    NewCollection,
    UpdateCollection,
    DeleteCollection,
    Profile,
    Feedback,
    /// Range filters and settings of the film list selected by the session context.
    FilmsList,
    CollectionsList,
    UsersList,
    FeedbacksList,
}

/// The single input a workflow is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Title,
    Year,
    Genre,
    Description,
    Rating,
    Image,
    Comment,
    Viewed,
    UserRating,
    Review,
    Name,
    Confirm,
    Username,
    Email,
    Category,
    Text,
    PageSize,
    YearRange,
    RatingRange,
    UserRatingRange,
}

/// Identifies which validator/setter pair accepts the next input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateToken {
    pub workflow: Workflow,
    pub field: Field,
}

impl StateToken {
    pub const fn new(workflow: Workflow, field: Field) -> Self {
        Self { workflow, field }
    }
}

impl fmt::Display for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.workflow, self.field)
    }
}

/// A persisted token that does not name a known (workflow, field) pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state token `{0}`")]
pub struct UnknownStateToken(pub String);

impl FromStr for StateToken {
    type Err = UnknownStateToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownStateToken(s.to_string());
        let (workflow, field) = s.split_once(SEPARATOR).ok_or_else(unknown)?;
        Ok(Self {
            workflow: Workflow::from_str(workflow).map_err(|_| unknown())?,
            field: Field::from_str(field).map_err(|_| unknown())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn renders_awaiting_form() {
        let token = StateToken::new(Workflow::NewFilm, Field::Year);
        assert_eq!(token.to_string(), "new_film_awaiting_year");
        let token = StateToken::new(Workflow::FilmsList, Field::UserRatingRange);
        assert_eq!(token.to_string(), "films_list_awaiting_user_rating_range");
    }

    #[test]
    fn every_pair_parses_back() {
        for workflow in Workflow::iter() {
            for field in Field::iter() {
                let token = StateToken::new(workflow, field);
                assert_eq!(token.to_string().parse::<StateToken>(), Ok(token));
            }
        }
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("new_film_year".parse::<StateToken>().is_err());
        assert!("new_show_awaiting_year".parse::<StateToken>().is_err());
        assert!("new_film_awaiting_budget".parse::<StateToken>().is_err());
        assert!("".parse::<StateToken>().is_err());
    }
}
