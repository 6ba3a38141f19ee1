// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Step table: which [`Step`] accepts the input for each state token.

use cinelist_config::model::DialogConfig;
use cinelist_core::{Field, FilterKey, FilterKind, Prompt, Session, StateToken, Workflow};

use crate::validate::{
    any, email, http_url, length_within, parse_decimal, parse_number, parse_range, parse_text,
    parse_yes_no, range_within, within,
};
use crate::wizard::{Step, WizardStep};

pub const TITLE_LEN: (u32, u32) = (1, 100);
pub const YEAR: (i32, i32) = (1888, 2100);
pub const GENRE_LEN: (u32, u32) = (1, 50);
pub const DESCRIPTION_LEN: (u32, u32) = (1, 1000);
pub const RATING: (f32, f32) = (0.0, 10.0);
pub const URL_LEN: (u32, u32) = (1, 2048);
pub const NOTE_LEN: (u32, u32) = (1, 500);
pub const NAME_LEN: (u32, u32) = (1, 100);
pub const COLLECTION_DESCRIPTION_LEN: (u32, u32) = (1, 500);
pub const USERNAME_LEN: (u32, u32) = (3, 32);
pub const EMAIL_LEN: (u32, u32) = (3, 254);
pub const FEEDBACK_LEN: (u32, u32) = (10, 3000);

/// Returns the step awaiting input for `token`, or `None` for fields that
/// are answered with buttons only (delete confirmation, feedback category)
/// and for pairs no wizard ever produces.
pub fn step_for(token: StateToken, config: &DialogConfig) -> Option<Box<dyn WizardStep>> {
    use Field::*;
    use Workflow::*;

    let create = token.workflow == NewFilm;
    let step: Box<dyn WizardStep> = match (token.workflow, token.field) {
        (NewFilm | UpdateFilm, Title) => Box::new(Step::new(
            Title,
            TITLE_LEN,
            parse_text,
            length_within,
            |s: &mut Session, v: String| s.film_detail.draft.title = Some(v),
        )),
        (NewFilm | UpdateFilm, Year) => Box::new(
            Step::new(
                Year,
                YEAR,
                parse_number::<i32>,
                within,
                |s: &mut Session, v: i32| s.film_detail.draft.year = Some(v),
            )
            .skippable(create),
        ),
        (NewFilm | UpdateFilm, Genre) => Box::new(
            Step::new(
                Genre,
                GENRE_LEN,
                parse_text,
                length_within,
                |s: &mut Session, v: String| s.film_detail.draft.genre = Some(v),
            )
            .skippable(true),
        ),
        (NewFilm | UpdateFilm, Description) => Box::new(
            Step::new(
                Description,
                DESCRIPTION_LEN,
                parse_text,
                length_within,
                |s: &mut Session, v: String| s.film_detail.draft.description = Some(v),
            )
            .skippable(true),
        ),
        (NewFilm | UpdateFilm, Rating) => Box::new(
            Step::new(
                Rating,
                RATING,
                parse_decimal,
                within,
                |s: &mut Session, v: f32| s.film_detail.draft.rating = Some(v),
            )
            .skippable(true),
        ),
        // Uploaded photos bypass this step; see `workflows::film::attach_image`.
        (NewFilm | UpdateFilm, Image) => Box::new(
            Step::new(
                Image,
                URL_LEN,
                parse_text,
                http_url,
                |s: &mut Session, v: String| s.film_detail.draft.image_url = Some(v),
            )
            .skippable(true),
        ),
        (NewFilm | UpdateFilm, Comment) => Box::new(
            Step::new(
                Comment,
                NOTE_LEN,
                parse_text,
                length_within,
                |s: &mut Session, v: String| s.film_detail.draft.comment = Some(v),
            )
            .skippable(true),
        ),
        (NewFilm | UpdateFilm, Viewed) => Box::new(Step::new(
            Viewed,
            (0u8, 1u8),
            parse_yes_no,
            any,
            |s: &mut Session, v: bool| s.film_detail.draft.is_viewed = Some(v),
        )),
        (NewFilm | UpdateFilm, UserRating) => Box::new(
            Step::new(
                UserRating,
                RATING,
                parse_decimal,
                within,
                |s: &mut Session, v: f32| s.film_detail.draft.user_rating = Some(v),
            )
            .skippable(true),
        ),
        (NewFilm | UpdateFilm, Review) => Box::new(
            Step::new(
                Review,
                NOTE_LEN,
                parse_text,
                length_within,
                |s: &mut Session, v: String| s.film_detail.draft.review = Some(v),
            )
            .skippable(true),
        ),

        (NewCollection | UpdateCollection, Name) => Box::new(Step::new(
            Name,
            NAME_LEN,
            parse_text,
            length_within,
            |s: &mut Session, v: String| s.collection_detail.draft.name = Some(v),
        )),
        (NewCollection | UpdateCollection, Description) => Box::new(
            Step::new(
                Description,
                COLLECTION_DESCRIPTION_LEN,
                parse_text,
                length_within,
                |s: &mut Session, v: String| s.collection_detail.draft.description = Some(v),
            )
            .skippable(true),
        ),

        (Profile, Username) => Box::new(Step::new(
            Username,
            USERNAME_LEN,
            parse_text,
            length_within,
            |s: &mut Session, v: String| s.profile.username = Some(v),
        )),
        (Profile, Email) => Box::new(Step::new(
            Email,
            EMAIL_LEN,
            parse_text,
            email,
            |s: &mut Session, v: String| s.profile.email = Some(v),
        )),

        (Feedback, Text) => Box::new(Step::new(
            Text,
            FEEDBACK_LEN,
            parse_text,
            length_within,
            |s: &mut Session, v: String| s.feedback.text = Some(v),
        )),

        (FilmsList, PageSize) => page_size_step(config, |s, v| s.film_list_mut().set_page_size(v)),
        (CollectionsList, PageSize) => {
            page_size_step(config, |s, v| s.collections.set_page_size(v))
        }
        (UsersList, PageSize) => page_size_step(config, |s, v| s.admin.users.set_page_size(v)),
        (FeedbacksList, PageSize) => {
            page_size_step(config, |s, v| s.admin.feedbacks.set_page_size(v))
        }

        (FilmsList, YearRange) => range_step(FilterKey::Year, |s, (lo, hi)| {
            s.film_list_mut()
                .filters
                .apply_range(FilterKey::Year, Some(lo), Some(hi))
        })?,
        (FilmsList, RatingRange) => range_step(FilterKey::Rating, |s, (lo, hi)| {
            s.film_list_mut()
                .filters
                .apply_range(FilterKey::Rating, Some(lo), Some(hi))
        })?,
        (FilmsList, UserRatingRange) => range_step(FilterKey::UserRating, |s, (lo, hi)| {
            s.film_list_mut()
                .filters
                .apply_range(FilterKey::UserRating, Some(lo), Some(hi))
        })?,

        _ => return None,
    };
    Some(step)
}

fn page_size_step(config: &DialogConfig, set: fn(&mut Session, u32)) -> Box<dyn WizardStep> {
    Box::new(Step::new(
        Field::PageSize,
        (1, config.max_page_size),
        parse_number::<u32>,
        within,
        set,
    ))
}

fn range_step(key: FilterKey, set: fn(&mut Session, (f64, f64))) -> Option<Box<dyn WizardStep>> {
    let FilterKind::Range { min, max } = key.kind() else {
        return None;
    };
    Some(Box::new(Step::new(
        key.range_field()?,
        (min, max),
        parse_range,
        range_within,
        set,
    )))
}

/// Prompt for a step-backed token. Button-only fields have no prompt here.
pub fn prompt(token: StateToken, config: &DialogConfig) -> Option<Prompt> {
    let step = step_for(token, config)?;
    Some(Prompt {
        token,
        skippable: step.skippable(),
        bounds: step.bounds(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::{FilterValue, Notice};
    use strum::IntoEnumIterator;

    fn config() -> DialogConfig {
        DialogConfig {
            default_page_size: 5,
            max_page_size: 20,
        }
    }

    fn token(workflow: Workflow, field: Field) -> StateToken {
        StateToken::new(workflow, field)
    }

    #[test]
    fn year_is_skippable_only_when_creating() {
        let config = config();
        assert!(prompt(token(Workflow::NewFilm, Field::Year), &config).unwrap().skippable);
        assert!(!prompt(token(Workflow::UpdateFilm, Field::Year), &config).unwrap().skippable);
        assert!(!prompt(token(Workflow::NewFilm, Field::Title), &config).unwrap().skippable);
    }

    #[test]
    fn button_only_fields_have_no_step() {
        let config = config();
        assert!(step_for(token(Workflow::DeleteFilm, Field::Confirm), &config).is_none());
        assert!(step_for(token(Workflow::Feedback, Field::Category), &config).is_none());
        assert!(step_for(token(Workflow::Profile, Field::Year), &config).is_none());
    }

    #[test]
    fn every_film_field_stores_into_the_draft() {
        let config = config();
        let inputs = [
            (Field::Title, "Alien"),
            (Field::Year, "1979"),
            (Field::Genre, "Horror"),
            (Field::Description, "In space"),
            (Field::Rating, "8,5"),
            (Field::Image, "https://img.example.com/alien.jpg"),
            (Field::Comment, "Classic"),
            (Field::Viewed, "yes"),
            (Field::UserRating, "0"),
            (Field::Review, "Tense"),
        ];
        let mut session = Session::new("1", "en", 5);
        for (field, input) in inputs {
            let step = step_for(token(Workflow::NewFilm, field), &config).unwrap();
            assert!(step.accept(&mut session, input).is_ok(), "{field}");
        }
        let draft = &session.film_detail.draft;
        assert_eq!(draft.title.as_deref(), Some("Alien"));
        assert_eq!(draft.rating, Some(8.5));
        assert_eq!(draft.is_viewed, Some(true));
        assert_eq!(draft.user_rating, Some(0.0));
    }

    #[test]
    fn page_size_is_bounded_by_config() {
        let config = config();
        let step = step_for(token(Workflow::CollectionsList, Field::PageSize), &config).unwrap();
        let mut session = Session::new("1", "en", 5);
        assert_eq!(
            step.accept(&mut session, "21"),
            Err(Notice::OutOfBounds {
                field: Field::PageSize,
                min: 1.0,
                max: 20.0
            })
        );
        assert!(step.accept(&mut session, "8").is_ok());
        assert_eq!(session.collections.page_size(), 8);
        assert_eq!(session.films.page_size(), 5);
    }

    #[test]
    fn range_steps_write_the_context_list_only() {
        let config = config();
        let step = step_for(token(Workflow::FilmsList, Field::RatingRange), &config).unwrap();
        let mut session = Session::new("1", "en", 5);
        session.context = cinelist_core::Context::Collection;
        assert!(step.accept(&mut session, "7-10").is_ok());
        assert_eq!(
            session.collection_films.filters.get(FilterKey::Rating),
            Some(&FilterValue::Range {
                min: Some(7.0),
                max: Some(10.0)
            })
        );
        assert!(session.films.filters.is_empty());
    }

    #[test]
    fn every_list_workflow_has_a_page_size_step() {
        let config = config();
        for workflow in Workflow::iter().filter(|w| w.to_string().ends_with("_list")) {
            assert!(step_for(token(workflow, Field::PageSize), &config).is_some(), "{workflow}");
        }
    }
}
