// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The wizard transition table: `(workflow, field, answer) -> next`.

use cinelist_core::{Field, StateToken, Workflow};

use crate::wizard::Answer;

/// What follows an accepted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Ask(Field),
    Finalize,
}

/// Field order of the create-film wizard up to the viewed question.
const NEW_FILM: &[Field] = &[
    Field::Title,
    Field::Year,
    Field::Genre,
    Field::Description,
    Field::Rating,
    Field::Image,
    Field::Comment,
    Field::Viewed,
];

pub fn next(token: StateToken, answer: Answer) -> Next {
    use Field::*;
    use Workflow::*;

    match (token.workflow, token.field, answer) {
        // Viewed links user rating and review in both film wizards.
        (NewFilm | UpdateFilm, Viewed, Answer::Yes) => Next::Ask(UserRating),
        (NewFilm | UpdateFilm, Viewed, _) => Next::Finalize,
        (NewFilm | UpdateFilm, UserRating, _) => Next::Ask(Review),
        (NewFilm | UpdateFilm, Review, _) => Next::Finalize,
        (NewFilm, field, _) => after(NEW_FILM, field),

        (NewCollection, Name, _) => Next::Ask(Description),
        (Feedback, Category, _) => Next::Ask(Text),

        // Update wizards edit one field; lists take one setting.
        _ => Next::Finalize,
    }
}

fn after(order: &[Field], field: Field) -> Next {
    order
        .iter()
        .position(|f| *f == field)
        .and_then(|i| order.get(i + 1))
        .map_or(Next::Finalize, |f| Next::Ask(*f))
}

/// First field each wizard asks for when started without a specific field.
pub fn first_field(workflow: Workflow) -> Field {
    match workflow {
        Workflow::NewFilm => Field::Title,
        Workflow::NewCollection => Field::Name,
        Workflow::DeleteFilm | Workflow::DeleteCollection => Field::Confirm,
        Workflow::Feedback => Field::Category,
        Workflow::Profile => Field::Username,
        Workflow::UpdateFilm => Field::Title,
        Workflow::UpdateCollection => Field::Name,
        Workflow::FilmsList
        | Workflow::CollectionsList
        | Workflow::UsersList
        | Workflow::FeedbacksList => Field::PageSize,
    }
}
