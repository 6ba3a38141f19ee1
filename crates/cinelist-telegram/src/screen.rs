// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text screens for every [`View`].
//!
//! Composition is pure so layouts can be tested without a bot. Every button
//! carries a token from the action grammar, built with [`Action::token`].

use std::fmt::Write as _;

use cinelist_core::action::{
    COLLECTION_UPDATE_FIELDS, CollectionAction, FILM_UPDATE_FIELDS, FilmAction, ListAction,
    PROFILE_UPDATE_FIELDS,
};
use cinelist_core::types::{Collection, Feedback, FeedbackCategory, Film, User};
use cinelist_core::view::EntityKind;
use cinelist_core::{
    Action, Context, Direction, Field, FilterKey, FilterKind, FilterSet, FilterValue, ListKind,
    ListState, Notice, Operation, Prompt, Role, SortSpec, View,
};
use strum::IntoEnumIterator;

/// Telegram rejects longer messages.
pub const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            token: action.token(),
        }
    }
}

/// A message body with its inline keyboard rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl Screen {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    fn row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.keyboard.push(row);
        }
        self
    }

    fn button(self, label: impl Into<String>, action: Action) -> Self {
        self.row(vec![Button::new(label, action)])
    }
}

pub fn compose(view: &View) -> Screen {
    let mut screen = match view {
        View::Notice(notice) => Screen::text(notice_text(notice)),
        View::Prompt(prompt) => prompt_screen(prompt),
        View::MainMenu { username, role } => main_menu(username.as_deref(), *role),
        View::Help => Screen::text(HELP).button("Main menu", Action::MainMenu),
        View::FilmsList {
            context,
            collection,
            list,
        } => films_list(*context, collection.as_ref(), list),
        View::FilmDetail {
            context,
            film,
            has_prev,
            has_next,
        } => film_detail(*context, film, *has_prev, *has_next),
        View::FilmUpdateMenu { film } => {
            let mut screen = Screen::text(format!("What do you want to change in \"{}\"?", film.title));
            for pair in FILM_UPDATE_FIELDS.chunks(2) {
                screen = screen.row(
                    pair.iter()
                        .map(|f| Button::new(field_label(*f), Action::Film(FilmAction::UpdateField(*f))))
                        .collect(),
                );
            }
            screen.button("Back", Action::Film(FilmAction::Back))
        }
        View::CollectionsList { list } => collections_list(list),
        View::CollectionDetail { collection } => collection_detail(collection),
        View::CollectionUpdateMenu { collection } => {
            let mut screen =
                Screen::text(format!("What do you want to change in \"{}\"?", collection.name));
            screen = screen.row(
                COLLECTION_UPDATE_FIELDS
                    .iter()
                    .map(|f| {
                        Button::new(
                            field_label(*f),
                            Action::Collection(CollectionAction::UpdateField(*f)),
                        )
                    })
                    .collect(),
            );
            screen.button("Back", Action::Collection(CollectionAction::Back))
        }
        View::ConfirmDelete { kind, title } => {
            let question = match kind {
                EntityKind::Film => format!("Delete the film \"{title}\"?"),
                EntityKind::CollectionFilm => {
                    format!("Remove \"{title}\" from this collection?")
                }
                EntityKind::Collection => format!("Delete the collection \"{title}\"?"),
            };
            Screen::text(question)
                .row(vec![
                    Button::new("Yes", Action::Yes),
                    Button::new("No", Action::No),
                ])
                .button("Cancel", Action::Cancel)
        }
        View::Filters { list, filters } => filters_screen(*list, filters),
        View::Sorting { list, sort } => sorting_screen(*list, sort),
        View::Profile { user } => profile(user),
        View::FeedbackCategories => {
            let mut screen = Screen::text("What is your feedback about?");
            for category in FeedbackCategory::iter() {
                screen = screen.button(category_label(category), Action::FeedbackCategory(category));
            }
            screen.button("Cancel", Action::Cancel)
        }
        View::AdminMenu => Screen::text("Administration")
            .button("Users", Action::List(ListKind::Users, ListAction::Show))
            .button("Feedback", Action::List(ListKind::Feedbacks, ListAction::Show))
            .button("Main menu", Action::MainMenu),
        View::UsersList { list } => users_list(list),
        View::UserDetail { user, actor_role } => user_detail(user, *actor_role),
        View::FeedbacksList { list } => feedbacks_list(list),
    };
    screen.text = truncate(&screen.text, MAX_MESSAGE_LEN);
    screen
}

const HELP: &str = "Cinelist keeps track of the films you want to see and have seen.\n\n\
/films - your films\n\
/collections - your collections\n\
/profile - your profile\n\
/feedback - tell us what you think\n\
/cancel - stop what you are doing\n\
/logout - sign out\n\
/menu - main menu";

fn main_menu(username: Option<&str>, role: Role) -> Screen {
    let greeting = match username {
        Some(name) => format!("Hello, {name}! What would you like to do?"),
        None => "Hello! What would you like to do?".to_string(),
    };
    let mut screen = Screen::text(greeting)
        .row(vec![
            Button::new("Films", Action::List(ListKind::Films, ListAction::Show)),
            Button::new(
                "Collections",
                Action::List(ListKind::Collections, ListAction::Show),
            ),
        ])
        .row(vec![
            Button::new("Profile", Action::Profile),
            Button::new("Feedback", Action::FeedbackNew),
        ]);
    if role >= Role::Admin {
        screen = screen.button("Administration", Action::AdminMenu);
    }
    screen
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Unrecognized => "Sorry, I did not understand that.".into(),
        Notice::FirstPage => "This is the first page.".into(),
        Notice::LastPage => "This is the last page.".into(),
        Notice::OutOfBounds { field, min, max } => {
            if is_text_field(*field) {
                format!(
                    "{} must be {} to {} characters long.",
                    field_label(*field),
                    number(*min),
                    number(*max)
                )
            } else {
                format!(
                    "{} must be between {} and {}.",
                    field_label(*field),
                    number(*min),
                    number(*max)
                )
            }
        }
        Notice::InvalidFormat { field } => {
            format!("That does not look like a valid {}.", field_label(*field).to_lowercase())
        }
        Notice::NotSkippable { field } => {
            format!("{} is required and cannot be skipped.", field_label(*field))
        }
        Notice::Failed(op) => format!("Could not {}. Please try again later.", operation_phrase(*op)),
        Notice::Succeeded(op) => succeeded_text(*op).into(),
        Notice::Cancelled => "Cancelled.".into(),
        Notice::Banned => "Your account has been banned.".into(),
        Notice::Forbidden => "You are not allowed to do that.".into(),
        Notice::SessionExpired => "Your session expired, you have been signed in again.".into(),
        Notice::LoggedOut => "You have been logged out.".into(),
    }
}

fn operation_phrase(op: Operation) -> &'static str {
    match op {
        Operation::Authenticate => "sign you in",
        Operation::LoadList => "load the list",
        Operation::CreateFilm => "add the film",
        Operation::UpdateFilm => "update the film",
        Operation::DeleteFilm => "delete the film",
        Operation::RemoveFromCollection => "remove the film from the collection",
        Operation::CreateCollection => "create the collection",
        Operation::UpdateCollection => "update the collection",
        Operation::DeleteCollection => "delete the collection",
        Operation::ToggleFavorite => "update favorites",
        Operation::UploadImage => "upload the image",
        Operation::UpdateProfile => "update your profile",
        Operation::SendFeedback => "send your feedback",
        Operation::ChangeRole => "change the role",
        Operation::Ban => "ban the user",
        Operation::Unban => "unban the user",
    }
}

fn succeeded_text(op: Operation) -> &'static str {
    match op {
        Operation::Authenticate => "Signed in.",
        Operation::LoadList => "List updated.",
        Operation::CreateFilm => "Film added.",
        Operation::UpdateFilm => "Film updated.",
        Operation::DeleteFilm => "Film deleted.",
        Operation::RemoveFromCollection => "Film removed from the collection.",
        Operation::CreateCollection => "Collection created.",
        Operation::UpdateCollection => "Collection updated.",
        Operation::DeleteCollection => "Collection deleted.",
        Operation::ToggleFavorite => "Favorites updated.",
        Operation::UploadImage => "Image uploaded.",
        Operation::UpdateProfile => "Profile updated.",
        Operation::SendFeedback => "Thank you for your feedback!",
        Operation::ChangeRole => "Role changed.",
        Operation::Ban => "User banned.",
        Operation::Unban => "User unbanned.",
    }
}

pub fn field_label(field: Field) -> &'static str {
    match field {
        Field::Title => "Title",
        Field::Year => "Year",
        Field::Genre => "Genre",
        Field::Description => "Description",
        Field::Rating => "Rating",
        Field::Image => "Image",
        Field::Comment => "Comment",
        Field::Viewed => "Viewed",
        Field::UserRating => "Your rating",
        Field::Review => "Review",
        Field::Name => "Name",
        Field::Confirm => "Confirmation",
        Field::Username => "Username",
        Field::Email => "Email",
        Field::Category => "Category",
        Field::Text => "Message",
        Field::PageSize => "Page size",
        Field::YearRange => "Year range",
        Field::RatingRange => "Rating range",
        Field::UserRatingRange => "Your rating range",
    }
}

fn is_text_field(field: Field) -> bool {
    matches!(
        field,
        Field::Title
            | Field::Genre
            | Field::Description
            | Field::Image
            | Field::Comment
            | Field::Review
            | Field::Name
            | Field::Username
            | Field::Email
            | Field::Text
    )
}

fn category_label(category: FeedbackCategory) -> &'static str {
    match category {
        FeedbackCategory::Suggestions => "Suggestions",
        FeedbackCategory::Bugs => "Bugs",
        FeedbackCategory::Issues => "Issues",
        FeedbackCategory::Other => "Other",
    }
}

fn filter_label(key: FilterKey) -> &'static str {
    match key {
        FilterKey::IsViewed => "Viewed",
        FilterKey::IsFavorite => "Favorite",
        FilterKey::IsBanned => "Banned",
        FilterKey::Year => "Year",
        FilterKey::Rating => "Rating",
        FilterKey::UserRating => "Your rating",
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Admin => "Admin",
        Role::SuperAdmin => "Super admin",
    }
}

/// Whole numbers without a fraction, others with one decimal.
fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

fn prompt_screen(prompt: &Prompt) -> Screen {
    let field = prompt.token.field;
    let mut text = match field {
        Field::Viewed => "Have you already watched this film?".to_string(),
        Field::Image => "Send a photo or an image link.".to_string(),
        Field::YearRange | Field::RatingRange | Field::UserRatingRange => format!(
            "Enter the {} as \"from-to\", for example 7-10. Use 0 to leave a side open.",
            field_label(field).to_lowercase()
        ),
        _ => format!("Enter the {}.", field_label(field).to_lowercase()),
    };
    if let Some((min, max)) = prompt.bounds {
        let hint = if is_text_field(field) {
            format!("\n({} to {} characters)", number(min), number(max))
        } else {
            format!("\n(from {} to {})", number(min), number(max))
        };
        text.push_str(&hint);
    }

    let mut screen = Screen::text(text);
    if field == Field::Viewed {
        screen = screen.row(vec![
            Button::new("Yes", Action::Yes),
            Button::new("No", Action::No),
        ]);
    }
    let mut controls = Vec::new();
    if prompt.skippable {
        controls.push(Button::new("Skip", Action::Skip));
    }
    controls.push(Button::new("Cancel", Action::Cancel));
    screen.row(controls)
}

fn page_line<T>(list: &ListState<T>) -> String {
    format!(
        "Page {} of {} ({} total)",
        list.current_page(),
        list.last_page(),
        list.total_records()
    )
}

/// Previous/next page row, omitting the direction that leads nowhere.
fn page_row<T>(kind: ListKind, list: &ListState<T>) -> Vec<Button> {
    let mut row = Vec::new();
    if !list.is_first_page() {
        row.push(Button::new("« Prev", Action::List(kind, ListAction::PrevPage)));
    }
    if !list.is_last_page() {
        row.push(Button::new("Next »", Action::List(kind, ListAction::NextPage)));
    }
    row
}

fn settings_row(kind: ListKind) -> Vec<Button> {
    let mut row = Vec::new();
    if !kind.filter_keys().is_empty() {
        row.push(Button::new("Filters", Action::List(kind, ListAction::Filters)));
    }
    row.push(Button::new("Sorting", Action::List(kind, ListAction::Sorting)));
    row.push(Button::new("Page size", Action::List(kind, ListAction::PageSize)));
    row
}

/// Numbered selection buttons, five to a row.
fn select_rows(kind: ListKind, count: usize) -> Vec<Vec<Button>> {
    (0..count)
        .map(|i| Button::new((i + 1).to_string(), Action::List(kind, ListAction::Select(i))))
        .collect::<Vec<_>>()
        .chunks(5)
        .map(<[Button]>::to_vec)
        .collect()
}

fn film_line(film: &Film) -> String {
    let mut line = film.title.clone();
    if let Some(year) = film.year {
        let _ = write!(line, " ({year})");
    }
    if let Some(rating) = film.rating {
        let _ = write!(line, " ★{}", number(f64::from(rating)));
    }
    if film.is_favorite {
        line.push_str(" ♥");
    }
    if film.is_viewed {
        line.push_str(" ✓");
    }
    line
}

fn films_list(context: Context, collection: Option<&Collection>, list: &ListState<Film>) -> Screen {
    let kind = ListKind::Films;
    let title = match (context, collection) {
        (Context::Collection, Some(c)) => format!("Films in \"{}\"", c.name),
        _ => "Your films".to_string(),
    };
    let mut text = format!("{title}\n{}\n", page_line(list));
    if list.items.is_empty() {
        text.push_str("\nNo films yet.");
    }
    for (i, film) in list.items.iter().enumerate() {
        let _ = write!(text, "\n{}. {}", i + 1, film_line(film));
    }

    let mut screen = Screen::text(text);
    for row in select_rows(kind, list.items.len()) {
        screen = screen.row(row);
    }
    screen = screen
        .row(page_row(kind, list))
        .row(settings_row(kind))
        .button("Add film", Action::Film(FilmAction::New));
    if context == Context::Collection {
        screen = screen.button("Back to collections", Action::Collection(CollectionAction::Back));
    }
    screen.button("Main menu", Action::MainMenu)
}

fn film_detail(context: Context, film: &Film, has_prev: bool, has_next: bool) -> Screen {
    let mut text = film.title.clone();
    let mut line = |label: &str, value: String| {
        let _ = write!(text, "\n{label}: {value}");
    };
    if let Some(year) = film.year {
        line("Year", year.to_string());
    }
    if let Some(genre) = &film.genre {
        line("Genre", genre.clone());
    }
    if let Some(rating) = film.rating {
        line("Rating", number(f64::from(rating)));
    }
    line("Viewed", if film.is_viewed { "yes" } else { "no" }.into());
    if let Some(rating) = film.user_rating {
        line("Your rating", number(f64::from(rating)));
    }
    if let Some(description) = &film.description {
        line("Description", description.clone());
    }
    if let Some(comment) = &film.comment {
        line("Comment", comment.clone());
    }
    if let Some(review) = &film.review {
        line("Review", review.clone());
    }
    if let Some(url) = &film.image_url {
        line("Image", url.clone());
    }

    let mut nav = Vec::new();
    if has_prev {
        nav.push(Button::new("« Prev", Action::Film(FilmAction::Prev)));
    }
    if has_next {
        nav.push(Button::new("Next »", Action::Film(FilmAction::Next)));
    }
    let favorite = if film.is_favorite {
        "Remove from favorites"
    } else {
        "Add to favorites"
    };
    let delete = match context {
        Context::Film => "Delete",
        Context::Collection => "Remove from collection",
    };
    Screen::text(text)
        .row(nav)
        .button(favorite, Action::Film(FilmAction::Favorite))
        .row(vec![
            Button::new("Edit", Action::Film(FilmAction::Update)),
            Button::new(delete, Action::Film(FilmAction::Delete)),
        ])
        .button("Back to list", Action::Film(FilmAction::Back))
}

fn collections_list(list: &ListState<Collection>) -> Screen {
    let kind = ListKind::Collections;
    let mut text = format!("Your collections\n{}\n", page_line(list));
    if list.items.is_empty() {
        text.push_str("\nNo collections yet.");
    }
    for (i, c) in list.items.iter().enumerate() {
        let _ = write!(text, "\n{}. {} ({} films)", i + 1, c.name, c.total_films);
        if c.is_favorite {
            text.push_str(" ♥");
        }
    }
    let mut screen = Screen::text(text);
    for row in select_rows(kind, list.items.len()) {
        screen = screen.row(row);
    }
    screen
        .row(page_row(kind, list))
        .row(settings_row(kind))
        .button("New collection", Action::Collection(CollectionAction::New))
        .button("Main menu", Action::MainMenu)
}

fn collection_detail(collection: &Collection) -> Screen {
    let mut text = format!("{}\nFilms: {}", collection.name, collection.total_films);
    if let Some(description) = &collection.description {
        let _ = write!(text, "\n{description}");
    }
    let favorite = if collection.is_favorite {
        "Remove from favorites"
    } else {
        "Add to favorites"
    };
    Screen::text(text)
        .button("Films", Action::Collection(CollectionAction::Films))
        .button(favorite, Action::Collection(CollectionAction::Favorite))
        .row(vec![
            Button::new("Edit", Action::Collection(CollectionAction::Update)),
            Button::new("Delete", Action::Collection(CollectionAction::Delete)),
        ])
        .button("Back to list", Action::Collection(CollectionAction::Back))
}

fn filters_screen(kind: ListKind, filters: &FilterSet) -> Screen {
    let mut text = String::from("Filters");
    let mut screen = Screen::default();
    for key in kind.filter_keys() {
        let state = match filters.get(*key) {
            None => "any".to_string(),
            Some(FilterValue::Switch { value }) => if *value { "yes" } else { "no" }.to_string(),
            Some(FilterValue::Range { min, max }) => format!(
                "{} - {}",
                min.map_or("…".to_string(), number),
                max.map_or("…".to_string(), number)
            ),
        };
        let _ = write!(text, "\n{}: {state}", filter_label(*key));

        let mut row = vec![Button::new(
            filter_label(*key),
            Action::List(kind, ListAction::Filter(*key)),
        )];
        if filters.is_enabled(*key) {
            row.push(Button::new(
                "Reset",
                Action::List(kind, ListAction::FilterReset(*key)),
            ));
        }
        if matches!(key.kind(), FilterKind::Switch) {
            row.insert(
                1,
                Button::new("Yes", Action::List(kind, ListAction::FilterSwitch(*key, true))),
            );
            row.insert(
                2,
                Button::new("No", Action::List(kind, ListAction::FilterSwitch(*key, false))),
            );
        }
        screen = screen.row(row);
    }
    screen.text = text;
    screen
        .button("Reset all", Action::List(kind, ListAction::FiltersReset))
        .button("Show list", Action::List(kind, ListAction::Show))
}

fn sorting_screen(kind: ListKind, sort: &SortSpec) -> Screen {
    let current = match sort.field() {
        Some(field) => format!(
            "{field} {}",
            match sort.direction() {
                Direction::Asc => "ascending",
                Direction::Desc => "descending",
            }
        ),
        None => "none".to_string(),
    };
    let mut screen = Screen::text(format!("Sorting\nCurrent: {current}"));
    for &field in kind.sort_fields() {
        screen = screen.row(vec![
            Button::new(
                format!("{field} ↑"),
                Action::List(kind, ListAction::Sort(field, Direction::Asc)),
            ),
            Button::new(
                format!("{field} ↓"),
                Action::List(kind, ListAction::Sort(field, Direction::Desc)),
            ),
        ]);
    }
    screen
        .button("Reset", Action::List(kind, ListAction::SortReset))
        .button("Show list", Action::List(kind, ListAction::Show))
}

fn profile(user: &User) -> Screen {
    let mut text = format!("Profile\nUsername: {}", user.username);
    if let Some(email) = &user.email {
        let _ = write!(text, "\nEmail: {email}");
    }
    let _ = write!(text, "\nRole: {}", role_label(user.role));
    let mut screen = Screen::text(text);
    screen = screen.row(
        PROFILE_UPDATE_FIELDS
            .iter()
            .map(|f| Button::new(format!("Change {}", field_label(*f).to_lowercase()), Action::ProfileUpdate(*f)))
            .collect(),
    );
    screen.button("Main menu", Action::MainMenu)
}

fn users_list(list: &ListState<User>) -> Screen {
    let kind = ListKind::Users;
    let mut text = format!("Users\n{}\n", page_line(list));
    for (i, user) in list.items.iter().enumerate() {
        let _ = write!(text, "\n{}. {} ({})", i + 1, user.username, role_label(user.role));
        if user.is_banned {
            text.push_str(" banned");
        }
    }
    let mut screen = Screen::text(text);
    for row in select_rows(kind, list.items.len()) {
        screen = screen.row(row);
    }
    screen
        .row(page_row(kind, list))
        .row(settings_row(kind))
        .button("Back", Action::AdminMenu)
}

fn user_detail(user: &User, actor_role: Role) -> Screen {
    let mut text = format!("{}\nRole: {}", user.username, role_label(user.role));
    if let Some(email) = &user.email {
        let _ = write!(text, "\nEmail: {email}");
    }
    if user.is_banned {
        text.push_str("\nBanned");
    }
    let mut screen = Screen::text(text);
    if user.role < actor_role {
        screen = screen.button(
            if user.is_banned { "Unban" } else { "Ban" },
            if user.is_banned {
                Action::UserUnban
            } else {
                Action::UserBan
            },
        );
        screen = screen.row(
            Role::iter()
                .filter(|r| *r < actor_role && *r != user.role)
                .map(|r| Button::new(format!("Make {}", role_label(r).to_lowercase()), Action::UserRole(r)))
                .collect(),
        );
    }
    screen.button("Back", Action::List(ListKind::Users, ListAction::Show))
}

fn feedback_line(feedback: &Feedback) -> String {
    format!(
        "[{}] user {}: {}",
        category_label(feedback.category),
        feedback.user_id,
        feedback.text
    )
}

fn feedbacks_list(list: &ListState<Feedback>) -> Screen {
    let kind = ListKind::Feedbacks;
    let mut text = format!("Feedback\n{}\n", page_line(list));
    for (i, feedback) in list.items.iter().enumerate() {
        let _ = write!(text, "\n{}. {}", i + 1, feedback_line(feedback));
    }
    Screen::text(text)
        .row(page_row(kind, list))
        .row(settings_row(kind))
        .button("Back", Action::AdminMenu)
}

/// Cuts `text` to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
