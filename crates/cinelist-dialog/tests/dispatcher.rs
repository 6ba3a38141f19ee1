// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatcher integration tests: sign-in, failure policy, routing and
//! per-user serialization, driven through the real session store.

use std::sync::Arc;

use cinelist_core::action::{Action, FilmAction, ListAction};
use cinelist_core::types::{EventKind, User};
use cinelist_core::{Field, ListKind, Notice, Operation, Role, StateToken, View, Workflow};
use cinelist_test_utils::mock_channel::event;
use cinelist_test_utils::{TEST_USER, TestHarness, films};

fn has_notice(views: &[View], notice: Notice) -> bool {
    views.iter().any(|v| *v == View::Notice(notice.clone()))
}

fn has_main_menu(views: &[View]) -> bool {
    views.iter().any(|v| matches!(v, View::MainMenu { .. }))
}

// ---- Sign-in ----

#[tokio::test]
async fn first_update_signs_in_once() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.command("start").await.unwrap();
    harness.command("help").await.unwrap();

    assert_eq!(harness.backend.call_count("authenticate").await, 1);
    let session = harness.session().await.unwrap();
    assert!(session.credentials.is_authenticated());
    assert_eq!(session.display_name, format!("user-{TEST_USER}"));
    assert_eq!(
        session.user.as_ref().map(|u| u.username.clone()),
        Some(format!("user-{TEST_USER}"))
    );
}

#[tokio::test]
async fn failed_sign_in_reports_and_persists_nothing_authenticated() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.backend.fail_next("authenticate", 503).await;

    let views = harness.command("start").await.unwrap();
    assert_eq!(views, vec![View::Notice(Notice::Failed(Operation::Authenticate))]);
    assert!(!harness.session().await.unwrap().credentials.is_authenticated());

    // The next update tries again.
    let views = harness.command("start").await.unwrap();
    assert!(has_main_menu(&views));
}

#[tokio::test]
async fn banned_users_get_only_the_ban_notice() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .backend
        .add_user(
            TEST_USER,
            User {
                id: 9,
                username: "troll".into(),
                is_banned: true,
                ..User::default()
            },
        )
        .await;

    let views = harness.command("films").await.unwrap();
    assert_eq!(views, vec![View::Notice(Notice::Banned)]);
    assert_eq!(harness.backend.call_count("list_films").await, 0);
}

#[tokio::test]
async fn rejected_credentials_sign_in_again() {
    let harness = TestHarness::builder()
        .with_films(films(3))
        .build()
        .await
        .unwrap();
    harness.command("films").await.unwrap();
    let before = harness.session().await.unwrap().credentials;

    harness.backend.revoke_tokens().await;
    let views = harness.command("films").await.unwrap();

    assert!(has_notice(&views, Notice::SessionExpired), "got {views:?}");
    assert!(has_main_menu(&views));
    assert_eq!(harness.backend.call_count("authenticate").await, 2);
    let after = harness.session().await.unwrap().credentials;
    assert!(after.is_authenticated());
    assert_ne!(before.access_token, after.access_token);
}

#[tokio::test]
async fn logout_forgets_credentials_until_next_update() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.command("start").await.unwrap();

    let views = harness.command("logout").await.unwrap();
    assert_eq!(views, vec![View::Notice(Notice::LoggedOut)]);
    let session = harness.session().await.unwrap();
    assert!(!session.credentials.is_authenticated());
    assert!(session.user.is_none());

    harness.command("start").await.unwrap();
    assert_eq!(harness.backend.call_count("authenticate").await, 2);
}

// ---- Failure policy ----

#[tokio::test]
async fn forbidden_list_fetch_shows_forbidden_then_cached_page() {
    let harness = TestHarness::builder()
        .with_films(films(3))
        .build()
        .await
        .unwrap();
    harness.backend.fail_next("list_films", 403).await;

    let views = harness.command("films").await.unwrap();
    assert_eq!(views.first(), Some(&View::Notice(Notice::Forbidden)));
    assert!(matches!(views.last(), Some(View::FilmsList { .. })));
}

#[tokio::test]
async fn failed_finalize_drops_the_wizard() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.press(Action::Film(FilmAction::New)).await.unwrap();
    harness.text("Heat").await.unwrap();
    for _ in 0..6 {
        harness.press(Action::Skip).await.unwrap();
    }
    harness.backend.fail_next("create_film", 500).await;

    let views = harness.press(Action::No).await.unwrap();

    assert!(has_notice(&views, Notice::Failed(Operation::CreateFilm)), "got {views:?}");
    let session = harness.session().await.unwrap();
    assert!(session.state.is_none());
    assert!(session.film_detail.draft.is_empty());
    assert!(harness.backend.films().await.is_empty());
}

#[tokio::test]
async fn failed_upload_aborts_the_wizard() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.press(Action::Film(FilmAction::New)).await.unwrap();
    harness.text("Heat").await.unwrap();
    for _ in 0..4 {
        harness.press(Action::Skip).await.unwrap();
    }
    assert_eq!(
        harness.session().await.unwrap().state,
        Some(StateToken::new(Workflow::NewFilm, Field::Image))
    );
    harness.backend.fail_next("upload_image", 502).await;

    let views = harness.media("photo-1").await.unwrap();

    assert!(has_notice(&views, Notice::Failed(Operation::UploadImage)));
    assert!(harness.session().await.unwrap().state.is_none());
}

// ---- Routing ----

#[tokio::test]
async fn idle_text_is_unrecognized_and_changes_nothing() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.command("start").await.unwrap();
    let before = harness.session().await.unwrap();

    let views = harness.text("hello?").await.unwrap();

    assert_eq!(views, vec![View::Notice(Notice::Unrecognized)]);
    let after = harness.session().await.unwrap();
    assert_eq!(after.state, before.state);
    assert_eq!(after.films, before.films);
}

#[tokio::test]
async fn unknown_token_mid_wizard_reprompts() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.press(Action::Film(FilmAction::New)).await.unwrap();

    let views = harness.press_token("films_teleport").await.unwrap();

    assert_eq!(views.first(), Some(&View::Notice(Notice::Unrecognized)));
    assert!(matches!(
        views.last(),
        Some(View::Prompt(p)) if p.token == StateToken::new(Workflow::NewFilm, Field::Title)
    ));
    assert_eq!(
        harness.session().await.unwrap().state,
        Some(StateToken::new(Workflow::NewFilm, Field::Title))
    );
}

#[tokio::test]
async fn navigation_abandons_the_running_wizard() {
    let harness = TestHarness::builder()
        .with_films(films(2))
        .build()
        .await
        .unwrap();
    harness.press(Action::Film(FilmAction::New)).await.unwrap();
    harness.text("Heat").await.unwrap();

    let views = harness
        .press(Action::List(ListKind::Films, ListAction::Show))
        .await
        .unwrap();

    assert!(matches!(views.last(), Some(View::FilmsList { .. })));
    let session = harness.session().await.unwrap();
    assert!(session.state.is_none());
    assert!(session.film_detail.draft.title.is_none());
}

#[tokio::test]
async fn regular_users_cannot_browse_users() {
    let harness = TestHarness::builder().build().await.unwrap();

    let views = harness
        .press(Action::List(ListKind::Users, ListAction::Show))
        .await
        .unwrap();

    assert_eq!(views.first(), Some(&View::Notice(Notice::Forbidden)));
    assert_eq!(harness.backend.call_count("list_users").await, 0);
}

#[tokio::test]
async fn admins_can_browse_users() {
    let harness = TestHarness::builder()
        .with_role(Role::Admin)
        .build()
        .await
        .unwrap();

    let views = harness.command("admin").await.unwrap();
    assert_eq!(views, vec![View::AdminMenu]);

    let views = harness
        .press(Action::List(ListKind::Users, ListAction::Show))
        .await
        .unwrap();
    assert!(matches!(views.last(), Some(View::UsersList { .. })));
}

// ---- Concurrency ----

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn updates_from_one_user_do_not_interleave() {
    let harness = Arc::new(TestHarness::builder().build().await.unwrap());
    harness.command("start").await.unwrap();
    harness.press(Action::Film(FilmAction::New)).await.unwrap();

    // Title then year, raced: whichever runs second sees the first's state.
    let a = {
        let h = harness.clone();
        tokio::spawn(async move {
            h.dispatcher
                .dispatch(event(100, TEST_USER, EventKind::Text("Ronin".into())))
                .await
        })
    };
    let b = {
        let h = harness.clone();
        tokio::spawn(async move {
            h.dispatcher
                .dispatch(event(101, TEST_USER, EventKind::Text("1998".into())))
                .await
        })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let session = harness.session().await.unwrap();
    let draft = &session.film_detail.draft;
    // Either "Ronin" became the title and "1998" the year, or "1998" became
    // the title and "Ronin" was rejected as a year. Never a lost update.
    match draft.title.as_deref() {
        Some("Ronin") => {
            assert_eq!(draft.year, Some(1998));
            assert_eq!(
                session.state,
                Some(StateToken::new(Workflow::NewFilm, Field::Genre))
            );
        }
        Some("1998") => {
            assert_eq!(draft.year, None);
            assert_eq!(
                session.state,
                Some(StateToken::new(Workflow::NewFilm, Field::Year))
            );
        }
        other => panic!("unexpected title {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn user_guards_are_released_after_handling() {
    let harness = Arc::new(TestHarness::builder().build().await.unwrap());
    harness.command("start").await.unwrap();
    assert_eq!(harness.dispatcher.tracked_users().await, 0);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let h = harness.clone();
            let user = if i % 2 == 0 { TEST_USER } else { "777" };
            tokio::spawn(async move {
                h.dispatcher
                    .dispatch(event(200 + i, user, EventKind::Command { name: "help".into() }))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(harness.dispatcher.tracked_users().await, 0);
}

#[tokio::test]
async fn views_target_the_sender_chat_and_locale() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.command("start").await.unwrap();
    harness.renderer.take_views().await;

    harness
        .dispatcher
        .dispatch(event(7, TEST_USER, EventKind::Command { name: "help".into() }))
        .await
        .unwrap();

    let targets = harness.renderer.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].chat_id, TEST_USER);
    assert_eq!(targets[0].locale, "en");
}
