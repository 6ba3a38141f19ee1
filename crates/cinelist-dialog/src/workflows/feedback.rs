// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback: pick a category, type the message, send it.

use cinelist_core::session::FeedbackDraft;
use cinelist_core::types::{Feedback, FeedbackCategory};
use cinelist_core::{CinelistError, Field, Notice, Operation, StateToken, Workflow};
use tracing::info;

use crate::transitions::first_field;
use crate::turn::Turn;

pub fn start(turn: &mut Turn<'_>) {
    turn.session.feedback = FeedbackDraft::default();
    turn.ask(StateToken::new(
        Workflow::Feedback,
        first_field(Workflow::Feedback),
    ));
}

pub fn choose_category(turn: &mut Turn<'_>, category: FeedbackCategory) {
    turn.session.feedback.category = Some(category);
    turn.ask(StateToken::new(Workflow::Feedback, Field::Text));
}

pub async fn send(turn: &mut Turn<'_>) -> Result<(), CinelistError> {
    let draft = &turn.session.feedback;
    let (Some(category), Some(text)) = (draft.category, draft.text.clone()) else {
        // The category was lost; start over from the buttons.
        start(turn);
        return Ok(());
    };
    let feedback = Feedback {
        id: 0,
        user_id: turn.session.user.as_ref().map_or(0, |u| u.id),
        category,
        text,
    };
    match turn
        .backend
        .send_feedback(&mut turn.session.credentials, &feedback)
        .await
    {
        Ok(()) => {
            info!(parent: &turn.span, %category, "feedback sent");
            turn.session.end_dialog();
            turn.notice(Notice::Succeeded(Operation::SendFeedback));
            turn.main_menu();
            Ok(())
        }
        Err(err) => super::abort(turn, Operation::SendFeedback, Workflow::Feedback, err),
    }
}
