// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-update execution context.
//!
//! A [`Turn`] owns the loaded session for the duration of one update, the
//! collaborators it may call, the views produced so far, and the update's
//! tracing span. Nothing in it outlives the update.

use cinelist_config::model::DialogConfig;
use cinelist_core::{BackendAdapter, CinelistError, Notice, Operation, Session, StateToken, View};
use tracing::{Span, warn};

use crate::steps;

pub struct Turn<'a> {
    pub session: Session,
    pub backend: &'a dyn BackendAdapter,
    pub config: &'a DialogConfig,
    /// Views to render, in order, once the update is handled.
    pub views: Vec<View>,
    /// Logging handle for this update, tagged with the sender and update id.
    pub span: Span,
}

impl<'a> Turn<'a> {
    pub fn new(
        session: Session,
        backend: &'a dyn BackendAdapter,
        config: &'a DialogConfig,
        span: Span,
    ) -> Self {
        Self {
            session,
            backend,
            config,
            views: Vec::new(),
            span,
        }
    }

    pub fn show(&mut self, view: impl Into<View>) {
        self.views.push(view.into());
    }

    pub fn notice(&mut self, notice: Notice) {
        self.views.push(View::Notice(notice));
    }

    pub fn main_menu(&mut self) {
        let view = View::MainMenu {
            username: self.session.user.as_ref().map(|u| u.username.clone()),
            role: self.session.role,
        };
        self.show(view);
    }

    /// Moves the session to `token` and asks for it.
    pub fn ask(&mut self, token: StateToken) {
        self.session.state = Some(token);
        self.reprompt(token);
    }

    /// Shows the prompt for `token` again without touching the session.
    pub fn reprompt(&mut self, token: StateToken) {
        match steps::prompt(token, self.config) {
            Some(prompt) => self.show(prompt),
            None => crate::workflows::show_button_prompt(self, token),
        }
    }

    /// Applies the collaborator-failure policy: log, report the failed
    /// operation, drop any active dialog. Credential failures are handed
    /// back to the dispatcher, which re-authenticates.
    pub fn recover(&mut self, op: Operation, err: CinelistError) -> Result<(), CinelistError> {
        if err.is_unauthorized() {
            return Err(err);
        }
        warn!(parent: &self.span, operation = %op, error = %err, "backend call failed");
        self.session.end_dialog();
        if err.is_forbidden() {
            self.notice(Notice::Forbidden);
        } else {
            self.notice(Notice::Failed(op));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_test_utils::MockBackend;
    use cinelist_core::{Field, Workflow};
    use tracing_test::traced_test;

    fn turn<'a>(backend: &'a MockBackend, config: &'a DialogConfig) -> Turn<'a> {
        let mut session = Session::new("1", "en", 5);
        session.state = Some(StateToken::new(Workflow::NewFilm, Field::Year));
        Turn::new(session, backend, config, tracing::info_span!("update", user = "1"))
    }

    #[test]
    #[traced_test]
    fn recover_reports_and_drops_the_dialog() {
        let backend = MockBackend::new();
        let config = DialogConfig::default();
        let mut turn = turn(&backend, &config);

        let err = CinelistError::backend("boom");
        assert!(turn.recover(Operation::CreateFilm, err).is_ok());

        assert!(turn.session.state.is_none());
        assert_eq!(turn.views, vec![View::Notice(Notice::Failed(Operation::CreateFilm))]);
        assert!(logs_contain("backend call failed"));
    }

    #[test]
    fn recover_maps_403_to_forbidden() {
        let backend = MockBackend::new();
        let config = DialogConfig::default();
        let mut turn = turn(&backend, &config);

        let err = CinelistError::Backend {
            message: "nope".into(),
            status: Some(403),
            source: None,
        };
        turn.recover(Operation::LoadList, err).unwrap();
        assert_eq!(turn.views, vec![View::Notice(Notice::Forbidden)]);
    }

    #[test]
    fn recover_hands_back_unauthorized() {
        let backend = MockBackend::new();
        let config = DialogConfig::default();
        let mut turn = turn(&backend, &config);

        let err = turn
            .recover(Operation::LoadList, CinelistError::Unauthorized)
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(turn.views.is_empty());
        assert!(turn.session.state.is_some());
    }
}
