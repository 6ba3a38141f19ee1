// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialog dispatcher: one inbound update in, rendered views out.
//!
//! For every update the dispatcher loads the session, signs the user in if
//! needed, classifies the input, runs the matching workflow, persists the
//! session and renders what the workflow produced. Updates from the same
//! user are handled one at a time; different users run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use cinelist_config::model::DialogConfig;
use cinelist_core::types::{ExternalIdentity, InboundEvent, RenderTarget};
use cinelist_core::{BackendAdapter, CinelistError, Notice, Operation, Renderer, SessionStore};
use tokio::sync::Mutex;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::classifier::classify;
use crate::turn::Turn;
use crate::workflows;

pub struct Dispatcher {
    store: Arc<dyn SessionStore>,
    backend: Arc<dyn BackendAdapter>,
    renderer: Arc<dyn Renderer>,
    config: DialogConfig,
    /// Per-user guards serializing updates from the same sender.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn SessionStore>,
        backend: Arc<dyn BackendAdapter>,
        renderer: Arc<dyn Renderer>,
        config: DialogConfig,
    ) -> Self {
        Self {
            store,
            backend,
            renderer,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handles one update end to end.
    ///
    /// Only a failure to load the session is returned; everything after
    /// that is reported to the user and logged.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<(), CinelistError> {
        let span = info_span!(
            "update",
            user = %event.sender.external_id,
            update_id = event.update_id,
        );
        self.handle(event, span.clone()).instrument(span).await
    }

    async fn lock_for(&self, external_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(external_id.to_string())
            .or_default()
            .clone()
    }

    /// Drops the guard of `external_id` once no other update holds or awaits it.
    async fn release(&self, external_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        // One reference here, one in the map.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(external_id);
        }
    }

    /// Number of users with a guard currently in the lock table.
    pub async fn tracked_users(&self) -> usize {
        self.locks.lock().await.len()
    }

    async fn handle(&self, event: InboundEvent, span: Span) -> Result<(), CinelistError> {
        let external_id = event.sender.external_id.clone();
        let lock = self.lock_for(&external_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.process(event, span).await
        };
        self.release(&external_id, lock).await;
        result
    }

    async fn process(&self, event: InboundEvent, span: Span) -> Result<(), CinelistError> {
        let mut session = self.store.load_or_create(&event.sender.external_id).await?;
        session.update_identity(&event.sender);

        let mut turn = Turn::new(session, self.backend.as_ref(), &self.config, span);
        self.run(&mut turn, &event).await;

        if let Err(e) = self.store.save_all(&turn.session).await {
            // The reply below still reflects this turn.
            warn!(error = %e, "failed to persist session");
        }

        let target = RenderTarget {
            chat_id: event.chat_id.clone(),
            locale: turn.session.locale.clone(),
        };
        for view in &turn.views {
            if let Err(e) = self.renderer.render(&target, view).await {
                error!(error = %e, "failed to render view");
            }
        }
        debug!(views = turn.views.len(), "update handled");
        Ok(())
    }

    async fn run(&self, turn: &mut Turn<'_>, event: &InboundEvent) {
        if let Err(e) = self.sign_in(turn, &event.sender).await {
            warn!(error = %e, "authentication failed");
            turn.notice(Notice::Failed(Operation::Authenticate));
            return;
        }
        if turn.session.is_banned {
            debug!("update from a banned user ignored");
            turn.notice(Notice::Banned);
            return;
        }

        let route = classify(&event.kind, turn.session.state);
        debug!(?route, state = ?turn.session.state, "update classified");

        match workflows::route(turn, route).await {
            Ok(()) => {}
            Err(e) if e.is_unauthorized() => {
                // The backend already tried a refresh; start over.
                warn!("credentials rejected, signing in again");
                turn.session.credentials.clear();
                turn.session.end_dialog();
                turn.views.clear();
                match self.sign_in(turn, &event.sender).await {
                    Ok(()) => {
                        turn.notice(Notice::SessionExpired);
                        turn.main_menu();
                    }
                    Err(e) => {
                        warn!(error = %e, "re-authentication failed");
                        turn.notice(Notice::Failed(Operation::Authenticate));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "update handling failed");
                turn.session.end_dialog();
                turn.notice(Notice::Unrecognized);
                turn.main_menu();
            }
        }
    }

    /// Authenticates a session that has no credentials yet.
    async fn sign_in(
        &self,
        turn: &mut Turn<'_>,
        identity: &ExternalIdentity,
    ) -> Result<(), CinelistError> {
        if turn.session.credentials.is_authenticated() && turn.session.user.is_some() {
            return Ok(());
        }
        let grant = self.backend.authenticate(identity).await?;
        info!(user_id = grant.user.id, role = %grant.user.role, "signed in");
        turn.session.credentials = grant.credentials;
        turn.session.set_user(grant.user);
        Ok(())
    }
}
