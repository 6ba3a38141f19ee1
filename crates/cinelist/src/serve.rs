// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cinelist serve` command implementation.
//!
//! Opens the session store, configures the REST backend and the Telegram
//! transport, and feeds every inbound update to the dialog dispatcher until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use cinelist_backend::RestBackend;
use cinelist_config::CinelistConfig;
use cinelist_core::error::CinelistError;
use cinelist_core::types::HealthStatus;
use cinelist_core::{ChannelAdapter, PluginAdapter, SessionStore};
use cinelist_dialog::Dispatcher;
use cinelist_storage::{SessionDefaults, SqliteSessionStore};
use cinelist_telegram::TelegramChannel;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::shutdown;

/// How long in-flight updates may run after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the `cinelist serve` command.
pub async fn run_serve(config: CinelistConfig) -> Result<(), CinelistError> {
    init_tracing(&config.bot.log_level);

    info!(name = %config.bot.name, "starting cinelist serve");

    let store = SqliteSessionStore::new(
        config.storage.clone(),
        SessionDefaults {
            locale: config.bot.default_locale.clone(),
            page_size: config.dialog.default_page_size,
        },
    );
    store.initialize().await?;
    let store = Arc::new(store);

    let backend = Arc::new(RestBackend::new(&config.backend)?);
    report_health(backend.as_ref()).await;

    let mut channel = TelegramChannel::new(config.telegram.clone()).inspect_err(|_| {
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in cinelist.toml \
             or the CINELIST_TELEGRAM_BOT_TOKEN env var."
        );
    })?;
    let renderer = Arc::new(channel.renderer());
    channel.connect().await?;
    report_health(&channel).await;

    let dispatcher = Arc::new(Dispatcher::new(
        store.clone(),
        backend.clone(),
        renderer,
        config.dialog.clone(),
    ));

    let cancel = shutdown::install_signal_handler();
    run_loop(&channel, dispatcher, cancel).await;

    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "failed to stop the Telegram channel");
    }
    backend.shutdown().await?;
    store.close().await?;

    info!("cinelist stopped");
    Ok(())
}

/// Receives updates until the channel closes or `cancel` fires. Every update
/// runs on its own task; the dispatcher serializes updates per user.
pub async fn run_loop(
    channel: &dyn ChannelAdapter,
    dispatcher: Arc<Dispatcher>,
    cancel: CancellationToken,
) {
    let tracker = TaskTracker::new();
    info!(channel = channel.name(), "update loop running");

    loop {
        tokio::select! {
            event = channel.receive() => {
                match event {
                    Ok(event) => {
                        debug!(update_id = event.update_id, "update received");
                        let dispatcher = dispatcher.clone();
                        tracker.spawn(async move {
                            if let Err(e) = dispatcher.dispatch(event).await {
                                error!(error = %e, "failed to handle update");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "channel receive error");
                        break;
                    }
                }
            }
            _ = cancel.cancelled() => {
                info!("shutdown signal received, stopping update loop");
                break;
            }
        }
    }

    shutdown::drain_updates(&tracker, DRAIN_TIMEOUT).await;
    info!("update loop stopped");
}

async fn report_health(adapter: &dyn PluginAdapter) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => info!(adapter = adapter.name(), "adapter healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(adapter = adapter.name(), %reason, "adapter degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), %reason, "adapter unhealthy, continuing")
        }
        Err(e) => warn!(adapter = adapter.name(), error = %e, "health check failed"),
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cinelist={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelist_core::View;
    use cinelist_core::types::EventKind;
    use cinelist_test_utils::mock_channel::event;
    use cinelist_test_utils::{MockBackend, MockChannel, MockRenderer, TestHarness};

    async fn stack() -> (TestHarness, Arc<Dispatcher>, Arc<MockRenderer>) {
        let harness = TestHarness::builder().build().await.unwrap();
        let renderer = Arc::new(MockRenderer::new());
        let dispatcher = Arc::new(Dispatcher::new(
            harness.store.clone(),
            Arc::new(MockBackend::new()),
            renderer.clone(),
            Default::default(),
        ));
        (harness, dispatcher, renderer)
    }

    #[tokio::test]
    async fn loop_dispatches_until_cancelled() {
        let (_harness, dispatcher, renderer) = stack().await;
        let channel = MockChannel::new();
        channel
            .inject(event(1, "7", EventKind::Command { name: "start".into() }))
            .await;
        channel
            .inject(event(2, "8", EventKind::Command { name: "help".into() }))
            .await;

        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        let watcher = renderer.clone();
        tokio::spawn(async move {
            while watcher.views().await.len() < 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            stopper.cancel();
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            run_loop(&channel, dispatcher, cancel),
        )
        .await
        .expect("loop should stop after cancellation");

        let views = renderer.views().await;
        assert!(views.iter().any(|v| matches!(v, View::MainMenu { .. })));
        assert!(views.contains(&View::Help));
        assert_eq!(channel.pending().await, 0);
    }

    #[tokio::test]
    async fn loop_stops_immediately_when_already_cancelled() {
        let (_harness, dispatcher, renderer) = stack().await;
        let channel = MockChannel::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        run_loop(&channel, dispatcher, cancel).await;
        assert!(renderer.views().await.is_empty());
    }
}
