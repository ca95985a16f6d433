//! Lifecycle controller wiring the stream client and the dispatcher.
//!
//! Exactly two worker tasks run: the stream pump (producer) and the
//! dispatcher loop (consumer), joined by a bounded channel. The supervisor
//! listens for SIGINT/SIGTERM, triggers the close handshake through a
//! cancellation token, and bounds the graceful drain with a timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::discord::{DiscordWebhook, WebhookConfig};
use crate::relay::dispatcher::Dispatcher;
use crate::relay::stream::StreamClient;

/// Bound on frames queued between the stream pump and the dispatcher. A
/// slow delivery backpressures the pump through this buffer.
const FRAME_BUFFER: usize = 32;

/// Orchestrates startup, the relay loop and ordered shutdown.
pub struct Supervisor {
    config: RelayConfig,
    cancel: CancellationToken,
}

impl Supervisor {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that triggers graceful shutdown when cancelled. The signal
    /// listener cancels it on SIGINT/SIGTERM; tests can cancel it directly.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the relay until the stream ends or shutdown is requested.
    pub async fn run(self) -> Result<(), RelayError> {
        // Configuration problems surface before any network activity.
        self.config.validate()?;

        let sink = Arc::new(DiscordWebhook::new(WebhookConfig {
            webhook_url: self.config.discord_url.clone(),
            timeout_secs: self.config.request_timeout_secs,
        })?);
        let dispatcher = Dispatcher::new(sink).with_dry_run(self.config.dry_run);

        // The initial connect is fatal on failure, no retry.
        let client =
            StreamClient::connect(&self.config.gotify_url, self.config.reconnect.clone()).await?;

        let (tx, rx) = mpsc::channel(FRAME_BUFFER);

        spawn_signal_listener(self.cancel.clone());

        let mut pump: JoinHandle<Result<(), RelayError>> =
            tokio::spawn(client.pump(tx, self.cancel.clone()));
        let mut dispatch = tokio::spawn(async move { dispatcher.run(rx).await });

        let grace = Duration::from_secs(self.config.shutdown_grace_secs);

        // Wait for the stream to end: either the pump finishes on its own
        // (fatal transport error) or shutdown was requested and the close
        // handshake has to drain within the grace period.
        let pump_result = tokio::select! {
            res = &mut pump => flatten_pump_result(res),
            _ = self.cancel.cancelled() => {
                match tokio::time::timeout(grace, &mut pump).await {
                    Ok(res) => flatten_pump_result(res),
                    Err(_) => {
                        warn!(
                            grace_secs = self.config.shutdown_grace_secs,
                            "graceful close timed out, forcing exit"
                        );
                        pump.abort();
                        Ok(())
                    }
                }
            }
        };

        // The pump dropped its channel sender on exit; the dispatcher
        // drains whatever was already queued and returns its counts.
        match tokio::time::timeout(grace, &mut dispatch).await {
            Ok(Ok(stats)) => info!(
                delivered = stats.delivered,
                skipped = stats.skipped,
                failed = stats.failed,
                "dispatcher drained"
            ),
            Ok(Err(e)) => warn!(error = %e, "dispatcher task failed"),
            Err(_) => {
                warn!(
                    grace_secs = self.config.shutdown_grace_secs,
                    "dispatcher drain timed out, forcing exit"
                );
                dispatch.abort();
            }
        }

        if let Err(e) = &pump_result {
            error!(error = %e, fatal = e.is_fatal(), "stream pump failed");
        }
        pump_result
    }
}

/// Listen for SIGINT (Ctrl+C) and, on unix, SIGTERM; either begins
/// graceful shutdown by cancelling the token.
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to register SIGTERM handler")
                .recv()
                .await;
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("SIGINT received, initiating graceful shutdown"),
            _ = terminate => info!("SIGTERM received, initiating graceful shutdown"),
        }

        cancel.cancel();
    });
}

fn flatten_pump_result(
    res: Result<Result<(), RelayError>, tokio::task::JoinError>,
) -> Result<(), RelayError> {
    match res {
        Ok(inner) => inner,
        Err(e) => {
            warn!(error = %e, "stream task aborted");
            Ok(())
        }
    }
}
