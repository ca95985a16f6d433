//! Stream client owning the persistent WebSocket connection to Gotify.
//!
//! The pump forwards raw text frames into a bounded channel in arrival
//! order. A lost connection is re-established with capped exponential
//! backoff; the initial connect has no retry and fails the relay.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backoff::{Backoff, ReconnectConfig};
use crate::error::RelayError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle states, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
    Closed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a single connection ended, seen from the read loop.
enum ConnectionEnd {
    /// We requested the close handshake and the stream drained, or the
    /// consumer went away during shutdown.
    Closed,
    /// The connection dropped while we were not closing it.
    Dropped(tungstenite::Error),
}

/// Client for the upstream notification stream.
pub struct StreamClient {
    url: String,
    ws: WsStream,
    state: ConnectionState,
    reconnect: ReconnectConfig,
}

impl StreamClient {
    /// Establish the initial session. Failure here is fatal, no retry.
    pub async fn connect(url: &str, reconnect: ReconnectConfig) -> Result<Self, RelayError> {
        info!(url = %url, "connecting to gotify stream");
        let (ws, _) = connect_async(url).await.map_err(|source| RelayError::Connect {
            url: url.to_string(),
            source,
        })?;
        info!("stream connected");
        Ok(Self {
            url: url.to_string(),
            ws,
            state: ConnectionState::Connected,
            reconnect,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Send the close handshake frame. Does not wait for the peer to
    /// acknowledge; the read loop keeps draining until the stream ends.
    pub async fn request_graceful_close(&mut self) -> Result<(), RelayError> {
        self.ws
            .send(Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            })))
            .await
            .map_err(RelayError::Close)
    }

    /// Forward text frames into `tx` until shutdown completes or the
    /// connection is lost beyond repair.
    ///
    /// On cancellation the close handshake is sent and frames already in
    /// flight keep flowing until the peer ends the stream. A mid-stream
    /// drop triggers the reconnect schedule; exhausting it is fatal.
    pub async fn pump(
        mut self,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<(), RelayError> {
        let mut backoff = Backoff::new(self.reconnect.clone());

        loop {
            match self.run_connection(&tx, &cancel).await {
                ConnectionEnd::Closed => {
                    self.set_state(ConnectionState::Closed);
                    info!("stream closed");
                    return Ok(());
                }
                ConnectionEnd::Dropped(err) => {
                    self.set_state(ConnectionState::Disconnected);
                    warn!(error = %err, "stream connection lost");
                    let last = RelayError::Read(err);

                    loop {
                        let Some(delay) = backoff.next_delay() else {
                            return Err(if self.reconnect.max_attempts == 0 {
                                last
                            } else {
                                RelayError::ReconnectExhausted {
                                    attempts: self.reconnect.max_attempts,
                                }
                            });
                        };

                        tokio::select! {
                            _ = cancel.cancelled() => {
                                info!("shutdown requested while disconnected");
                                self.set_state(ConnectionState::Closed);
                                return Ok(());
                            }
                            _ = tokio::time::sleep(delay) => {}
                        }

                        self.set_state(ConnectionState::Connecting);
                        match connect_async(&self.url).await {
                            Ok((ws, _)) => {
                                self.ws = ws;
                                self.set_state(ConnectionState::Connected);
                                backoff.reset();
                                info!("stream reconnected");
                                break;
                            }
                            Err(e) => {
                                warn!(
                                    attempt = backoff.attempts_used(),
                                    error = %e,
                                    "reconnect attempt failed"
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    /// Read loop for one established connection.
    async fn run_connection(
        &mut self,
        tx: &mpsc::Sender<String>,
        cancel: &CancellationToken,
    ) -> ConnectionEnd {
        loop {
            tokio::select! {
                _ = cancel.cancelled(), if self.state != ConnectionState::Closing => {
                    match self.request_graceful_close().await {
                        Ok(()) => self.set_state(ConnectionState::Closing),
                        Err(e) => {
                            // Shutting down anyway: note the failure and stop.
                            warn!(error = %e, "close handshake failed");
                            return ConnectionEnd::Closed;
                        }
                    }
                }
                msg = self.ws.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if tx.send(text).await.is_err() {
                            warn!("frame consumer went away, stopping stream");
                            return ConnectionEnd::Closed;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return if self.state == ConnectionState::Closing {
                            ConnectionEnd::Closed
                        } else {
                            ConnectionEnd::Dropped(tungstenite::Error::ConnectionClosed)
                        };
                    }
                    // Pings are answered by the protocol layer; binary
                    // frames are not part of the gotify stream.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return if self.state == ConnectionState::Closing {
                            ConnectionEnd::Closed
                        } else {
                            ConnectionEnd::Dropped(e)
                        };
                    }
                }
            }
        }
    }

    fn set_state(&mut self, next: ConnectionState) {
        debug!(from = %self.state, to = %next, "connection state");
        self.state = next;
    }
}
