//! Error taxonomy for the relay.
//!
//! Every stage returns a typed error; the supervisor consults
//! [`RelayError::is_fatal`] to decide between terminating the process and
//! logging the error and continuing with the next frame.

use tokio_tungstenite::tungstenite;

/// Errors surfaced by the relay stages.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A required startup parameter was not provided.
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// The initial WebSocket handshake failed.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    /// The stream failed mid-read and reconnection was disabled.
    #[error("stream read failed: {0}")]
    Read(#[source] tungstenite::Error),

    /// Writing the close handshake frame failed.
    #[error("close handshake failed: {0}")]
    Close(#[source] tungstenite::Error),

    /// An inbound frame did not decode as a Gotify message.
    #[error("malformed inbound frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// The outbound webhook request could not be issued.
    #[error("webhook delivery failed: {0}")]
    Deliver(#[from] reqwest::Error),

    /// All reconnect attempts were used up without a working connection.
    #[error("reconnect attempts exhausted after {attempts} tries")]
    ReconnectExhausted { attempts: u32 },
}

impl RelayError {
    /// Whether this error should terminate the relay.
    ///
    /// Malformed frames and failed deliveries affect a single message and
    /// the loop continues past them; everything else concerns the transport
    /// or the startup configuration and stops the process.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RelayError::Decode(_) | RelayError::Deliver(_))
    }
}
