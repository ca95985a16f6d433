//! Gotify → Discord 通知转发

pub mod config;
pub mod error;
pub mod relay;
pub mod supervisor;

pub use config::RelayConfig;
pub use error::RelayError;
pub use relay::backoff::{Backoff, ReconnectConfig};
pub use relay::discord::{DiscordWebhook, WebhookConfig};
pub use relay::dispatcher::{Dispatcher, DrainStats};
pub use relay::message::{DiscordMessage, Embed, GotifyMessage};
pub use relay::sink::{DeliverySink, DispatchOutcome};
pub use relay::stream::{ConnectionState, StreamClient};
pub use relay::tier::PriorityTier;
pub use supervisor::Supervisor;
