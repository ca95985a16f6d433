//! 转发核心 - 消息模型、流客户端与投递
//!
//! # 设计目标
//! 1. 统一接口：投递端实现 `DeliverySink` trait，测试可替换
//! 2. 单生产者/单消费者：流客户端经有界 channel 把帧交给 Dispatcher
//! 3. 顺序投递：逐帧处理，不乱序、不并发投递
//! 4. 可恢复错误不终止进程：坏帧跳过，投递失败记录后继续
//!
//! # 使用示例
//! ```ignore
//! use gotify_discord_relay::{GotifyMessage, Dispatcher, DiscordWebhook, WebhookConfig};
//!
//! let sink = DiscordWebhook::new(WebhookConfig {
//!     webhook_url: "https://discord.com/api/webhooks/...".into(),
//!     ..Default::default()
//! })?;
//! let dispatcher = Dispatcher::new(std::sync::Arc::new(sink));
//! let outcome = dispatcher.handle_frame(raw_frame).await;
//! ```

pub mod backoff;
pub mod discord;
pub mod dispatcher;
pub mod message;
pub mod sink;
pub mod stream;
pub mod tier;

pub use backoff::{Backoff, ReconnectConfig};
pub use discord::{DiscordWebhook, WebhookConfig};
pub use dispatcher::{Dispatcher, DrainStats};
pub use message::{DiscordMessage, Embed, GotifyMessage};
pub use sink::{DeliverySink, DispatchOutcome};
pub use stream::{ConnectionState, StreamClient};
pub use tier::PriorityTier;
