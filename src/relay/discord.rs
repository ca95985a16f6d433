//! Discord Webhook 投递端
//!
//! 通过 HTTP POST 把序列化后的载荷发给固定的 webhook URL。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::message::DiscordMessage;
use super::sink::{DeliverySink, DispatchOutcome};
use crate::error::RelayError;

/// Webhook 客户端配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Webhook URL
    pub webhook_url: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Discord Webhook 客户端
#[derive(Debug)]
pub struct DiscordWebhook {
    client: Client,
    config: WebhookConfig,
}

impl DiscordWebhook {
    /// 创建新的 Webhook 客户端
    pub fn new(config: WebhookConfig) -> Result<Self, RelayError> {
        if config.webhook_url.is_empty() {
            return Err(RelayError::MissingConfig(
                "Discord webhook URL (--discord / DISCORD_WEBHOOK_URL)",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RelayError::Deliver)?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl DeliverySink for DiscordWebhook {
    fn name(&self) -> &str {
        "discord"
    }

    async fn deliver(&self, payload: &DiscordMessage) -> Result<DispatchOutcome, RelayError> {
        let response = self
            .client
            .post(&self.config.webhook_url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(RelayError::Deliver)?;

        // 响应体随 drop 释放；状态码只进日志，不做成功/失败分支
        let status = response.status().as_u16();
        debug!(status, "webhook delivery response");
        Ok(DispatchOutcome::Delivered { status })
    }
}
