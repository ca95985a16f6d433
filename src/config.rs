//! 启动配置 - flag 优先，环境变量兜底

use crate::error::RelayError;
use crate::relay::backoff::ReconnectConfig;

/// 环境变量：Gotify WebSocket URL
pub const ENV_GOTIFY_URL: &str = "GOTIFY_WS_URL";
/// 环境变量：Discord Webhook URL
pub const ENV_DISCORD_URL: &str = "DISCORD_WEBHOOK_URL";

/// Relay 配置
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// 上游通知流地址（含鉴权 token）
    pub gotify_url: String,
    /// 出站 webhook 地址
    pub discord_url: String,
    /// 单次投递请求超时（秒）
    pub request_timeout_secs: u64,
    /// 优雅关闭等待上限（秒），超时强制退出
    pub shutdown_grace_secs: u64,
    /// 断线重连策略
    pub reconnect: ReconnectConfig,
    /// 是否为 dry-run 模式
    pub dry_run: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gotify_url: String::new(),
            discord_url: String::new(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 10,
            reconnect: ReconnectConfig::default(),
            dry_run: false,
        }
    }
}

impl RelayConfig {
    /// 解析两个必填 URL：命令行参数优先，环境变量兜底
    pub fn resolve(gotify: Option<String>, discord: Option<String>) -> Self {
        Self {
            gotify_url: gotify
                .filter(|v| !v.is_empty())
                .or_else(|| env_nonempty(ENV_GOTIFY_URL))
                .unwrap_or_default(),
            discord_url: discord
                .filter(|v| !v.is_empty())
                .or_else(|| env_nonempty(ENV_DISCORD_URL))
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// 校验必填项。在任何网络活动之前调用。
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.gotify_url.is_empty() {
            return Err(RelayError::MissingConfig(
                "Gotify WebSocket URL (--gotify / GOTIFY_WS_URL)",
            ));
        }
        if self.discord_url.is_empty() {
            return Err(RelayError::MissingConfig(
                "Discord webhook URL (--discord / DISCORD_WEBHOOK_URL)",
            ));
        }
        Ok(())
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_both_urls() {
        let config = RelayConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GOTIFY_WS_URL"));

        let config = RelayConfig {
            gotify_url: "wss://gotify.example.com/stream?token=abc".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DISCORD_WEBHOOK_URL"));

        let config = RelayConfig {
            gotify_url: "wss://gotify.example.com/stream?token=abc".to_string(),
            discord_url: "https://discord.com/api/webhooks/1/abc".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_flag_takes_precedence_over_env() {
        // 同一个测试里完成设置与断言，避免并行测试间串扰
        std::env::set_var(ENV_GOTIFY_URL, "wss://from-env/stream");
        std::env::set_var(ENV_DISCORD_URL, "https://from-env/webhook");

        let config = RelayConfig::resolve(
            Some("wss://from-flag/stream".to_string()),
            Some("https://from-flag/webhook".to_string()),
        );
        assert_eq!(config.gotify_url, "wss://from-flag/stream");
        assert_eq!(config.discord_url, "https://from-flag/webhook");

        let config = RelayConfig::resolve(None, None);
        assert_eq!(config.gotify_url, "wss://from-env/stream");
        assert_eq!(config.discord_url, "https://from-env/webhook");

        std::env::remove_var(ENV_GOTIFY_URL);
        std::env::remove_var(ENV_DISCORD_URL);
    }

    #[test]
    fn test_default_timeouts() {
        let config = RelayConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.shutdown_grace_secs, 10);
        assert!(!config.dry_run);
    }
}
