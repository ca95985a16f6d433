//! Gotify → Discord Relay CLI
//!
//! 订阅 Gotify 通知流并转发到 Discord webhook

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use gotify_discord_relay::{RelayConfig, Supervisor};

#[derive(Parser)]
#[command(name = "gdr")]
#[command(about = "Relay Gotify push notifications to a Discord webhook")]
#[command(version)]
struct Cli {
    /// Gotify WebSocket URL（缺省读取环境变量 GOTIFY_WS_URL）
    /// Example: wss://gotify.example.com/stream?token=abcdefghijklmnop
    #[arg(long, verbatim_doc_comment)]
    gotify: Option<String>,

    /// Discord Webhook URL（缺省读取环境变量 DISCORD_WEBHOOK_URL）
    /// Example: https://discord.com/api/webhooks/123456789012345678/abcdef
    #[arg(long, verbatim_doc_comment)]
    discord: Option<String>,

    /// 单次投递请求超时（秒）
    #[arg(long, default_value = "30")]
    request_timeout: u64,

    /// 优雅关闭等待上限（秒），超时强制退出
    #[arg(long, default_value = "10")]
    shutdown_grace: u64,

    /// 断线重连最大尝试次数（0 表示不重连）
    #[arg(long, default_value = "10")]
    max_reconnects: u32,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = RelayConfig::resolve(cli.gotify, cli.discord);
    config.request_timeout_secs = cli.request_timeout;
    config.shutdown_grace_secs = cli.shutdown_grace;
    config.reconnect.max_attempts = cli.max_reconnects;
    config.dry_run = cli.dry_run;

    Supervisor::new(config).run().await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gotify_discord_relay=info,gdr=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
