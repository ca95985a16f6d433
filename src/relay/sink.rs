//! 投递端 trait 定义

use async_trait::async_trait;

use super::message::DiscordMessage;
use crate::error::RelayError;

/// 单帧处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 投递成功（记录 HTTP 状态码，但不据此分支）
    Delivered { status: u16 },
    /// 跳过（帧格式错误或 dry-run）
    Skipped(String),
    /// 投递失败（请求无法发出）
    Failed(String),
}

/// 投递端 trait
///
/// Dispatcher 只通过该接口投递，测试中可替换为 mock。
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// 投递端名称（用于日志）
    fn name(&self) -> &str;

    /// 投递一个载荷
    ///
    /// `Err` 表示请求无法发出（网络不可达等），由调用方折叠为
    /// [`DispatchOutcome::Failed`] 并继续处理后续帧。
    async fn deliver(&self, payload: &DiscordMessage) -> Result<DispatchOutcome, RelayError>;
}
