//! 消息模型 - 入站帧与出站载荷的 schema 及纯映射
//!
//! 入站格式（Gotify 每帧一个 JSON 对象）：
//! ```json
//! { "id": 1, "appid": 2, "title": "...", "message": "...",
//!   "priority": 5, "date": "2026-08-07T00:00:00Z" }
//! ```
//!
//! 出站格式（Discord webhook）：
//! ```json
//! { "content": "...", "embeds": [ { "title": "...", "description": "...", "color": 8421504 } ] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tier::PriorityTier;
use crate::error::RelayError;

/// 入站通知消息（每收到一帧构造一个，不可变）
///
/// 所有字段缺省可省略：上游不保证字段齐全，缺失时按零值填充。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GotifyMessage {
    pub id: i64,
    pub appid: i64,
    pub title: String,
    pub message: String,
    pub priority: i64,
    pub date: Option<DateTime<Utc>>,
}

impl GotifyMessage {
    /// 解码一个原始帧
    pub fn decode(raw: &str) -> Result<Self, RelayError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 映射为 Discord 载荷（纯函数）
    ///
    /// 不变式：`content` 与 `embeds` 恰好一个非空。
    pub fn to_discord(&self) -> DiscordMessage {
        let tier = PriorityTier::from_priority(self.priority);
        match tier.color() {
            Some(color) => {
                let title = match tier.icon() {
                    Some(icon) => format!("{} {}", icon, self.title),
                    None => self.title.clone(),
                };
                DiscordMessage {
                    content: String::new(),
                    embeds: vec![Embed {
                        title,
                        description: self.message.clone(),
                        color,
                    }],
                }
            }
            // 未识别的优先级：标题加粗 + 空行 + 正文
            None => DiscordMessage {
                content: format!("**{}**\n\n{}", self.title, self.message),
                embeds: Vec::new(),
            },
        }
    }
}

/// 出站 Discord 消息（每次投递构造一个，不可变）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

/// Discord embed 块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}
