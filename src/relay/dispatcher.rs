//! 帧分发器 - 逐帧解码、映射并投递

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::message::GotifyMessage;
use super::sink::{DeliverySink, DispatchOutcome};

/// 帧分发器 - 单消费者，严格按到达顺序逐帧处理
pub struct Dispatcher {
    /// 投递端
    sink: Arc<dyn DeliverySink>,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

/// 消费循环结束时的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub delivered: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl Dispatcher {
    /// 创建新的分发器
    pub fn new(sink: Arc<dyn DeliverySink>) -> Self {
        Self {
            sink,
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 处理单个原始帧：解码 → 映射 → 投递
    ///
    /// 解码失败跳过该帧；投递失败记录后继续。两者都不终止进程。
    pub async fn handle_frame(&self, raw: &str) -> DispatchOutcome {
        let inbound = match GotifyMessage::decode(raw) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "malformed frame skipped");
                return DispatchOutcome::Skipped(e.to_string());
            }
        };

        debug!(
            id = inbound.id,
            appid = inbound.appid,
            priority = inbound.priority,
            "frame decoded"
        );

        let payload = inbound.to_discord();

        if self.dry_run {
            eprintln!(
                "[DRY-RUN] Would deliver to {}: {}",
                self.sink.name(),
                serde_json::to_string(&payload).unwrap_or_default()
            );
            return DispatchOutcome::Skipped("dry-run".to_string());
        }

        match self.sink.deliver(&payload).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(sink = self.sink.name(), error = %e, "delivery failed");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    /// 消费循环：直到通道关闭（生产者退出）才返回
    pub async fn run(&self, mut rx: mpsc::Receiver<String>) -> DrainStats {
        let mut stats = DrainStats::default();
        while let Some(frame) = rx.recv().await {
            match self.handle_frame(&frame).await {
                DispatchOutcome::Delivered { status } => {
                    debug!(status, "frame delivered");
                    stats.delivered += 1;
                }
                DispatchOutcome::Skipped(_) => stats.skipped += 1,
                DispatchOutcome::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use crate::relay::message::DiscordMessage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 测试用的 mock 投递端
    struct MockSink {
        send_count: AtomicUsize,
        payloads: Mutex<Vec<DiscordMessage>>,
        fail: bool,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                send_count: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn get_send_count(&self) -> usize {
            self.send_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DeliverySink for MockSink {
        fn name(&self) -> &str {
            "mock"
        }

        async fn deliver(&self, payload: &DiscordMessage) -> Result<DispatchOutcome, RelayError> {
            if self.fail {
                // 模拟请求无法发出
                return Ok(DispatchOutcome::Failed("transient error".to_string()));
            }
            self.send_count.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(payload.clone());
            Ok(DispatchOutcome::Delivered { status: 204 })
        }
    }

    #[tokio::test]
    async fn test_handle_frame_delivers_valid_frame() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = Dispatcher::new(sink.clone());

        let outcome = dispatcher
            .handle_frame(r#"{"title":"Backup","message":"done","priority":9}"#)
            .await;

        assert_eq!(outcome, DispatchOutcome::Delivered { status: 204 });
        assert_eq!(sink.get_send_count(), 1);
        let payloads = sink.payloads.lock().unwrap();
        assert_eq!(payloads[0].embeds[0].title, "🚨 Backup");
        assert_eq!(payloads[0].embeds[0].color, 0xFF0000);
    }

    #[tokio::test]
    async fn test_handle_frame_skips_malformed_frame() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = Dispatcher::new(sink.clone());

        let outcome = dispatcher.handle_frame("not json").await;

        assert!(matches!(outcome, DispatchOutcome::Skipped(_)));
        assert_eq!(sink.get_send_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_frame_reports_failed_delivery() {
        let sink = Arc::new(MockSink::failing());
        let dispatcher = Dispatcher::new(sink.clone());

        let outcome = dispatcher
            .handle_frame(r#"{"title":"X","message":"Y","priority":1}"#)
            .await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_dispatcher_dry_run() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = Dispatcher::new(sink.clone()).with_dry_run(true);

        let outcome = dispatcher
            .handle_frame(r#"{"title":"X","message":"Y","priority":1}"#)
            .await;

        assert_eq!(outcome, DispatchOutcome::Skipped("dry-run".to_string()));
        assert_eq!(sink.get_send_count(), 0); // 不应该实际发送
    }

    #[tokio::test]
    async fn test_run_drains_channel_in_order() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = Dispatcher::new(sink.clone());
        let (tx, rx) = mpsc::channel(8);

        for title in ["first", "second", "third"] {
            tx.send(format!(
                r#"{{"title":"{}","message":"m","priority":0}}"#,
                title
            ))
            .await
            .unwrap();
        }
        // 夹一个坏帧，循环应继续
        tx.send("garbage".to_string()).await.unwrap();
        drop(tx);

        let stats = dispatcher.run(rx).await;

        assert_eq!(
            stats,
            DrainStats {
                delivered: 3,
                skipped: 1,
                failed: 0
            }
        );
        let payloads = sink.payloads.lock().unwrap();
        let titles: Vec<&str> = payloads.iter().map(|p| p.embeds[0].title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
