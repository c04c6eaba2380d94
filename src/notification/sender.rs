//! 通知发送器模块
//!
//! 定义通知发送的trait和消息结构

use crate::error::Result;
use async_trait::async_trait;

/// 告警消息标题
pub const ALERT_TITLE: &str = "❗ Major healthcheck failure";

/// 不支持富文本的客户端显示的回退文本
pub const ALERT_FALLBACK_TEXT: &str = "❗ Healthcheck failure!";

/// 通知消息结构
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    /// 消息标题
    pub title: String,
    /// 消息内容
    pub content: String,
    /// 回退文本
    pub fallback_text: String,
}

impl NotificationMessage {
    /// 创建健康检测失败告警
    pub fn alert(content: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            content: content.into(),
            fallback_text: ALERT_FALLBACK_TEXT.to_string(),
        }
    }
}

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送消息
    ///
    /// # 参数
    /// * `message` - 通知消息
    ///
    /// # 返回
    /// * `Result<()>` - 发送结果
    async fn send_message(&self, message: &NotificationMessage) -> Result<()>;

    /// 测试连接
    ///
    /// # 返回
    /// * `Result<()>` - 测试结果
    async fn test_connection(&self) -> Result<()>;
}
