//! Slack通知发送器模块
//!
//! 通过 chat.postMessage 接口发送告警

use crate::error::{NotificationError, Result};
use crate::notification::sender::{NotificationMessage, NotificationSender};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

/// Slack通知发送器
pub struct SlackSender {
    /// HTTP客户端
    client: Client,
    /// API基础地址，例如 `https://slack.com/api`
    api_url: String,
    /// 频道
    channel: String,
    /// Bot token
    token: String,
}

impl SlackSender {
    /// 创建新的Slack发送器
    ///
    /// # 参数
    /// * `api_url` - API基础地址
    /// * `channel` - 频道
    /// * `token` - Bot token
    ///
    /// # 返回
    /// * `Result<Self>` - 发送器实例
    pub fn new(
        api_url: impl Into<String>,
        channel: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let channel = channel.into();
        let token = token.into();
        if channel.trim().is_empty() || token.trim().is_empty() {
            return Err(NotificationError::ConfigError("Slack频道和token不能为空".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(|e| NotificationError::SendError(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            channel,
            token,
        })
    }

    /// 构建Slack消息体：标题块加正文块
    fn build_message_body(&self, message: &NotificationMessage) -> Value {
        json!({
            "channel": self.channel,
            "text": message.fallback_text,
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": message.title
                    }
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": message.content
                    }
                }
            ]
        })
    }

    /// 调用Slack Web API
    ///
    /// HTTP状态码非2xx或响应体 `ok` 不为 true 都视为失败
    async fn call_api(&self, method: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.api_url, method);
        debug!("调用Slack接口: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| NotificationError::SendError(format!("请求Slack失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Slack接口返回错误状态: {} - {}", status, text);
            return Err(NotificationError::SendError(format!("HTTP {status}")).into());
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| NotificationError::SendError(format!("解析Slack响应失败: {e}")))?;

        if payload.get("ok").and_then(Value::as_bool) == Some(true) {
            Ok(payload)
        } else {
            let api_error = payload
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            error!("Slack接口调用失败: {} - {}", method, api_error);
            Err(NotificationError::ApiError { error: api_error }.into())
        }
    }
}

#[async_trait]
impl NotificationSender for SlackSender {
    async fn send_message(&self, message: &NotificationMessage) -> Result<()> {
        let body = self.build_message_body(message);
        self.call_api("chat.postMessage", &body).await?;

        info!("Slack消息发送成功: {}", self.channel);
        Ok(())
    }

    async fn test_connection(&self) -> Result<()> {
        let payload = self.call_api("auth.test", &json!({})).await?;

        let team = payload.get("team").and_then(Value::as_str).unwrap_or("-");
        let user = payload.get("user").and_then(Value::as_str).unwrap_or("-");
        info!("Slack连接正常: team={}, user={}", team, user);
        Ok(())
    }
}
