//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use crate::health::checker::DEFAULT_REQUEST_TIMEOUT;
use crate::health::EndpointSet;
use crate::notification::HandlebarsTemplate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认的Slack API地址
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// 主配置结构，包含通知渠道、端点列表和运行参数
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Slack 通知配置
    #[serde(default)]
    pub slack: SlackConfig,
    /// 端点名称到URL的映射
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
    /// 运行参数
    #[serde(default)]
    pub settings: Settings,
}

/// Slack 通知配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlackConfig {
    /// 频道ID或名称
    #[serde(default)]
    pub channel: String,
    /// Bot token
    #[serde(default)]
    pub token: String,
}

impl SlackConfig {
    /// 频道和token都非空时才启用通知
    pub fn is_enabled(&self) -> bool {
        !self.channel.trim().is_empty() && !self.token.trim().is_empty()
    }
}

/// 运行参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// 单次请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// 通知消息模板（Handlebars）
    pub message_template: Option<String>,
    /// Slack API 基础地址
    #[serde(default = "default_slack_api_url")]
    pub slack_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_timeout(),
            message_template: None,
            slack_api_url: default_slack_api_url(),
        }
    }
}

// 默认值函数
fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_slack_api_url() -> String {
    DEFAULT_SLACK_API_URL.to_string()
}

impl Config {
    /// 构建本次运行的端点集合
    pub fn endpoint_set(&self) -> EndpointSet {
        self.endpoints
            .iter()
            .map(|(name, url)| (name.clone(), url.clone()))
            .collect()
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    let settings = &config.settings;

    if settings.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    validate_http_url(&settings.slack_api_url).map_err(|e| format!("Slack API地址无效: {e}"))?;

    if let Some(ref template) = settings.message_template {
        HandlebarsTemplate::validate(template).map_err(|e| format!("消息模板无效: {e}"))?;
    }

    let slack = &config.slack;
    if !slack.is_enabled() && !(slack.channel.trim().is_empty() && slack.token.trim().is_empty())
    {
        tracing::warn!("Slack频道和token需同时配置，通知已禁用");
    }

    for (name, url) in &config.endpoints {
        if name.trim().is_empty() {
            return Err("端点名称不能为空".to_string());
        }

        validate_http_url(url).map_err(|e| format!("端点 {name} 的URL格式无效: {e}"))?;
    }

    Ok(())
}

/// 校验URL可解析且为 http/https
fn validate_http_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("{raw} ({e})"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{raw} (不支持的协议 {other})")),
    }
}
