//! 消息模板模块
//!
//! 基于Handlebars渲染失败告警正文

use crate::error::{NotificationError, Result};
use crate::health::RunOutcome;
use handlebars::Handlebars;
use serde::Serialize;

const TEMPLATE_NAME: &str = "alert";

/// 默认的告警正文模板
pub const DEFAULT_ALERT_TEMPLATE: &str = "Failed services: {{failed}}";

/// 模板上下文数据
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// 以 ", " 连接的失败端点名称
    pub failed: String,
    /// 失败端点数量
    pub failed_count: usize,
    /// 已检测端点数量
    pub checked: usize,
    /// 运行ID
    pub run_id: String,
    /// 运行结束时间
    pub timestamp: String,
}

impl TemplateContext {
    /// 从运行结果构建上下文
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        Self {
            failed: outcome.failed_joined(),
            failed_count: outcome.failed_names().len(),
            checked: outcome.checked(),
            run_id: outcome.run_id().to_string(),
            timestamp: outcome
                .finished_at()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        }
    }
}

impl TemplateContext {
    /// 字段齐全的示例上下文，用于校验模板
    pub fn sample() -> Self {
        Self {
            failed: "svc1, svc2".to_string(),
            failed_count: 2,
            checked: 3,
            run_id: uuid::Uuid::nil().to_string(),
            timestamp: "1970-01-01 00:00:00 UTC".to_string(),
        }
    }
}

/// 消息模板trait
pub trait MessageTemplate: Send + Sync {
    /// 渲染模板
    fn render(&self, context: &TemplateContext) -> Result<String>;
}

/// Handlebars模板
pub struct HandlebarsTemplate {
    registry: Handlebars<'static>,
}

impl HandlebarsTemplate {
    /// 创建新的Handlebars模板
    ///
    /// 模板语法错误在此处返回；严格模式下引用不存在的变量会在渲染时报错
    pub fn new(template: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // 正文发往聊天渠道，不做HTML转义
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| NotificationError::TemplateError(e.to_string()))?;

        Ok(Self { registry })
    }

    /// 使用内置告警模板
    pub fn default_alert() -> Result<Self> {
        Self::new(DEFAULT_ALERT_TEMPLATE)
    }

    /// 校验模板：语法可解析，且在严格模式下能对示例上下文完成渲染
    pub fn validate(template: &str) -> Result<()> {
        Self::new(template)?.render(&TemplateContext::sample())?;
        Ok(())
    }
}

impl MessageTemplate for HandlebarsTemplate {
    fn render(&self, context: &TemplateContext) -> Result<String> {
        self.registry
            .render(TEMPLATE_NAME, context)
            .map_err(|e| NotificationError::TemplateError(e.to_string()).into())
    }
}
