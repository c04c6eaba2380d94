//! 结果报告模块
//!
//! 将封存后的运行结果输出到控制台，存在失败且配置了通知渠道时发送告警

use crate::config::Config;
use crate::error::Result;
use crate::health::RunOutcome;
use crate::notification::{
    HandlebarsTemplate, MessageTemplate, NotificationMessage, NotificationSender, SlackSender,
    TemplateContext,
};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// 成功时的控制台输出
pub const SUCCESS_LINE: &str = "OK!";

/// 报告摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    /// 失败端点数量
    pub failed: usize,
    /// 是否已发送通知
    pub notified: bool,
}

/// 结果报告器
pub struct OutcomeReporter {
    /// 通知发送器，未配置时为None
    notifier: Option<Arc<dyn NotificationSender>>,
    /// 告警正文模板
    template: Box<dyn MessageTemplate>,
}

impl OutcomeReporter {
    /// 创建新的报告器
    ///
    /// # 参数
    /// * `notifier` - 通知发送器（可选）
    /// * `template` - 告警正文模板
    pub fn new(
        notifier: Option<Arc<dyn NotificationSender>>,
        template: Box<dyn MessageTemplate>,
    ) -> Self {
        Self { notifier, template }
    }

    /// 只输出到控制台的报告器
    pub fn console_only() -> Result<Self> {
        Ok(Self::new(None, Box::new(HandlebarsTemplate::default_alert()?)))
    }

    /// 根据配置创建报告器
    ///
    /// # 参数
    /// * `config` - 配置
    /// * `notify` - 是否允许发送通知
    pub fn from_config(config: &Config, notify: bool) -> Result<Self> {
        let template: Box<dyn MessageTemplate> = match config.settings.message_template {
            Some(ref template) => Box::new(HandlebarsTemplate::new(template)?),
            None => Box::new(HandlebarsTemplate::default_alert()?),
        };

        let notifier: Option<Arc<dyn NotificationSender>> = if notify && config.slack.is_enabled()
        {
            Some(Arc::new(SlackSender::new(
                config.settings.slack_api_url.clone(),
                config.slack.channel.clone(),
                config.slack.token.clone(),
            )?))
        } else {
            debug!("未启用通知渠道");
            None
        };

        Ok(Self::new(notifier, template))
    }

    /// 是否配置了通知渠道
    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// 渲染控制台输出
    pub fn console_line(outcome: &RunOutcome) -> String {
        if outcome.failed_names().is_empty() {
            SUCCESS_LINE.to_string()
        } else {
            format!("Failed: {}", outcome.failed_joined())
        }
    }

    /// 输出运行结果并按需发送通知
    ///
    /// 通知发送失败作为本次运行的最终错误返回
    ///
    /// # 参数
    /// * `outcome` - 封存后的运行结果
    /// * `console` - 控制台输出目标
    pub async fn report<W: Write + Send>(
        &self,
        outcome: &RunOutcome,
        console: &mut W,
    ) -> Result<ReportSummary> {
        writeln!(console, "{}", Self::console_line(outcome))?;
        console.flush()?;

        let failed = outcome.failed_names().len();
        if failed == 0 {
            return Ok(ReportSummary {
                failed,
                notified: false,
            });
        }

        let Some(ref notifier) = self.notifier else {
            return Ok(ReportSummary {
                failed,
                notified: false,
            });
        };

        let content = self.template.render(&TemplateContext::from_outcome(outcome))?;
        notifier
            .send_message(&NotificationMessage::alert(content))
            .await?;

        info!("已发送失败通知，失败端点数量: {}", failed);
        Ok(ReportSummary {
            failed,
            notified: true,
        })
    }
}
