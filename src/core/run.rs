//! 单次检测运行
//!
//! 连通性预检 → 加载配置 → 并发检测 → 报告结果

use crate::config::{Config, ConfigLoader, FileConfigLoader};
use crate::core::reporter::{OutcomeReporter, ReportSummary};
use crate::error::{Result, VitalsError};
use crate::health::{ConnectivityProbe, Coordinator, HttpEndpointChecker, RunOutcome};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 离线时的控制台提示
pub const OFFLINE_LINE: &str = "You are not connected to the internet";

/// 运行参数
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 配置文件路径
    pub config_path: PathBuf,
    /// 覆盖配置中的单次请求超时时间（秒）
    pub timeout_override: Option<u64>,
    /// 是否允许发送通知
    pub notify: bool,
}

/// 一次运行的最终结果
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub summary: ReportSummary,
}

/// 检测运行器
pub struct HealthcheckRun {
    /// 连通性探测器，None 表示跳过预检
    probe: Option<Arc<dyn ConnectivityProbe>>,
    options: RunOptions,
}

impl HealthcheckRun {
    /// 创建新的运行器
    pub fn new(probe: Option<Arc<dyn ConnectivityProbe>>, options: RunOptions) -> Self {
        Self { probe, options }
    }

    /// 执行完整流程
    ///
    /// # 参数
    /// * `console` - 控制台输出目标
    ///
    /// # 返回
    /// * `Result<RunReport>` - 任一环节失败都作为运行错误返回
    pub async fn execute<W: Write + Send>(&self, console: &mut W) -> Result<RunReport> {
        self.preflight(console).await?;

        let config = self.load_config().await?;
        let endpoints = config.endpoint_set();

        let timeout_secs = self
            .options
            .timeout_override
            .unwrap_or(config.settings.request_timeout_seconds);
        let checker = HttpEndpointChecker::new(Duration::from_secs(timeout_secs))?;
        let coordinator = Coordinator::new(Arc::new(checker));
        let reporter = OutcomeReporter::from_config(&config, self.options.notify)?;

        let outcome = coordinator.run_checks(&endpoints).await?;
        let summary = reporter.report(&outcome, console).await?;

        Ok(RunReport { outcome, summary })
    }

    /// 连通性预检，失败时不派发任何检测
    async fn preflight<W: Write + Send>(&self, console: &mut W) -> Result<()> {
        let Some(ref probe) = self.probe else {
            warn!("已跳过连通性预检");
            return Ok(());
        };

        if probe.is_reachable().await {
            info!("连通性预检通过: {}", probe.target());
            Ok(())
        } else {
            writeln!(console, "{OFFLINE_LINE}")?;
            Err(VitalsError::Connectivity {
                url: probe.target().to_string(),
            })
        }
    }

    /// 加载并验证配置
    async fn load_config(&self) -> Result<Config> {
        let loader = FileConfigLoader::new(true);
        let mut config = loader.load_from_file(&self.options.config_path).await?;

        if let Some(timeout_secs) = self.options.timeout_override {
            config.settings.request_timeout_seconds = timeout_secs;
        }
        loader.validate(&config)?;

        info!("配置加载完成，端点数量: {}", config.endpoints.len());
        Ok(config)
    }
}
