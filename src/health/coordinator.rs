//! 检测协调器模块
//!
//! 为每个端点并发派发一次检测，经由通道汇总结果，
//! 所有检测结束后封存为唯一的运行结果

use crate::error::HealthCheckError;
use crate::health::checker::EndpointChecker;
use crate::health::endpoint::EndpointSet;
use crate::health::result::{CheckResult, OutcomeBuilder, RunOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// 检测协调器
pub struct Coordinator {
    /// 端点检测器
    checker: Arc<dyn EndpointChecker>,
}

impl Coordinator {
    /// 创建新的协调器
    ///
    /// # 参数
    /// * `checker` - 端点检测器
    pub fn new(checker: Arc<dyn EndpointChecker>) -> Self {
        Self { checker }
    }

    /// 执行一次完整的检测运行
    ///
    /// 任一端点出现传输层错误时整次运行失败，已汇总的失败列表不返回给调用方
    ///
    /// # 参数
    /// * `endpoints` - 端点集合
    ///
    /// # 返回
    /// * `Result<RunOutcome, HealthCheckError>` - 封存后的运行结果
    pub async fn run_checks(&self, endpoints: &EndpointSet) -> Result<RunOutcome, HealthCheckError> {
        let outcome = self.collect(endpoints).await?;

        if let Some(err) = outcome.hard_error() {
            error!("检测运行失败 [{}]: {}", outcome.run_id(), err);
        }

        outcome.into_result()
    }

    /// 派发全部检测并返回封存结果，运行错误保留在结果中
    pub async fn collect(&self, endpoints: &EndpointSet) -> Result<RunOutcome, HealthCheckError> {
        let expected = endpoints.len();
        let builder = OutcomeBuilder::new(expected);
        let run_id = builder.run_id();

        info!("开始检测运行 [{}]，端点数量: {}", run_id, expected);

        // 容量等于派发数量，检测任务发送结果时永不阻塞
        let (report_tx, report_rx) = mpsc::channel::<CheckResult>(expected.max(1));
        let (sealed_tx, sealed_rx) = oneshot::channel::<RunOutcome>();

        tokio::spawn(aggregate(builder, report_rx, sealed_tx));

        let mut handles = Vec::with_capacity(expected);
        for endpoint in endpoints.iter().cloned() {
            let checker = Arc::clone(&self.checker);
            let report_tx = report_tx.clone();

            handles.push(tokio::spawn(async move {
                debug!("开始检测端点: {} ({})", endpoint.name, endpoint.url);

                let result = checker.check(&endpoint).await;
                match &result {
                    CheckResult::Healthy => debug!("端点检测正常: {}", endpoint.name),
                    CheckResult::Unhealthy(_) => warn!("端点检测失败: {}", endpoint.name),
                    CheckResult::Errored(e) => error!("端点检测出错 {}: {}", endpoint.name, e),
                }

                if report_tx.send(result).await.is_err() {
                    warn!("汇总通道已关闭，丢弃结果: {}", endpoint.name);
                }
            }));
        }

        // 只保留检测任务持有的发送端，全部结束后通道关闭
        drop(report_tx);

        for joined in futures::future::join_all(handles).await {
            if let Err(e) = joined {
                error!("检测任务异常退出: {}", e);
            }
        }

        let outcome = sealed_rx
            .await
            .map_err(|_| HealthCheckError::TaskFailed("汇总任务未返回结果".to_string()))?;

        info!(
            "检测运行结束 [{}]: 已检测 {}/{}，失败 {} 个",
            outcome.run_id(),
            outcome.checked(),
            outcome.expected(),
            outcome.failed_names().len()
        );

        Ok(outcome)
    }
}

/// 汇总任务：收齐预期数量的结果或通道关闭后封存
async fn aggregate(
    mut builder: OutcomeBuilder,
    mut reports: mpsc::Receiver<CheckResult>,
    sealed: oneshot::Sender<RunOutcome>,
) {
    while !builder.is_complete() {
        match reports.recv().await {
            Some(result) => builder.record(result),
            None => {
                warn!("汇总通道提前关闭，结果未收齐");
                break;
            }
        }
    }

    reports.close();

    if sealed.send(builder.seal()).is_err() {
        warn!("运行结果无人接收");
    }
}
