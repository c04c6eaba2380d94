//! 健康检测结果数据结构
//!
//! 定义单个端点的检测结果以及一次运行的汇总结果

use crate::error::HealthCheckError;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::warn;
use uuid::Uuid;

/// 单个端点的检测结果，每个端点每次运行恰好产生一个
#[derive(Debug)]
pub enum CheckResult {
    /// 状态码在 200..=204 之间
    Healthy,
    /// 收到响应但状态码不在健康范围内
    Unhealthy(String),
    /// 传输层错误
    Errored(HealthCheckError),
}

impl CheckResult {
    /// 判断结果是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckResult::Healthy)
    }

    /// 判断结果是否为传输层错误
    pub fn is_errored(&self) -> bool {
        matches!(self, CheckResult::Errored(_))
    }
}

/// 汇总中的运行结果，尚未封存
///
/// 只能由汇总方持有并逐条写入，调用 [`OutcomeBuilder::seal`] 后得到只读的 [`RunOutcome`]
#[derive(Debug)]
pub struct OutcomeBuilder {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    expected: usize,
    received: usize,
    failed_names: BTreeSet<String>,
    hard_error: Option<HealthCheckError>,
    dropped_errors: usize,
}

impl OutcomeBuilder {
    /// 创建新的汇总
    ///
    /// # 参数
    /// * `expected` - 本次运行派发的检测数量
    pub fn new(expected: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            expected,
            received: 0,
            failed_names: BTreeSet::new(),
            hard_error: None,
            dropped_errors: 0,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// 记录一条检测结果
    ///
    /// 第一个错误会被保留，之后的错误只记录日志
    pub fn record(&mut self, result: CheckResult) {
        self.received += 1;

        match result {
            CheckResult::Healthy => {}
            CheckResult::Unhealthy(name) => {
                self.failed_names.insert(name);
            }
            CheckResult::Errored(err) => {
                if self.hard_error.is_none() {
                    self.hard_error = Some(err);
                } else {
                    self.dropped_errors += 1;
                    warn!("已存在检测错误，丢弃后续错误: {}", err);
                }
            }
        }
    }

    /// 是否已收齐全部结果
    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }

    /// 封存汇总结果
    ///
    /// 结果未收齐且没有其他错误时，以 [`HealthCheckError::IncompleteRun`] 作为运行错误
    pub fn seal(mut self) -> RunOutcome {
        if !self.is_complete() && self.hard_error.is_none() {
            self.hard_error = Some(HealthCheckError::IncompleteRun {
                expected: self.expected,
                received: self.received,
            });
        }

        RunOutcome {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            expected: self.expected,
            checked: self.received,
            failed_names: self.failed_names,
            hard_error: self.hard_error,
            dropped_errors: self.dropped_errors,
        }
    }
}

/// 一次运行的最终结果（已封存，只读）
#[derive(Debug)]
pub struct RunOutcome {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    expected: usize,
    checked: usize,
    failed_names: BTreeSet<String>,
    hard_error: Option<HealthCheckError>,
    dropped_errors: usize,
}

impl RunOutcome {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// 派发的检测数量
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// 实际收到的结果数量
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// 不健康的端点名称（按名称排序）
    pub fn failed_names(&self) -> &BTreeSet<String> {
        &self.failed_names
    }

    pub fn hard_error(&self) -> Option<&HealthCheckError> {
        self.hard_error.as_ref()
    }

    /// 被丢弃的后续错误数量
    pub fn dropped_errors(&self) -> usize {
        self.dropped_errors
    }

    /// 没有失败端点也没有错误
    pub fn is_healthy(&self) -> bool {
        self.failed_names.is_empty() && self.hard_error.is_none()
    }

    /// 以 ", " 连接失败的端点名称
    pub fn failed_joined(&self) -> String {
        self.failed_names
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 转换为调用方结果，存在运行错误时丢弃已汇总的失败列表
    pub fn into_result(mut self) -> Result<RunOutcome, HealthCheckError> {
        match self.hard_error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
