//! Vitals Check - 一次性HTTP端点健康检测工具
//!
//! 每次运行：
//! - 连通性预检，离线时直接失败
//! - 并发检测所有配置的端点，汇总失败列表
//! - 控制台输出结果，存在失败时可发送Slack告警
//! - 任何运行错误以非零退出码结束进程

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use config::{Config, Settings, SlackConfig};
pub use error::{Result, VitalsError};
pub use health::{
    CheckResult, Coordinator, Endpoint, EndpointChecker, EndpointSet, HttpEndpointChecker,
    RunOutcome,
};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
