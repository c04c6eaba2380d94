//! 核心模块
//!
//! 包含单次检测运行、结果报告和命令分发

pub mod app;
pub mod reporter;
pub mod run;

// 重新导出主要类型
pub use app::execute_command;
pub use reporter::{OutcomeReporter, ReportSummary};
pub use run::{HealthcheckRun, RunOptions, RunReport};
