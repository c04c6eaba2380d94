//! 应用程序核心逻辑
//!
//! 命令分发和进程退出约定

use crate::cli::args::{Args, Commands};
use crate::cli::commands::{
    Command, InitCommand, RunCommand, TestNotificationCommand, ValidateCommand, VersionCommand,
};
use crate::logging::{LogConfig, LoggingSystem};
use anyhow::{Context, Result};
use tracing::{debug, error};

/// 应用程序主函数
///
/// 返回进程退出码：成功为0，任何运行错误为1
pub async fn main(args: Args) -> i32 {
    if let Err(e) = LoggingSystem::setup_logging(log_config(&args)).context("初始化日志系统失败") {
        eprintln!("{e:#}");
    }

    debug!("{} v{} 启动", crate::APP_NAME, crate::VERSION);

    match execute_command(&args).await {
        Ok(()) => 0,
        Err(e) => {
            error!("命令执行失败: {:#}", e);
            println!("Failure {e}");
            1
        }
    }
}

/// 由命令行参数构建日志配置
pub fn log_config(args: &Args) -> LogConfig {
    LogConfig {
        level: args.log_level.clone().into(),
        file_path: args.log_file.clone(),
        json_format: args.json_logs,
    }
}

/// 执行CLI命令
pub async fn execute_command(args: &Args) -> Result<()> {
    let command: Box<dyn Command> = match args.command() {
        Commands::Run(_) => Box::new(RunCommand),
        Commands::Validate { .. } => Box::new(ValidateCommand),
        Commands::Init { .. } => Box::new(InitCommand),
        Commands::TestNotification { .. } => Box::new(TestNotificationCommand),
        Commands::Version { .. } => Box::new(VersionCommand),
    };

    command.execute(args).await.map_err(anyhow::Error::from)
}
