//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::health::probe::{DEFAULT_CONNECTIVITY_TIMEOUT, DEFAULT_CONNECTIVITY_URL};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Vitals Check - 一次性HTTP端点健康检测
#[derive(Parser, Debug, Clone)]
#[command(
    name = "vitals-check",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "VITALS_CHECK_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "warn",
        help = "日志级别",
        env = "VITALS_CHECK_LOG_LEVEL",
        global = true
    )]
    pub log_level: LogLevel,

    /// 以JSON格式输出日志
    #[arg(long, help = "以JSON格式输出日志", global = true)]
    pub json_logs: bool,

    /// 日志文件路径，省略时日志写到 stderr
    #[arg(
        long,
        value_name = "FILE",
        help = "日志文件路径",
        env = "VITALS_CHECK_LOG_FILE",
        global = true
    )]
    pub log_file: Option<PathBuf>,

    /// 子命令，省略时执行 run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// `run` 子命令参数
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// 单次请求超时时间（秒），覆盖配置文件
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "单次请求超时时间（秒）",
        env = "VITALS_CHECK_TIMEOUT"
    )]
    pub timeout: Option<u64>,

    /// 跳过连通性预检
    #[arg(long, help = "跳过连通性预检")]
    pub skip_connectivity: bool,

    /// 连通性探测地址
    #[arg(
        long,
        value_name = "URL",
        default_value = DEFAULT_CONNECTIVITY_URL,
        help = "连通性探测地址",
        env = "VITALS_CHECK_CONNECTIVITY_URL"
    )]
    pub connectivity_url: String,

    /// 连通性探测超时时间（秒）
    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "5",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "连通性探测超时时间（秒）"
    )]
    pub connectivity_timeout: u64,

    /// 不发送通知
    #[arg(long, help = "不发送通知，只输出到控制台")]
    pub no_notify: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            timeout: None,
            skip_connectivity: false,
            connectivity_url: DEFAULT_CONNECTIVITY_URL.to_string(),
            connectivity_timeout: DEFAULT_CONNECTIVITY_TIMEOUT.as_secs(),
            no_notify: false,
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 执行一次健康检测（默认）
    Run(RunArgs),

    /// 验证配置文件
    Validate {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,

        /// 是否显示详细信息
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },

    /// 初始化配置文件
    Init {
        /// 配置文件路径
        #[arg(
            value_name = "FILE",
            help = "配置文件路径",
            default_value = crate::config::loader::DEFAULT_CONFIG_FILE
        )]
        config_path: PathBuf,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 测试通知功能
    TestNotification {
        /// 测试消息内容
        #[arg(short, long, default_value = "Test notification from vitals-check", help = "测试消息内容")]
        message: String,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }

    /// 获取要执行的命令，省略时为默认参数的 run
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}
