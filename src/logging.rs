//! 日志系统模块
//!
//! 提供结构化日志配置和管理功能。日志统一写到 stderr 或日志文件，
//! stdout 只保留检测报告。

use log::LevelFilter;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局日志初始化状态
#[derive(Debug, Default)]
struct GlobalLoggingState {
    /// 是否已初始化
    initialized: bool,
    /// 初始化失败原因
    init_error: Option<String>,
}

/// 全局日志状态管理器
static GLOBAL_LOGGING_STATE: OnceLock<Mutex<GlobalLoggingState>> = OnceLock::new();

fn lock_state() -> MutexGuard<'static, GlobalLoggingState> {
    GLOBAL_LOGGING_STATE
        .get_or_init(|| Mutex::new(GlobalLoggingState::default()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 日志配置结构
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 日志文件路径，未设置时写到 stderr
    pub file_path: Option<PathBuf>,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            file_path: None,
            json_format: false,
        }
    }
}

/// 日志系统管理器
#[derive(Debug)]
pub struct LoggingSystem {
    config: LogConfig,
}

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 进程内只会真正安装一次 subscriber，重复调用返回新的句柄
    ///
    /// # 参数
    /// * `config` - 日志配置
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        Self::setup_logging_with_options(config, false)
    }

    /// 初始化日志系统（带选项）
    ///
    /// # 参数
    /// * `config` - 日志配置
    /// * `force_reinit` - 是否强制重新初始化（主要用于测试）
    pub fn setup_logging_with_options(
        config: LogConfig,
        force_reinit: bool,
    ) -> anyhow::Result<Self> {
        {
            let state = lock_state();
            if state.initialized && !force_reinit {
                return match state.init_error {
                    None => Ok(Self { config }),
                    Some(ref e) => Err(anyhow::anyhow!("日志系统之前初始化失败: {}", e)),
                };
            }
        }

        let init_result = Self::perform_initialization(&config);

        {
            let mut state = lock_state();
            state.initialized = true;
            state.init_error = init_result.as_ref().err().map(|e| e.to_string());
        }

        init_result?;
        Ok(Self { config })
    }

    /// 当前句柄使用的配置
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn perform_initialization(config: &LogConfig) -> anyhow::Result<()> {
        Self::init_log_tracer()?;
        Self::init_tracing_subscriber(config)
    }

    /// 初始化 LogTracer（log crate 到 tracing 的桥接）
    fn init_log_tracer() -> anyhow::Result<()> {
        use tracing_log::LogTracer;

        static LOG_TRACER_INIT: OnceLock<Result<(), String>> = OnceLock::new();

        LOG_TRACER_INIT
            .get_or_init(|| LogTracer::init().map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| anyhow::anyhow!("LogTracer初始化失败: {}", e))?;
        Ok(())
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        // RUST_LOG 中的模块级指令与命令行级别叠加
        let env_filter = EnvFilter::from_default_env()
            .add_directive(Self::convert_level_to_directive(config.level));

        let result = if let Some(file_path) = &config.file_path {
            let file = std::fs::File::create(file_path)
                .map_err(|e| anyhow::anyhow!("创建日志文件失败: {}", e))?;
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_target(true);

            registry().with(env_filter).with(file_layer).try_init()
        } else {
            let stderr_layer = if config.json_format {
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_current_span(false)
                    .boxed()
            } else {
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_target(true)
                    .boxed()
            };

            registry().with(env_filter).with(stderr_layer).try_init()
        };

        match result {
            Ok(()) => {
                tracing::debug!("日志系统初始化完成: {:?}", config);
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains(
                    "attempted to set a logger after the logging system was already initialized",
                ) || error_msg.contains("a global default trace dispatcher has already been set")
                {
                    tracing::debug!("日志系统已经初始化过了");
                    Ok(())
                } else {
                    Err(anyhow::anyhow!(
                        "tracing subscriber初始化失败: {}",
                        error_msg
                    ))
                }
            }
        }
    }

    fn convert_level_to_directive(level: LevelFilter) -> Directive {
        match level {
            LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF.into(),
            LevelFilter::Error => Directive::from(tracing::Level::ERROR),
            LevelFilter::Warn => Directive::from(tracing::Level::WARN),
            LevelFilter::Info => Directive::from(tracing::Level::INFO),
            LevelFilter::Debug => Directive::from(tracing::Level::DEBUG),
            LevelFilter::Trace => Directive::from(tracing::Level::TRACE),
        }
    }

    /// 重置日志系统状态（主要用于测试）
    #[cfg(test)]
    pub fn reset_for_testing() {
        let mut state = lock_state();
        *state = GlobalLoggingState::default();
    }
}
