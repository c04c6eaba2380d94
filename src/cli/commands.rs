//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat, RunArgs};
use crate::config::{ConfigLoader, FileConfigLoader};
use crate::core::run::{HealthcheckRun, RunOptions};
use crate::error::{NotificationError, Result};
use crate::health::{ConnectivityProbe, HttpConnectivityProbe};
use crate::notification::{NotificationMessage, NotificationSender, SlackSender};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// `init` 生成的示例配置
pub const SAMPLE_CONFIG: &str = r#"{
  "slack": {
    "channel": "",
    "token": "${SLACK_TOKEN}"
  },
  "endpoints": {
    "example": "https://example.com/"
  },
  "settings": {
    "request_timeout_seconds": 10
  }
}
"#;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 检测命令
pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Run(run_args) = args.command() {
            self.run_once(args, &run_args).await
        } else {
            Ok(())
        }
    }
}

impl RunCommand {
    async fn run_once(&self, args: &Args, run_args: &RunArgs) -> Result<()> {
        let probe: Option<Arc<dyn ConnectivityProbe>> = if run_args.skip_connectivity {
            None
        } else {
            Some(Arc::new(HttpConnectivityProbe::new(
                run_args.connectivity_url.clone(),
                Duration::from_secs(run_args.connectivity_timeout),
            )?))
        };

        let options = RunOptions {
            config_path: args.get_config_path(),
            timeout_override: run_args.timeout,
            notify: !run_args.no_notify,
        };

        let mut stdout = std::io::stdout();
        HealthcheckRun::new(probe, options)
            .execute(&mut stdout)
            .await?;

        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = args.command() {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Init { config_path, force } = args.command() {
            self.create_config_file(&config_path, force).await
        } else {
            Ok(())
        }
    }
}

impl InitCommand {
    /// 创建配置文件
    async fn create_config_file(&self, config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(config_path, SAMPLE_CONFIG).await?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请编辑配置文件以添加需要检测的端点");

        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate {
            config_path,
            verbose,
        } = args.command()
        {
            let config_file = config_path.unwrap_or_else(|| args.get_config_path());
            self.validate_config_file(&config_file, verbose).await
        } else {
            Ok(())
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<()> {
        println!("验证配置文件: {}", config_path.display());

        let loader = FileConfigLoader::new(true);
        let config = loader.load_from_file(config_path).await?;

        if verbose {
            println!("配置验证通过！");
            println!("  请求超时: {}秒", config.settings.request_timeout_seconds);
            println!(
                "  Slack通知: {}",
                if config.slack.is_enabled() {
                    config.slack.channel.as_str()
                } else {
                    "未启用"
                }
            );
            println!("端点配置:");
            for (i, (name, url)) in config.endpoints.iter().enumerate() {
                println!("  {}. {} ({})", i + 1, name, url);
            }
        } else {
            println!("✓ 配置文件验证通过");
            println!("✓ 找到 {} 个端点配置", config.endpoints.len());
        }

        Ok(())
    }
}

/// 测试通知命令
pub struct TestNotificationCommand;

#[async_trait]
impl Command for TestNotificationCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::TestNotification { message } = args.command() {
            self.send_test_message(args, &message).await
        } else {
            Ok(())
        }
    }
}

impl TestNotificationCommand {
    async fn send_test_message(&self, args: &Args, message: &str) -> Result<()> {
        let loader = FileConfigLoader::new(true);
        let config = loader.load_from_file(args.get_config_path()).await?;

        if !config.slack.is_enabled() {
            return Err(NotificationError::ConfigError(
                "未配置Slack频道和token".to_string(),
            )
            .into());
        }

        let sender = SlackSender::new(
            config.settings.slack_api_url.clone(),
            config.slack.channel.clone(),
            config.slack.token.clone(),
        )?;

        sender.test_connection().await?;
        sender
            .send_message(&NotificationMessage {
                title: "Healthcheck notification test".to_string(),
                content: message.to_string(),
                fallback_text: message.to_string(),
            })
            .await?;

        println!("✓ 测试通知已发送到 {}", config.slack.channel);
        Ok(())
    }
}
