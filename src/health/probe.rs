//! 网络连通性预检
//!
//! 在派发任何检测之前确认本机可以访问外网

use crate::error::{HealthCheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// 默认的连通性探测地址
pub const DEFAULT_CONNECTIVITY_URL: &str = "http://clients3.google.com/generate_204";

/// 默认的连通性探测超时时间
pub const DEFAULT_CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// 连通性探测trait
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// 探测是否可以访问外网，任何失败都表现为 `false`
    async fn is_reachable(&self) -> bool;

    /// 探测目标地址
    fn target(&self) -> &str;
}

/// 基于HTTP请求的连通性探测
pub struct HttpConnectivityProbe {
    client: Client,
    url: String,
}

impl HttpConnectivityProbe {
    /// 创建新的探测器
    ///
    /// # 参数
    /// * `url` - 探测地址
    /// * `timeout` - 请求超时时间
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HealthCheckError::RequestError)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    async fn is_reachable(&self) -> bool {
        // 收到任何HTTP响应都视为可达，与状态码无关
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                debug!("连通性探测响应: {} {}", self.url, response.status());
                true
            }
            Err(e) => {
                warn!("连通性探测失败: {} - {}", self.url, e);
                false
            }
        }
    }

    fn target(&self) -> &str {
        &self.url
    }
}
