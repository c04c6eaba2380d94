//! HTTP端点检测器实现
//!
//! 对单个端点发起一次GET请求并对结果分类

use crate::error::{HealthCheckError, Result};
use crate::health::endpoint::Endpoint;
use crate::health::result::CheckResult;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// 默认单次请求超时时间
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 端点检测器trait，定义检测接口
#[async_trait]
pub trait EndpointChecker: Send + Sync {
    /// 执行一次检测
    ///
    /// # 参数
    /// * `endpoint` - 被检测的端点
    ///
    /// # 返回
    /// * `CheckResult` - 检测结果，传输层错误以 `Errored` 返回
    async fn check(&self, endpoint: &Endpoint) -> CheckResult;
}

/// 判断状态码是否健康（200..=204，含两端）
pub fn is_healthy_status(status_code: u16) -> bool {
    (200..=204).contains(&status_code)
}

/// HTTP端点检测器实现
pub struct HttpEndpointChecker {
    /// HTTP客户端
    client: Client,
    /// 单次请求超时时间
    request_timeout: Duration,
}

impl HttpEndpointChecker {
    /// 创建新的HTTP检测器
    ///
    /// # 参数
    /// * `request_timeout` - 单次请求超时时间
    ///
    /// # 返回
    /// * `Result<Self>` - 检测器实例
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(HealthCheckError::RequestError)?;

        Ok(Self {
            client,
            request_timeout,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// 将请求错误归类为运行错误
    fn classify_error(&self, endpoint: &Endpoint, error: reqwest::Error) -> HealthCheckError {
        if error.is_timeout() {
            HealthCheckError::Timeout {
                url: endpoint.url.clone(),
            }
        } else if error.is_builder() {
            HealthCheckError::InvalidUrl {
                url: endpoint.url.clone(),
            }
        } else {
            HealthCheckError::RequestError(error)
        }
    }
}

/// 格式化请求错误信息，便于日志阅读
pub fn describe_request_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "Request timeout"
    } else if error.is_connect() {
        "Connection refused"
    } else if error.is_builder() {
        "Invalid request"
    } else if error.is_decode() {
        "Response decode error"
    } else {
        "Request failed"
    }
}

#[async_trait]
impl EndpointChecker for HttpEndpointChecker {
    async fn check(&self, endpoint: &Endpoint) -> CheckResult {
        let start_time = Instant::now();

        let response_result = timeout(
            self.request_timeout,
            self.client.get(&endpoint.url).send(),
        )
        .await;

        let elapsed_ms = start_time.elapsed().as_millis();

        match response_result {
            Ok(Ok(response)) => {
                let status_code = response.status().as_u16();
                debug!(
                    "端点 {} 返回 HTTP {} ({}ms)",
                    endpoint.name, status_code, elapsed_ms
                );

                if is_healthy_status(status_code) {
                    CheckResult::Healthy
                } else {
                    CheckResult::Unhealthy(endpoint.name.clone())
                }
            }
            Ok(Err(e)) => {
                debug!(
                    "端点 {} 请求失败: {} ({}ms)",
                    endpoint.name,
                    describe_request_error(&e),
                    elapsed_ms
                );
                CheckResult::Errored(self.classify_error(endpoint, e))
            }
            Err(_) => {
                debug!("端点 {} 请求超时 ({}ms)", endpoint.name, elapsed_ms);
                CheckResult::Errored(HealthCheckError::Timeout {
                    url: endpoint.url.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_checker() -> HttpEndpointChecker {
        HttpEndpointChecker::new(Duration::from_secs(5)).unwrap()
    }

    /// 绑定后立即释放端口，得到一个拒绝连接的地址
    fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}/health")
    }

    #[test]
    fn test_is_healthy_status_band() {
        for code in 200..=204 {
            assert!(is_healthy_status(code), "{code} should be healthy");
        }
        assert!(!is_healthy_status(199));
        assert!(!is_healthy_status(205));
        assert!(!is_healthy_status(206));
        assert!(!is_healthy_status(301));
        assert!(!is_healthy_status(404));
        assert!(!is_healthy_status(503));
    }

    #[tokio::test]
    async fn test_http_endpoint_checker_creation() {
        let checker = HttpEndpointChecker::new(DEFAULT_REQUEST_TIMEOUT);
        assert!(checker.is_ok());
        assert_eq!(checker.unwrap().request_timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_no_content_is_healthy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let endpoint = Endpoint::new("svc", format!("{}/health", server.url()));
        let result = create_test_checker().check(&endpoint).await;

        assert!(result.is_healthy());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_service_unavailable_is_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        let endpoint = Endpoint::new("svc2", format!("{}/health", server.url()));
        match create_test_checker().check(&endpoint).await {
            CheckResult::Unhealthy(name) => assert_eq!(name, "svc2"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_partial_content_is_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(206)
            .create_async()
            .await;

        let endpoint = Endpoint::new("svc", format!("{}/health", server.url()));
        let result = create_test_checker().check(&endpoint).await;
        assert!(matches!(result, CheckResult::Unhealthy(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_errored() {
        let endpoint = Endpoint::new("down", refused_url());
        let result = create_test_checker().check(&endpoint).await;

        assert!(result.is_errored());
    }
}
